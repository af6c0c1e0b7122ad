use std::error::Error as StdError;
use std::fmt;

/// Error type returned by functions under test.
pub type TestError = Box<dyn StdError + Send + Sync + 'static>;

/// What a failing case's error must look like.
#[derive(Clone)]
pub enum ExpectedError {
    /// The error message must contain this text.
    Message(String),
    /// The error must be of a given concrete type.
    Type {
        name: &'static str,
        check: fn(&(dyn StdError + Send + Sync + 'static)) -> bool,
    },
}

impl ExpectedError {
    /// Matches errors whose concrete type is `E`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trial::trial::{ExpectedError, TestError};
    /// let err: TestError = "12x".parse::<i32>().unwrap_err().into();
    /// assert!(ExpectedError::of_type::<std::num::ParseIntError>().matches(&err));
    /// assert!(!ExpectedError::of_type::<std::fmt::Error>().matches(&err));
    /// ```
    pub fn of_type<E: StdError + 'static>() -> Self {
        ExpectedError::Type {
            name: std::any::type_name::<E>(),
            check: |err| err.is::<E>(),
        }
    }

    pub fn matches(&self, actual: &TestError) -> bool {
        match self {
            ExpectedError::Message(text) => actual.to_string().contains(text.as_str()),
            ExpectedError::Type { check, .. } => check(&**actual),
        }
    }
}

impl fmt::Display for ExpectedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedError::Message(text) => write!(f, "{}", text),
            ExpectedError::Type { name, .. } => write!(f, "error of type {}", name),
        }
    }
}

impl fmt::Debug for ExpectedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedError::Message(text) => f.debug_tuple("Message").field(text).finish(),
            ExpectedError::Type { name, .. } => f.debug_struct("Type").field("name", name).finish(),
        }
    }
}

impl From<&str> for ExpectedError {
    fn from(text: &str) -> Self {
        ExpectedError::Message(text.to_string())
    }
}

impl From<String> for ExpectedError {
    fn from(text: String) -> Self {
        ExpectedError::Message(text)
    }
}
