use std::collections::BTreeMap;

use super::expected::ExpectedError;
use crate::value::{Reflect, Value};

/// Named cases, run in name order.
pub type Cases = BTreeMap<String, Case>;

/// One scenario for the function under test.
///
/// # Examples
///
/// ```rust
/// use trial::trial::Case;
/// use trial::value::Value;
/// let case = Case::new(2).expect(4);
/// assert_eq!(case.input.len(), 1);
/// let failing = Case::args(vec![Value::from(1i64), Value::from(0i64)]).should_err();
/// assert!(failing.should_err);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Case {
    /// Arguments passed to the function under test.
    pub input: Vec<Value>,
    pub expected: Value,

    /// an error is expected
    pub should_err: bool,
    /// the error that is expected; implies `should_err`
    pub expected_err: Option<ExpectedError>,
    /// a panic is expected
    pub should_panic: bool,
}

impl Case {
    /// A case with a single input argument.
    pub fn new<T: Reflect>(input: T) -> Self {
        Self {
            input: vec![input.reflect()],
            ..Self::default()
        }
    }

    /// A case whose input is spread over several arguments.
    pub fn args(input: Vec<Value>) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    pub fn expect<T: Reflect>(mut self, expected: T) -> Self {
        self.expected = expected.reflect();
        self
    }

    pub fn expect_value(mut self, expected: Value) -> Self {
        self.expected = expected;
        self
    }

    pub fn should_err(mut self) -> Self {
        self.should_err = true;
        self
    }

    pub fn expected_err(mut self, expected: impl Into<ExpectedError>) -> Self {
        self.expected_err = Some(expected.into());
        self
    }

    pub fn should_panic(mut self) -> Self {
        self.should_panic = true;
        self
    }
}
