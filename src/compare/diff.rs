//! Accumulator for containment differences.

use std::fmt;

/// Collected differences between a container and a subset.
///
/// `extra` holds values present only on the container side, `missing` values
/// present only on the subset side, and `messages` free-form explanations.
/// Messages take priority when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    extra: Vec<String>,
    missing: Vec<String>,
    messages: Vec<String>,
}

impl Diff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extra(&mut self, value: impl fmt::Display) {
        self.extra.push(value.to_string());
    }

    pub fn missing(&mut self, value: impl fmt::Display) {
        self.missing.push(value.to_string());
    }

    pub fn errorf(&mut self, args: fmt::Arguments<'_>) -> &mut Self {
        self.messages.push(fmt::format(args));
        self
    }

    pub fn is_equal(&self) -> bool {
        self.extra.is_empty() && self.missing.is_empty() && self.messages.is_empty()
    }

    /// Merges `other` onto `self`, preserving discovery order. `None` is a no-op.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trial::compare::Diff;
    /// let mut parent = Diff::new();
    /// let mut child = Diff::new();
    /// child.missing(4);
    /// parent.append(child);
    /// parent.append(None::<Diff>);
    /// assert_eq!(parent.to_string(), "-4\n");
    /// ```
    pub fn append(&mut self, other: impl Into<Option<Diff>>) {
        let Some(other) = other.into() else {
            return;
        };
        self.messages.extend(other.messages);
        self.extra.extend(other.extra);
        self.missing.extend(other.missing);
    }

    pub fn extras(&self) -> &[String] {
        &self.extra
    }

    pub fn missings(&self) -> &[String] {
        &self.missing
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.messages.is_empty() {
            for msg in &self.messages {
                writeln!(f, "{}", msg)?;
            }
            return Ok(());
        }
        for v in &self.extra {
            writeln!(f, "+{}", v)?;
        }
        for v in &self.missing {
            writeln!(f, "-{}", v)?;
        }
        Ok(())
    }
}

/// An absent diff means "no difference".
pub fn is_equal(diff: Option<&Diff>) -> bool {
    diff.map_or(true, Diff::is_equal)
}

pub fn render(diff: Option<&Diff>) -> String {
    diff.map(Diff::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_diff_is_equal_and_renders_empty() {
        assert!(is_equal(None));
        assert_eq!(render(None), "");
        assert!(Diff::new().is_equal());
    }

    #[test]
    fn messages_hide_extra_and_missing() {
        let mut d = Diff::new();
        d.extra("a");
        d.missing("b");
        assert_eq!(d.to_string(), "+a\n-b\n");
        d.errorf(format_args!("type mismatch -{} +{}", "String", "i64"));
        assert_eq!(d.to_string(), "type mismatch -String +i64\n");
        assert!(!d.is_equal());
    }

    #[test]
    fn every_entry_gets_its_prefix() {
        let mut d = Diff::new();
        d.missing(1);
        d.missing(2);
        assert_eq!(d.to_string(), "-1\n-2\n");
    }

    #[test]
    fn append_is_associative_and_order_preserving() {
        let leaf = |v: i32| {
            let mut d = Diff::new();
            d.missing(v);
            d
        };

        let mut left = leaf(1);
        let mut bc = leaf(2);
        bc.append(leaf(3));
        left.append(bc);

        let mut right = leaf(1);
        right.append(leaf(2));
        right.append(leaf(3));

        assert_eq!(left, right);
        assert_eq!(left.missings(), ["1", "2", "3"]);
    }
}
