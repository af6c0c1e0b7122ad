//! Exact structural equality.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use super::access::{allow_unexported, AccessGrant};
use super::render::string_diff;
use crate::value::{Key, StructValue, Value};

/// Compares `actual` and `expected` structurally, including unexported
/// fields of every struct type granted for `actual`.
///
/// Returns `(true, "")` when equal; otherwise a report with one block per
/// divergent path, `-` for the actual side and `+` for the expected side.
///
/// # Examples
///
/// ```rust
/// use trial::compare::equal;
/// use trial::value::Value;
/// assert_eq!(equal(&Value::of(&vec![1, 2]), &Value::of(&vec![1, 2])), (true, String::new()));
/// let (eq, diff) = equal(&Value::from("a"), &Value::from("b"));
/// assert!(!eq);
/// assert!(diff.contains("\"a\"") && diff.contains("\"b\""));
/// ```
pub fn equal(actual: &Value, expected: &Value) -> (bool, String) {
    tracing::trace!(actual = %actual.type_name(), expected = %expected.type_name(), "exact compare");
    let grants = allow_unexported(actual);
    let report = Walker::new(&grants).run(actual, expected);
    (report.is_empty(), report)
}

struct Walker {
    granted: BTreeSet<String>,
    out: String,
}

impl Walker {
    fn new(grants: &[AccessGrant]) -> Self {
        Self {
            granted: grants.iter().map(|g| g.type_name().to_string()).collect(),
            out: String::new(),
        }
    }

    fn run(mut self, actual: &Value, expected: &Value) -> String {
        self.walk(&actual.type_name(), actual, expected);
        self.out
    }

    fn walk(&mut self, path: &str, actual: &Value, expected: &Value) {
        if actual.type_name() != expected.type_name() {
            let _ = writeln!(
                self.out,
                "{}: type mismatch -{} +{}\n  -: {}\n  +: {}",
                path,
                actual.type_name(),
                expected.type_name(),
                actual.literal(),
                expected.literal()
            );
            return;
        }
        match (actual, expected) {
            (Value::Nil, Value::Nil) => {}
            (Value::Float(a), Value::Float(b)) => {
                if a != b && !(a.is_nan() && b.is_nan()) {
                    self.values(path, actual, expected);
                }
            }
            (Value::Str(a), Value::Str(b)) => {
                if a != b {
                    let _ = write!(self.out, "{}:\n{}", path, string_diff(a, b));
                }
            }
            (Value::Slice { items: a, .. }, Value::Slice { items: b, .. })
            | (Value::Array { items: a, .. }, Value::Array { items: b, .. }) => {
                self.sequence(path, a, b)
            }
            (Value::Map { entries: a, .. }, Value::Map { entries: b, .. }) => {
                for (key, av) in a {
                    match b.get(key) {
                        Some(bv) => self.walk(&index(path, key), av, bv),
                        None => self.one_sided(&index(path, key), Some(av), None),
                    }
                }
                for (key, bv) in b.iter().filter(|(k, _)| !a.contains_key(*k)) {
                    self.one_sided(&index(path, key), None, Some(bv));
                }
            }
            (Value::Struct(a), Value::Struct(b)) => self.structure(path, a, b),
            (Value::Pointer { target: a, .. }, Value::Pointer { target: b, .. }) => {
                match (a, b) {
                    (None, None) => {}
                    (Some(a), Some(b)) => self.walk(path, a, b),
                    _ => self.values(path, actual, expected),
                }
            }
            (Value::Func(a), Value::Func(b)) => {
                if a.addr != b.addr {
                    self.values(path, actual, expected);
                }
            }
            (Value::Bool(a), Value::Bool(b)) if a == b => {}
            (Value::Int(a), Value::Int(b)) if a == b => {}
            (Value::Uint(a), Value::Uint(b)) if a == b => {}
            (Value::Char(a), Value::Char(b)) if a == b => {}
            _ => self.values(path, actual, expected),
        }
    }

    fn sequence(&mut self, path: &str, a: &[Value], b: &[Value]) {
        for i in 0..a.len().max(b.len()) {
            let at = format!("{}[{}]", path, i);
            match (a.get(i), b.get(i)) {
                (Some(av), Some(bv)) => self.walk(&at, av, bv),
                (av, bv) => self.one_sided(&at, av, bv),
            }
        }
    }

    fn structure(&mut self, path: &str, a: &StructValue, b: &StructValue) {
        if a.module != b.module {
            let _ = writeln!(
                self.out,
                "{}: type mismatch -{} +{}",
                path,
                a.qualified_name(),
                b.qualified_name()
            );
            return;
        }
        let same_layout = a.fields.len() == b.fields.len()
            && a.fields.iter().zip(&b.fields).all(|(fa, fb)| fa.name == fb.name);
        if !same_layout {
            let _ = writeln!(
                self.out,
                "{}: field mismatch -{{{}}} +{{{}}}",
                path,
                field_names(a),
                field_names(b)
            );
            return;
        }
        let granted = self.granted.contains(a.name);
        for (fa, fb) in a.fields.iter().zip(&b.fields) {
            let at = format!("{}.{}", path, fa.name);
            if !fa.exported && !granted {
                let _ = writeln!(
                    self.out,
                    "{}: cannot compare unexported field without an access grant for {}",
                    at, a.name
                );
                continue;
            }
            self.walk(&at, &fa.value, &fb.value);
        }
    }

    fn values(&mut self, path: &str, actual: &Value, expected: &Value) {
        let _ = writeln!(
            self.out,
            "{}:\n  -: {}\n  +: {}",
            path,
            actual.literal(),
            expected.literal()
        );
    }

    fn one_sided(&mut self, path: &str, actual: Option<&Value>, expected: Option<&Value>) {
        let side = |v: Option<&Value>| v.map_or_else(|| "<absent>".to_string(), Value::literal);
        let _ = writeln!(
            self.out,
            "{}:\n  -: {}\n  +: {}",
            path,
            side(actual),
            side(expected)
        );
    }
}

fn field_names(s: &StructValue) -> String {
    s.fields.iter().map(|f| f.name).collect::<Vec<_>>().join(", ")
}

fn index(path: &str, key: &Key) -> String {
    format!("{}[{}]", path, key.literal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Field, Reflect, StructValue};
    use pretty_assertions::assert_eq;

    #[derive(Clone)]
    struct Wallet {
        pub owner: String,
        balance: i64,
    }

    crate::reflect_struct!(Wallet {
        pub owner: String,
        balance: i64,
    });

    #[test]
    fn unexported_fields_take_part() {
        let a = Wallet {
            owner: "ann".into(),
            balance: 1,
        };
        let mut b = a.clone();
        assert_eq!(equal(&a.reflect(), &b.reflect()), (true, String::new()));

        b.balance = 2;
        let (eq, diff) = equal(&a.reflect(), &b.reflect());
        assert!(!eq);
        assert_eq!(diff, "Wallet.balance:\n  -: 1\n  +: 2\n");
    }

    #[test]
    fn ungranted_unexported_field_is_reported() {
        let hidden = Value::Struct(StructValue::new("Hidden").with_field(Field::new(
            "n",
            false,
            i64::type_desc,
            Value::Int(1),
        )));
        let diff = Walker::new(&[]).run(&hidden, &hidden);
        assert_eq!(
            diff,
            "Hidden.n: cannot compare unexported field without an access grant for Hidden\n"
        );
    }

    #[test]
    fn struct_behind_a_dynamic_slot_is_granted() {
        let secret = |pin: i64| {
            Value::Struct(StructValue::new("Secret").private_field("pin", &pin))
        };
        let envelope = |pin: i64| {
            Value::Struct(StructValue::new("Envelope").private_field("payload", &secret(pin)))
        };
        assert_eq!(equal(&envelope(1), &envelope(1)), (true, String::new()));
        let (eq, diff) = equal(&envelope(1), &envelope(2));
        assert!(!eq);
        assert_eq!(diff, "Envelope.payload.pin:\n  -: 1\n  +: 2\n");

        let bag = Value::Struct(StructValue::new("Bag").private_field("items", &vec![secret(7)]));
        assert_eq!(equal(&bag, &bag), (true, String::new()));
    }

    #[test]
    fn same_name_different_fields_differ() {
        let a = Value::Struct(StructValue::new("X").field("a", &1));
        let b = Value::Struct(StructValue::new("X").field("a", &1).field("b", &2));
        let (eq, diff) = equal(&a, &b);
        assert!(!eq);
        assert_eq!(diff, "X: field mismatch -{a} +{a, b}\n");

        let c = Value::Struct(StructValue::new("X").field("c", &1));
        assert!(!equal(&a, &c).0);
    }

    mod billing {
        pub struct Config {
            pub retries: i64,
        }

        crate::reflect_struct!(Config { pub retries: i64 });
    }

    mod shipping {
        pub struct Config {
            pub retries: i64,
        }

        crate::reflect_struct!(Config { pub retries: i64 });
    }

    #[test]
    fn same_name_in_different_modules_differ() {
        let a = billing::Config { retries: 3 };
        let b = shipping::Config { retries: 3 };
        assert!(equal(&a.reflect(), &a.reflect()).0);
        let (eq, diff) = equal(&a.reflect(), &b.reflect());
        assert!(!eq);
        assert_eq!(
            diff,
            "Config: type mismatch -trial::compare::exact::tests::billing::Config \
             +trial::compare::exact::tests::shipping::Config\n"
        );
    }

    #[test]
    fn sequences_are_positional() {
        let (eq, diff) = equal(&Value::of(&vec![1, 2, 3]), &Value::of(&vec![1, 3]));
        assert!(!eq);
        assert_eq!(
            diff,
            "Vec<i64>[1]:\n  -: 2\n  +: 3\nVec<i64>[2]:\n  -: 3\n  +: <absent>\n"
        );
    }

    #[test]
    fn maps_are_keyed() {
        let a: std::collections::HashMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let b: std::collections::HashMap<&str, i32> = [("b", 2), ("a", 1)].into_iter().collect();
        assert!(equal(&a.reflect(), &b.reflect()).0);

        let c: std::collections::HashMap<&str, i32> = [("a", 1), ("c", 2)].into_iter().collect();
        let (_, diff) = equal(&a.reflect(), &c.reflect());
        assert!(diff.contains(r#"Map<String, i64>["b"]"#));
        assert!(diff.contains(r#"Map<String, i64>["c"]"#));
    }

    #[test]
    fn type_mismatch_names_both_types() {
        let (eq, diff) = equal(&Value::from(1i64), &Value::from("1"));
        assert!(!eq);
        assert!(diff.starts_with("i64: type mismatch -i64 +String"));
    }

    #[test]
    fn nan_equals_nan() {
        assert!(equal(&Value::from(f64::NAN), &Value::from(f64::NAN)).0);
        assert!(!equal(&Value::from(1.0), &Value::from(1.5)).0);
    }

    #[test]
    fn nil_pointers() {
        let none: Option<i32> = None;
        assert!(equal(&none.reflect(), &none.reflect()).0);
        let (eq, diff) = equal(&none.reflect(), &Some(1).reflect());
        assert!(!eq);
        assert!(diff.contains("None") && diff.contains("Some(1)"));
    }
}
