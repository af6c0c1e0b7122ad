//! Containment: is one value a structural subset of another.

use std::collections::BTreeMap;

use super::diff::{self, Diff};
use super::exact::equal;
use super::render::string_diff;
use crate::value::{Key, Kind, Value};

/// Determines whether `subset` is contained in `container`.
///
/// - string container: `subset` is a string (or has a textual representation)
///   found as a substring;
/// - slice or array container: every element of a slice/array `subset`, or a
///   single scalar `subset`, matches some container element;
/// - map container: `subset` is a map whose keys all exist in the container,
///   with contained values;
/// - anything else: exact equality.
///
/// A nil `subset` is always contained.
///
/// # Examples
///
/// ```rust
/// use trial::compare::contains;
/// use trial::value::Value;
/// assert!(contains(&Value::from("hello world"), &Value::from("world")).0);
/// assert!(contains(&Value::of(&vec![1, 2, 3]), &Value::of(&vec![3, 1])).0);
/// assert!(contains(&Value::of(&vec![1, 2, 3]), &Value::Nil).0);
/// ```
pub fn contains(container: &Value, subset: &Value) -> (bool, String) {
    if subset.is_nil() {
        return (true, String::new());
    }
    tracing::trace!(container = %container.type_name(), subset = %subset.type_name(), "containment compare");
    let d = contains_value(container, subset);
    (diff::is_equal(d.as_ref()), diff::render(d.as_ref()))
}

fn contains_value(container: &Value, subset: &Value) -> Option<Diff> {
    let mut d = Diff::new();
    match (container.kind(), container) {
        (Kind::String, Value::Str(text)) => {
            let Some(needle) = subset.as_text() else {
                d.errorf(format_args!(
                    "type mismatch -{} +{}",
                    container.type_name(),
                    subset.type_name()
                ));
                return Some(d);
            };
            if text.contains(needle) {
                return None;
            }
            d.errorf(format_args!("{}", string_diff(text, needle)));
            Some(d)
        }
        (Kind::Slice | Kind::Array, _) => {
            let parent = container.items().unwrap_or_default();
            match subset.items() {
                Some(children) => Some(in_slice(parent, children.iter())),
                None => Some(in_slice(parent, std::iter::once(subset))),
            }
        }
        (Kind::Map, Value::Map { entries, .. }) => match subset {
            Value::Map {
                entries: children, ..
            } => Some(in_map(container, entries, children)),
            _ => {
                d.errorf(format_args!(
                    "type mismatch -{} +{}",
                    container.type_name(),
                    subset.type_name()
                ));
                Some(d)
            }
        },
        _ => {
            let (is_equal, text) = equal(container, subset);
            if is_equal {
                return None;
            }
            d.errorf(format_args!("{}", text));
            Some(d)
        }
    }
}

/// Each child is searched independently; duplicates are separate searches.
fn in_slice<'a>(parent: &[Value], children: impl Iterator<Item = &'a Value>) -> Diff {
    let mut d = Diff::new();
    for child in children {
        let found = parent
            .iter()
            .any(|p| diff::is_equal(contains_value(p, child).as_ref()));
        if !found {
            d.missing(child);
        }
    }
    d
}

fn in_map(container: &Value, parent: &BTreeMap<Key, Value>, children: &BTreeMap<Key, Value>) -> Diff {
    let mut d = Diff::new();
    for (key, child) in children {
        match parent.get(key) {
            Some(p) => d.append(contains_value(p, child)),
            None => d.missing(format_args!("{} key={}", container.type_name(), key)),
        }
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn map(pairs: &[(&'static str, i64)]) -> Value {
        Value::of(&pairs.iter().copied().collect::<HashMap<_, _>>())
    }

    #[test]
    fn substring_match() {
        assert_eq!(
            contains(&Value::from("hello world"), &Value::from("world")),
            (true, String::new())
        );
        let (ok, diff) = contains(&Value::from("hello world"), &Value::from("xyz"));
        assert!(!ok);
        assert!(diff.contains("hello world") && diff.contains("xyz"));
    }

    #[test]
    fn string_against_non_text_is_a_type_mismatch() {
        let (ok, diff) = contains(&Value::from("abc"), &Value::from(1i64));
        assert!(!ok);
        assert_eq!(diff, "type mismatch -String +i64\n");
    }

    #[test]
    fn slice_elements_are_searched_independently() {
        let container = Value::of(&vec![1, 2, 3]);
        assert!(contains(&container, &Value::of(&vec![3, 1])).0);
        assert!(contains(&container, &Value::of(&vec![1, 1])).0);
        assert!(contains(&container, &Value::from(2i64)).0);

        let (ok, diff) = contains(&container, &Value::of(&vec![4, 2, 5]));
        assert!(!ok);
        assert_eq!(diff, "-4\n-5\n");
    }

    #[test]
    fn slice_elements_use_containment() {
        let container = Value::of(&vec!["alpha beta", "gamma"]);
        assert!(contains(&container, &Value::of(&vec!["beta", "gam"])).0);
    }

    #[test]
    fn map_subset() {
        let container = map(&[("a", 1), ("b", 2)]);
        assert_eq!(contains(&container, &map(&[("a", 1)])), (true, String::new()));

        let (ok, diff) = contains(&container, &map(&[("c", 1)]));
        assert!(!ok);
        assert_eq!(diff, "-Map<String, i64> key=c\n");

        let (ok, diff) = contains(&container, &map(&[("a", 2)]));
        assert!(!ok);
        assert!(diff.contains("-: 1") && diff.contains("+: 2"));
    }

    #[test]
    fn map_against_slice_is_a_type_mismatch() {
        let (ok, diff) = contains(&map(&[("a", 1)]), &Value::of(&vec![1]));
        assert!(!ok);
        assert_eq!(diff, "type mismatch -Map<String, i64> +Vec<i64>\n");
    }

    #[test]
    fn nested_maps_recurse() {
        let inner = |pairs: &[(&'static str, i64)]| pairs.iter().copied().collect::<HashMap<_, _>>();
        let mut outer = HashMap::new();
        outer.insert("x", inner(&[("a", 1), ("b", 2)]));
        let mut sub = HashMap::new();
        sub.insert("x", inner(&[("b", 2)]));
        assert!(contains(&Value::of(&outer), &Value::of(&sub)).0);

        sub.insert("x", inner(&[("z", 2)]));
        let (ok, diff) = contains(&Value::of(&outer), &Value::of(&sub));
        assert!(!ok);
        assert_eq!(diff, "-Map<String, i64> key=z\n");
    }

    #[test]
    fn other_kinds_fall_back_to_equality() {
        assert!(contains(&Value::from(3i64), &Value::from(3i64)).0);
        let (ok, diff) = contains(&Value::from(3i64), &Value::from(4i64));
        assert!(!ok);
        assert_eq!(diff, "i64:\n  -: 3\n  +: 4\n\n");
    }

    #[test]
    fn nil_subset_is_vacuous() {
        assert_eq!(contains(&Value::from(1i64), &Value::Nil), (true, String::new()));
        assert_eq!(contains(&Value::Nil, &Value::Nil), (true, String::new()));
    }
}
