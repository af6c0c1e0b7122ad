//! Text rendering shared by the comparators.

use difference::{Changeset, Difference};

/// Renders two strings side by side: `-` for the first, `+` for the second.
/// Multi-line strings are shown as a line diff.
pub fn string_diff(actual: &str, expected: &str) -> String {
    if !actual.contains('\n') && !expected.contains('\n') {
        return format!("  -: {:?}\n  +: {:?}\n", actual, expected);
    }
    let changeset = Changeset::new(actual, expected, "\n");
    let mut out = String::new();
    for diff in &changeset.diffs {
        let (prefix, text) = match diff {
            Difference::Same(ref x) => (' ', x),
            Difference::Rem(ref x) => ('-', x),
            Difference::Add(ref x) => ('+', x),
        };
        for line in text.split('\n') {
            out.push_str("  ");
            out.push(prefix);
            out.push(' ');
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
