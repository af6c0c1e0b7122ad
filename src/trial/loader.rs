//! YAML case tables.
//!
//! ```yaml
//! adds one:
//!   input: 1
//!   expected: 2
//! sums pairs:
//!   args: [1, 2]
//!   expected: 3
//! rejects text:
//!   input: "x"
//!   expected_err: "invalid digit"
//! ```
//!
//! Values in a table are dynamically typed: sequences load as `Vec<any>`
//! and mappings as `Map<String, any>`. Exact comparison against statically
//! typed containers fails on the element type, so tables that describe
//! collections usually pair with `contains`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use super::case::{Case, Cases};
use crate::errors::{HarnessError, Result};
use crate::value::Value;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseSpec {
    input: Option<serde_json::Value>,
    args: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    expected: serde_json::Value,
    #[serde(default)]
    should_err: bool,
    expected_err: Option<String>,
    #[serde(default)]
    should_panic: bool,
}

impl CaseSpec {
    fn into_case(self, name: &str) -> Result<Case> {
        let input = match (self.input, self.args) {
            (Some(_), Some(_)) => {
                return Err(HarnessError::InvalidCase {
                    name: name.to_string(),
                    reason: "use either 'input' or 'args', not both".to_string(),
                })
            }
            (Some(input), None) => vec![Value::from(input)],
            (None, Some(args)) => args.into_iter().map(Value::from).collect(),
            (None, None) => Vec::new(),
        };
        Ok(Case {
            input,
            expected: Value::from(self.expected),
            should_err: self.should_err,
            expected_err: self.expected_err.map(Into::into),
            should_panic: self.should_panic,
        })
    }
}

/// Parses a case table from YAML text.
pub fn parse_cases(source: &str, path: &Path) -> Result<Cases> {
    let specs: BTreeMap<String, CaseSpec> =
        serde_yaml::from_str(source).map_err(|source| HarnessError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
    specs
        .into_iter()
        .map(|(name, spec)| {
            let case = spec.into_case(&name)?;
            Ok((name, case))
        })
        .collect()
}

/// Loads a case table from a YAML file.
pub fn load_cases(path: &Path) -> Result<Cases> {
    let source = fs::read_to_string(path).map_err(|source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cases = parse_cases(&source, path)?;
    tracing::debug!(path = %path.display(), count = cases.len(), "loaded case table");
    Ok(cases)
}

/// Discovers all YAML files recursively under the given root directory.
pub fn discover_case_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cases_parse_with_defaults() {
        let cases = parse_cases(
            "one:\n  input: 1\n  expected: 2\npair:\n  args: [1, \"a\"]\n  should_err: true\n",
            Path::new("inline.yaml"),
        )
        .unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases["one"].input[0].as_int(), Some(1));
        assert_eq!(cases["one"].expected.as_int(), Some(2));
        assert_eq!(cases["pair"].input.len(), 2);
        assert!(cases["pair"].should_err);
        assert!(cases["pair"].expected.is_nil());
    }

    #[test]
    fn input_and_args_conflict() {
        let err = parse_cases("bad:\n  input: 1\n  args: [2]\n", Path::new("bad.yaml")).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidCase { ref name, .. } if name == "bad"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_cases("bad:\n  expect: 1\n", Path::new("bad.yaml")).unwrap_err();
        assert!(matches!(err, HarnessError::Yaml { .. }));
    }
}
