//! Errors raised while loading case tables.
//!
//! Comparators never fail; they report through their `(bool, String)`
//! result. Only the I/O side of the runner produces these diagnostics.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum HarnessError {
    #[error("failed to read case file '{}'", path.display())]
    #[diagnostic(code(trial::io), help("check that the file exists and is readable"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse case file '{}'", path.display())]
    #[diagnostic(
        code(trial::yaml),
        help("case files map each case name to {{input | args, expected, should_err, expected_err, should_panic}}")
    )]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid case '{name}': {reason}")]
    #[diagnostic(code(trial::invalid_case))]
    InvalidCase { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, HarnessError>;
