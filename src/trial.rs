//! Table-driven case runner.
//!
//! A [`Trial`] drives a set of named [`Case`]s through a function under test
//! and checks each outcome against the case's expectation:
//!
//! 1. **Invocation**: call the function with the case input, catching panics
//! 2. **Panic check**: a panic passes only when `should_panic` is set
//! 3. **Error check**: the error (or its absence) must match `should_err` / `expected_err`
//! 4. **Comparison**: otherwise the result is compared with the expected value
//!    using the configured comparator (exact equality by default)
//!
//! # Example Usage
//!
//! ```rust
//! use trial::compare::contains;
//! use trial::trial::{Case, Cases, Trial};
//! use trial::value::Value;
//!
//! let mut cases = Cases::new();
//! cases.insert("words".into(), Case::new("a b c").expect(vec!["c", "a"]));
//! Trial::new(
//!     |args: &[Value]| {
//!         let text = args[0].as_str().ok_or("want a string")?;
//!         Ok(Value::of(&text.split(' ').collect::<Vec<_>>()))
//!     },
//!     cases,
//! )
//! .comparer(contains)
//! .test();
//! ```

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use termcolor::Buffer;

mod case;
mod expected;
mod loader;
mod output;
mod panic_capture;

pub use case::{Case, Cases};
pub use expected::{ExpectedError, TestError};
pub use loader::{discover_case_files, load_cases, parse_cases};

use crate::compare::equal;
use crate::errors::Result;
use crate::value::Value;

type TestFn = Box<dyn Fn(&[Value]) -> std::result::Result<Value, TestError> + Send + Sync>;
type Comparator = Box<dyn Fn(&Value, &Value) -> (bool, String) + Send + Sync>;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Runner settings, passed explicitly at construction.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub use_colors: bool,
    /// Record a backtrace for unexpected panics.
    pub capture_backtrace: bool,
    /// Backtrace lines containing any of these are dropped from reports.
    pub stack_filters: Vec<String>,
    /// Also drop this crate's own frames.
    pub hide_harness_frames: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
            capture_backtrace: true,
            stack_filters: vec![
                "std::panicking".to_string(),
                "core::panicking".to_string(),
                "std::backtrace".to_string(),
                "std::panic::catch_unwind".to_string(),
                "rust_begin_unwind".to_string(),
            ],
            hide_harness_frames: true,
        }
    }
}

impl RunnerConfig {
    pub fn use_colors(mut self, on: bool) -> Self {
        self.use_colors = on;
        self
    }

    pub fn capture_backtrace(mut self, on: bool) -> Self {
        self.capture_backtrace = on;
        self
    }

    pub fn stack_filter(mut self, pattern: impl Into<String>) -> Self {
        self.stack_filters.push(pattern.into());
        self
    }

    pub fn hide_harness_frames(mut self, on: bool) -> Self {
        self.hide_harness_frames = on;
        self
    }

    fn filters(&self) -> Vec<String> {
        let mut filters = self.stack_filters.clone();
        if self.hide_harness_frames {
            filters.push(format!("{}::", env!("CARGO_CRATE_NAME")));
        }
        filters
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Outcome of one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub name: String,
    pub success: bool,
    pub message: String,
}

impl CaseResult {
    fn pass(name: &str, message: String) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            message,
        }
    }

    fn fail(name: &str, message: String) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            message,
        }
    }
}

/// Outcomes of every case, in name order.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub results: Vec<CaseResult>,
}

impl Report {
    pub fn success(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| !r.success)
    }

    pub fn get(&self, name: &str) -> Option<&CaseResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

// =============================================================================
// TRIAL
// =============================================================================

/// A function under test plus the cases it must satisfy.
pub struct Trial {
    cases: Cases,
    test_fn: TestFn,
    compare: Comparator,
    config: RunnerConfig,
}

impl Trial {
    pub fn new<F>(test_fn: F, cases: Cases) -> Self
    where
        F: Fn(&[Value]) -> std::result::Result<Value, TestError> + Send + Sync + 'static,
    {
        Self {
            cases,
            test_fn: Box::new(test_fn),
            compare: Box::new(equal),
            config: RunnerConfig::default(),
        }
    }

    /// Builds a trial from a YAML case table.
    pub fn from_file<F>(test_fn: F, path: &Path) -> Result<Self>
    where
        F: Fn(&[Value]) -> std::result::Result<Value, TestError> + Send + Sync + 'static,
    {
        Ok(Self::new(test_fn, load_cases(path)?))
    }

    /// Replaces the comparator, e.g. with [`contains`](crate::compare::contains).
    pub fn comparer<C>(mut self, compare: C) -> Self
    where
        C: Fn(&Value, &Value) -> (bool, String) + Send + Sync + 'static,
    {
        self.compare = Box::new(compare);
        self
    }

    pub fn config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn case(mut self, name: impl Into<String>, case: Case) -> Self {
        self.cases.insert(name.into(), case);
        self
    }

    /// Runs every case and collects the outcomes.
    pub fn run(&self) -> Report {
        if self.config.capture_backtrace {
            panic_capture::install_hook();
        }
        let results = self
            .cases
            .iter()
            .map(|(name, case)| {
                let result = self.run_case(name, case);
                tracing::debug!(case = %name, success = result.success, "case finished");
                result
            })
            .collect();
        Report { results }
    }

    /// Runs every case, logs each outcome and panics if any case failed.
    pub fn test(&self) {
        let report = self.run();
        self.print(&report, output::write_results);
        assert!(report.success(), "{} case(s) failed", report.failures().count());
    }

    /// Like [`test`](Self::test), reporting each case under its own heading.
    pub fn sub_test(&self) {
        let report = self.run();
        self.print(&report, output::write_sub_results);
        assert!(report.success(), "{} case(s) failed", report.failures().count());
    }

    fn print(&self, report: &Report, body: fn(&mut Buffer, &Report) -> io::Result<()>) {
        let mut buf = output::buffer(&self.config);
        let written = body(&mut buf, report).and_then(|()| output::write_summary(&mut buf, report));
        if let Err(err) = written {
            tracing::warn!(error = %err, "failed to render case results");
        }
        output::flush(&buf);
    }

    fn run_case(&self, name: &str, case: &Case) -> CaseResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.test_fn)(&case.input)));
        match outcome {
            Err(payload) if case.should_panic => {
                let _ = panic_capture::take_backtrace();
                drop(payload);
                CaseResult::pass(name, format!("PASS: {:?}", name))
            }
            Err(payload) => {
                // the hook is process-wide, so a trace may exist even when
                // this runner did not ask for one
                let stack = panic_capture::take_backtrace()
                    .filter(|_| self.config.capture_backtrace)
                    .map(|trace| panic_capture::clean_stack(&trace, &self.config.filters()))
                    .unwrap_or_default();
                CaseResult::fail(
                    name,
                    format!(
                        "PANIC: {:?} {}\n{}",
                        name,
                        panic_capture::payload_message(payload.as_ref()),
                        stack
                    ),
                )
            }
            Ok(_) if case.should_panic => {
                CaseResult::fail(name, format!("FAIL: {:?} did not panic", name))
            }
            Ok(result) => self.check_result(name, case, result),
        }
    }

    fn check_result(
        &self,
        name: &str,
        case: &Case,
        result: std::result::Result<Value, TestError>,
    ) -> CaseResult {
        let expects_err = case.should_err || case.expected_err.is_some();
        match (result, &case.expected_err) {
            (Ok(_), _) if expects_err => {
                CaseResult::fail(name, format!("FAIL: {:?} should error", name))
            }
            (Err(err), None) if !case.should_err => CaseResult::fail(
                name,
                format!("FAIL: {:?} unexpected error '{}'", name, err),
            ),
            (Err(err), Some(expected)) if !expected.matches(&err) => CaseResult::fail(
                name,
                format!(
                    "FAIL: {:?} error {:?} does not match expected {:?}",
                    name,
                    err.to_string(),
                    expected.to_string()
                ),
            ),
            (Ok(actual), _) => {
                let (is_equal, diff) = (self.compare)(&actual, &case.expected);
                if is_equal {
                    CaseResult::pass(name, format!("PASS: {:?}", name))
                } else {
                    CaseResult::fail(name, format!("FAIL: {:?} \n{}", name, diff))
                }
            }
            (Err(_), _) => CaseResult::pass(name, format!("PASS: {:?}", name)),
        }
    }
}
