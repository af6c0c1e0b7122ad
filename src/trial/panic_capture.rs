//! Panic capture for cases that run under `catch_unwind`.
//!
//! A single process-wide hook records the backtrace of the latest panic on
//! the panicking thread, then defers to whatever hook was installed before.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic;

use once_cell::sync::Lazy;

thread_local! {
    static LAST_BACKTRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Lazy<()> = Lazy::new(|| {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let trace = Backtrace::force_capture().to_string();
        LAST_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(trace));
        previous(info);
    }));
});

pub fn install_hook() {
    Lazy::force(&HOOK);
}

/// Takes the backtrace recorded for the last panic on this thread.
pub fn take_backtrace() -> Option<String> {
    LAST_BACKTRACE.with(|slot| slot.borrow_mut().take())
}

pub fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// Drops backtrace lines containing any of `filters`. A filter only matches
/// at the start of a path segment, so `trial::` leaves `mytrial::` alone.
pub fn clean_stack(trace: &str, filters: &[String]) -> String {
    let mut out = String::new();
    for line in trace.lines() {
        if filters.iter().any(|f| matches_segment(line, f)) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn matches_segment(line: &str, pattern: &str) -> bool {
    line.match_indices(pattern).any(|(at, _)| {
        line[..at]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payloads_render_as_text() {
        let err = panic::catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        assert_eq!(payload_message(err.as_ref()), "boom 1");
        let err = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(payload_message(err.as_ref()), "static");
    }

    #[test]
    fn filtered_lines_are_dropped() {
        let trace = "0: std::panicking::begin_panic\n1: my_crate::work\n2: core::panicking::panic\n";
        let filters = vec!["std::panicking".to_string(), "core::panicking".to_string()];
        assert_eq!(clean_stack(trace, &filters), "1: my_crate::work\n");
    }

    #[test]
    fn filters_match_whole_path_segments() {
        let trace = "  4: mytrial::checks::run\n  5: trial::trial::Trial::run_case\n  6: <trial::value::Value as core::fmt::Display>::fmt\n  7: my_trial::go\n";
        let filters = vec!["trial::".to_string()];
        assert_eq!(
            clean_stack(trace, &filters),
            "  4: mytrial::checks::run\n  7: my_trial::go\n"
        );
    }

    #[test]
    fn hook_records_backtrace() {
        install_hook();
        let _ = panic::catch_unwind(|| panic!("recorded"));
        assert!(take_backtrace().is_some());
        assert!(take_backtrace().is_none());
    }
}
