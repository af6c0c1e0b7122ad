//! Colored rendering of case results.
//!
//! Everything is written into a `termcolor` buffer first and then handed to
//! `eprint!`, so libtest's output capture still applies.

use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use super::{CaseResult, Report, RunnerConfig};

pub fn buffer(config: &RunnerConfig) -> Buffer {
    if config.use_colors {
        Buffer::ansi()
    } else {
        Buffer::no_color()
    }
}

pub fn flush(buffer: &Buffer) {
    eprint!("{}", String::from_utf8_lossy(buffer.as_slice()));
}

/// One line (or block) per case: passes plain, failures in red.
pub fn write_results<W: WriteColor>(w: &mut W, report: &Report) -> io::Result<()> {
    for result in &report.results {
        write_result(w, result, &result.message)?;
    }
    Ok(())
}

/// Each case under its own heading, the message stripped of the case name
/// and the `FAIL:` prefix.
pub fn write_sub_results<W: WriteColor>(w: &mut W, report: &Report) -> io::Result<()> {
    for result in &report.results {
        w.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(w, "--- {}", result.name)?;
        w.reset()?;
        if result.success {
            continue;
        }
        let message = result
            .message
            .replacen(&format!("{:?}", result.name), "", 1)
            .replacen("FAIL:", "", 1);
        write_result(w, result, message.trim_start_matches(&[' ', '\n'][..]))?;
    }
    Ok(())
}

pub fn write_summary<W: WriteColor>(w: &mut W, report: &Report) -> io::Result<()> {
    let failed = report.failures().count();
    let color = if failed == 0 { Color::Green } else { Color::Red };
    w.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    writeln!(
        w,
        "{} passed, {} failed",
        report.results.len() - failed,
        failed
    )?;
    w.reset()
}

fn write_result<W: WriteColor>(w: &mut W, result: &CaseResult, message: &str) -> io::Result<()> {
    if result.success {
        writeln!(w, "{}", message)?;
        return Ok(());
    }
    w.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
    writeln!(w, "{}", message)?;
    w.reset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn report() -> Report {
        Report {
            results: vec![
                CaseResult::pass("ok", "PASS: \"ok\"".to_string()),
                CaseResult::fail("bad", "FAIL: \"bad\" \nsome diff".to_string()),
            ],
        }
    }

    #[test]
    fn results_and_summary() {
        let mut buf = Buffer::no_color();
        write_results(&mut buf, &report()).unwrap();
        write_summary(&mut buf, &report()).unwrap();
        assert_eq!(
            String::from_utf8_lossy(buf.as_slice()),
            "PASS: \"ok\"\nFAIL: \"bad\" \nsome diff\n1 passed, 1 failed\n"
        );
    }

    #[test]
    fn sub_results_strip_name_and_prefix() {
        let mut buf = Buffer::no_color();
        write_sub_results(&mut buf, &report()).unwrap();
        assert_eq!(
            String::from_utf8_lossy(buf.as_slice()),
            "--- ok\n--- bad\nsome diff\n"
        );
    }

    #[test]
    fn write_errors_propagate() {
        let mut out = NoColor::new(Closed);
        assert!(write_results(&mut out, &report()).is_err());
        assert!(write_sub_results(&mut out, &report()).is_err());
        assert!(write_summary(&mut out, &report()).is_err());
    }
}
