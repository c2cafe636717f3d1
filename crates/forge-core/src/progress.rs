//! Progress reporting channel between the engine and its caller
//!
//! The engine reports one human-readable line per notable step. Lines are
//! delivered in pipeline order and never concurrently with each other; the
//! caller decides where they end up (terminal, log panel, test recorder).

use colored::Colorize;
use std::sync::Mutex;

/// Implicit severity of a progress line; callers may ignore it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Receiver of progress lines
pub trait ProgressSink: Send + Sync {
    fn report(&self, severity: Severity, line: &str);

    fn info(&self, line: &str) {
        self.report(Severity::Info, line);
    }

    fn success(&self, line: &str) {
        self.report(Severity::Success, line);
    }

    fn warning(&self, line: &str) {
        self.report(Severity::Warning, line);
    }

    fn error(&self, line: &str) {
        self.report(Severity::Error, line);
    }
}

impl<F> ProgressSink for F
where
    F: Fn(Severity, &str) + Send + Sync,
{
    fn report(&self, severity: Severity, line: &str) {
        self(severity, line)
    }
}

/// Prints lines to the terminal, styled by severity
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn report(&self, severity: Severity, line: &str) {
        match severity {
            Severity::Info => println!("  {} {}", "->".blue(), line),
            Severity::Success => println!("  {} {}", "ok".green(), line),
            Severity::Warning => eprintln!("  {} {}", "Warning:".yellow(), line),
            Severity::Error => eprintln!("  {}", line.red()),
        }
    }
}

/// Collects lines in memory so they can be inspected or replayed elsewhere
#[derive(Default)]
pub struct Recorder {
    lines: Mutex<Vec<(Severity, String)>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Only the text of each line
    pub fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, line)| line).collect()
    }
}

impl ProgressSink for Recorder {
    fn report(&self, severity: Severity, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((severity, line.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_recorder_keeps_order_and_severity() {
        let recorder = Recorder::new();
        recorder.info("first");
        recorder.error("Error: second");

        assert_eq!(
            recorder.lines(),
            vec![
                (Severity::Info, "first".to_string()),
                (Severity::Error, "Error: second".to_string()),
            ]
        );
    }

    #[test]
    fn test_closure_sink() {
        let count = AtomicUsize::new(0);
        let sink = |_: Severity, _: &str| {
            count.fetch_add(1, Ordering::SeqCst);
        };
        sink.info("a");
        sink.warning("b");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
