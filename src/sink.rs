//! The output sink: the one externally-visible side effect a program can
//! produce besides its return value.

use std::cell::RefCell;

/// `printLine` is serialised by the single evaluator thread; implementations
/// need no internal locking.
pub trait OutputSink {
    fn print_line(&self, line: &str);
}

/// Writes to standard output, one line at a time.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn print_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// Discards everything. Useful as the sink for programs run only for their
/// return value.
pub struct NullSink;

impl OutputSink for NullSink {
    fn print_line(&self, _line: &str) {}
}

/// Captures printed lines in memory, for tests that assert on the full
/// sequence of `print` calls rather than just the final value.
#[derive(Default)]
pub struct CapturingSink {
    lines: RefCell<Vec<String>>,
}

impl CapturingSink {
    pub fn new() -> Self {
        CapturingSink {
            lines: RefCell::new(Vec::new()),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl OutputSink for CapturingSink {
    fn print_line(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}
