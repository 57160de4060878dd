//! Action-line reporting.
//!
//! Every planned and executed action is rendered as one human-readable
//! line. In dry-run mode these lines are the only observable effect, so
//! their format is a stable contract for audit tooling:
//!
//! ```text
//! - CREATE TABLE: user
//! -- add column: user.email text (limit: 255, nullable: false)
//! -- add index: index on user(email) (unique: true)
//! ```

use std::sync::Mutex;

/// Sink for action lines.
pub trait Reporter {
    /// Record one action line.
    fn line(&self, line: &str);
}

/// Default reporter: emits each line as a `tracing` info event.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn line(&self, line: &str) {
        tracing::info!(target: "converge", "{line}");
    }
}

/// Reporter that buffers lines in memory, for tests and audit capture.
#[derive(Debug, Default)]
pub struct BufferReporter {
    lines: Mutex<Vec<String>>,
}

impl BufferReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the buffered lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap())
    }

    /// The buffered lines joined with newlines, without draining.
    pub fn rendered(&self) -> String {
        self.lines.lock().unwrap().join("\n")
    }
}

impl Reporter for BufferReporter {
    fn line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
