//! Stage messages emitted by import and filtering.
//!
//! The core never prints; callers hand in a [`StageLog`] and decide where the
//! lines go.

use std::cell::RefCell;

pub trait StageLog {
    fn stage(&self, message: &str);
}

/// Writes each message to stderr unless `quiet` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrLog {
    pub quiet: bool,
}

impl StderrLog {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl StageLog for StderrLog {
    fn stage(&self, message: &str) {
        if !self.quiet {
            eprintln!("  {}", message);
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLog;

impl StageLog for NullLog {
    fn stage(&self, _message: &str) {}
}

/// Keeps messages in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryLog {
    messages: RefCell<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl StageLog for MemoryLog {
    fn stage(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
