// src/gui/progress.rs
use std::sync::{ Arc, Mutex };
use crate::progress::Progress;

/// Mirrors fetch progress into the status line.
pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    done: usize,
    total: usize,
    failed: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>) -> Self {
        Self { status, done: 0, total: 0, failed: 0 }
    }
    fn set_status(&self, msg: impl Into<String>) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        self.set_status(s!(msg));
    }
    fn cell_done(&mut self, label: &str, records: usize) {
        self.done += 1;
        self.set_status(format!("Fetched {} ({}/{}): {} records", label, self.done, self.total, records));
    }
    fn cell_failed(&mut self, label: &str, _error: &str) {
        self.done += 1;
        self.failed += 1;
        self.set_status(format!("Failed {} ({}/{})", label, self.done, self.total));
    }
    fn finish(&mut self) {
        if self.failed == 0 {
            self.set_status(format!("Fetch complete ({}/{})", self.done, self.total));
        } else {
            self.set_status(format!("Fetch complete ({}/{}, {} failed)", self.done, self.total, self.failed));
        }
    }
}
