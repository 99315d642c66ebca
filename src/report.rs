// src/report.rs
//
// Run bookkeeping. The context is owned by whoever starts the run and is
// threaded through every step, then turned into the completion report.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::consts::ERROR_ECHO_LIMIT;
use crate::file::{ensure_directory, report_path, write_atomic};
use crate::runner::PipelineError;

#[derive(Debug)]
pub struct RunContext {
    started: Instant,
    pub started_at: DateTime<Local>,
    pub regions_completed: usize,
    pub total_records: usize,
    pub charts_generated: usize,
    pub cells_failed: usize,
    pub errors: Vec<String>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            started_at: Local::now(),
            regions_completed: 0,
            total_records: 0,
            charts_generated: 0,
            cells_failed: 0,
            errors: Vec::new(),
        }
    }

    /// Record a recoverable failure (one cell, one chart).
    pub fn record_error(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        loge!("{msg}");
        self.errors.push(msg);
    }

    pub fn elapsed_minutes(&self) -> f64 {
        self.started.elapsed().as_secs_f64() / 60.0
    }

    /// Snapshot as a report. Only the first few errors are echoed.
    pub fn report(&self, completed: DateTime<Local>) -> CompletionReport {
        let shown: Vec<String> = self.errors.iter().take(ERROR_ECHO_LIMIT).cloned().collect();
        CompletionReport {
            completion_time: completed,
            duration_minutes: self.elapsed_minutes(),
            prefectures_completed: self.regions_completed,
            total_records_processed: self.total_records,
            charts_generated: self.charts_generated,
            errors_count: self.errors.len(),
            errors_omitted: self.errors.len() - shown.len(),
            errors: shown,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionReport {
    pub completion_time: DateTime<Local>,
    pub duration_minutes: f64,
    pub prefectures_completed: usize,
    pub total_records_processed: usize,
    pub charts_generated: usize,
    pub errors_count: usize,
    pub errors: Vec<String>,
    pub errors_omitted: usize,
}

impl CompletionReport {
    /// Write as pretty JSON into `dir`, file name stamped with the
    /// completion time.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, PipelineError> {
        ensure_directory(dir)?;
        let path = report_path(dir, &self.completion_time);
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(&path, |out| out.write_all(json.as_bytes())).map_err(|e| PipelineError::io(&path, e))?;
        logf!("Report: saved {}", path.display());
        Ok(path)
    }

    /// Human summary, one line per entry.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Duration: {:.1} minutes", self.duration_minutes),
            format!("Regions completed: {}", self.prefectures_completed),
            format!("Total records: {}", self.total_records_processed),
            format!("Charts generated: {}", self.charts_generated),
            format!("Errors: {}", self.errors_count),
        ];
        for e in &self.errors {
            lines.push(format!("  - {e}"));
        }
        if self.errors_omitted > 0 {
            lines.push(format!("  ... and {} more errors", self.errors_omitted));
        }
        lines
    }
}
