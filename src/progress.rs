// src/progress.rs
/// Progress reporting for the fetch grid.
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of cells about to be queried.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One cell answered (possibly with zero records).
    fn cell_done(&mut self, _label: &str, _records: usize) {}

    /// One cell failed and counts as zero records.
    fn cell_failed(&mut self, _label: &str, _error: &str) {}

    /// Called once the work has completed.
    fn finish(&mut self) {}
}
