// tests/pipeline_e2e.rs
mod common;

use std::fs;
use std::cell::Cell;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use common::FakeSource;
use house_trend::normalize::RawRecord;
use house_trend::source::{CellQuery, DataSource, SourceError};
use house_trend::config::consts::region_by_key;
use house_trend::config::options::{AppOptions, FetchOptions, OutputOptions, RegionSelector};
use house_trend::progress::Progress;
use house_trend::report::{CompletionReport, RunContext};
use house_trend::runner::{self, PipelineError};
use tempfile::TempDir;

fn tokyo_opts(root: &std::path::Path) -> AppOptions {
    AppOptions {
        fetch: FetchOptions {
            regions: RegionSelector::Only(vec![region_by_key("tokyo").unwrap()]),
            start_year: 2020,
            end_year: 2021,
            delay: Duration::ZERO,
            ..FetchOptions::default()
        },
        output: OutputOptions::rooted(root),
    }
}

#[test]
fn full_run_writes_caches_charts_and_report() {
    let dir = TempDir::new().unwrap();
    let opts = tokyo_opts(dir.path());
    let src = FakeSource::new();
    let mut ctx = RunContext::new();

    let summary = runner::run(&src, &opts, &mut ctx, None, None).unwrap();
    let rep = &summary.report;

    assert_eq!(rep.prefectures_completed, 1);
    assert_eq!(rep.total_records_processed, 16);
    // two areas, each with ALL plus one layout, two languages each
    assert_eq!(rep.charts_generated, 8);
    assert_eq!(rep.errors_count, 0);

    let tokyo = region_by_key("tokyo").unwrap();
    assert!(opts.output.raw_path(tokyo).is_file());
    assert!(opts.output.processed_path(tokyo).is_file());
    assert!(opts.output.chart_dir.join("tokyo_港区_ALL_jp.png").is_file());
    assert!(opts.output.chart_dir.join("tokyo_港区_ALL_en.png").is_file());
    assert!(opts.output.chart_dir.join("tokyo_千代田区_２ＬＤＫ_en.png").is_file());
    assert!(!opts.output.chart_dir.join("tokyo_港区_１Ｋ_jp.png").exists());

    let name = summary.report_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("completion_report_") && name.ends_with(".json"));
    let back: CompletionReport = serde_json::from_str(&fs::read_to_string(&summary.report_path).unwrap()).unwrap();
    assert_eq!(back.total_records_processed, rep.total_records_processed);
    assert_eq!(back.charts_generated, rep.charts_generated);
    assert_eq!(back.completion_time, rep.completion_time);
}

#[derive(Default)]
struct Recorder {
    total: usize,
    cells: usize,
    failed: usize,
    lines: Vec<String>,
    finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn log(&mut self, msg: &str) { self.lines.push(msg.to_string()); }
    fn cell_done(&mut self, _label: &str, _records: usize) { self.cells += 1; }
    fn cell_failed(&mut self, _label: &str, _error: &str) { self.failed += 1; }
    fn finish(&mut self) { self.finished = true; }
}

#[test]
fn run_reports_progress_across_regions() {
    let dir = TempDir::new().unwrap();
    let mut opts = tokyo_opts(dir.path());
    opts.fetch.regions = RegionSelector::Only(vec![
        region_by_key("tokyo").unwrap(),
        region_by_key("osaka").unwrap(),
    ]);
    opts.output.skip_charts = true;
    let src = FakeSource::failing(&[(2021, 3)]);
    let mut ctx = RunContext::new();
    let mut prog = Recorder::default();

    let summary = runner::run(&src, &opts, &mut ctx, None, Some(&mut prog)).unwrap();

    assert_eq!(prog.total, 16);
    assert_eq!(prog.cells, 14);
    assert_eq!(prog.failed, 2);
    assert!(prog.finished);
    assert_eq!(prog.lines.first().map(String::as_str), Some("Step 1: fetching"));
    assert!(prog.lines.iter().any(|l| l == "Step 2: transforming"));
    assert_eq!(summary.report.prefectures_completed, 2);
}

#[test]
fn refresh_region_reports_progress() {
    let dir = TempDir::new().unwrap();
    let opts = tokyo_opts(dir.path());
    let tokyo = region_by_key("tokyo").unwrap();
    let mut ctx = RunContext::new();
    let mut prog = Recorder::default();

    runner::refresh_region(&FakeSource::new(), tokyo, &opts, &mut ctx, None, Some(&mut prog)).unwrap();
    assert_eq!(prog.cells, 8);
    assert_eq!(prog.failed, 0);
}

#[test]
fn failed_cells_are_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    let mut opts = tokyo_opts(dir.path());
    opts.output.skip_charts = true;
    let src = FakeSource::failing(&[(2020, 1), (2021, 4)]);
    let mut ctx = RunContext::new();

    let summary = runner::run(&src, &opts, &mut ctx, None, None).unwrap();
    assert_eq!(summary.report.total_records_processed, 12);
    assert_eq!(summary.report.charts_generated, 0);
    assert_eq!(summary.report.errors_count, 2);
    assert!(!opts.output.chart_dir.exists());
}

#[test]
fn cancelled_run_is_fatal() {
    let dir = TempDir::new().unwrap();
    let opts = tokyo_opts(dir.path());
    let src = FakeSource::new();
    let mut ctx = RunContext::new();
    let cancel = AtomicBool::new(true);

    let res = runner::run(&src, &opts, &mut ctx, Some(&cancel), None);
    assert!(matches!(res, Err(PipelineError::Cancelled)));
    assert!(!opts.output.processed_dir.exists());
}

/// Answers like `FakeSource`, then raises the interrupt flag after `after`
/// queries, as a Ctrl-C handler would.
struct InterruptAfter<'a> {
    inner: FakeSource,
    after: usize,
    calls: Cell<usize>,
    flag: &'a AtomicBool,
}

impl DataSource for InterruptAfter<'_> {
    fn fetch_cell(&self, q: &CellQuery) -> Result<Vec<RawRecord>, SourceError> {
        self.calls.set(self.calls.get() + 1);
        if self.calls.get() >= self.after {
            self.flag.store(true, Ordering::Relaxed);
        }
        self.inner.fetch_cell(q)
    }
}

fn temp_files(dir: &Path) -> Vec<String> {
    let mut out = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else { return out };
    for e in entries.flatten() {
        let path = e.path();
        if path.is_dir() {
            out.extend(temp_files(&path));
        } else if path.to_string_lossy().ends_with(".tmp") {
            out.push(path.display().to_string());
        }
    }
    out
}

#[test]
fn interrupt_mid_run_keeps_only_complete_caches() {
    let dir = TempDir::new().unwrap();
    let mut opts = tokyo_opts(dir.path());
    opts.fetch.regions = RegionSelector::Only(vec![
        region_by_key("tokyo").unwrap(),
        region_by_key("osaka").unwrap(),
    ]);
    let cancel = AtomicBool::new(false);
    let src = InterruptAfter { inner: FakeSource::new(), after: 10, calls: Cell::new(0), flag: &cancel };
    let mut ctx = RunContext::new();

    let res = runner::run(&src, &opts, &mut ctx, Some(&cancel), None);
    assert!(matches!(res, Err(PipelineError::Cancelled)));
    assert_eq!(src.calls.get(), 10);

    assert!(opts.output.raw_path(region_by_key("tokyo").unwrap()).is_file());
    assert!(!opts.output.raw_path(region_by_key("osaka").unwrap()).exists());
    assert!(!opts.output.processed_dir.exists());
    assert!(temp_files(dir.path()).is_empty());
}

#[test]
fn bad_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    let mut opts = tokyo_opts(dir.path());
    opts.fetch.start_year = 2030;
    let mut ctx = RunContext::new();

    let res = runner::run(&FakeSource::new(), &opts, &mut ctx, None, None);
    assert!(matches!(res, Err(PipelineError::Config(_))));
}

#[test]
fn refresh_region_returns_admitted_records() {
    let dir = TempDir::new().unwrap();
    let opts = tokyo_opts(dir.path());
    let chiba = region_by_key("chiba").unwrap();
    let mut ctx = RunContext::new();

    let data = runner::refresh_region(&FakeSource::new(), chiba, &opts, &mut ctx, None, None).unwrap();
    assert_eq!(data.region.key, "chiba");
    assert_eq!(data.records.len(), 16);
    assert_eq!(data.stats.output_count, 16);
    assert!(opts.output.processed_path(chiba).is_file());
}

#[test]
fn report_echoes_first_errors_only() {
    let mut ctx = RunContext::new();
    for i in 0..15 {
        ctx.record_error(format!("error {i}"));
    }
    let rep = ctx.report(chrono::Local::now());
    assert_eq!(rep.errors_count, 15);
    assert_eq!(rep.errors.len(), 10);
    assert_eq!(rep.errors_omitted, 5);
    assert_eq!(rep.errors[0], "error 0");
    assert!(rep.summary_lines().iter().any(|l| l.contains("5 more")));
}
