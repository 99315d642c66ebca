// src/runner.rs
//
// The full update: fetch every selected region, transform and cache it,
// draw the charts, write the completion report.
//
// A bad record or a failed cell never stops the run. Anything that means
// the run itself cannot go on (bad configuration, unwritable output,
// cancellation) comes back as a PipelineError.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;
use thiserror::Error;

use crate::aggregate::{aggregate, areas, AgeBucket, CategoryFilter, Selection};
use crate::chart::write_chart_pair;
use crate::config::consts::{Region, TEST_MODE_AREA_LIMIT};
use crate::config::options::AppOptions;
use crate::fetch::{fetch_region, RegionBatch};
use crate::file::ensure_directory;
use crate::normalize::{transform_batch, FloorPlan, NormalizedRecord, QualityReport, Stats};
use crate::progress::Progress;
use crate::report::{CompletionReport, RunContext};
use crate::source::DataSource;
use crate::store;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error at {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed cache {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("run cancelled")]
    Cancelled,
}

impl PipelineError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        PipelineError::Io { path: path.to_path_buf(), source }
    }
}

/// Per-area charts, in this order.
pub const CHART_CATEGORIES: [CategoryFilter; 6] = [
    CategoryFilter::All,
    CategoryFilter::Only(FloorPlan::FourLdkPlus),
    CategoryFilter::Only(FloorPlan::ThreeLdk),
    CategoryFilter::Only(FloorPlan::TwoLdk),
    CategoryFilter::Only(FloorPlan::OneLdk),
    CategoryFilter::Only(FloorPlan::OneK),
];

/// Admitted records for one region.
#[derive(Debug)]
pub struct RegionData {
    pub region: &'static Region,
    pub records: Vec<NormalizedRecord>,
    pub stats: Stats,
}

pub struct RunSummary {
    pub report: CompletionReport,
    pub report_path: PathBuf,
}

#[inline]
fn check_cancel(cancel: Option<&AtomicBool>) -> Result<(), PipelineError> {
    match cancel {
        Some(c) if c.load(Ordering::Relaxed) => Err(PipelineError::Cancelled),
        _ => Ok(()),
    }
}

/// Run all four steps. `ctx` stays with the caller, so a failed run can
/// still be inspected.
pub fn run(
    source: &dyn DataSource,
    opts: &AppOptions,
    ctx: &mut RunContext,
    cancel: Option<&AtomicBool>,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, PipelineError> {
    opts.fetch.validate().map_err(PipelineError::Config)?;
    let regions = opts.fetch.regions();
    logf!(
        "Run: start at {} regions={} years={}-{} test_mode={}",
        ctx.started_at.format("%Y-%m-%d %H:%M:%S"),
        regions.len(), opts.fetch.start_year, opts.fetch.end_year, opts.fetch.test_mode
    );

    // Step 1: fetch, raw cache per region once complete
    if let Some(p) = progress.as_deref_mut() {
        p.log("Step 1: fetching");
        p.begin(regions.len() * opts.fetch.cells_per_region());
    }
    let mut batches = Vec::with_capacity(regions.len());
    for region in regions {
        let reborrow = progress.as_mut().map(|p| &mut **p as &mut dyn Progress);
        let batch = fetch_region(source, region, &opts.fetch, ctx, cancel, reborrow)?;
        save_raw_batch(&batch, opts)?;
        batches.push(batch);
    }

    // Step 2: transform + normalized cache
    if let Some(p) = progress.as_deref_mut() {
        p.log("Step 2: transforming");
    }
    let mut data = Vec::with_capacity(batches.len());
    for batch in batches {
        data.push(transform_and_save(batch, opts, ctx)?);
    }

    // Step 3: charts
    if opts.output.skip_charts {
        logf!("Run: charts skipped");
    } else {
        if let Some(p) = progress.as_deref_mut() {
            p.log("Step 3: charts");
        }
        generate_all_charts(&data, opts, ctx, cancel)?;
    }

    // Step 4: report
    let report = ctx.report(Local::now());
    let report_path = report.write(&opts.output.report_dir)?;
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    logf!(
        "Run: done records={} charts={} errors={}",
        report.total_records_processed, report.charts_generated, report.errors_count
    );
    Ok(RunSummary { report, report_path })
}

fn save_raw_batch(batch: &RegionBatch, opts: &AppOptions) -> Result<(), PipelineError> {
    if batch.records.is_empty() {
        logw!("Cache: no raw data to save for {}", batch.region.key);
        return Ok(());
    }
    store::save_raw(&opts.output.raw_path(batch.region), &batch.records)
}

/// Transform one fetched region and write its normalized cache.
pub fn transform_and_save(
    batch: RegionBatch,
    opts: &AppOptions,
    ctx: &mut RunContext,
) -> Result<RegionData, PipelineError> {
    let region = batch.region;
    let (records, stats) = transform_batch(&batch.records, opts.fetch.fallback_year);
    stats.log(region.key);
    let q = QualityReport::from_records(&records);
    logd!(
        "Quality: {} missing_area={} missing_age={} areas={}",
        region.key, q.missing_areas, q.missing_building_ages, q.unique_areas
    );

    if records.is_empty() {
        logw!("Transform: no valid data for {}", region.key);
    } else {
        store::save_processed(&opts.output.processed_path(region), &records)?;
        ctx.total_records += records.len();
    }
    ctx.regions_completed += 1;
    Ok(RegionData { region, records, stats })
}

/// Fetch, cache and transform a single region (viewer refresh).
pub fn refresh_region(
    source: &dyn DataSource,
    region: &'static Region,
    opts: &AppOptions,
    ctx: &mut RunContext,
    cancel: Option<&AtomicBool>,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RegionData, PipelineError> {
    opts.fetch.validate().map_err(PipelineError::Config)?;
    if let Some(p) = progress.as_deref_mut() {
        p.begin(opts.fetch.cells_per_region());
    }
    let reborrow = progress.as_mut().map(|p| &mut **p as &mut dyn Progress);
    let batch = fetch_region(source, region, &opts.fetch, ctx, cancel, reborrow)?;
    save_raw_batch(&batch, opts)?;
    let data = transform_and_save(batch, opts, ctx)?;
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(data)
}

/// Both language variants for every (area, category) with data.
/// A failed chart is recorded and skipped.
pub fn generate_all_charts(
    data: &[RegionData],
    opts: &AppOptions,
    ctx: &mut RunContext,
    cancel: Option<&AtomicBool>,
) -> Result<(), PipelineError> {
    let dir = &opts.output.chart_dir;
    ensure_directory(dir)?;

    for rd in data {
        if rd.records.is_empty() {
            logw!("Chart: no data for {}, skipping", rd.region.key);
            continue;
        }
        let mut area_list = areas(&rd.records);
        if opts.fetch.test_mode {
            area_list.truncate(TEST_MODE_AREA_LIMIT);
        }
        logf!("Chart: {} areas for {}", area_list.len(), rd.region.key);

        for area in &area_list {
            check_cancel(cancel)?;
            for category in CHART_CATEGORIES {
                let series = aggregate(&rd.records, &Selection::new(area.as_str(), category, AgeBucket::Any));
                if series.is_empty() {
                    continue;
                }
                match write_chart_pair(dir, rd.region.key, area, category, &series) {
                    Ok(paths) => ctx.charts_generated += paths.len(),
                    Err(e) => ctx.record_error(format!(
                        "Chart generation failed: {}_{}_{} - {}",
                        rd.region.key, area, category, e
                    )),
                }
            }
        }
    }
    Ok(())
}
