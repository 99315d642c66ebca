// src/fetch.rs
//
// Walks the region × year × quarter grid against a data source, one request
// at a time. A failed cell is logged and counted as zero records; only
// cancellation stops the walk.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::config::consts::{QUARTERS, Region};
use crate::config::options::FetchOptions;
use crate::normalize::RawRecord;
use crate::progress::Progress;
use crate::report::RunContext;
use crate::runner::PipelineError;
use crate::source::{CellQuery, DataSource};

/// Everything one region returned, in grid order.
#[derive(Debug)]
pub struct RegionBatch {
    pub region: &'static Region,
    pub records: Vec<RawRecord>,
    pub cells_queried: usize,
    pub cells_failed: usize,
}

#[inline]
fn cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|c| c.load(Ordering::Relaxed))
}

/// Stamp where a record came from.
pub fn tag_provenance(rec: &mut RawRecord, q: &CellQuery) {
    rec.prefecture_code = Some(s!(q.region.code));
    rec.prefecture_name = Some(s!(q.region.local_name));
    rec.fetch_year = Some(q.year);
    rec.fetch_quarter = Some(q.quarter);
}

/// Cells for one region, years ascending then quarters.
pub fn cells(region: &'static Region, opts: &FetchOptions) -> Vec<CellQuery> {
    opts.years()
        .flat_map(|year| {
            QUARTERS.iter().map(move |&quarter| CellQuery {
                region,
                year,
                quarter,
                city: opts.city.clone(),
            })
        })
        .collect()
}

/// Query every cell of `region`. Nothing is written here; the caller
/// persists the batch once it is complete.
pub fn fetch_region(
    source: &dyn DataSource,
    region: &'static Region,
    opts: &FetchOptions,
    ctx: &mut RunContext,
    cancel: Option<&AtomicBool>,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RegionBatch, PipelineError> {
    let grid = cells(region, opts);
    logf!(
        "Fetch: {} ({}) {}-{}, {} cells",
        region.local_name, region.key, opts.start_year, opts.end_year, grid.len()
    );

    let mut batch = RegionBatch { region, records: Vec::new(), cells_queried: 0, cells_failed: 0 };

    for (i, q) in grid.iter().enumerate() {
        if cancelled(cancel) {
            logw!("Fetch: cancelled at {}", q.label());
            return Err(PipelineError::Cancelled);
        }

        let label = q.label();
        batch.cells_queried += 1;
        match source.fetch_cell(q) {
            Ok(mut rows) => {
                logd!("Fetch: {label} -> {} records", rows.len());
                for r in rows.iter_mut() {
                    tag_provenance(r, q);
                }
                if let Some(p) = progress.as_deref_mut() {
                    p.cell_done(&label, rows.len());
                }
                batch.records.append(&mut rows);
            }
            Err(e) => {
                batch.cells_failed += 1;
                ctx.cells_failed += 1;
                ctx.record_error(format!("Fetch failed: {label} - {e}"));
                if let Some(p) = progress.as_deref_mut() {
                    p.cell_failed(&label, &e.to_string());
                }
            }
        }

        let last = i + 1 == grid.len();
        if !last && !opts.delay.is_zero() {
            thread::sleep(opts.delay);
        }
    }

    logf!(
        "Fetch: {} complete, {} records ({} of {} cells failed)",
        region.key, batch.records.len(), batch.cells_failed, batch.cells_queried
    );
    Ok(batch)
}

/// All selected regions in configured order.
pub fn fetch_all(
    source: &dyn DataSource,
    opts: &FetchOptions,
    ctx: &mut RunContext,
    cancel: Option<&AtomicBool>,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Vec<RegionBatch>, PipelineError> {
    let regions = opts.regions();
    if let Some(p) = progress.as_deref_mut() {
        p.begin(regions.len() * opts.cells_per_region());
    }

    let mut out = Vec::with_capacity(regions.len());
    for region in regions {
        let reborrow = progress.as_mut().map(|p| &mut **p as &mut dyn Progress);
        let batch = fetch_region(source, region, opts, ctx, cancel, reborrow)?;
        out.push(batch);
    }
    Ok(out)
}
