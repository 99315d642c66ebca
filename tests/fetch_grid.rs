// tests/fetch_grid.rs
mod common;

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use common::FakeSource;
use house_trend::config::consts::region_by_key;
use house_trend::config::options::{FetchOptions, RegionSelector};
use house_trend::fetch::{fetch_all, fetch_region};
use house_trend::progress::Progress;
use house_trend::report::RunContext;
use house_trend::runner::PipelineError;

fn opts(start: i32, end: i32) -> FetchOptions {
    FetchOptions {
        start_year: start,
        end_year: end,
        delay: Duration::ZERO,
        ..FetchOptions::default()
    }
}

#[derive(Default)]
struct Counting {
    total: usize,
    done: usize,
    failed: usize,
}

impl Progress for Counting {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn cell_done(&mut self, _label: &str, _records: usize) { self.done += 1; }
    fn cell_failed(&mut self, _label: &str, _error: &str) { self.failed += 1; }
}

#[test]
fn walks_years_then_quarters() {
    let src = FakeSource::new();
    let tokyo = region_by_key("tokyo").unwrap();
    let mut ctx = RunContext::new();

    let batch = fetch_region(&src, tokyo, &opts(2020, 2021), &mut ctx, None, None).unwrap();

    let order: Vec<(i32, u8)> = src.seen.borrow().iter().map(|q| (q.year, q.quarter)).collect();
    assert_eq!(order, vec![
        (2020, 1), (2020, 2), (2020, 3), (2020, 4),
        (2021, 1), (2021, 2), (2021, 3), (2021, 4),
    ]);
    assert_eq!(batch.cells_queried, 8);
    assert_eq!(batch.records.len(), 16);
    assert!(ctx.errors.is_empty());
}

#[test]
fn records_carry_provenance() {
    let src = FakeSource::new();
    let osaka = region_by_key("osaka").unwrap();
    let mut ctx = RunContext::new();

    let batch = fetch_region(&src, osaka, &opts(2019, 2019), &mut ctx, None, None).unwrap();
    let last = batch.records.last().unwrap();
    assert_eq!(last.prefecture_code.as_deref(), Some("27"));
    assert_eq!(last.prefecture_name.as_deref(), Some("大阪府"));
    assert_eq!(last.fetch_year, Some(2019));
    assert_eq!(last.fetch_quarter, Some(4));
}

#[test]
fn failed_cell_counts_as_zero_records() {
    let src = FakeSource::failing(&[(2020, 2), (2020, 3)]);
    let tokyo = region_by_key("tokyo").unwrap();
    let mut ctx = RunContext::new();
    let mut prog = Counting::default();

    let batch = fetch_region(&src, tokyo, &opts(2020, 2020), &mut ctx, None, Some(&mut prog)).unwrap();

    assert_eq!(batch.cells_queried, 4);
    assert_eq!(batch.cells_failed, 2);
    assert_eq!(batch.records.len(), 4);
    assert_eq!(ctx.cells_failed, 2);
    assert_eq!(ctx.errors.len(), 2);
    assert!(ctx.errors[0].contains("2020Q2"));
    assert_eq!((prog.done, prog.failed), (2, 2));
}

#[test]
fn cancellation_stops_before_the_next_cell() {
    let src = FakeSource::new();
    let tokyo = region_by_key("tokyo").unwrap();
    let mut ctx = RunContext::new();
    let cancel = AtomicBool::new(true);

    let res = fetch_region(&src, tokyo, &opts(2020, 2024), &mut ctx, Some(&cancel), None);
    assert!(matches!(res, Err(PipelineError::Cancelled)));
    assert!(src.seen.borrow().is_empty());
}

#[test]
fn city_code_is_forwarded() {
    let src = FakeSource::new();
    let tokyo = region_by_key("tokyo").unwrap();
    let mut ctx = RunContext::new();
    let mut o = opts(2020, 2020);
    o.city = Some("13101".into());

    fetch_region(&src, tokyo, &o, &mut ctx, None, None).unwrap();
    let seen = src.seen.borrow();
    let params = seen[0].params();
    assert!(params.contains(&("city", "13101".to_string())));
    assert!(params.contains(&("area", "13".to_string())));
    assert!(params.contains(&("priceClassification", "01".to_string())));
}

#[test]
fn fetch_all_follows_region_order() {
    let src = FakeSource::new();
    let mut o = opts(2020, 2020);
    o.regions = RegionSelector::Only(vec![
        region_by_key("aichi").unwrap(),
        region_by_key("chiba").unwrap(),
    ]);
    let mut ctx = RunContext::new();
    let mut prog = Counting::default();

    let batches = fetch_all(&src, &o, &mut ctx, None, Some(&mut prog)).unwrap();
    let keys: Vec<&str> = batches.iter().map(|b| b.region.key).collect();
    assert_eq!(keys, vec!["aichi", "chiba"]);
    assert_eq!(prog.total, 8);
}

#[test]
fn test_mode_is_tokyo_only() {
    let o = FetchOptions { test_mode: true, ..FetchOptions::default() };
    let keys: Vec<&str> = o.regions().iter().map(|r| r.key).collect();
    assert_eq!(keys, vec!["tokyo"]);
}

#[test]
fn validation() {
    assert!(opts(2020, 2019).validate().is_err());
    let mut o = opts(2020, 2020);
    o.city = Some("131".into());
    assert!(o.validate().is_err());
    o.city = Some("13101".into());
    assert!(o.validate().is_ok());
}
