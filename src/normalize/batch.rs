// src/normalize/batch.rs

use std::collections::{BTreeMap, BTreeSet};

use super::floor_plan::FloorPlan;
use super::record::transform;
use super::types::{NormalizedRecord, PropertyType, RawRecord};

/// Data-quality counters for one batch. Observability only; nothing
/// downstream branches on these.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub input_count: usize,
    pub output_count: usize,
    /// Property type outside the valid set (short-circuited before transform)
    pub dropped_by_type: usize,
    /// Missing price or transaction year
    pub dropped_inadmissible: usize,
    /// Min/max transaction year among admitted records
    pub year_range: Option<(i32, i32)>,
    pub distinct_areas: usize,
    pub categories: BTreeMap<FloorPlan, usize>,
}

impl Stats {
    pub fn log(&self, label: &str) {
        let years = match self.year_range {
            Some((lo, hi)) => format!("{lo}-{hi}"),
            None => s!("none"),
        };
        let cats = self
            .categories
            .iter()
            .map(|(c, n)| format!("{}={}", c.label(), n))
            .collect::<Vec<_>>()
            .join(" ");
        logf!(
            "Transform: {label} input={} valid={} dropped_type={} dropped_invalid={} years={years} areas={} [{cats}]",
            self.input_count,
            self.output_count,
            self.dropped_by_type,
            self.dropped_inadmissible,
            self.distinct_areas,
        );
    }
}

/// Transform a batch, keeping only admissible records.
/// A bad record is excluded and counted; it never aborts the batch.
pub fn transform_batch(raws: &[RawRecord], fallback_year: i32) -> (Vec<NormalizedRecord>, Stats) {
    let mut stats = Stats { input_count: raws.len(), ..Stats::default() };
    let mut out = Vec::with_capacity(raws.len());

    for raw in raws {
        if PropertyType::from_label(RawRecord::field(&raw.kind)).is_none() {
            stats.dropped_by_type += 1;
            continue;
        }
        let rec = transform(raw, fallback_year);
        if !rec.is_admissible() {
            stats.dropped_inadmissible += 1;
            continue;
        }
        out.push(rec);
    }

    let mut areas: BTreeSet<&str> = BTreeSet::new();
    for rec in &out {
        if let Some(y) = rec.transaction_year {
            stats.year_range = Some(match stats.year_range {
                Some((lo, hi)) => (lo.min(y), hi.max(y)),
                None => (y, y),
            });
        }
        areas.insert(rec.municipality.as_str());
        *stats.categories.entry(rec.floor_plan).or_insert(0) += 1;
    }
    stats.distinct_areas = areas.len();
    stats.output_count = out.len();

    (out, stats)
}

/// Field coverage over already-admitted records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QualityReport {
    pub total_records: usize,
    pub missing_prices: usize,
    pub missing_areas: usize,
    pub missing_building_ages: usize,
    pub valid_years: usize,
    pub year_range: Option<(i32, i32)>,
    pub unique_areas: usize,
    pub floor_plan_distribution: BTreeMap<FloorPlan, usize>,
}

impl QualityReport {
    pub fn from_records(records: &[NormalizedRecord]) -> Self {
        let mut rep = QualityReport { total_records: records.len(), ..Default::default() };
        let mut areas: BTreeSet<&str> = BTreeSet::new();
        for r in records {
            if r.price.is_none() { rep.missing_prices += 1; }
            if r.area_sqm.is_none() { rep.missing_areas += 1; }
            if r.building_age_years.is_none() { rep.missing_building_ages += 1; }
            if let Some(y) = r.transaction_year {
                rep.valid_years += 1;
                rep.year_range = Some(match rep.year_range {
                    Some((lo, hi)) => (lo.min(y), hi.max(y)),
                    None => (y, y),
                });
            }
            areas.insert(r.municipality.as_str());
            *rep.floor_plan_distribution.entry(r.floor_plan).or_insert(0) += 1;
        }
        rep.unique_areas = areas.len();
        rep
    }
}
