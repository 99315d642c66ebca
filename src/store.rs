// src/store.rs
//
// Flat-file caches: raw records as JSON per region, admitted records as CSV
// per region. Files are written whole, after the region is complete, and
// replace the previous cache in one rename.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::consts::{PROCESSED_SUFFIX, REGIONS, Region};
use crate::csv::{parse_rows, write_row};
use crate::file::{ensure_parent, write_atomic};
use crate::normalize::{FloorPlan, NormalizedRecord, PropertyType, RawRecord};
use crate::runner::PipelineError;

const SEP: char = ',';

/// Normalized cache columns, in file order.
pub const PROCESSED_HEADERS: [&str; 11] = [
    "種類",
    "都道府県名",
    "市区町村名",
    "地区名",
    "取引価格（総額）",
    "間取り",
    "面積（㎡）",
    "建築年",
    "取引時期",
    "取引時期（年）",
    "築年数",
];

/* ---------------- Raw cache ---------------- */

/// Pretty JSON, UTF-8, non-ASCII kept as-is.
pub fn save_raw(path: &Path, records: &[RawRecord]) -> Result<(), PipelineError> {
    ensure_parent(path)?;
    let json = serde_json::to_vec_pretty(records)?;
    write_atomic(path, |out| out.write_all(&json)).map_err(|e| PipelineError::io(path, e))?;
    logf!("Cache: saved {} raw records -> {}", records.len(), path.display());
    Ok(())
}

pub fn load_raw(path: &Path) -> Result<Vec<RawRecord>, PipelineError> {
    let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/* ---------------- Normalized cache ---------------- */

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

pub fn record_to_row(r: &NormalizedRecord) -> Vec<String> {
    vec![
        r.property_type.map(|t| s!(t.label())).unwrap_or_default(),
        r.prefecture.clone(),
        r.municipality.clone(),
        r.district.clone(),
        opt(r.price),
        s!(r.floor_plan.label()),
        opt(r.area_sqm),
        r.building_year.clone().unwrap_or_default(),
        r.transaction_period.clone(),
        opt(r.transaction_year),
        opt(r.building_age_years),
    ]
}

pub fn save_processed(path: &Path, records: &[NormalizedRecord]) -> Result<(), PipelineError> {
    ensure_parent(path)?;
    write_atomic(path, |out| {
        write_row(&mut *out, &PROCESSED_HEADERS[..], SEP)?;
        for r in records {
            write_row(&mut *out, record_to_row(r).as_slice(), SEP)?;
        }
        Ok(())
    })
    .map_err(|e| PipelineError::io(path, e))?;
    logf!("Cache: saved {} records -> {}", records.len(), path.display());
    Ok(())
}

/// Column positions resolved from the header row.
struct Columns(HashMap<&'static str, usize>);

impl Columns {
    fn from_header(header: &[String]) -> Result<Self, String> {
        let mut map = HashMap::new();
        for name in PROCESSED_HEADERS {
            let ix = header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| format!("missing column {name}"))?;
            map.insert(name, ix);
        }
        Ok(Columns(map))
    }

    fn get<'r>(&self, row: &'r [String], name: &str) -> &'r str {
        self.0
            .get(name)
            .and_then(|&ix| row.get(ix))
            .map(|s| s.trim())
            .unwrap_or("")
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

fn row_to_record(cols: &Columns, row: &[String]) -> NormalizedRecord {
    let plan = cols.get(row, "間取り");
    NormalizedRecord {
        property_type: PropertyType::from_label(cols.get(row, "種類")),
        prefecture: s!(cols.get(row, "都道府県名")),
        municipality: s!(cols.get(row, "市区町村名")),
        district: s!(cols.get(row, "地区名")),
        price: non_empty(cols.get(row, "取引価格（総額）")).and_then(|s| s.parse().ok()),
        floor_plan: FloorPlan::from_label(plan).unwrap_or_else(|| FloorPlan::categorize(plan)),
        area_sqm: non_empty(cols.get(row, "面積（㎡）")).and_then(|s| s.parse().ok()),
        building_year: non_empty(cols.get(row, "建築年")).map(str::to_string),
        transaction_period: s!(cols.get(row, "取引時期")),
        transaction_year: non_empty(cols.get(row, "取引時期（年）")).and_then(|s| s.parse().ok()),
        building_age_years: non_empty(cols.get(row, "築年数")).and_then(|s| s.parse().ok()),
    }
}

/// Read a normalized cache back. Rows that no longer pass admissibility are
/// skipped and counted; a missing column is an error.
pub fn load_processed(path: &Path) -> Result<(Vec<NormalizedRecord>, usize), PipelineError> {
    let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    let mut rows = parse_rows(&text, SEP).into_iter();

    let Some(header) = rows.next() else {
        return Ok((Vec::new(), 0));
    };
    let cols = Columns::from_header(&header).map_err(|reason| PipelineError::Malformed {
        path: path.to_path_buf(),
        reason,
    })?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in rows {
        let rec = row_to_record(&cols, &row);
        if rec.is_admissible() {
            records.push(rec);
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        logw!("Cache: {} skipped {} unusable rows", path.display(), skipped);
    }
    Ok((records, skipped))
}

/// Regions with a normalized cache file in `dir`, in configured order.
pub fn available_regions(dir: &Path) -> Vec<(&'static Region, PathBuf)> {
    REGIONS
        .iter()
        .map(|r| (r, dir.join(join!(r.key, PROCESSED_SUFFIX))))
        .filter(|(_, p)| p.is_file())
        .collect()
}
