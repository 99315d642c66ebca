// src/config/options.rs
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppOptions {
    pub fetch: FetchOptions,
    pub output: OutputOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegionSelector {
    All,
    Only(Vec<&'static Region>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    pub regions: RegionSelector,
    pub start_year: i32,
    pub end_year: i32,
    /// Optional 5-digit municipality code narrowing every query
    pub city: Option<String>,
    pub delay: Duration,
    /// Tokyo only, first few areas charted
    pub test_mode: bool,
    pub fallback_year: i32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            regions: RegionSelector::All,
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            city: None,
            delay: Duration::from_millis(REQUEST_PAUSE_MS),
            test_mode: false,
            fallback_year: AGE_FALLBACK_YEAR,
        }
    }
}

impl FetchOptions {
    pub fn regions(&self) -> Vec<&'static Region> {
        if self.test_mode {
            return REGIONS.iter().filter(|r| r.key == "tokyo").collect();
        }
        match &self.regions {
            RegionSelector::All => REGIONS.iter().collect(),
            RegionSelector::Only(v) => v.clone(),
        }
    }

    /// Empty when start > end.
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    /// Queries issued per region.
    pub fn cells_per_region(&self) -> usize {
        self.years().count() * QUARTERS.len()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.start_year > self.end_year {
            return Err(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            ));
        }
        if let Some(city) = &self.city {
            if city.len() != 5 || !city.chars().all(|c| c.is_ascii_digit()) {
                return Err(format!("city code must be 5 digits, got {city:?}"));
            }
        }
        if self.regions().is_empty() {
            return Err(s!("no regions selected"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputOptions {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub chart_dir: PathBuf,
    pub report_dir: PathBuf,
    pub skip_charts: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from(DEFAULT_RAW_DIR),
            processed_dir: PathBuf::from(DEFAULT_PROCESSED_DIR),
            chart_dir: PathBuf::from(DEFAULT_CHART_DIR),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            skip_charts: false,
        }
    }
}

impl OutputOptions {
    /// Everything under one root, as tests and the viewer refresh use it.
    pub fn rooted(root: &Path) -> Self {
        Self {
            raw_dir: root.join(DEFAULT_RAW_DIR),
            processed_dir: root.join(DEFAULT_PROCESSED_DIR),
            chart_dir: root.join(DEFAULT_CHART_DIR),
            report_dir: root.join(DEFAULT_REPORT_DIR),
            skip_charts: false,
        }
    }

    pub fn raw_path(&self, region: &Region) -> PathBuf {
        self.raw_dir.join(join!(region.key, RAW_SUFFIX))
    }

    pub fn processed_path(&self, region: &Region) -> PathBuf {
        self.processed_dir.join(join!(region.key, PROCESSED_SUFFIX))
    }
}

/// Static credential for the data source.
/// `.env` in the working directory wins over the process environment.
pub fn load_api_key() -> Option<String> {
    let from_dotenv = dotenvy::dotenv_iter().ok().and_then(|iter| {
        iter.filter_map(Result::ok)
            .find(|(k, _)| k == API_KEY_HEADER || k == API_KEY_ENV_FALLBACK)
            .map(|(_, v)| v)
    });

    from_dotenv
        .or_else(|| std::env::var(API_KEY_HEADER).ok())
        .or_else(|| std::env::var(API_KEY_ENV_FALLBACK).ok())
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}
