// src/chart/mod.rs
//! Dual-axis trend charts: mean price as a line on the left axis,
//! transaction count as bars on the right.
//!
//! [`ChartScale`] holds the axis math shared by the PNG rasteriser
//! ([`raster`]) and the viewer's painter, so both draw the same chart.
//! [`ChartLabels`] carries the per-language text, drawn into each PNG by
//! [`text::Pen`].

pub mod glyphs;
pub mod raster;
pub mod text;

use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::aggregate::{CategoryFilter, TimeSeries};
use crate::core::sanitize::sanitize_filename;
use crate::file::{chart_path, write_atomic};

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("image encode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("chart write failed: {0}")]
    Io(#[from] io::Error),
    #[error("nothing to draw")]
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    Local,
    English,
}

impl Language {
    pub const BOTH: [Language; 2] = [Language::Local, Language::English];

    /// File-name suffix.
    pub fn code(self) -> &'static str {
        match self {
            Language::Local => "jp",
            Language::English => "en",
        }
    }
}

/// Text for one chart in one language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartLabels {
    pub title: String,
    pub x_axis: String,
    pub price_axis: String,
    pub count_axis: String,
    pub price_legend: String,
    pub count_legend: String,
}

impl ChartLabels {
    pub fn new(area: &str, category: CategoryFilter, lang: Language) -> Self {
        match lang {
            Language::Local => Self {
                title: format!("{area} - {}の平均取引価格と取引件数の推移", category.label()),
                x_axis: s!("Year"),
                price_axis: s!("平均取引価格"),
                count_axis: s!("取引回数"),
                price_legend: s!("平均取引価格"),
                count_legend: s!("取引回数"),
            },
            Language::English => Self {
                title: format!(
                    "{area} - The trend of the average transaction price and the number of transactions for {}",
                    category.english()
                ),
                x_axis: s!("Year"),
                price_axis: s!("Average Transaction Price"),
                count_axis: s!("Number of transactions"),
                price_legend: s!("Average Price"),
                count_legend: s!("Transaction Count"),
            },
        }
    }
}

/// One output image: region, area, category, language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartSpec {
    pub region_key: String,
    pub area: String,
    pub category: CategoryFilter,
    pub language: Language,
}

impl ChartSpec {
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.region_key,
            sanitize_filename(&self.area),
            self.category.label(),
            self.language.code()
        )
    }

    pub fn labels(&self) -> ChartLabels {
        ChartLabels::new(&self.area, self.category, self.language)
    }
}

/// Axis extents and ticks for a series.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartScale {
    pub first_year: i32,
    pub last_year: i32,
    /// Left axis top: 10% headroom over the highest mean
    pub price_max: f64,
    /// Right axis top: 20% headroom over the highest count
    pub count_max: f64,
    pub price_ticks: Vec<f64>,
    pub count_ticks: Vec<f64>,
    pub year_ticks: Vec<i32>,
}

impl ChartScale {
    /// Bar width in years.
    pub const BAR_WIDTH: f64 = 0.4;
    /// Horizontal padding either side of the first/last year.
    pub const YEAR_PAD: f64 = 0.6;

    pub fn for_series(series: &TimeSeries) -> Option<Self> {
        let (first_year, last_year) = series.years()?;
        let price_max = (series.max_mean_price() * 1.1).max(1.0);
        let count_max = (series.max_count() as f64 * 1.2).max(1.0);

        let span = (last_year - first_year) as usize;
        let step = if span > 20 { 2 } else { 1 };
        let year_ticks = (first_year..=last_year).step_by(step).collect();

        Some(Self {
            first_year,
            last_year,
            price_max,
            count_max,
            price_ticks: ticks(price_max, false),
            count_ticks: ticks(count_max, true),
            year_ticks,
        })
    }

    pub fn x_min(&self) -> f64 { self.first_year as f64 - Self::YEAR_PAD }
    pub fn x_max(&self) -> f64 { self.last_year as f64 + Self::YEAR_PAD }

    /// 0..1 across the plot width.
    pub fn x_frac(&self, year: f64) -> f64 {
        (year - self.x_min()) / (self.x_max() - self.x_min())
    }

    /// 0..1 up the plot height.
    pub fn price_frac(&self, v: f64) -> f64 { (v / self.price_max).clamp(0.0, 1.0) }
    pub fn count_frac(&self, v: f64) -> f64 { (v / self.count_max).clamp(0.0, 1.0) }
}

/// 1-2-5 step so that roughly five ticks fit under `max`.
pub fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm <= 1.0 { 1.0 } else if norm <= 2.0 { 2.0 } else if norm <= 5.0 { 5.0 } else { 10.0 };
    nice * mag
}

fn ticks(max: f64, integer: bool) -> Vec<f64> {
    let mut step = nice_step(max / 5.0);
    if integer {
        step = step.max(1.0).round();
    }
    let mut out = Vec::new();
    let mut v = 0.0;
    while v <= max + step * 1e-9 {
        out.push(v);
        v += step;
    }
    out
}

/// `12345678.9` → `"12,345,679"`.
pub fn format_thousands(v: f64) -> String {
    let n = v.round() as i64;
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render and write `series` once per language, labels drawn in that
/// language. Returns the written paths (local first).
pub fn write_chart_pair(
    dir: &Path,
    region_key: &str,
    area: &str,
    category: CategoryFilter,
    series: &TimeSeries,
) -> Result<Vec<PathBuf>, ChartError> {
    if series.is_empty() {
        return Err(ChartError::Empty);
    }
    let mut written = Vec::with_capacity(2);
    for language in Language::BOTH {
        let spec = ChartSpec {
            region_key: s!(region_key),
            area: s!(area),
            category,
            language,
        };
        let labels = spec.labels();
        let img = raster::render(series, &labels).ok_or(ChartError::Empty)?;

        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
        let path = chart_path(dir, &spec);
        write_atomic(&path, |out| out.write_all(&png))?;
        logd!("Chart: {} ({})", path.display(), labels.title);
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(12_345_678.4), "12,345,678");
    }

    #[test]
    fn nice_steps_are_1_2_5() {
        assert_eq!(nice_step(0.8), 1.0);
        assert_eq!(nice_step(1.7), 2.0);
        assert_eq!(nice_step(34.0), 50.0);
        assert_eq!(nice_step(7_200_000.0), 10_000_000.0);
    }

    #[test]
    fn file_stem_keeps_local_names() {
        let spec = ChartSpec {
            region_key: s!("tokyo"),
            area: s!("千代田区"),
            category: CategoryFilter::All,
            language: Language::English,
        };
        assert_eq!(spec.file_stem(), "tokyo_千代田区_ALL_en");
    }
}
