// src/aggregate.rs
//
// Yearly mean price and transaction count for one area/category/age slice.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::consts::AGE_SPLIT_YEARS;
use crate::normalize::{FloorPlan, NormalizedRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    All,
    Only(FloorPlan),
}

impl CategoryFilter {
    #[inline]
    pub fn admits(self, plan: FloorPlan) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(p) => p == plan,
        }
    }

    /// Label in file names and the local-language chart.
    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "ALL",
            CategoryFilter::Only(p) => p.label(),
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            CategoryFilter::All => "all layouts",
            CategoryFilter::Only(p) => p.english(),
        }
    }

    /// `"ALL"` (any case) or a canonical floor-plan label.
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Some(CategoryFilter::All);
        }
        FloorPlan::from_label(s).map(CategoryFilter::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Building-age slice. The bounded buckets need a known age; records
/// without one only show up under `Any`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgeBucket {
    Any,
    /// age <= n
    AtMost(u32),
    /// age > n
    Over(u32),
}

impl AgeBucket {
    /// The two buckets the viewer offers besides `Any`.
    pub const VIEWER: [AgeBucket; 3] = [
        AgeBucket::Any,
        AgeBucket::AtMost(AGE_SPLIT_YEARS),
        AgeBucket::Over(AGE_SPLIT_YEARS),
    ];

    #[inline]
    pub fn admits(self, age: Option<u32>) -> bool {
        match (self, age) {
            (AgeBucket::Any, _) => true,
            (AgeBucket::AtMost(n), Some(a)) => a <= n,
            (AgeBucket::Over(n), Some(a)) => a > n,
            (_, None) => false,
        }
    }

    pub fn label(self) -> String {
        match self {
            AgeBucket::Any => s!("全て"),
            AgeBucket::AtMost(n) => format!("{n}年以内"),
            AgeBucket::Over(n) => format!("{}年以上", n + 1),
        }
    }

    pub fn english(self) -> String {
        match self {
            AgeBucket::Any => s!("any age"),
            AgeBucket::AtMost(n) => format!("up to {n} years"),
            AgeBucket::Over(n) => format!("{} years or older", n + 1),
        }
    }
}

/// Which admitted records feed one series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub area: String,
    pub category: CategoryFilter,
    pub age: AgeBucket,
}

impl Selection {
    pub fn new(area: impl Into<String>, category: CategoryFilter, age: AgeBucket) -> Self {
        Self { area: area.into(), category, age }
    }

    pub fn matches(&self, r: &NormalizedRecord) -> bool {
        r.municipality == self.area
            && self.category.admits(r.floor_plan)
            && self.age.admits(r.building_age_years)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YearPoint {
    pub mean_price: f64,
    pub count: usize,
}

/// Year → (mean price, count). Years without matching records are absent,
/// not zero; callers handle gaps themselves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSeries {
    points: BTreeMap<i32, YearPoint>,
}

impl TimeSeries {
    pub fn is_empty(&self) -> bool { self.points.is_empty() }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn get(&self, year: i32) -> Option<&YearPoint> { self.points.get(&year) }

    /// Ascending by year.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &YearPoint)> + '_ {
        self.points.iter().map(|(y, p)| (*y, p))
    }

    pub fn years(&self) -> Option<(i32, i32)> {
        let lo = *self.points.keys().next()?;
        let hi = *self.points.keys().next_back()?;
        Some((lo, hi))
    }

    pub fn max_mean_price(&self) -> f64 {
        self.points.values().map(|p| p.mean_price).fold(0.0, f64::max)
    }

    pub fn max_count(&self) -> usize {
        self.points.values().map(|p| p.count).max().unwrap_or(0)
    }

    pub fn total_count(&self) -> usize {
        self.points.values().map(|p| p.count).sum()
    }
}

/// Group the selected records by transaction year; mean price and count per
/// year. No rounding here.
pub fn aggregate(records: &[NormalizedRecord], sel: &Selection) -> TimeSeries {
    // year -> (price sum, count)
    let mut acc: BTreeMap<i32, (u128, usize)> = BTreeMap::new();

    for r in records.iter().filter(|r| sel.matches(r)) {
        // Inadmissible records never get this far; skip rather than guess.
        let (Some(year), Some(price)) = (r.transaction_year, r.price) else { continue };
        let e = acc.entry(year).or_insert((0, 0));
        e.0 += price as u128;
        e.1 += 1;
    }

    let points = acc
        .into_iter()
        .map(|(year, (sum, count))| {
            (year, YearPoint { mean_price: sum as f64 / count as f64, count })
        })
        .collect();

    TimeSeries { points }
}

/// Distinct municipalities in first-seen order.
pub fn areas(records: &[NormalizedRecord]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for r in records {
        if seen.insert(r.municipality.as_str()) {
            out.push(r.municipality.clone());
        }
    }
    out
}

/// Floor-plan categories present in `records` for `area`, in enum order.
pub fn categories_in(records: &[NormalizedRecord], area: &str) -> Vec<FloorPlan> {
    let present: std::collections::BTreeSet<FloorPlan> = records
        .iter()
        .filter(|r| r.municipality == area)
        .map(|r| r.floor_plan)
        .collect();
    present.into_iter().collect()
}
