// tests/common/mod.rs
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;

use house_trend::normalize::RawRecord;
use house_trend::source::{CellQuery, DataSource, SourceError};

pub const CONDO: &str = "中古マンション等";

pub fn raw(kind: &str, muni: &str, price: &str, plan: &str, period: &str, built: &str) -> RawRecord {
    let opt = |s: &str| if s.is_empty() { None } else { Some(s.to_string()) };
    RawRecord {
        kind: opt(kind),
        prefecture: Some("東京都".into()),
        municipality: opt(muni),
        district: Some("丸の内".into()),
        trade_price: opt(price),
        floor_plan: opt(plan),
        area: Some("70".into()),
        building_year: opt(built),
        period: opt(period),
        ..RawRecord::default()
    }
}

/// Canned source: two records per cell, failing on the listed (year, quarter)
/// cells. Records every query it answers.
pub struct FakeSource {
    pub fail: HashSet<(i32, u8)>,
    pub seen: RefCell<Vec<CellQuery>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self { fail: HashSet::new(), seen: RefCell::new(Vec::new()) }
    }

    pub fn failing(cells: &[(i32, u8)]) -> Self {
        Self { fail: cells.iter().copied().collect(), seen: RefCell::new(Vec::new()) }
    }
}

impl DataSource for FakeSource {
    fn fetch_cell(&self, q: &CellQuery) -> Result<Vec<RawRecord>, SourceError> {
        self.seen.borrow_mut().push(q.clone());
        if self.fail.contains(&(q.year, q.quarter)) {
            return Err(SourceError::HttpStatus { status: 503, body: "busy".into() });
        }
        let period = format!("{}年第{}四半期", q.year, q.quarter);
        Ok(vec![
            raw(CONDO, "千代田区", "30,000,000", "２ＬＤＫ", &period, "2000年"),
            raw(CONDO, "港区", "50,000,000", "３ＬＤＫ", &period, "2015年"),
        ])
    }
}
