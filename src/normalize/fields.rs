// src/normalize/fields.rs
//
// One raw field in, one typed value out. None marks "absent"; these never fail.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::sanitize::{ascii_digit, digits_only};

/// 4-digit year followed by the 年 marker, in period and building-year labels.
fn year_re() -> &'static Regex {
    static YEAR_RE: OnceLock<Regex> = OnceLock::new();
    YEAR_RE.get_or_init(|| Regex::new(r"([0-9０-９]{4})年").expect("valid year regex"))
}

fn year_before_marker(label: &str) -> Option<i32> {
    let caps = year_re().captures(label)?;
    digits_only(caps.get(1)?.as_str()).parse().ok()
}

/// `"¥12,345,000"` → 12345000. Every non-digit is dropped first.
pub fn parse_price(raw: &str) -> Option<u64> {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// `"70㎡"` → 70.0, `"2000㎡以上"` → 2000.0. Keeps digits and the decimal
/// point; more than one point does not parse.
pub fn parse_area(raw: &str) -> Option<f64> {
    let kept: String = raw
        .chars()
        .filter_map(|c| if c == '.' { Some('.') } else { ascii_digit(c) })
        .collect();
    if kept.is_empty() {
        return None;
    }
    kept.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `"2024年第1四半期"` → 2024.
pub fn parse_period_year(period: &str) -> Option<i32> {
    year_before_marker(period)
}

/// `"2003年"` → 2003. Labels without a western year (`"戦前"`) give None.
pub fn parse_built_year(label: &str) -> Option<i32> {
    if label.trim().is_empty() {
        return None;
    }
    year_before_marker(label)
}

/// Years between construction and transaction, never negative.
pub fn building_age(building_year: &str, transaction_year: i32) -> Option<u32> {
    let built = parse_built_year(building_year)?;
    Some(transaction_year.saturating_sub(built).max(0) as u32)
}
