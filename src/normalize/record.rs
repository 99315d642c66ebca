// src/normalize/record.rs

use super::fields::{building_age, parse_area, parse_period_year, parse_price};
use super::floor_plan::FloorPlan;
use super::types::{NormalizedRecord, PropertyType, RawRecord};

/// Map one raw record to its normalized candidate. Always succeeds;
/// admissibility is judged by the batch transformer.
///
/// `fallback_year` only feeds the building-age estimate when the period has
/// no readable year. It never becomes the record's `transaction_year`, so
/// such a record is still dropped later.
pub fn transform(raw: &RawRecord, fallback_year: i32) -> NormalizedRecord {
    let period = RawRecord::field(&raw.period);
    let transaction_year = parse_period_year(period);

    let building_year = raw
        .building_year
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let building_age_years = building_year
        .as_deref()
        .and_then(|b| building_age(b, transaction_year.unwrap_or(fallback_year)));

    NormalizedRecord {
        property_type: PropertyType::from_label(RawRecord::field(&raw.kind)),
        prefecture: RawRecord::field(&raw.prefecture).trim().to_string(),
        municipality: RawRecord::field(&raw.municipality).trim().to_string(),
        district: RawRecord::field(&raw.district).trim().to_string(),
        price: parse_price(RawRecord::field(&raw.trade_price)),
        area_sqm: parse_area(RawRecord::field(&raw.area)),
        floor_plan: FloorPlan::categorize(RawRecord::field(&raw.floor_plan)),
        building_year,
        transaction_period: period.trim().to_string(),
        transaction_year,
        building_age_years,
    }
}
