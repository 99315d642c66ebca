// src/normalize/types.rs
//
// Record shapes on either side of the transformer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::floor_plan::FloorPlan;

/// One upstream transaction, as delivered. Known fields are lifted out as
/// optional strings; everything else rides along in `extra` so the raw cache
/// keeps the record verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Type", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "Prefecture", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
    #[serde(rename = "Municipality", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(rename = "DistrictName", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(rename = "TradePrice", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub trade_price: Option<String>,
    #[serde(rename = "FloorPlan", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub floor_plan: Option<String>,
    #[serde(rename = "Area", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(rename = "BuildingYear", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub building_year: Option<String>,
    #[serde(rename = "Period", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,

    // Provenance, stamped by the fetcher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefecture_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefecture_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_quarter: Option<u8>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RawRecord {
    #[inline]
    pub fn field(v: &Option<String>) -> &str {
        v.as_deref().unwrap_or("")
    }
}

/// Upstream sends strings, but a number or null in a string slot must not
/// sink the whole page.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(_) => None,
    })
}

/// Transaction categories the pipeline keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyType {
    Condominium,
    LandWithBuilding,
    Land,
    Building,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Condominium,
        PropertyType::LandWithBuilding,
        PropertyType::Land,
        PropertyType::Building,
    ];

    /// Upstream label, also written to the normalized cache.
    pub fn label(self) -> &'static str {
        match self {
            PropertyType::Condominium => "中古マンション等",
            PropertyType::LandWithBuilding => "宅地(土地と建物)",
            PropertyType::Land => "土地",
            PropertyType::Building => "建物",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            PropertyType::Condominium => "residential condominium",
            PropertyType::LandWithBuilding => "residential land with building",
            PropertyType::Land => "land",
            PropertyType::Building => "building",
        }
    }

    /// Exact match after trimming. Anything else is outside the valid set.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical analysis unit.
///
/// Only admissible records (see [`NormalizedRecord::is_admissible`]) leave the
/// batch transformer; the optional fields stay optional so the same type can
/// describe a candidate that is about to be dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedRecord {
    pub property_type: Option<PropertyType>,
    pub prefecture: String,
    pub municipality: String,
    pub district: String,
    pub price: Option<u64>,
    pub area_sqm: Option<f64>,
    pub floor_plan: FloorPlan,
    pub building_year: Option<String>,
    pub transaction_period: String,
    pub transaction_year: Option<i32>,
    pub building_age_years: Option<u32>,
}

impl NormalizedRecord {
    /// Price, transaction year and a known property type are all present.
    pub fn is_admissible(&self) -> bool {
        self.price.is_some() && self.transaction_year.is_some() && self.property_type.is_some()
    }
}
