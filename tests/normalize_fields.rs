// tests/normalize_fields.rs
use house_trend::normalize::fields::{building_age, parse_area, parse_built_year, parse_period_year, parse_price};
use house_trend::normalize::{FloorPlan, PropertyType};
use proptest::prelude::*;

#[test]
fn price_strips_everything_but_digits() {
    assert_eq!(parse_price("¥12,345,000"), Some(12_345_000));
    assert_eq!(parse_price("12345000"), Some(12_345_000));
    assert_eq!(parse_price("１２，０００"), Some(12_000));
    assert_eq!(parse_price("0"), Some(0));
    assert_eq!(parse_price(""), None);
    assert_eq!(parse_price("N/A"), None);
}

#[test]
fn area_keeps_one_decimal_point() {
    assert_eq!(parse_area("70"), Some(70.0));
    assert_eq!(parse_area("65.5㎡"), Some(65.5));
    assert_eq!(parse_area("2000㎡以上"), Some(2000.0));
    assert_eq!(parse_area(""), None);
    assert_eq!(parse_area("-"), None);
    assert_eq!(parse_area("1.2.3"), None);
}

#[test]
fn period_year_needs_marker() {
    assert_eq!(parse_period_year("2024年第1四半期"), Some(2024));
    assert_eq!(parse_period_year("２０１９年第４四半期"), Some(2019));
    assert_eq!(parse_period_year("2024 Q1"), None);
    assert_eq!(parse_period_year(""), None);
}

#[test]
fn built_year_and_age() {
    assert_eq!(parse_built_year("2003年"), Some(2003));
    assert_eq!(parse_built_year("戦前"), None);
    assert_eq!(parse_built_year("  "), None);

    assert_eq!(building_age("2003年", 2020), Some(17));
    assert_eq!(building_age("2020年", 2020), Some(0));
    assert_eq!(building_age("戦前", 2020), None);
    assert_eq!(building_age("", 2020), None);
}

#[test]
fn age_never_negative() {
    // Built after the sale: malformed upstream data.
    assert_eq!(building_age("2025年", 2020), Some(0));
    for built in 1950..2030 {
        let label = format!("{built}年");
        for tx in 2005..2025 {
            let age = building_age(&label, tx).unwrap();
            assert_eq!(age as i32, (tx - built).max(0));
        }
    }
}

#[test]
fn floor_plan_exact_table_collapses_variants() {
    assert_eq!(FloorPlan::categorize("１ＤＫ"), FloorPlan::OneK);
    assert_eq!(FloorPlan::categorize("２Ｋ"), FloorPlan::OneK);
    assert_eq!(FloorPlan::categorize("２ＤＫ"), FloorPlan::TwoLdk);
    assert_eq!(FloorPlan::categorize("３Ｋ"), FloorPlan::ThreeLdk);
    assert_eq!(FloorPlan::categorize("３ＤＫ"), FloorPlan::ThreeLdk);
    assert_eq!(FloorPlan::categorize("５ＬＤＫ以上"), FloorPlan::FourLdkPlus);
    assert_eq!(FloorPlan::categorize("１Ｒ"), FloorPlan::Studio);
    assert_eq!(FloorPlan::categorize(" ３ＬＤＫ "), FloorPlan::ThreeLdk);
}

#[test]
fn floor_plan_falls_back_to_containment() {
    assert_eq!(FloorPlan::categorize("2LDK+S"), FloorPlan::TwoLdk);
    assert_eq!(FloorPlan::categorize("３ＬＤＫ＋Ｓ"), FloorPlan::ThreeLdk);
    assert_eq!(FloorPlan::categorize("1R"), FloorPlan::Studio);
    assert_eq!(FloorPlan::categorize("studio-mini"), FloorPlan::Other);
    assert_eq!(FloorPlan::categorize("オープンフロア"), FloorPlan::Other);
    assert_eq!(FloorPlan::categorize(""), FloorPlan::Other);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn floor_plan_is_total(raw in "\\PC*") {
        let c = FloorPlan::categorize(&raw);
        prop_assert!(FloorPlan::ALL.contains(&c), "{:?} -> {:?}", raw, c);
    }

    #[test]
    fn floor_plan_layout_like_strings_are_total(raw in "[1-5１-５]?[SLDKRＳＬＤＫＲ+＋]{0,5}(以上)?") {
        let c = FloorPlan::categorize(&raw);
        prop_assert!(FloorPlan::ALL.contains(&c), "{:?} -> {:?}", raw, c);
    }

    #[test]
    fn floor_plan_ignores_surrounding_whitespace(raw in "\\PC{0,12}", pad in "[ \t]{0,3}") {
        let padded = format!("{pad}{raw}{pad}");
        prop_assert_eq!(FloorPlan::categorize(&padded), FloorPlan::categorize(&raw));
    }

    #[test]
    fn price_reads_grouped_yen(n in 0u64..1_000_000_000_000_000) {
        let digits = n.to_string();
        let mut grouped = String::new();
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        prop_assert_eq!(parse_price(&format!("¥{grouped}")), Some(n));
    }
}

#[test]
fn property_type_labels_round_trip() {
    for t in PropertyType::ALL {
        assert_eq!(PropertyType::from_label(t.label()), Some(t));
    }
    assert_eq!(PropertyType::from_label(" 土地 "), Some(PropertyType::Land));
    assert_eq!(PropertyType::from_label("林地"), None);
    assert_eq!(PropertyType::from_label(""), None);
}
