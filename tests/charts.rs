// tests/charts.rs
use house_trend::aggregate::{aggregate, AgeBucket, CategoryFilter, Selection, TimeSeries};
use house_trend::chart::text::Pen;
use house_trend::chart::{raster, write_chart_pair, ChartError, ChartLabels, ChartScale, Language};
use house_trend::normalize::{FloorPlan, NormalizedRecord, PropertyType};
use tempfile::TempDir;

fn series(points: &[(i32, u64)]) -> TimeSeries {
    let recs: Vec<NormalizedRecord> = points
        .iter()
        .map(|&(year, price)| NormalizedRecord {
            property_type: Some(PropertyType::Condominium),
            prefecture: "東京都".into(),
            municipality: "港区".into(),
            district: String::new(),
            price: Some(price),
            area_sqm: None,
            floor_plan: FloorPlan::OneK,
            building_year: None,
            transaction_period: String::new(),
            transaction_year: Some(year),
            building_age_years: None,
        })
        .collect();
    aggregate(&recs, &Selection::new("港区", CategoryFilter::All, AgeBucket::Any))
}

#[test]
fn scale_has_headroom() {
    let ts = series(&[(2010, 100), (2010, 300), (2012, 1000)]);
    let s = ChartScale::for_series(&ts).unwrap();
    assert_eq!((s.first_year, s.last_year), (2010, 2012));
    assert!((s.price_max - 1100.0).abs() < 1e-9);
    assert!((s.count_max - 2.4).abs() < 1e-9);
    assert_eq!(s.year_ticks, vec![2010, 2011, 2012]);
    assert!(s.count_ticks.iter().all(|t| t.fract() == 0.0));
}

#[test]
fn long_spans_tick_every_other_year() {
    let ts = series(&[(2000, 1), (2024, 1)]);
    let s = ChartScale::for_series(&ts).unwrap();
    assert_eq!(s.year_ticks.first(), Some(&2000));
    assert_eq!(s.year_ticks.get(1), Some(&2002));
}

#[test]
fn empty_series_draws_nothing() {
    let ts = TimeSeries::default();
    assert!(ChartScale::for_series(&ts).is_none());
    let labels = ChartLabels::new("港区", CategoryFilter::All, Language::English);
    assert!(raster::render(&ts, &labels).is_none());

    let dir = TempDir::new().unwrap();
    let err = write_chart_pair(dir.path(), "tokyo", "港区", CategoryFilter::All, &ts).unwrap_err();
    assert!(matches!(err, ChartError::Empty));
}

#[test]
fn pair_is_written_for_both_languages() {
    let dir = TempDir::new().unwrap();
    let ts = series(&[(2019, 10_000_000), (2020, 12_000_000)]);
    let paths = write_chart_pair(dir.path(), "tokyo", "港区", CategoryFilter::Only(FloorPlan::OneK), &ts).unwrap();

    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("tokyo_港区_１Ｋ_jp.png"));
    assert!(paths[1].ends_with("tokyo_港区_１Ｋ_en.png"));

    let img = image::open(&paths[0]).unwrap();
    assert_eq!((img.width(), img.height()), (1200, 800));

    let jp = std::fs::read(&paths[0]).unwrap();
    let en = std::fs::read(&paths[1]).unwrap();
    assert_ne!(jp, en, "language variants must carry their own labels");

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn builtin_glyphs_still_label_each_language() {
    let ts = series(&[(2019, 10_000_000), (2020, 12_000_000)]);
    let jp = ChartLabels::new("港区", CategoryFilter::All, Language::Local);
    let en = ChartLabels::new("港区", CategoryFilter::All, Language::English);

    let a = raster::render_with(&ts, &jp, Pen::Bitmap, 600, 400).unwrap();
    let b = raster::render_with(&ts, &en, Pen::Bitmap, 600, 400).unwrap();
    assert_eq!(a.dimensions(), (600, 400));
    assert_ne!(a.as_raw(), b.as_raw());
}

#[test]
fn title_is_drawn_above_the_plot() {
    let ts = series(&[(2019, 10_000_000), (2020, 12_000_000)]);
    let en = ChartLabels::new("Minato", CategoryFilter::All, Language::English);
    let img = raster::render_with(&ts, &en, Pen::Bitmap, 1200, 800).unwrap();

    let inked = (0..1200).any(|x| (10..50).any(|y| img.get_pixel(x, y).0 == [0, 0, 0]));
    assert!(inked);
}

#[test]
fn labels_per_language() {
    let jp = ChartLabels::new("港区", CategoryFilter::All, Language::Local);
    assert!(jp.title.starts_with("港区 - ALL"));
    let en = ChartLabels::new("港区", CategoryFilter::Only(FloorPlan::TwoLdk), Language::English);
    assert_eq!(en.count_legend, "Transaction Count");
    assert!(en.title.contains("港区"));
}
