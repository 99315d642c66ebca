// src/gui/components/selectors.rs
//
// Left panel: region, area, layout category and building age. Every change
// goes back through `App` so the series is rebuilt once.

use eframe::egui;
use crate::{
    aggregate::{AgeBucket, CategoryFilter},
    chart::Language,
    config::consts::REGIONS,
    gui::app::App,
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let english = app.state.viewer.language == Language::English;

    ui.heading(if english { "Region" } else { "地域" });
    for region in REGIONS {
        let selected = app.state.viewer.region == Some(region);
        let cached = app.cached.iter().any(|(r, _)| *r == region);
        let text = if english {
            format!("{} ({})", region.key, region.code)
        } else {
            format!("{} ({})", region.local_name, region.code)
        };
        let text = if cached { egui::RichText::new(text) } else { egui::RichText::new(text).weak() };

        let resp = ui.selectable_label(selected, text);
        if resp.clicked() && !selected && !app.running {
            logf!("UI: region → {}", region.key);
            app.load_region(region);
        }
    }

    ui.separator();

    ui.label(if english { "Area" } else { "市区町村" });
    let current = app.state.viewer.area.clone();
    let mut picked: Option<String> = None;
    egui::ComboBox::from_id_salt("area_combo")
        .width(ui.available_width())
        .selected_text(current.as_deref().unwrap_or("-"))
        .show_ui(ui, |ui| {
            for area in &app.areas {
                if ui.selectable_label(current.as_deref() == Some(area.as_str()), area).clicked() {
                    picked = Some(area.clone());
                }
            }
        });
    if let Some(area) = picked.filter(|a| Some(a) != current.as_ref()) {
        logf!("UI: area → {area}");
        app.select_area(Some(area));
    }

    ui.separator();

    ui.label(if english { "Layout" } else { "間取り" });
    let before = app.state.viewer.category;
    let label = |c: CategoryFilter| if english { c.english() } else { c.label() };
    ui.selectable_value(&mut app.state.viewer.category, CategoryFilter::All, label(CategoryFilter::All));
    for plan in app.categories.clone() {
        let c = CategoryFilter::Only(plan);
        ui.selectable_value(&mut app.state.viewer.category, c, label(c));
    }
    let category_changed = app.state.viewer.category != before;

    ui.separator();

    ui.label(if english { "Building age" } else { "築年数" });
    let before_age = app.state.viewer.age;
    for bucket in AgeBucket::VIEWER {
        let text = if english { bucket.english() } else { bucket.label() };
        ui.radio_value(&mut app.state.viewer.age, bucket, text);
    }
    let age_changed = app.state.viewer.age != before_age;

    if category_changed || age_changed {
        logf!("UI: category={} age={:?}", app.state.viewer.category, app.state.viewer.age);
        app.recompute();
    }
}
