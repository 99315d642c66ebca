// src/gui/components/toolbar.rs
//
// Refresh / cancel / export, language toggle and the status line.

use eframe::egui::{self, widgets::Spinner};
use crate::{chart::Language, gui::{actions, app::App}};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        let red = egui::Color32::from_rgb(220, 30, 30);
        let black = egui::Color32::BLACK;

        let can_refresh = !app.running && app.state.viewer.region.is_some();
        let button_refresh = ui
            .add_enabled(
                can_refresh,
                egui::Button::new(egui::RichText::new("REFRESH").color(black).strong()).fill(red),
            )
            .on_hover_text("Fetch the selected region again from the API");
        if button_refresh.clicked() {
            actions::start_refresh(app, ui.ctx());
        }

        if ui.add_enabled(app.running, egui::Button::new("Cancel")).clicked() {
            actions::cancel_refresh(app);
        }

        if ui.add_enabled(!app.series.is_empty(), egui::Button::new("Save PNG")).clicked() {
            actions::export_chart(app);
        }

        ui.separator();

        let before = app.state.viewer.language;
        ui.selectable_value(&mut app.state.viewer.language, Language::Local, "日本語");
        ui.selectable_value(&mut app.state.viewer.language, Language::English, "English");
        if app.state.viewer.language != before {
            logf!("UI: language → {:?}", app.state.viewer.language);
        }

        ui.checkbox(&mut app.state.viewer.show_table, "Table");

        ui.separator();

        if app.running {
            ui.add(Spinner::new().size(16.0));
        }
        ui.label(app.status_text());
    });
}
