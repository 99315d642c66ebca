// src/gui/components/year_table.rs
use eframe::egui::{self, Align, Layout};
use egui_extras::{Column, TableBuilder};

use crate::{chart::{format_thousands, ChartLabels}, gui::app::App};

pub fn draw(ui: &mut egui::Ui, app: &App) {
    let v = &app.state.viewer;
    let labels = ChartLabels::new(v.area.as_deref().unwrap_or_default(), v.category, v.language);

    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(Layout::right_to_left(Align::Center))
        .column(Column::initial(80.0).at_least(50.0))
        .column(Column::initial(200.0).resizable(true))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            header.col(|ui| { ui.strong(&labels.x_axis); });
            header.col(|ui| { ui.strong(&labels.price_axis); });
            header.col(|ui| { ui.strong(&labels.count_axis); });
        })
        .body(|mut body| {
            for (year, p) in app.series.iter() {
                body.row(18.0, |mut row| {
                    row.col(|ui| { ui.label(year.to_string()); });
                    row.col(|ui| { ui.monospace(format_thousands(p.mean_price)); });
                    row.col(|ui| { ui.monospace(p.count.to_string()); });
                });
            }
        });
}
