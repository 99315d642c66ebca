// src/gui/components/chart_view.rs
//
// Dual-axis chart painted straight onto the panel: count bars against the
// right axis, mean price line against the left. Same scale as the PNGs.

use eframe::egui::{self, pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke};

use crate::{
    aggregate::AgeBucket,
    chart::{format_thousands, ChartLabels, ChartScale, Language},
    gui::app::App,
};

const PRICE: Color32 = Color32::from_rgb(220, 20, 20);
const PRICE_AXIS: Color32 = Color32::from_rgb(139, 0, 0);
const COUNT_AXIS: Color32 = Color32::from_rgb(0, 0, 139);
const BAR: Color32 = Color32::from_rgba_premultiplied(87, 108, 115, 128);
const GRID: Color32 = Color32::from_gray(90);

pub fn draw(ui: &mut egui::Ui, app: &App) {
    let v = &app.state.viewer;
    let Some(area) = v.area.as_deref() else {
        ui.centered_and_justified(|ui| ui.label("No data loaded"));
        return;
    };
    let labels = ChartLabels::new(area, v.category, v.language);

    ui.vertical_centered(|ui| {
        ui.heading(&labels.title);
        if v.age != AgeBucket::Any {
            let age = if v.language == Language::English { v.age.english() } else { v.age.label() };
            ui.label(age);
        }
    });

    let Some(scale) = ChartScale::for_series(&app.series) else {
        ui.centered_and_justified(|ui| ui.label("No transactions for this selection"));
        return;
    };

    let (resp, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
    let outer = resp.rect;
    let plot = Rect::from_min_max(outer.min + vec2(90.0, 30.0), outer.max - vec2(80.0, 45.0));
    if plot.width() < 50.0 || plot.height() < 50.0 {
        return;
    }

    let x = |year: f64| plot.left() + scale.x_frac(year) as f32 * plot.width();
    let y_price = |p: f64| plot.bottom() - scale.price_frac(p) as f32 * plot.height();
    let y_count = |c: f64| plot.bottom() - scale.count_frac(c) as f32 * plot.height();
    let font = FontId::proportional(12.0);
    let text_color = ui.visuals().text_color();

    // grid
    let grid = Stroke::new(0.5, GRID);
    for &t in &scale.price_ticks {
        let y = y_price(t);
        painter.line_segment([pos2(plot.left(), y), pos2(plot.right(), y)], grid);
    }
    for &yr in &scale.year_ticks {
        let xx = x(yr as f64);
        painter.line_segment([pos2(xx, plot.top()), pos2(xx, plot.bottom())], grid);
    }

    // bars
    let half = ChartScale::BAR_WIDTH / 2.0;
    for (year, p) in app.series.iter() {
        let yr = year as f64;
        let r = Rect::from_min_max(pos2(x(yr - half), y_count(p.count as f64)), pos2(x(yr + half), plot.bottom()));
        painter.rect_filled(r, 0.0, BAR);
    }

    // price line + markers
    let points: Vec<Pos2> = app
        .series
        .iter()
        .map(|(year, p)| pos2(x(year as f64), y_price(p.mean_price)))
        .collect();
    if points.len() > 1 {
        painter.add(Shape::line(points.clone(), Stroke::new(2.0, PRICE)));
    }
    for pt in &points {
        painter.circle_filled(*pt, 4.0, PRICE);
    }

    // axes
    let axis = Stroke::new(1.0, text_color);
    painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis);
    painter.line_segment([plot.left_bottom(), plot.left_top()], Stroke::new(1.0, PRICE_AXIS));
    painter.line_segment([plot.right_bottom(), plot.right_top()], Stroke::new(1.0, COUNT_AXIS));

    for &t in &scale.price_ticks {
        painter.text(pos2(plot.left() - 6.0, y_price(t)), Align2::RIGHT_CENTER, format_thousands(t), font.clone(), PRICE_AXIS);
    }
    for &t in &scale.count_ticks {
        painter.text(pos2(plot.right() + 6.0, y_count(t)), Align2::LEFT_CENTER, format_thousands(t), font.clone(), COUNT_AXIS);
    }
    for &yr in &scale.year_ticks {
        painter.text(pos2(x(yr as f64), plot.bottom() + 4.0), Align2::CENTER_TOP, yr.to_string(), font.clone(), text_color);
    }

    painter.text(pos2(plot.center().x, outer.bottom() - 4.0), Align2::CENTER_BOTTOM, &labels.x_axis, font.clone(), text_color);
    painter.text(pos2(plot.left(), plot.top() - 6.0), Align2::CENTER_BOTTOM, &labels.price_axis, font.clone(), PRICE_AXIS);
    painter.text(pos2(plot.right(), plot.top() - 6.0), Align2::CENTER_BOTTOM, &labels.count_axis, font.clone(), COUNT_AXIS);

    // legend
    let lx = plot.left() + 12.0;
    let ly = plot.top() + 12.0;
    painter.line_segment([pos2(lx, ly), pos2(lx + 24.0, ly)], Stroke::new(2.0, PRICE));
    painter.circle_filled(pos2(lx + 12.0, ly), 3.0, PRICE);
    painter.text(pos2(lx + 30.0, ly), Align2::LEFT_CENTER, &labels.price_legend, font.clone(), text_color);
    let sw = Rect::from_min_max(pos2(lx, ly + 12.0), pos2(lx + 24.0, ly + 24.0));
    painter.rect_filled(sw, 0.0, BAR);
    painter.text(pos2(lx + 30.0, ly + 18.0), Align2::LEFT_CENTER, &labels.count_legend, font, text_color);

    // hover readout, nearest year
    if let Some(hover) = resp.hover_pos().filter(|p| plot.contains(*p)) {
        let nearest = app
            .series
            .iter()
            .min_by(|a, b| {
                let da = (x(a.0 as f64) - hover.x).abs();
                let db = (x(b.0 as f64) - hover.x).abs();
                da.total_cmp(&db)
            });
        if let Some((year, p)) = nearest {
            let xx = x(year as f64);
            painter.line_segment([pos2(xx, plot.top()), pos2(xx, plot.bottom())], Stroke::new(1.0, text_color));
            resp.on_hover_ui_at_pointer(|ui| {
                ui.strong(year.to_string());
                ui.label(format!("{}: {}", labels.price_legend, format_thousands(p.mean_price)));
                ui.label(format!("{}: {}", labels.count_legend, p.count));
            });
        }
    }
}
