// src/chart/raster.rs
//
// PNG rendering of one series in one language: title, grid, count bars
// (right axis), mean-price line with markers (left axis), tick labels,
// axis names and a legend.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use super::text::Pen;
use super::{format_thousands, ChartLabels, ChartScale};
use crate::aggregate::TimeSeries;
use crate::config::consts::{CHART_HEIGHT, CHART_WIDTH};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([224, 224, 224]);
const PRICE: Rgb<u8> = Rgb([220, 20, 20]);
const PRICE_AXIS: Rgb<u8> = Rgb([139, 0, 0]);
const COUNT_AXIS: Rgb<u8> = Rgb([0, 0, 139]);
const BAR: Rgb<u8> = Rgb([173, 216, 230]);
const BAR_ALPHA: f64 = 0.5;

const LEFT: i64 = 130;
const RIGHT: i64 = 100;
const TOP: i64 = 90;
const BOTTOM: i64 = 80;

const TITLE_PX: f32 = 24.0;
const AXIS_PX: f32 = 17.0;
const TICK_PX: f32 = 14.0;
const LEGEND_PX: f32 = 15.0;

/// Plot area in pixels.
struct Frame {
    x0: i64,
    y0: i64,
    w: i64,
    h: i64,
}

impl Frame {
    fn x(&self, frac: f64) -> i64 { self.x0 + (frac * self.w as f64).round() as i64 }
    fn y(&self, frac: f64) -> i64 { self.y0 + self.h - (frac * self.h as f64).round() as i64 }
    fn bottom(&self) -> i64 { self.y0 + self.h }
    fn right(&self) -> i64 { self.x0 + self.w }
}

/// None for an empty series.
pub fn render(series: &TimeSeries, labels: &ChartLabels) -> Option<RgbImage> {
    render_with(series, labels, Pen::system(), CHART_WIDTH, CHART_HEIGHT)
}

pub fn render_with(
    series: &TimeSeries,
    labels: &ChartLabels,
    pen: Pen<'_>,
    width: u32,
    height: u32,
) -> Option<RgbImage> {
    let scale = ChartScale::for_series(series)?;
    let mut img = RgbImage::from_pixel(width, height, WHITE);
    let frame = Frame {
        x0: LEFT,
        y0: TOP,
        w: (width as i64 - LEFT - RIGHT).max(10),
        h: (height as i64 - TOP - BOTTOM).max(10),
    };

    draw_grid(&mut img, &frame, &scale);
    draw_bars(&mut img, &frame, &scale, series);
    draw_price_line(&mut img, &frame, &scale, series);
    draw_axes(&mut img, &frame, &scale, pen);
    draw_titles(&mut img, &frame, labels, pen);
    draw_legend(&mut img, &frame, labels, pen);
    Some(img)
}

fn draw_grid(img: &mut RgbImage, f: &Frame, s: &ChartScale) {
    for &t in &s.price_ticks {
        let y = f.y(s.price_frac(t));
        hline(img, f.x0, f.right(), y, GRID);
    }
    for &year in &s.year_ticks {
        let x = f.x(s.x_frac(year as f64));
        vline(img, x, f.y0, f.bottom(), GRID);
    }
}

fn draw_bars(img: &mut RgbImage, f: &Frame, s: &ChartScale, series: &TimeSeries) {
    let half = ChartScale::BAR_WIDTH / 2.0;
    for (year, p) in series.iter() {
        let xa = f.x(s.x_frac(year as f64 - half));
        let xb = f.x(s.x_frac(year as f64 + half));
        let yt = f.y(s.count_frac(p.count as f64));
        fill_blend(img, (xa, yt), (xb, f.bottom()), BAR, BAR_ALPHA);
    }
}

fn draw_price_line(img: &mut RgbImage, f: &Frame, s: &ChartScale, series: &TimeSeries) {
    let pts: Vec<(i64, i64)> = series
        .iter()
        .map(|(year, p)| (f.x(s.x_frac(year as f64)), f.y(s.price_frac(p.mean_price))))
        .collect();
    for w in pts.windows(2) {
        thick_line(img, w[0], w[1], 2, PRICE);
    }
    for &(x, y) in &pts {
        disc(img, x, y, 5, PRICE);
    }
}

fn draw_axes(img: &mut RgbImage, f: &Frame, s: &ChartScale, pen: Pen<'_>) {
    // Left: price
    vline(img, f.x0, f.y0, f.bottom(), PRICE_AXIS);
    for &t in &s.price_ticks {
        let y = f.y(s.price_frac(t));
        hline(img, f.x0 - 6, f.x0, y, PRICE_AXIS);
        let label = format_thousands(t);
        let (w, h) = pen.size(&label, TICK_PX);
        pen.draw(img, f.x0 - 10 - w as i64, y - h as i64 / 2, &label, PRICE_AXIS, TICK_PX);
    }

    // Right: count
    vline(img, f.right(), f.y0, f.bottom(), COUNT_AXIS);
    for &t in &s.count_ticks {
        let y = f.y(s.count_frac(t));
        hline(img, f.right(), f.right() + 6, y, COUNT_AXIS);
        let label = format_thousands(t);
        let (_, h) = pen.size(&label, TICK_PX);
        pen.draw(img, f.right() + 10, y - h as i64 / 2, &label, COUNT_AXIS, TICK_PX);
    }

    // Bottom: years
    hline(img, f.x0, f.right(), f.bottom(), BLACK);
    for &year in &s.year_ticks {
        let x = f.x(s.x_frac(year as f64));
        vline(img, x, f.bottom(), f.bottom() + 6, BLACK);
        let label = year.to_string();
        let (w, _) = pen.size(&label, TICK_PX);
        pen.draw(img, x - w as i64 / 2, f.bottom() + 12, &label, BLACK, TICK_PX);
    }
}

/// Title centred on top, axis names over their axes, year name underneath.
fn draw_titles(img: &mut RgbImage, f: &Frame, labels: &ChartLabels, pen: Pen<'_>) {
    let width = img.width() as i64;

    let px = pen.fit(&labels.title, TITLE_PX, img.width().saturating_sub(40));
    let (w, _) = pen.size(&labels.title, px);
    pen.draw(img, (width - w as i64) / 2, 16, &labels.title, BLACK, px);

    let axis_y = f.y0 - 30;
    let px = pen.fit(&labels.price_axis, AXIS_PX, (f.w / 2) as u32);
    pen.draw(img, 12, axis_y, &labels.price_axis, PRICE_AXIS, px);

    let px = pen.fit(&labels.count_axis, AXIS_PX, (f.w / 2) as u32);
    let (w, _) = pen.size(&labels.count_axis, px);
    pen.draw(img, width - 12 - w as i64, axis_y, &labels.count_axis, COUNT_AXIS, px);

    let (w, _) = pen.size(&labels.x_axis, AXIS_PX);
    pen.draw(img, f.x0 + f.w / 2 - w as i64 / 2, f.bottom() + 42, &labels.x_axis, BLACK, AXIS_PX);
}

/// Upper-left: price line swatch, count bar swatch, each with its name.
fn draw_legend(img: &mut RgbImage, f: &Frame, labels: &ChartLabels, pen: Pen<'_>) {
    let x = f.x0 + 16;
    let y = f.y0 + 16;
    let (_, h) = pen.size(&labels.price_legend, LEGEND_PX);
    let half = h as i64 / 2;

    thick_line(img, (x, y), (x + 36, y), 2, PRICE);
    disc(img, x + 18, y, 5, PRICE);
    pen.draw(img, x + 46, y - half, &labels.price_legend, BLACK, LEGEND_PX);

    let bar_y = y + 26;
    fill_blend(img, (x + 8, bar_y - 8), (x + 28, bar_y + 8), BAR, BAR_ALPHA);
    pen.draw(img, x + 46, bar_y - half, &labels.count_legend, BLACK, LEGEND_PX);
}

/* ---------------- primitives ---------------- */

fn hline(img: &mut RgbImage, x0: i64, x1: i64, y: i64, c: Rgb<u8>) {
    draw_line_segment_mut(img, (x0 as f32, y as f32), (x1 as f32, y as f32), c);
}

fn vline(img: &mut RgbImage, x: i64, y0: i64, y1: i64, c: Rgb<u8>) {
    draw_line_segment_mut(img, (x as f32, y0 as f32), (x as f32, y1 as f32), c);
}

fn disc(img: &mut RgbImage, cx: i64, cy: i64, r: i64, c: Rgb<u8>) {
    draw_filled_circle_mut(img, (cx as i32, cy as i32), r as i32, c);
}

fn thick_line(img: &mut RgbImage, a: (i64, i64), b: (i64, i64), half_width: i64, c: Rgb<u8>) {
    let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).max(1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = a.0 as f64 + (b.0 - a.0) as f64 * t;
        let y = a.1 as f64 + (b.1 - a.1) as f64 * t;
        disc(img, x.round() as i64, y.round() as i64, half_width, c);
    }
}

/// Alpha-blend `c` over the inclusive rectangle `a`..`b`, clipped.
fn fill_blend(img: &mut RgbImage, a: (i64, i64), b: (i64, i64), c: Rgb<u8>, alpha: f64) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let mix = |top: u8, bottom: u8| (top as f64 * alpha + bottom as f64 * (1.0 - alpha)).round() as u8;
    for y in a.1.max(0)..=b.1.min(h - 1) {
        for x in a.0.max(0)..=b.0.min(w - 1) {
            let under = *img.get_pixel(x as u32, y as u32);
            img.put_pixel(
                x as u32,
                y as u32,
                Rgb([mix(c[0], under[0]), mix(c[1], under[1]), mix(c[2], under[2])]),
            );
        }
    }
}
