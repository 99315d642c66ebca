// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use std::path::Path;

use eframe::egui::ViewportBuilder;
use house_trend::config::consts::{LOG_FILE, STORE_DIR};
use house_trend::config::state::ViewerState;
use house_trend::gui;

fn main() {
    if let Err(e) = house_trend::log::init(&Path::new(STORE_DIR).join(LOG_FILE)) {
        eprintln!("Logging disabled: {e}");
    }

    let viewer = ViewerState::default();
    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([viewer.window_w as f32, viewer.window_h as f32])
            .with_title("House Trend"),
        ..Default::default()
    };

    if let Err(e) = gui::run(options) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
