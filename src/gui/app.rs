// src/gui/app.rs
use std::{
    error::Error,
    path::PathBuf,
    sync::{
        atomic::AtomicBool,
        mpsc::{Receiver, TryRecvError},
        Arc, Mutex,
    },
};

use eframe::egui;

use crate::{
    aggregate::{aggregate, areas, categories_in, CategoryFilter, TimeSeries},
    config::{
        consts::Region,
        options::load_api_key,
        state::AppState,
    },
    normalize::{FloorPlan, NormalizedRecord},
    runner::RegionData,
    store,
};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "House Trend",
        options,
        Box::new(|cc| {
            super::fonts::install(&cc.egui_ctx);
            Ok(Box::new(App::new(AppState::default())))
        }),
    )?;
    Ok(())
}

/// What a refresh worker hands back.
pub type RefreshResult = Result<RegionData, String>;

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // regions with a normalized cache on disk
    pub cached: Vec<(&'static Region, PathBuf)>,

    // loaded region + derived views
    pub records: Vec<NormalizedRecord>,
    pub areas: Vec<String>,
    pub categories: Vec<FloorPlan>,
    pub series: TimeSeries,

    // status/progress (workers write here)
    pub status: Arc<Mutex<String>>,
    pub running: bool,
    pub cancel: Arc<AtomicBool>,
    pub refresh_rx: Option<Receiver<RefreshResult>>,

    pub api_key: Option<String>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let cached = store::available_regions(&state.options.output.processed_dir);
        let api_key = load_api_key();
        logf!(
            "Init: cached regions={}, api key {}",
            cached.len(),
            if api_key.is_some() { "present" } else { "missing" }
        );

        let mut app = Self {
            state,
            cached,
            records: Vec::new(),
            areas: Vec::new(),
            categories: Vec::new(),
            series: TimeSeries::default(),
            status: Arc::new(Mutex::new(s!("Idle"))),
            running: false,
            cancel: Arc::new(AtomicBool::new(false)),
            refresh_rx: None,
            api_key,
        };

        match app.cached.first().map(|(r, _)| *r) {
            Some(first) => app.load_region(first),
            None => app.status("No local data: pick a region and refresh"),
        }
        app
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    #[inline]
    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /* ---------- selection ---------- */

    /// Read the region's normalized cache. The area is kept when the new
    /// region has it, otherwise the first area is picked.
    pub fn load_region(&mut self, region: &'static Region) {
        self.state.viewer.region = Some(region);
        let path = self.state.options.output.processed_path(region);

        match store::load_processed(&path) {
            Ok((records, skipped)) => {
                logf!("Cache: loaded {} ({} records, {} skipped)", region.key, records.len(), skipped);
                self.status(format!("{}: {} records", region.local_name, records.len()));
                self.set_records(records);
            }
            Err(e) => {
                logd!("Cache: missing {} ({})", region.key, e);
                self.status(format!("{}: no local data", region.local_name));
                self.set_records(Vec::new());
            }
        }
    }

    pub fn set_records(&mut self, records: Vec<NormalizedRecord>) {
        self.records = records;
        self.areas = areas(&self.records);

        let keep = self
            .state
            .viewer
            .area
            .as_ref()
            .filter(|a| self.areas.contains(a))
            .cloned();
        let area = keep.or_else(|| self.areas.first().cloned());
        self.select_area(area);
    }

    pub fn select_area(&mut self, area: Option<String>) {
        self.categories = area
            .as_deref()
            .map(|a| categories_in(&self.records, a))
            .unwrap_or_default();

        // A category missing from the new area falls back to all.
        if let CategoryFilter::Only(p) = self.state.viewer.category {
            if !self.categories.contains(&p) {
                self.state.viewer.category = CategoryFilter::All;
            }
        }
        self.state.viewer.area = area;
        self.recompute();
    }

    /// Rebuild the series for the current selection.
    pub fn recompute(&mut self) {
        self.series = match self.state.viewer.selection() {
            Some(sel) => aggregate(&self.records, &sel),
            None => TimeSeries::default(),
        };
        logd!(
            "View: area={:?} category={} age={:?} years={}",
            self.state.viewer.area,
            self.state.viewer.category,
            self.state.viewer.age,
            self.series.len()
        );
    }

    /* ---------- background refresh ---------- */

    /// Pick up a finished refresh, if any.
    pub fn poll_refresh(&mut self) {
        let Some(rx) = &self.refresh_rx else { return };
        let msg = match rx.try_recv() {
            Ok(msg) => msg,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(s!("Refresh worker stopped unexpectedly")),
        };
        self.refresh_rx = None;
        self.running = false;

        match msg {
            Ok(data) => {
                logf!("Refresh: {} done, {} records", data.region.key, data.records.len());
                self.cached = store::available_regions(&self.state.options.output.processed_dir);
                let n = data.records.len();
                let dropped = data.stats.input_count - data.stats.output_count;
                if self.state.viewer.region == Some(data.region) {
                    self.set_records(data.records);
                }
                self.status(format!("Updated {}: {} records ({} dropped)", data.region.local_name, n, dropped));
            }
            Err(e) => {
                loge!("Refresh: {e}");
                self.status(format!("Error: {e}"));
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_refresh();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            crate::gui::components::toolbar::draw(ui, self);
        });

        egui::SidePanel::left("selectors")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                crate::gui::components::selectors::draw(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.viewer.show_table && !self.series.is_empty() {
                egui::TopBottomPanel::bottom("yearly_table")
                    .resizable(true)
                    .default_height(200.0)
                    .show_inside(ui, |ui| {
                        crate::gui::components::year_table::draw(ui, self);
                    });
            }
            crate::gui::components::chart_view::draw(ui, self);
        });

        if self.running {
            ctx.request_repaint_after(std::time::Duration::from_millis(200));
        }
    }
}
