// src/gui/actions/refresh.rs
use std::sync::{atomic::Ordering, mpsc, Arc};
use std::thread;

use eframe::egui;

use crate::{
    config::options::RegionSelector,
    gui::{app::App, progress::GuiProgress},
    report::RunContext,
    runner,
    source::MlitClient,
};

/// Re-fetch the selected region on a worker thread. The result comes back
/// through `app.refresh_rx`.
pub fn start_refresh(app: &mut App, ctx: &egui::Context) {
    if app.running {
        return;
    }
    let Some(region) = app.state.viewer.region else {
        app.status("Select a region first");
        return;
    };
    let Some(key) = app.api_key.clone() else {
        app.status("No API key: set MLIT_API_KEY in .env");
        return;
    };

    let mut opts = app.state.options.clone();
    opts.fetch.regions = RegionSelector::Only(vec![region]);

    app.cancel.store(false, Ordering::Relaxed);
    app.running = true;
    app.status(format!("Refreshing {}…", region.local_name));
    logf!("Refresh: begin {} {}-{}", region.key, opts.fetch.start_year, opts.fetch.end_year);

    let (tx, rx) = mpsc::channel();
    app.refresh_rx = Some(rx);

    let status = app.status.clone();
    let cancel = Arc::clone(&app.cancel);
    let ctx2 = ctx.clone();

    thread::spawn(move || {
        let result = MlitClient::new(&key)
            .map_err(|e| e.to_string())
            .and_then(|client| {
                let mut run_ctx = RunContext::new();
                let mut prog = GuiProgress::new(status);
                runner::refresh_region(&client, region, &opts, &mut run_ctx, Some(cancel.as_ref()), Some(&mut prog))
                    .map_err(|e| e.to_string())
            });
        // Receiver gone means the window closed; nothing left to tell.
        let _ = tx.send(result);
        ctx2.request_repaint();
    });
}

pub fn cancel_refresh(app: &App) {
    if app.running {
        app.cancel.store(true, Ordering::Relaxed);
        app.status("Cancelling…");
        logf!("Refresh: cancel requested");
    }
}
