// src/gui/actions/export.rs
use crate::{
    aggregate::{aggregate, AgeBucket, Selection},
    chart::write_chart_pair,
    file::ensure_directory,
    gui::app::App,
};

/// Write the current area/category as a PNG pair into the chart directory.
/// File names carry no age bucket, so the export always covers all ages.
pub fn export_chart(app: &App) {
    let (Some(region), Some(area)) = (app.state.viewer.region, app.state.viewer.area.as_deref()) else {
        app.status("Nothing selected");
        return;
    };
    let series = aggregate(&app.records, &Selection::new(area, app.state.viewer.category, AgeBucket::Any));
    if series.is_empty() {
        app.status("No data for this selection");
        return;
    }

    let dir = &app.state.options.output.chart_dir;
    if let Err(e) = ensure_directory(dir) {
        loge!("Export: {e}");
        app.status(format!("Error: {e}"));
        return;
    }

    match write_chart_pair(dir, region.key, area, app.state.viewer.category, &series) {
        Ok(paths) => {
            logf!("Export: {} charts for {} {}", paths.len(), region.key, area);
            let shown = paths.first().map(|p| p.display().to_string()).unwrap_or_default();
            app.status(format!("Saved {} (+{} more)", shown, paths.len().saturating_sub(1)));
        }
        Err(e) => {
            loge!("Export: {e}");
            app.status(format!("Error: {e}"));
        }
    }
}
