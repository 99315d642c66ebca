// src/gui/actions/mod.rs
//
// Folder module facade: re-export public entrypoints.

mod export;   // src/gui/actions/export.rs
mod refresh;  // src/gui/actions/refresh.rs

pub use export::export_chart;
pub use refresh::{cancel_refresh, start_refresh};
