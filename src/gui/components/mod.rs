// src/gui/components/mod.rs
pub mod chart_view;
pub mod selectors;
pub mod toolbar;
pub mod year_table;
