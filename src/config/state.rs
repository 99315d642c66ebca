// src/config/state.rs
use super::consts::Region;
use super::options::AppOptions;
use crate::aggregate::{AgeBucket, CategoryFilter, Selection};
use crate::chart::Language;

#[derive(Clone, Debug)]
pub struct ViewerState {
    /// Region whose normalized cache is loaded
    pub region: Option<&'static Region>,
    pub area: Option<String>,
    pub category: CategoryFilter,
    pub age: AgeBucket,
    pub language: Language,

    /// Show the yearly table under the chart
    pub show_table: bool,

    pub window_w: u32,
    pub window_h: u32,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            region: None,
            area: None,
            category: CategoryFilter::All,
            age: AgeBucket::Any,
            language: Language::Local,
            show_table: true,
            window_w: 1100,
            window_h: 720,
        }
    }
}

impl ViewerState {
    /// Current selection, once an area is picked.
    pub fn selection(&self) -> Option<Selection> {
        self.area
            .as_ref()
            .map(|a| Selection::new(a.as_str(), self.category, self.age))
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub viewer: ViewerState,
}
