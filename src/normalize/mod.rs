// src/normalize/mod.rs
//! Record normalization.
//!
//! Raw upstream records are loosely typed: prices with separators and
//! currency marks, areas with units, years embedded in locale labels, and
//! free-text floor plans. This module turns them into [`NormalizedRecord`]s.
//!
//! - `fields`: one raw field → typed value or None
//! - `floor_plan`: closed floor-plan categories and the label mapping
//! - `record`: one raw record → candidate (always succeeds)
//! - `batch`: many raw records → admitted records + [`Stats`]
//!
//! Nothing here performs I/O or holds state; the functions are safe to call
//! from any thread on disjoint inputs.
pub mod batch;
pub mod fields;
pub mod floor_plan;
pub mod record;
pub mod types;

pub use batch::{transform_batch, QualityReport, Stats};
pub use floor_plan::FloorPlan;
pub use record::transform;
pub use types::{NormalizedRecord, PropertyType, RawRecord};
