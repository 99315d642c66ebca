// src/lib.rs
// #![allow(dead_code)]

#[macro_use]
mod macros;
#[macro_use]
pub mod log;

#[doc(hidden)]
pub use tracing as __tracing;

pub mod config;
pub mod core;

pub mod aggregate;
pub mod chart;
pub mod csv;
pub mod fetch;
pub mod file;
pub mod gui;
pub mod normalize;
pub mod progress;
pub mod report;
pub mod runner;
pub mod source;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;
