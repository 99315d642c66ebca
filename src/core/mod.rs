// src/core/mod.rs

pub mod fonts;
pub mod net;
pub mod sanitize;
