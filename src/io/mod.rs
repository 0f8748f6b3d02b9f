//! Output helpers.
//!
//! - projection exports (CSV) and selection-state export (JSON) (`export`)

pub mod export;

pub use export::*;
