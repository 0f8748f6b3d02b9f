//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the closed indicator enumeration (`Indicator`)
//! - joined per-country records (`CountryRecord`, `RawSeries`)
//! - the explicit UI selection state (`Selection`)

pub mod types;

pub use types::*;
