//! Data sources: tabular loading + join (`tables`) and the synthetic demo
//! generator (`sample`).

use crate::domain::CountryRecord;

pub mod sample;
pub mod tables;

pub use sample::generate_dataset;
pub use tables::load_dataset;

/// The fully joined, in-memory dataset the dashboard runs on.
///
/// Loaded once at startup; every derived view is recomputed from it and the
/// current `Selection`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// One record per population-table row, in source order.
    pub countries: Vec<CountryRecord>,
    /// Distinct region labels in first-seen order.
    pub regions: Vec<String>,
    /// Valid year columns of the population table, sorted ascending.
    pub years: Vec<i32>,
}

impl Dataset {
    pub fn new(countries: Vec<CountryRecord>, mut years: Vec<i32>) -> Self {
        let mut regions: Vec<String> = Vec::new();
        for record in &countries {
            if !regions.iter().any(|r| *r == record.region) {
                regions.push(record.region.clone());
            }
        }
        years.sort_unstable();
        years.dedup();
        Self {
            countries,
            regions,
            years,
        }
    }

    /// First record matching a geo code, if any.
    pub fn find_country(&self, geo: &str) -> Option<&CountryRecord> {
        self.countries.iter().find(|c| c.geo == geo)
    }

    /// Clamp a requested year into the dataset's year coverage.
    pub fn clamp_year(&self, year: i32) -> i32 {
        match (self.years.first(), self.years.last()) {
            (Some(&min), Some(&max)) => year.clamp(min, max),
            _ => year,
        }
    }
}

/// Resolve the data base (directory or http(s) URL).
///
/// Order: explicit flag, `WORLD_DATA_DIR` from the environment (`.env` is
/// honored via dotenvy), then `./data`.
pub fn resolve_base(flag: Option<&str>) -> String {
    if let Some(base) = flag {
        return base.to_string();
    }
    dotenvy::dotenv().ok();
    std::env::var("WORLD_DATA_DIR").unwrap_or_else(|_| "data".to_string())
}
