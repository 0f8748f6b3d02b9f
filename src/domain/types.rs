//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the view builders
//! - exported to JSON/CSV
//! - reloaded later to restore a dashboard selection

use std::collections::HashMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Closed enumeration of the five indicators.
///
/// Selecting an indicator anywhere in the UI goes through this enum, so an
/// invalid indicator name is a parse-time error rather than a silent empty
/// column (clap rejects it; serde rejects it on state reload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Indicator {
    Population,
    Gdp,
    ChildMortality,
    LifeExpectancy,
    FertilityRate,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::Population,
        Indicator::Gdp,
        Indicator::ChildMortality,
        Indicator::LifeExpectancy,
        Indicator::FertilityRate,
    ];

    /// Human-readable label for headers and axis titles.
    pub fn display_name(self) -> &'static str {
        match self {
            Indicator::Population => "population",
            Indicator::Gdp => "gdp",
            Indicator::ChildMortality => "child mortality",
            Indicator::LifeExpectancy => "life expectancy",
            Indicator::FertilityRate => "fertility rate",
        }
    }

    /// File name of the source table under the data base.
    pub fn table_file(self) -> &'static str {
        match self {
            Indicator::Population => "population.csv",
            Indicator::Gdp => "gdp.csv",
            Indicator::ChildMortality => "cmu5.csv",
            Indicator::LifeExpectancy => "life_expectancy.csv",
            Indicator::FertilityRate => "fertility-rate.csv",
        }
    }

    pub fn next(self) -> Indicator {
        match self {
            Indicator::Population => Indicator::Gdp,
            Indicator::Gdp => Indicator::ChildMortality,
            Indicator::ChildMortality => Indicator::LifeExpectancy,
            Indicator::LifeExpectancy => Indicator::FertilityRate,
            Indicator::FertilityRate => Indicator::Population,
        }
    }

    pub fn prev(self) -> Indicator {
        match self {
            Indicator::Population => Indicator::FertilityRate,
            Indicator::Gdp => Indicator::Population,
            Indicator::ChildMortality => Indicator::Gdp,
            Indicator::LifeExpectancy => Indicator::ChildMortality,
            Indicator::FertilityRate => Indicator::LifeExpectancy,
        }
    }
}

/// Raw per-indicator series: year column name -> raw cell text.
///
/// Cells stay unparsed here. Numeric interpretation (including the NaN policy
/// for malformed or missing values) belongs to the view builders, so a bad
/// cell can never corrupt an unrelated projection.
pub type RawSeries = HashMap<String, String>;

/// One joined record per population-table row.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    pub geo: String,
    pub country: String,
    pub region: String,

    /// Year columns of the population table itself (always present).
    pub population: RawSeries,

    /// Secondary tables, joined by geo code. `None` means the table had no
    /// row for this geo code — a silent gap, not an error.
    pub gdp: Option<RawSeries>,
    pub child_mortality: Option<RawSeries>,
    pub life_expectancy: Option<RawSeries>,
    pub fertility_rate: Option<RawSeries>,
}

impl CountryRecord {
    /// Strongly-typed series dispatch (no stringly-typed field lookup).
    pub fn series(&self, indicator: Indicator) -> Option<&RawSeries> {
        match indicator {
            Indicator::Population => Some(&self.population),
            Indicator::Gdp => self.gdp.as_ref(),
            Indicator::ChildMortality => self.child_mortality.as_ref(),
            Indicator::LifeExpectancy => self.life_expectancy.as_ref(),
            Indicator::FertilityRate => self.fertility_rate.as_ref(),
        }
    }

    /// Numeric value of an indicator at a year.
    ///
    /// Missing series, missing year column, and malformed cells all yield NaN;
    /// consumers exclude NaN from domains and aggregates.
    pub fn value_at(&self, indicator: Indicator, year: i32) -> f64 {
        let Some(series) = self.series(indicator) else {
            return f64::NAN;
        };
        series
            .get(year.to_string().as_str())
            .map(|cell| parse_cell(cell))
            .unwrap_or(f64::NAN)
    }
}

/// Parse a raw cell to a finite number, or NaN.
pub fn parse_cell(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

/// The full UI selection state.
///
/// All derived views are pure functions of `(&Dataset, &Selection)`; event
/// handlers go through the transition methods below and never mutate free
/// variables. Serializable so a session's state can be exported and restored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub x: Indicator,
    pub y: Indicator,
    pub r: Indicator,
    /// Indicator aggregated per region in the bar chart.
    pub bar: Indicator,
    /// Indicator plotted over time for the selected country.
    pub line: Indicator,
    pub year: i32,
    /// Geo code of the country driving the time-series chart.
    pub selected_country: Option<String>,
    /// Region filter for scatter-point visibility.
    pub highlighted_region: Option<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            x: Indicator::FertilityRate,
            y: Indicator::ChildMortality,
            r: Indicator::Gdp,
            bar: Indicator::ChildMortality,
            line: Indicator::Gdp,
            year: 2000,
            selected_country: None,
            highlighted_region: None,
        }
    }
}

impl Selection {
    pub fn set_year(&mut self, year: i32) {
        self.year = year;
    }

    pub fn select_country(&mut self, geo: impl Into<String>) {
        self.selected_country = Some(geo.into());
    }

    /// Toggle a region highlight: highlighting the already-highlighted region
    /// clears it and restores the all-visible baseline.
    pub fn toggle_region(&mut self, region: &str) {
        if self.highlighted_region.as_deref() == Some(region) {
            self.highlighted_region = None;
        } else {
            self.highlighted_region = Some(region.to_string());
        }
    }
}
