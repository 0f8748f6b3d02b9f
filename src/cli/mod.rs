//! Command-line parsing for the country-data dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the data/derivation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{Indicator, Selection};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "wd", version, about = "Terminal explorer for multi-indicator country data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (the default when no subcommand is given).
    Tui(ViewArgs),
    /// Print the scatter projection as a table; optionally export it to CSV.
    Scatter(ViewArgs),
    /// Print per-region means of the aggregation indicator.
    Regions(ViewArgs),
    /// Print one country's time series for the line indicator.
    Series(ViewArgs),
}

/// Common options shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    /// Data base: a directory or an http(s) URL holding the five CSV tables.
    /// Defaults to $WORLD_DATA_DIR (honoring .env), then ./data.
    #[arg(long)]
    pub data: Option<String>,

    /// Run on a generated demo dataset instead of loading tables.
    #[arg(long)]
    pub demo: bool,

    /// Number of demo countries to generate.
    #[arg(long, default_value_t = 60)]
    pub demo_count: usize,

    /// Random seed for demo generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Year to filter the scatter and bar views to.
    #[arg(long, default_value_t = 2000)]
    pub year: i32,

    /// Indicator on the scatter x axis.
    #[arg(short = 'x', long, value_enum, default_value_t = Indicator::FertilityRate)]
    pub x: Indicator,

    /// Indicator on the scatter y axis.
    #[arg(short = 'y', long, value_enum, default_value_t = Indicator::ChildMortality)]
    pub y: Indicator,

    /// Indicator encoded as scatter point radius.
    #[arg(short = 'r', long, value_enum, default_value_t = Indicator::Gdp)]
    pub radius: Indicator,

    /// Indicator averaged per region in the bar view.
    #[arg(long, value_enum, default_value_t = Indicator::ChildMortality)]
    pub bar: Indicator,

    /// Indicator plotted over time for the selected country.
    #[arg(long, value_enum, default_value_t = Indicator::Gdp)]
    pub line: Indicator,

    /// Geo code of the country driving the time-series view.
    #[arg(short = 'c', long)]
    pub country: Option<String>,

    /// Region to highlight (filters scatter visibility).
    #[arg(long)]
    pub region: Option<String>,

    /// Export the scatter projection to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the selection state to JSON.
    #[arg(long = "export-state")]
    pub export_state: Option<PathBuf>,
}

impl ViewArgs {
    /// The initial selection state implied by the flags.
    pub fn selection(&self) -> Selection {
        Selection {
            x: self.x,
            y: self.y,
            r: self.radius,
            bar: self.bar,
            line: self.line,
            year: self.year,
            selected_country: self.country.clone(),
            highlighted_region: self.region.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dashboard_defaults() {
        let cli = Cli::parse_from(["wd", "scatter"]);
        let Command::Scatter(args) = cli.command else {
            panic!("expected scatter subcommand");
        };
        assert_eq!(args.selection(), Selection::default());
    }

    #[test]
    fn indicator_flags_parse_kebab_case_names() {
        let cli = Cli::parse_from([
            "wd",
            "scatter",
            "-x",
            "life-expectancy",
            "--bar",
            "gdp",
            "--year",
            "1984",
            "-c",
            "usa",
        ]);
        let Command::Scatter(args) = cli.command else {
            panic!("expected scatter subcommand");
        };
        let selection = args.selection();
        assert_eq!(selection.x, Indicator::LifeExpectancy);
        assert_eq!(selection.bar, Indicator::Gdp);
        assert_eq!(selection.year, 1984);
        assert_eq!(selection.selected_country.as_deref(), Some("usa"));
    }
}
