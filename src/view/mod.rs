//! Derived views (projections) of the dataset.
//!
//! Each projection is a pure function of `(&Dataset, &Selection)`, recomputed
//! in full on every selection change and discarded afterwards. Keeping the
//! builders pure means the TUI and the report subcommands share one derivation
//! path, and every view is testable without a terminal.

use crate::data::Dataset;
use crate::domain::Selection;

pub mod bars;
pub mod scatter;
pub mod series;

pub use bars::{RegionMean, RegionMeansView};
pub use scatter::{ScatterPoint, ScatterView};
pub use series::{SeriesPoint, TimeSeriesView};

/// All three projections for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViews {
    pub scatter: ScatterView,
    pub regions: RegionMeansView,
    pub series: TimeSeriesView,
}

/// Build every projection from scratch.
///
/// Cheap at this data size (a few hundred rows), so the front ends rebuild all
/// three rather than tracking which one a given event invalidated.
pub fn build_views(dataset: &Dataset, selection: &Selection) -> DashboardViews {
    DashboardViews {
        scatter: scatter::build(dataset, selection),
        regions: bars::build(dataset, selection),
        series: series::build(dataset, selection),
    }
}

/// Safe `[min, max]` extent over the finite values of an iterator.
///
/// Returns `[0, 1]` when no finite value exists so downstream scales never see
/// an undefined domain. `min == max` is a legitimate result and is handled by
/// the scales themselves.
pub(crate) fn finite_extent(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min.is_finite() && max.is_finite() {
        [min, max]
    } else {
        [0.0, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountryRecord, Indicator, RawSeries};

    fn series_of(pairs: &[(&str, &str)]) -> RawSeries {
        pairs
            .iter()
            .map(|&(y, v)| (y.to_string(), v.to_string()))
            .collect()
    }

    /// Complete (gap-free) dataset, so projections compare with `==`.
    fn sample_dataset() -> Dataset {
        let mk = |geo: &str, country: &str, region: &str, base: f64| CountryRecord {
            geo: geo.to_string(),
            country: country.to_string(),
            region: region.to_string(),
            population: series_of(&[("2000", "1000"), ("2001", "1100")]),
            gdp: Some(series_of(&[
                ("2000", &format!("{}", base * 10.0)),
                ("2001", &format!("{}", base * 11.0)),
            ])),
            child_mortality: Some(series_of(&[
                ("2000", &format!("{}", 100.0 - base)),
                ("2001", &format!("{}", 90.0 - base)),
            ])),
            life_expectancy: Some(series_of(&[("2000", "60"), ("2001", "61")])),
            fertility_rate: Some(series_of(&[
                ("2000", &format!("{base}")),
                ("2001", &format!("{}", base / 2.0)),
            ])),
        };

        Dataset::new(
            vec![
                mk("aaa", "Alpha", "north", 2.0),
                mk("bbb", "Beta", "north", 4.0),
                mk("ccc", "Gamma", "south", 6.0),
            ],
            vec![2000, 2001],
        )
    }

    #[test]
    fn finite_extent_ignores_nan_and_defaults_when_empty() {
        assert_eq!(
            finite_extent([1.0, f64::NAN, 3.0, 2.0].into_iter()),
            [1.0, 3.0]
        );
        assert_eq!(finite_extent(std::iter::empty()), [0.0, 1.0]);
        assert_eq!(finite_extent([f64::NAN, f64::NAN].into_iter()), [0.0, 1.0]);
    }

    #[test]
    fn changing_bar_indicator_touches_only_region_means() {
        let dataset = sample_dataset();
        let mut selection = Selection::default();
        selection.select_country("aaa");
        let before = build_views(&dataset, &selection);

        selection.bar = Indicator::Gdp;
        let after = build_views(&dataset, &selection);

        assert_ne!(before.regions, after.regions);
        assert_eq!(before.scatter, after.scatter);
        assert_eq!(before.series, after.series);
    }

    #[test]
    fn changing_year_touches_scatter_and_bars_but_not_series() {
        let dataset = sample_dataset();
        let mut selection = Selection::default();
        selection.select_country("aaa");
        let before = build_views(&dataset, &selection);

        selection.set_year(2001);
        let after = build_views(&dataset, &selection);

        assert_ne!(before.scatter, after.scatter);
        assert_ne!(before.regions, after.regions);
        assert_eq!(before.series, after.series);
    }
}
