//! Time-series projection for the selected country.

use crate::data::Dataset;
use crate::domain::Selection;
use crate::view::finite_extent;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// One country's line-indicator values across all its valid years.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesView {
    /// The resolved country, when the selection matched one.
    pub geo: Option<String>,
    pub country: Option<String>,
    /// Points sorted strictly ascending by year.
    pub points: Vec<SeriesPoint>,
    pub year_domain: [f64; 2],
    pub value_domain: [f64; 2],
}

impl TimeSeriesView {
    fn empty() -> Self {
        Self {
            geo: None,
            country: None,
            points: Vec::new(),
            year_domain: [0.0, 1.0],
            value_domain: [0.0, 1.0],
        }
    }
}

/// Build the time series for the currently selected country.
///
/// No selection, or a selection matching no record, yields an empty series
/// rather than an error — "selected" normally references a valid prior pick,
/// but a stale geo code must fail silently.
///
/// Year keys must be valid positive integers and are sorted numerically;
/// lexicographic key order would interleave e.g. "1990" and "205". Non-finite
/// values are dropped so one bad cell cannot distort the value domain.
pub fn build(dataset: &Dataset, selection: &Selection) -> TimeSeriesView {
    let Some(geo) = selection.selected_country.as_deref() else {
        return TimeSeriesView::empty();
    };
    let Some(record) = dataset.find_country(geo) else {
        return TimeSeriesView::empty();
    };

    let mut points: Vec<SeriesPoint> = record
        .series(selection.line)
        .map(|series| {
            series
                .iter()
                .filter_map(|(key, cell)| {
                    let year = key.parse::<i32>().ok().filter(|&y| y > 0)?;
                    let value = crate::domain::parse_cell(cell);
                    value.is_finite().then_some(SeriesPoint { year, value })
                })
                .collect()
        })
        .unwrap_or_default();
    points.sort_unstable_by_key(|p| p.year);

    let year_domain = finite_extent(points.iter().map(|p| f64::from(p.year)));
    let value_domain = finite_extent(points.iter().map(|p| p.value));

    TimeSeriesView {
        geo: Some(record.geo.clone()),
        country: Some(record.country.clone()),
        points,
        year_domain,
        value_domain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountryRecord, Indicator, RawSeries};

    fn dataset() -> Dataset {
        let mut gdp = RawSeries::new();
        for (k, v) in [("2005", "5"), ("1990", "2"), ("-1", "9"), ("abc", "3")] {
            gdp.insert(k.to_string(), v.to_string());
        }
        let record = CountryRecord {
            geo: "usa".to_string(),
            country: "United States".to_string(),
            region: "america".to_string(),
            population: RawSeries::new(),
            gdp: Some(gdp),
            child_mortality: None,
            life_expectancy: None,
            fertility_rate: None,
        };
        Dataset::new(vec![record], vec![1990, 2005])
    }

    fn selection_for(geo: Option<&str>) -> Selection {
        Selection {
            line: Indicator::Gdp,
            selected_country: geo.map(str::to_string),
            ..Selection::default()
        }
    }

    #[test]
    fn invalid_year_keys_are_dropped_and_order_is_numeric() {
        let view = build(&dataset(), &selection_for(Some("usa")));
        let pairs: Vec<(i32, f64)> = view.points.iter().map(|p| (p.year, p.value)).collect();
        assert_eq!(pairs, vec![(1990, 2.0), (2005, 5.0)]);
        assert_eq!(view.year_domain, [1990.0, 2005.0]);
        assert_eq!(view.value_domain, [2.0, 5.0]);
        assert_eq!(view.country.as_deref(), Some("United States"));
    }

    #[test]
    fn no_selection_yields_empty_series() {
        let view = build(&dataset(), &selection_for(None));
        assert!(view.points.is_empty());
        assert!(view.geo.is_none());
    }

    #[test]
    fn stale_geo_code_fails_silently() {
        let view = build(&dataset(), &selection_for(Some("zzz")));
        assert!(view.points.is_empty());
        assert!(view.country.is_none());
    }

    #[test]
    fn missing_joined_series_yields_empty_points() {
        let mut sel = selection_for(Some("usa"));
        sel.line = Indicator::LifeExpectancy;
        let view = build(&dataset(), &sel);
        assert!(view.points.is_empty());
        // Still resolved the country.
        assert_eq!(view.geo.as_deref(), Some("usa"));
    }
}
