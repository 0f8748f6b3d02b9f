//! Scatter projection: one point per country at the selected year.

use crate::data::Dataset;
use crate::domain::Selection;
use crate::view::finite_extent;

/// One country's x/y/r values for the current year.
///
/// Values may be NaN (missing join, missing year, malformed cell). NaN points
/// are kept in the projection — they are excluded from the domains here and
/// skipped by the renderer, but tables can still list the country.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub geo: String,
    pub country: String,
    pub region: String,
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterView {
    pub points: Vec<ScatterPoint>,
    pub x_domain: [f64; 2],
    pub y_domain: [f64; 2],
    pub r_domain: [f64; 2],
}

/// Build the scatter projection for the current selection.
pub fn build(dataset: &Dataset, selection: &Selection) -> ScatterView {
    let points: Vec<ScatterPoint> = dataset
        .countries
        .iter()
        .map(|record| ScatterPoint {
            geo: record.geo.clone(),
            country: record.country.clone(),
            region: record.region.clone(),
            x: record.value_at(selection.x, selection.year),
            y: record.value_at(selection.y, selection.year),
            r: record.value_at(selection.r, selection.year),
        })
        .collect();

    let x_domain = finite_extent(points.iter().map(|p| p.x));
    let y_domain = finite_extent(points.iter().map(|p| p.y));
    let r_domain = finite_extent(points.iter().map(|p| p.r));

    ScatterView {
        points,
        x_domain,
        y_domain,
        r_domain,
    }
}

/// Region-highlight visibility filter.
///
/// With no highlight every point is visible; with a highlight only points in
/// that region are.
pub fn visible(point: &ScatterPoint, selection: &Selection) -> bool {
    match selection.highlighted_region.as_deref() {
        None => true,
        Some(region) => point.region == region,
    }
}
