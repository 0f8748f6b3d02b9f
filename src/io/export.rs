//! Export the scatter projection to CSV and the selection state to JSON.
//!
//! Exports are meant to be easy to consume in spreadsheets or downstream
//! scripts. Missing values are written as empty cells, not "NaN".

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::Selection;
use crate::error::AppError;
use crate::view::ScatterView;

/// Write the per-country scatter projection to a CSV file.
pub fn write_scatter_csv(
    path: &Path,
    view: &ScatterView,
    selection: &Selection,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(
        file,
        "geo,country,region,year,{},{},{}",
        csv_name(selection.x.display_name()),
        csv_name(selection.y.display_name()),
        csv_name(selection.r.display_name()),
    )
    .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    for point in &view.points {
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            point.geo,
            quote_if_needed(&point.country),
            point.region,
            selection.year,
            csv_value(point.x),
            csv_value(point.y),
            csv_value(point.r),
        )
        .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Serialize the selection state to pretty JSON.
///
/// The file round-trips through `Selection`'s serde derives, so a saved state
/// can be fed back in later to restore a session.
pub fn write_selection_json(path: &Path, selection: &Selection) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(selection)
        .map_err(|e| AppError::usage(format!("Failed to serialize selection state: {e}")))?;
    std::fs::write(path, json).map_err(|e| {
        AppError::usage(format!(
            "Failed to write state JSON '{}': {e}",
            path.display()
        ))
    })
}

fn csv_value(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.6}")
    } else {
        String::new()
    }
}

/// Column names come from display names ("child mortality" -> "child_mortality").
fn csv_name(name: &str) -> String {
    name.replace(' ', "_")
}

fn quote_if_needed(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_state_round_trips_through_json() {
        let mut selection = Selection::default();
        selection.select_country("usa");
        selection.toggle_region("europe");
        let json = serde_json::to_string(&selection).unwrap();
        let back: Selection = serde_json::from_str(&json).unwrap();
        assert_eq!(selection, back);
    }

    #[test]
    fn csv_helpers_handle_gaps_and_commas() {
        assert_eq!(csv_value(f64::NAN), "");
        assert_eq!(csv_value(1.5), "1.500000");
        assert_eq!(quote_if_needed("Korea, Rep."), "\"Korea, Rep.\"");
        assert_eq!(quote_if_needed("France"), "France");
        assert_eq!(csv_name("child mortality"), "child_mortality");
    }
}
