//! Formatted terminal output for the non-interactive subcommands.
//!
//! We keep formatting code in one place so:
//! - the derivation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::Selection;
use crate::scale::LinearScale;
use crate::view::{RegionMeansView, ScatterView, TimeSeriesView};

const BAR_WIDTH: usize = 40;

/// Render a value that may be NaN (missing) for a table cell.
fn fmt_value(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.2}")
    } else {
        "-".to_string()
    }
}

/// Scatter projection as an aligned table, one row per country.
pub fn format_scatter(view: &ScatterView, selection: &Selection) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== wd - scatter @ {} | x: {} | y: {} | r: {} ===\n",
        selection.year,
        selection.x.display_name(),
        selection.y.display_name(),
        selection.r.display_name(),
    ));
    if let Some(region) = selection.highlighted_region.as_deref() {
        out.push_str(&format!("(showing region: {region})\n"));
    }
    out.push_str(&format!(
        "x=[{}, {}] | y=[{}, {}] | r=[{}, {}]\n\n",
        fmt_value(view.x_domain[0]),
        fmt_value(view.x_domain[1]),
        fmt_value(view.y_domain[0]),
        fmt_value(view.y_domain[1]),
        fmt_value(view.r_domain[0]),
        fmt_value(view.r_domain[1]),
    ));

    out.push_str(&format!(
        "{:<28} {:<10} {:>14} {:>14} {:>16}\n",
        "country", "region", "x", "y", "r"
    ));
    for point in &view.points {
        if !crate::view::scatter::visible(point, selection) {
            continue;
        }
        out.push_str(&format!(
            "{:<28} {:<10} {:>14} {:>14} {:>16}\n",
            point.country,
            point.region,
            fmt_value(point.x),
            fmt_value(point.y),
            fmt_value(point.r),
        ));
    }
    out
}

/// Region means as labelled horizontal bars.
pub fn format_regions(view: &RegionMeansView, selection: &Selection) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== wd - region means | {} @ {} ===\n\n",
        selection.bar.display_name(),
        selection.year,
    ));

    let scale = LinearScale::new([0.0, view.max_mean], [0.0, BAR_WIDTH as f64]);
    for bar in &view.bars {
        let (mean_label, width) = match bar.mean {
            Some(mean) => (format!("{mean:.2}"), scale.scale(mean).round().max(0.0) as usize),
            None => ("-".to_string(), 0),
        };
        out.push_str(&format!(
            "{:<12} {:>12}  {:<width$}  (n={})\n",
            bar.region,
            mean_label,
            "#".repeat(width.min(BAR_WIDTH)),
            bar.count,
            width = BAR_WIDTH,
        ));
    }
    out
}

/// One country's time series, one row per year.
pub fn format_series(view: &TimeSeriesView, selection: &Selection) -> String {
    let mut out = String::new();
    let country = view.country.as_deref().unwrap_or("(no country selected)");
    out.push_str(&format!(
        "=== wd - {} | {} ===\n\n",
        country,
        selection.line.display_name(),
    ));

    if view.points.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    for point in &view.points {
        out.push_str(&format!("{:>6}  {:.2}\n", point.year, point.value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{RegionMean, SeriesPoint};

    #[test]
    fn region_bars_scale_relative_to_max() {
        let view = RegionMeansView {
            bars: vec![
                RegionMean {
                    region: "r1".to_string(),
                    mean: Some(100.0),
                    count: 2,
                },
                RegionMean {
                    region: "r2".to_string(),
                    mean: Some(50.0),
                    count: 1,
                },
                RegionMean {
                    region: "r3".to_string(),
                    mean: None,
                    count: 0,
                },
            ],
            max_mean: 100.0,
        };
        let text = format_regions(&view, &Selection::default());
        let lines: Vec<&str> = text.lines().collect();
        let full = lines.iter().find(|l| l.starts_with("r1")).unwrap();
        let half = lines.iter().find(|l| l.starts_with("r2")).unwrap();
        let none = lines.iter().find(|l| l.starts_with("r3")).unwrap();
        assert_eq!(full.matches('#').count(), BAR_WIDTH);
        assert_eq!(half.matches('#').count(), BAR_WIDTH / 2);
        assert_eq!(none.matches('#').count(), 0);
        assert!(none.contains('-'));
    }

    #[test]
    fn series_report_handles_empty_series() {
        let view = TimeSeriesView {
            geo: None,
            country: None,
            points: Vec::new(),
            year_domain: [0.0, 1.0],
            value_domain: [0.0, 1.0],
        };
        let text = format_series(&view, &Selection::default());
        assert!(text.contains("(no country selected)"));
        assert!(text.contains("(no data)"));
    }

    #[test]
    fn series_report_lists_years_in_order() {
        let view = TimeSeriesView {
            geo: Some("usa".to_string()),
            country: Some("United States".to_string()),
            points: vec![
                SeriesPoint {
                    year: 1990,
                    value: 2.0,
                },
                SeriesPoint {
                    year: 2005,
                    value: 5.0,
                },
            ],
            year_domain: [1990.0, 2005.0],
            value_domain: [2.0, 5.0],
        };
        let text = format_series(&view, &Selection::default());
        let y1990 = text.find("1990").unwrap();
        let y2005 = text.find("2005").unwrap();
        assert!(y1990 < y2005);
        assert!(text.contains("United States"));
    }
}
