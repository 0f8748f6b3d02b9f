//! Region-means projection for the bar chart.

use crate::data::Dataset;
use crate::domain::Selection;

/// Mean of the bar indicator over one region at the selected year.
///
/// `mean` is `None` when the region has no numeric value at all for that year;
/// a single missing cell never zeroes out or NaN-poisons the mean, it is
/// simply excluded from both sum and count.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMean {
    pub region: String,
    pub mean: Option<f64>,
    /// Countries that contributed a numeric value.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionMeansView {
    /// One entry per distinct region, in first-seen dataset order.
    pub bars: Vec<RegionMean>,
    /// Largest mean, for the y-scale domain `[0, max_mean]`.
    pub max_mean: f64,
}

/// Build the region-means projection for the current selection.
pub fn build(dataset: &Dataset, selection: &Selection) -> RegionMeansView {
    let bars: Vec<RegionMean> = dataset
        .regions
        .iter()
        .map(|region| {
            let mut sum = 0.0;
            let mut count = 0usize;
            for record in dataset.countries.iter().filter(|c| &c.region == region) {
                let v = record.value_at(selection.bar, selection.year);
                if v.is_finite() {
                    sum += v;
                    count += 1;
                }
            }
            RegionMean {
                region: region.clone(),
                mean: (count > 0).then(|| sum / count as f64),
                count,
            }
        })
        .collect();

    let max_mean = bars
        .iter()
        .filter_map(|b| b.mean)
        .fold(0.0_f64, f64::max);

    RegionMeansView { bars, max_mean }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountryRecord, Indicator, RawSeries};

    /// 3 regions, 6 countries, one deliberately missing value.
    fn dataset() -> Dataset {
        let mk = |geo: &str, region: &str, cell: Option<&str>| {
            let mut le = RawSeries::new();
            if let Some(cell) = cell {
                le.insert("2000".to_string(), cell.to_string());
            }
            CountryRecord {
                geo: geo.to_string(),
                country: geo.to_uppercase(),
                region: region.to_string(),
                population: RawSeries::new(),
                gdp: None,
                child_mortality: None,
                life_expectancy: Some(le),
                fertility_rate: None,
            }
        };

        Dataset::new(
            vec![
                mk("a1", "r1", Some("60")),
                mk("a2", "r1", Some("70")),
                mk("b1", "r2", Some("50")),
                mk("b2", "r2", None), // the gap: excluded from sum and count
                mk("c1", "r3", Some("80")),
                mk("c2", "r3", Some("90")),
            ],
            vec![2000],
        )
    }

    fn selection() -> Selection {
        Selection {
            bar: Indicator::LifeExpectancy,
            ..Selection::default()
        }
    }

    #[test]
    fn means_exclude_missing_values_from_sum_and_count() {
        let view = build(&dataset(), &selection());
        assert_eq!(view.bars.len(), 3);

        let by_region: Vec<(&str, Option<f64>, usize)> = view
            .bars
            .iter()
            .map(|b| (b.region.as_str(), b.mean, b.count))
            .collect();
        assert_eq!(
            by_region,
            vec![
                ("r1", Some(65.0), 2),
                // r2's mean is 50/1, not 50/2 and not NaN.
                ("r2", Some(50.0), 1),
                ("r3", Some(85.0), 2),
            ]
        );
        assert_eq!(view.max_mean, 85.0);
    }

    #[test]
    fn region_order_is_first_seen() {
        let view = build(&dataset(), &selection());
        let order: Vec<&str> = view.bars.iter().map(|b| b.region.as_str()).collect();
        assert_eq!(order, vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn fully_missing_region_yields_none_not_nan() {
        let mut sel = selection();
        sel.set_year(1999); // no table has this year
        let view = build(&dataset(), &sel);
        assert!(view.bars.iter().all(|b| b.mean.is_none() && b.count == 0));
        assert_eq!(view.max_mean, 0.0);
    }
}
