//! Synthetic demo dataset generation.
//!
//! `wd --demo` runs the dashboard without any data files on disk. The
//! generator is fully deterministic for a given seed so demo output (and the
//! tests below) are reproducible.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::Dataset;
use crate::domain::{CountryRecord, RawSeries};
use crate::error::AppError;

const FIRST_YEAR: i32 = 1950;
const LAST_YEAR: i32 = 2015;

/// Probability of an individual year cell being left blank, so that the NaN
/// handling in the view builders gets exercised by demo data too.
const GAP_PROB: f64 = 0.02;

/// Region baselines per indicator: (gdp, child mortality, life expectancy,
/// fertility rate) at the first year of the series.
struct RegionProfile {
    name: &'static str,
    gdp: f64,
    child_mortality: f64,
    life_expectancy: f64,
    fertility_rate: f64,
}

const PROFILES: [RegionProfile; 4] = [
    RegionProfile {
        name: "africa",
        gdp: 1_200.0,
        child_mortality: 220.0,
        life_expectancy: 42.0,
        fertility_rate: 6.5,
    },
    RegionProfile {
        name: "america",
        gdp: 6_500.0,
        child_mortality: 110.0,
        life_expectancy: 58.0,
        fertility_rate: 5.0,
    },
    RegionProfile {
        name: "asia",
        gdp: 2_400.0,
        child_mortality: 180.0,
        life_expectancy: 48.0,
        fertility_rate: 5.8,
    },
    RegionProfile {
        name: "europe",
        gdp: 9_000.0,
        child_mortality: 60.0,
        life_expectancy: 66.0,
        fertility_rate: 2.8,
    },
];

/// Generate a demo dataset of `count` countries across four regions.
pub fn generate_dataset(count: usize, seed: u64) -> Result<Dataset, AppError> {
    if count == 0 {
        return Err(AppError::usage("Demo country count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let noise: Normal<f64> = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::runtime(format!("Noise distribution error: {e}")))?;

    let years: Vec<i32> = (FIRST_YEAR..=LAST_YEAR).collect();
    let mut countries = Vec::with_capacity(count);

    for i in 0..count {
        let profile = &PROFILES[i % PROFILES.len()];
        let geo = format!("d{i:03}");
        let country = format!("Demoland {}", i + 1);

        // Country-level spread around the region baseline.
        let wealth = (1.0 + 0.35 * noise.sample(&mut rng)).max(0.2);
        let population0 = rng.gen_range(500_000.0..80_000_000.0);

        let population = trend_series(&mut rng, &noise, &years, population0, 0.015, 0.01);
        let gdp = trend_series(&mut rng, &noise, &years, profile.gdp * wealth, 0.02, 0.04);
        // Mortality and fertility decline over the period; life expectancy rises.
        let child_mortality =
            trend_series(&mut rng, &noise, &years, profile.child_mortality / wealth.sqrt(), -0.025, 0.03);
        let life_expectancy =
            trend_series(&mut rng, &noise, &years, profile.life_expectancy * wealth.powf(0.05), 0.004, 0.005);
        let fertility_rate =
            trend_series(&mut rng, &noise, &years, profile.fertility_rate / wealth.powf(0.1), -0.012, 0.02);

        // Leave an occasional country without a gdp join to mirror real gaps.
        let gdp = if rng.gen_bool(0.02) { None } else { Some(gdp) };

        countries.push(CountryRecord {
            geo,
            country,
            region: profile.name.to_string(),
            population,
            gdp,
            child_mortality: Some(child_mortality),
            life_expectancy: Some(life_expectancy),
            fertility_rate: Some(fertility_rate),
        });
    }

    Ok(Dataset::new(countries, years))
}

/// Multiplicative drift + noise series, formatted as raw cells.
fn trend_series(
    rng: &mut StdRng,
    noise: &Normal<f64>,
    years: &[i32],
    start: f64,
    drift: f64,
    vol: f64,
) -> RawSeries {
    let mut series = RawSeries::new();
    let mut level = start.max(0.01);
    for &year in years {
        if !rng.gen_bool(GAP_PROB) {
            series.insert(year.to_string(), format!("{level:.2}"));
        }
        let shock = 1.0 + drift + vol * noise.sample(rng);
        level = (level * shock).max(0.01);
    }
    series
}
