//! Tabular source loading and the keyed geo join.
//!
//! Five per-indicator tables are fetched independently (in parallel), then
//! joined into one `CountryRecord` per population row. The join is an explicit
//! keyed lookup on the geo code for every secondary table; positional
//! alignment between tables is never assumed.
//!
//! Design goals (mirroring the rest of the crate):
//! - **Strict schema** for identity columns (clear errors + exit code 2)
//! - **Silent gaps** for missing join matches (the field is `None`)
//! - **Deterministic behavior** (first duplicate geo wins, source order kept)

use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;
use rayon::prelude::*;

use crate::data::Dataset;
use crate::domain::{CountryRecord, Indicator, RawSeries};
use crate::error::AppError;

/// One parsed source table.
#[derive(Debug, Clone)]
pub struct Table {
    pub rows: Vec<TableRow>,
    /// Header columns that are valid positive-integer years, sorted ascending.
    pub year_columns: Vec<i32>,
    /// Rows dropped for having no geo code.
    pub rows_skipped: usize,
}

/// One source row: identity columns plus the raw year cells.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub geo: String,
    pub country: Option<String>,
    pub region: Option<String>,
    pub series: RawSeries,
}

/// Load all five tables from `base` and join them into a `Dataset`.
///
/// The whole load fails if any single fetch fails; there is no partial
/// degraded mode (a dashboard over half-loaded data would be misleading).
pub fn load_dataset(base: &str) -> Result<Dataset, AppError> {
    let tables: Vec<(Indicator, Table)> = Indicator::ALL
        .par_iter()
        .map(|&indicator| {
            let text = fetch_table_text(base, indicator.table_file())?;
            let table = parse_table(&text, indicator)?;
            Ok((indicator, table))
        })
        .collect::<Result<_, AppError>>()?;

    let mut population = None;
    let mut secondaries = Vec::new();
    for (indicator, table) in tables {
        if indicator == Indicator::Population {
            population = Some(table);
        } else {
            secondaries.push((indicator, table));
        }
    }
    // Indicator::ALL contains Population, so this cannot be None.
    let population = population
        .ok_or_else(|| AppError::runtime("Population table missing from load results."))?;

    let years = population.year_columns.clone();
    let countries = join_tables(&population, &secondaries);
    if countries.is_empty() {
        return Err(AppError::new(
            3,
            format!("No country rows found in '{}/{}'.", base, Indicator::Population.table_file()),
        ));
    }

    Ok(Dataset::new(countries, years))
}

/// Fetch one table's text from a directory or an http(s) base URL.
fn fetch_table_text(base: &str, file: &str) -> Result<String, AppError> {
    if base.starts_with("http://") || base.starts_with("https://") {
        let url = format!("{}/{}", base.trim_end_matches('/'), file);
        let resp = reqwest::blocking::get(&url)
            .map_err(|e| AppError::runtime(format!("Failed to fetch '{url}': {e}")))?;
        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "Fetch of '{url}' failed with status {}.",
                resp.status()
            )));
        }
        resp.text()
            .map_err(|e| AppError::runtime(format!("Failed to read body of '{url}': {e}")))
    } else {
        let path = Path::new(base).join(file);
        std::fs::read_to_string(&path)
            .map_err(|e| AppError::runtime(format!("Failed to read '{}': {e}", path.display())))
    }
}

/// Parse one CSV table.
///
/// The population table must carry `country` and `region` alongside `geo`;
/// secondary tables only need `geo` plus year columns.
pub fn parse_table(text: &str, indicator: Indicator) -> Result<Table, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| {
            AppError::usage(format!(
                "Failed to read CSV headers of '{}': {e}",
                indicator.table_file()
            ))
        })?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_identity_columns(indicator, &header_map)?;

    // Year columns: any header that is a valid positive integer.
    let mut year_headers: Vec<(i32, usize)> = Vec::new();
    for (idx, name) in headers.iter().enumerate() {
        let normalized = normalize_header_name(name);
        if let Ok(year) = normalized.parse::<i32>() {
            if year > 0 {
                year_headers.push((year, idx));
            }
        }
    }
    year_headers.sort_unstable_by_key(|&(year, _)| year);

    let mut rows = Vec::new();
    let mut rows_skipped = 0usize;
    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(_) => {
                rows_skipped += 1;
                continue;
            }
        };
        match parse_row(&record, &header_map, &year_headers) {
            Some(row) => rows.push(row),
            None => rows_skipped += 1,
        }
    }

    Ok(Table {
        rows,
        year_columns: year_headers.iter().map(|&(year, _)| year).collect(),
        rows_skipped,
    })
}

/// Join secondary tables onto the population table by geo code.
///
/// Output order follows the population table. A secondary table with no row
/// for a geo code leaves that field `None`; duplicate geo codes keep the first
/// occurrence.
pub fn join_tables(population: &Table, secondaries: &[(Indicator, Table)]) -> Vec<CountryRecord> {
    let mut keyed: HashMap<Indicator, HashMap<&str, &TableRow>> = HashMap::new();
    for (indicator, table) in secondaries {
        let map = keyed.entry(*indicator).or_default();
        for row in &table.rows {
            map.entry(row.geo.as_str()).or_insert(row);
        }
    }

    let lookup = |indicator: Indicator, geo: &str| -> Option<RawSeries> {
        keyed
            .get(&indicator)
            .and_then(|map| map.get(geo))
            .map(|row| row.series.clone())
    };

    population
        .rows
        .iter()
        .map(|row| CountryRecord {
            geo: row.geo.clone(),
            country: row.country.clone().unwrap_or_default(),
            region: row.region.clone().unwrap_or_default(),
            population: row.series.clone(),
            gdp: lookup(Indicator::Gdp, &row.geo),
            child_mortality: lookup(Indicator::ChildMortality, &row.geo),
            life_expectancy: lookup(Indicator::LifeExpectancy, &row.geo),
            fertility_rate: lookup(Indicator::FertilityRate, &row.geo),
        })
        .collect()
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿geo"). If we don't strip it, schema validation will
    // incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_identity_columns(
    indicator: Indicator,
    header_map: &HashMap<String, usize>,
) -> Result<(), AppError> {
    if !header_map.contains_key("geo") {
        return Err(AppError::usage(format!(
            "Missing required column `geo` in '{}'.",
            indicator.table_file()
        )));
    }
    if indicator == Indicator::Population {
        for col in ["country", "region"] {
            if !header_map.contains_key(col) {
                return Err(AppError::usage(format!(
                    "Missing required column `{col}` in '{}'.",
                    indicator.table_file()
                )));
            }
        }
    }
    Ok(())
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    year_headers: &[(i32, usize)],
) -> Option<TableRow> {
    let geo = get_field(record, header_map, "geo")?.to_string();

    let country = get_field(record, header_map, "country").map(str::to_string);
    let region = get_field(record, header_map, "region").map(str::to_string);

    let mut series = RawSeries::new();
    for &(year, idx) in year_headers {
        if let Some(cell) = record.get(idx).map(str::trim).filter(|s| !s.is_empty()) {
            series.insert(year.to_string(), cell.to_string());
        }
    }

    Some(TableRow {
        geo,
        country,
        region,
        series,
    })
}

fn get_field<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const POPULATION: &str = "\
geo,country,region,2000,2001
usa,United States,america,282000000,285000000
fra,France,europe,59000000,59500000
xkx,Kosovo,europe,1700000,1720000
";

    const GDP: &str = "\
geo,2000,2001
fra,22364,22620
usa,45986,45978
usa,1,1
";

    fn parse(text: &str, indicator: Indicator) -> Table {
        parse_table(text, indicator).unwrap()
    }

    fn joined() -> Vec<CountryRecord> {
        let population = parse(POPULATION, Indicator::Population);
        let gdp = parse(GDP, Indicator::Gdp);
        join_tables(&population, &[(Indicator::Gdp, gdp)])
    }

    #[test]
    fn join_matches_by_geo_not_position() {
        let records = joined();
        // Output order follows the population table even though the gdp table
        // lists fra before usa.
        assert_eq!(records[0].geo, "usa");
        assert_eq!(records[1].geo, "fra");
        let usa_gdp = records[0].gdp.as_ref().unwrap();
        assert_eq!(usa_gdp.get("2000").map(String::as_str), Some("45986"));
        let fra_gdp = records[1].gdp.as_ref().unwrap();
        assert_eq!(fra_gdp.get("2001").map(String::as_str), Some("22620"));
    }

    #[test]
    fn missing_geo_leaves_field_absent() {
        let records = joined();
        let kosovo = &records[2];
        assert_eq!(kosovo.geo, "xkx");
        assert!(kosovo.gdp.is_none());
        // The record itself is still usable.
        assert!(kosovo.value_at(Indicator::Gdp, 2000).is_nan());
        assert_eq!(kosovo.value_at(Indicator::Population, 2000), 1_700_000.0);
    }

    #[test]
    fn duplicate_geo_keeps_first_row() {
        let records = joined();
        let usa_gdp = records[0].gdp.as_ref().unwrap();
        assert_eq!(usa_gdp.get("2000").map(String::as_str), Some("45986"));
    }

    #[test]
    fn year_columns_are_sorted_positive_integers() {
        let table = parse_table(
            "geo,country,region,2001,1990,abc,-5,2000\nusa,US,america,1,2,3,4,5\n",
            Indicator::Population,
        )
        .unwrap();
        assert_eq!(table.year_columns, vec![1990, 2000, 2001]);
        let row = &table.rows[0];
        assert!(!row.series.contains_key("abc"));
        assert!(!row.series.contains_key("-5"));
    }

    #[test]
    fn bom_header_is_stripped() {
        let table = parse_table(
            "\u{feff}geo,2000\nusa,42\n",
            Indicator::Gdp,
        )
        .unwrap();
        assert_eq!(table.rows[0].geo, "usa");
    }

    #[test]
    fn population_table_requires_identity_columns() {
        let err = parse_table("geo,2000\nusa,42\n", Indicator::Population).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn rows_without_geo_are_skipped() {
        let table = parse_table(
            "geo,2000\nusa,42\n,43\n",
            Indicator::Gdp,
        )
        .unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows_skipped, 1);
    }
}
