// Emissions Normalizer: the named estimates sheet -> one row per region with
// one summed column per year.
//
// The source carries detail columns (sector breakdown, gas, activity,
// product) that have no place past the aggregation; they are dropped when
// present and ignored when absent. Year columns are recognized by their
// label alone.
use crate::config::PipelineConfig;
use crate::sheet::{self, SheetGrid};
use crate::types::{EmissionsTable, RegionEmissions};
use crate::util::{is_year_label, parse_value};
use std::collections::BTreeMap;
use std::error::Error;

pub const REGION_COL: &str = "STATE";

/// Descriptive columns excluded from the aggregation when present.
const DETAIL_COLUMNS: [&str; 5] = ["SECTOR", "SUBSECTOR", "GAS", "ACTIVITY", "PRODUCT"];

/// Indices and labels of the columns surviving the detail drop. Matching is
/// case-insensitive; detail columns that are absent are simply not there to
/// drop.
fn retained_columns(headers: &[String]) -> Vec<(usize, String)> {
    headers
        .iter()
        .enumerate()
        .filter(|&(_, h)| !DETAIL_COLUMNS.contains(&h.to_uppercase().as_str()))
        .map(|(idx, h)| (idx, h.clone()))
        .collect()
}

/// Normalize a raw emissions grid: keep the region label and the year
/// columns, drop the detail columns, and sum each year per region. Year
/// order stays as the source provides it.
pub fn normalize(rows: &[Vec<String>]) -> Result<EmissionsTable, Box<dyn Error>> {
    let grid = SheetGrid::from_rows(rows, 0);

    let region_col = grid
        .column_index(REGION_COL)
        .ok_or_else(|| format!("column {:?} not found in emissions sheet", REGION_COL))?;
    // Drop the detail columns first; year detection only ever sees what
    // survives.
    let year_cols: Vec<(usize, String)> = retained_columns(&grid.headers)
        .into_iter()
        .filter(|(idx, label)| *idx != region_col && is_year_label(label))
        .collect();

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in &grid.rows {
        let region = grid.cell(row, region_col).to_string();
        if region.is_empty() {
            continue;
        }
        let sums = groups
            .entry(region)
            .or_insert_with(|| vec![0.0; year_cols.len()]);
        for (slot, (col, _)) in year_cols.iter().enumerate() {
            // Net removals make negative per-year sums legitimate.
            sums[slot] += parse_value(grid.cell(row, *col));
        }
    }

    let years = year_cols.into_iter().map(|(_, label)| label).collect();
    let rows = groups
        .into_iter()
        .map(|(region, values)| RegionEmissions { region, values })
        .collect();
    Ok(EmissionsTable { years, rows })
}

/// Load and normalize the emissions sheet named by the config.
pub fn load(config: &PipelineConfig) -> Result<EmissionsTable, Box<dyn Error>> {
    let rows = sheet::load_rows(&config.emissions_path, Some(&config.emissions_sheet))?;
    normalize(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn normalize_detects_year_columns_in_source_order() {
        let rows = grid(&[
            &["STATE", "SECTOR", "GAS", "2012", "2010", "NOTES"],
            &["AC", "Energy", "CO2", "1.5", "2.0", "x"],
        ]);
        let table = normalize(&rows).unwrap();
        assert_eq!(table.years, vec!["2012", "2010"]);
        assert_eq!(table.rows[0].values, vec![1.5, 2.0]);
    }

    #[test]
    fn detail_columns_are_dropped_before_year_detection() {
        let headers: Vec<String> = ["STATE", "Sector", "GAS", "2010", "NOTES"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let retained = retained_columns(&headers);
        let labels: Vec<&str> = retained.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(labels, vec!["STATE", "2010", "NOTES"]);
        // Original column indices survive the drop so cell access stays valid.
        assert_eq!(retained[1].0, 3);
    }

    #[test]
    fn normalize_sums_per_region_allowing_negatives() {
        let rows = grid(&[
            &["STATE", "SECTOR", "2010", "2011"],
            &["AC", "Energy", "10", "3"],
            &["AC", "Land Use", "-25", "4"],
            &["AL", "Energy", "7", "1"],
        ]);
        let table = normalize(&rows).unwrap();
        assert_eq!(table.rows.len(), 2);
        let ac = table.rows.iter().find(|r| r.region == "AC").unwrap();
        assert_eq!(ac.values, vec![-15.0, 7.0]);
        let al = table.rows.iter().find(|r| r.region == "AL").unwrap();
        assert_eq!(al.values, vec![7.0, 1.0]);
    }

    #[test]
    fn normalize_tolerates_missing_detail_columns() {
        let rows = grid(&[&["STATE", "2010"], &["AC", "5"]]);
        let table = normalize(&rows).unwrap();
        assert_eq!(table.years, vec!["2010"]);
        assert_eq!(table.rows[0].values, vec![5.0]);
    }

    #[test]
    fn normalize_every_row_carries_the_full_year_set() {
        let rows = grid(&[
            &["STATE", "2010", "2011", "2012"],
            &["AC", "1", "", "3"],
            &["AL", "4", "5", ""],
        ]);
        let table = normalize(&rows).unwrap();
        for row in &table.rows {
            assert_eq!(row.values.len(), table.years.len());
        }
    }

    #[test]
    fn normalize_without_region_column_is_an_error() {
        let rows = grid(&[&["REGION", "2010"], &["AC", "5"]]);
        assert!(normalize(&rows).is_err());
    }
}
