// Population Normalizer: municipal population spreadsheet -> one row per
// region.
//
// The raw export has an unknown number of metadata rows above the header, a
// population column whose exact label varies between vintages, and values
// written as annotated text ("1.234.567 (est.)"). Everything below the
// region level (municipality code and name) is dropped by the aggregation.
use crate::config::PipelineConfig;
use crate::sheet::{self, SheetGrid};
use crate::types::{PopulationTable, RegionPopulation};
use crate::util::clean_population;
use std::collections::BTreeMap;
use std::error::Error;

/// Header cell marker for the population column, matched case-insensitively
/// as a substring ("POPULATION", "ESTIMATED POPULATION", ...).
const POPULATION_MARKER: &str = "POPULATION";
pub const REGION_COL: &str = "STATE";
pub const REGION_ID_COL: &str = "STATE_CODE";

/// How many leading rows we are willing to probe for the header.
const HEADER_PROBE_WINDOW: usize = 10;

/// Find the row offset at which the header lives: the first probed offset
/// whose row has a cell matching the population marker. Offsets beyond the
/// probe window are never tried; if nothing matches, fall back to 0.
pub fn find_header_offset<F>(probe: F) -> usize
where
    F: Fn(usize) -> Option<Vec<String>>,
{
    for offset in 0..HEADER_PROBE_WINDOW {
        if let Some(row) = probe(offset) {
            if row
                .iter()
                .any(|cell| cell.to_uppercase().contains(POPULATION_MARKER))
            {
                return offset;
            }
        }
    }
    0
}

/// Normalize a raw population grid: locate the header, clean the population
/// field, and sum to one row per `(region, region_id)`.
pub fn normalize(rows: &[Vec<String>]) -> Result<PopulationTable, Box<dyn Error>> {
    let offset = find_header_offset(|off| rows.get(off).cloned());
    let grid = SheetGrid::from_rows(rows, offset);

    let pop_col = grid
        .headers
        .iter()
        .position(|h| h.to_uppercase().contains(POPULATION_MARKER))
        .ok_or("population column not found in any probed header row")?;
    let region_col = grid
        .column_index(REGION_COL)
        .ok_or_else(|| format!("column {:?} not found in population sheet", REGION_COL))?;
    // The numeric region id is useful but not essential; tolerate its absence.
    let region_id_col = grid.column_index(REGION_ID_COL);

    // Keyed on the region alone: a junk numeric id cell must not split one
    // region into two rows. The id carried is the first one that parses.
    let mut groups: BTreeMap<String, (Option<i64>, i64)> = BTreeMap::new();
    for row in &grid.rows {
        let pop_text = grid.cell(row, pop_col);
        if pop_text.is_empty() {
            continue;
        }
        let region = grid.cell(row, region_col).to_string();
        if region.is_empty() {
            continue;
        }
        let parsed_id =
            region_id_col.and_then(|c| grid.cell(row, c).trim().parse::<i64>().ok());
        let entry = groups.entry(region).or_insert((None, 0));
        if entry.0.is_none() {
            entry.0 = parsed_id;
        }
        entry.1 += clean_population(pop_text);
    }

    let rows = groups
        .into_iter()
        .map(|(region, (region_id, population))| RegionPopulation {
            region,
            region_id: region_id.unwrap_or(0),
            population,
        })
        .collect();
    Ok(PopulationTable { rows })
}

/// Load and normalize the population spreadsheet named by the config. The
/// first sheet of the workbook is the implicit data sheet.
pub fn load(config: &PipelineConfig) -> Result<PopulationTable, Box<dyn Error>> {
    let rows = sheet::load_rows(&config.population_path, None)?;
    normalize(&rows)
}
