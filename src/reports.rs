// Read-only views over the combined table: overview ranking, detail
// cross-tab, and the long-form projection the chart consumes.
use crate::types::{CombinedTable, DetailRow, OverviewRow, PlotProjection, SummaryStats, TidyPoint};
use crate::util::{format_int, format_number, safe_ratio};
use std::cmp::Ordering;

/// Overview ranking: every region with its share of the grand total, sorted
/// descending by total emissions.
pub fn overview(table: &CombinedTable) -> Vec<OverviewRow> {
    let grand_total: f64 = table.rows.iter().map(|r| r.total_emissions).sum();
    let mut ranked: Vec<(f64, OverviewRow)> = table
        .rows
        .iter()
        .map(|r| {
            let share = safe_ratio(100.0 * r.total_emissions, grand_total);
            let row = OverviewRow {
                region: r.region.clone(),
                code: r.region_id,
                population: format_int(r.population),
                total_emissions: format_number(r.total_emissions, 2),
                per_capita: format_number(r.per_capita, 4),
                share_pct: format_number(share, 2),
            };
            (r.total_emissions, row)
        })
        .collect();
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    ranked.into_iter().map(|(_, row)| row).collect()
}

/// Detail cross-tab: one row per selected (region, year) pair, with the
/// region's population repeated per year and a per-year per-capita value
/// under the same zero-population guard as the combined table.
pub fn detail(table: &CombinedTable, region_indices: &[usize], years: &[String]) -> Vec<DetailRow> {
    let mut rows = Vec::new();
    for &idx in region_indices {
        let Some(record) = table.rows.get(idx) else {
            continue;
        };
        for year in years {
            let Some(pos) = table.years.iter().position(|y| y == year) else {
                continue;
            };
            let value = record.values[pos];
            rows.push(DetailRow {
                region: record.region.clone(),
                year: year.clone(),
                population: format_int(record.population),
                emissions: format_number(value, 2),
                per_capita: format_number(safe_ratio(value, record.population as f64), 6),
            });
        }
    }
    rows
}

/// Long-form projection for the chart: every (region, year, value) triple
/// for the selected regions, the unweighted mean of those values, and each
/// region's peak year (first occurrence wins a tie).
pub fn plot_projection(table: &CombinedTable, region_indices: &[usize]) -> PlotProjection {
    let mut points: Vec<TidyPoint> = Vec::new();
    let mut peaks: Vec<(String, i32, f64)> = Vec::new();
    for &idx in region_indices {
        let Some(record) = table.rows.get(idx) else {
            continue;
        };
        let mut peak: Option<(i32, f64)> = None;
        for (year_label, value) in table.years.iter().zip(&record.values) {
            let Ok(year) = year_label.parse::<i32>() else {
                continue;
            };
            points.push(TidyPoint {
                region: record.region.clone(),
                year,
                value: *value,
            });
            match peak {
                Some((_, best)) if *value <= best => {}
                _ => peak = Some((year, *value)),
            }
        }
        if let Some((year, value)) = peak {
            peaks.push((record.region.clone(), year, value));
        }
    }
    let mean = if points.is_empty() {
        0.0
    } else {
        points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64
    };
    PlotProjection { points, mean, peaks }
}

/// Whole-table summary stats, exported as JSON alongside the overview.
pub fn summary(table: &CombinedTable) -> SummaryStats {
    let total_population: i64 = table.rows.iter().map(|r| r.population).sum();
    let total_emissions: f64 = table.rows.iter().map(|r| r.total_emissions).sum();
    SummaryStats {
        regions: table.rows.len(),
        years: table.years.len(),
        total_population,
        total_emissions,
        overall_per_capita: safe_ratio(total_emissions, total_population as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CombinedRecord;

    fn table() -> CombinedTable {
        let years = vec!["2010".to_string(), "2011".to_string()];
        let mk = |region: &str, id: i64, pop: i64, values: Vec<f64>| {
            let total: f64 = values.iter().sum();
            CombinedRecord {
                region: region.to_string(),
                region_id: id,
                population: pop,
                values,
                total_emissions: total,
                per_capita: if pop == 0 { 0.0 } else { total / pop as f64 },
            }
        };
        CombinedTable {
            years,
            rows: vec![
                mk("X", 1, 100, vec![20.0, 30.0]),
                mk("Y", 2, 50, vec![150.0, 50.0]),
                mk("Z", 3, 0, vec![4.0, 6.0]),
            ],
        }
    }

    #[test]
    fn overview_sorts_descending_by_total() {
        let rows = overview(&table());
        let regions: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["Y", "X", "Z"]);
    }

    #[test]
    fn overview_shares_sum_to_one_hundred() {
        let rows = overview(&table());
        let sum: f64 = rows
            .iter()
            .map(|r| r.share_pct.replace(',', "").parse::<f64>().unwrap())
            .sum();
        assert!((sum - 100.0).abs() < 0.05);
    }

    #[test]
    fn detail_repeats_population_and_guards_per_capita() {
        let rows = detail(
            &table(),
            &[0, 2],
            &["2010".to_string(), "2011".to_string()],
        );
        assert_eq!(rows.len(), 4);
        assert!(rows[0].region == "X" && rows[0].year == "2010");
        assert_eq!(rows[0].population, "100");
        assert_eq!(rows[0].per_capita, "0.200000");
        // Zero-population region: per-capita pinned to zero, no NaN.
        assert_eq!(rows[2].region, "Z");
        assert_eq!(rows[2].per_capita, "0.000000");
    }

    #[test]
    fn detail_with_empty_selection_is_empty_not_an_error() {
        assert!(detail(&table(), &[], &[]).is_empty());
        assert!(detail(&table(), &[0], &[]).is_empty());
    }

    #[test]
    fn projection_is_one_point_per_region_year() {
        let proj = plot_projection(&table(), &[0, 1]);
        assert_eq!(proj.points.len(), 4);
        assert_eq!(proj.points[0].region, "X");
        assert_eq!(proj.points[0].year, 2010);
        assert_eq!(proj.points[0].value, 20.0);
    }

    #[test]
    fn projection_mean_is_unweighted_over_plotted_values() {
        let proj = plot_projection(&table(), &[0, 1]);
        assert!((proj.mean - (20.0 + 30.0 + 150.0 + 50.0) / 4.0).abs() < 1e-9);
    }

    #[test]
    fn projection_peak_takes_first_occurrence_on_ties() {
        let years = vec!["2010".to_string(), "2011".to_string()];
        let t = CombinedTable {
            years,
            rows: vec![CombinedRecord {
                region: "X".to_string(),
                region_id: 1,
                population: 10,
                values: vec![7.0, 7.0],
                total_emissions: 14.0,
                per_capita: 1.4,
            }],
        };
        let proj = plot_projection(&t, &[0]);
        assert_eq!(proj.peaks, vec![("X".to_string(), 2010, 7.0)]);
    }

    #[test]
    fn summary_matches_the_table() {
        let s = summary(&table());
        assert_eq!(s.regions, 3);
        assert_eq!(s.years, 2);
        assert_eq!(s.total_population, 150);
        assert!((s.total_emissions - 260.0).abs() < 1e-9);
        assert!((s.overall_per_capita - 260.0 / 150.0).abs() < 1e-9);
    }
}
