// Combiner: inner join of the two aggregated tables plus the derived
// columns.
//
// Regions present on only one side are excluded; that loss is deliberate and
// reported as counts rather than silently swallowed.
use crate::types::{CombinedRecord, CombinedTable, EmissionsTable, JoinReport, PopulationTable};
use crate::util::guarded_div;
use std::collections::{HashMap, HashSet};

/// Join population against emissions on the region key and derive totals and
/// per-capita values. Output keeps the population table's row order.
pub fn combine(
    population: &PopulationTable,
    emissions: &EmissionsTable,
) -> (CombinedTable, JoinReport) {
    let by_region: HashMap<&str, &[f64]> = emissions
        .rows
        .iter()
        .map(|r| (r.region.as_str(), r.values.as_slice()))
        .collect();

    let mut rows: Vec<CombinedRecord> = Vec::new();
    let mut population_only = 0usize;
    for pop in &population.rows {
        let Some(&values) = by_region.get(pop.region.as_str()) else {
            population_only += 1;
            continue;
        };
        rows.push(CombinedRecord {
            region: pop.region.clone(),
            region_id: pop.region_id,
            population: pop.population,
            values: values.to_vec(),
            total_emissions: values.iter().sum(),
            per_capita: 0.0, // filled in below
        });
    }

    // Vectorized guarded division over the whole column instead of a per-row
    // branch.
    let totals: Vec<f64> = rows.iter().map(|r| r.total_emissions).collect();
    let populations: Vec<f64> = rows.iter().map(|r| r.population as f64).collect();
    for (row, pc) in rows.iter_mut().zip(guarded_div(&totals, &populations)) {
        row.per_capita = pc;
    }

    // Count drops by membership, not by subtraction: the counts stay correct
    // (and cannot underflow) even if an upstream table ever carried a
    // duplicated region key.
    let population_regions: HashSet<&str> = population
        .rows
        .iter()
        .map(|r| r.region.as_str())
        .collect();
    let emissions_only = emissions
        .rows
        .iter()
        .filter(|r| !population_regions.contains(r.region.as_str()))
        .count();
    let report = JoinReport {
        population_only,
        emissions_only,
    };
    (
        CombinedTable {
            years: emissions.years.clone(),
            rows,
        },
        report,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RegionEmissions, RegionPopulation};

    fn population(entries: &[(&str, i64, i64)]) -> PopulationTable {
        PopulationTable {
            rows: entries
                .iter()
                .map(|(region, id, pop)| RegionPopulation {
                    region: region.to_string(),
                    region_id: *id,
                    population: *pop,
                })
                .collect(),
        }
    }

    fn emissions(years: &[&str], entries: &[(&str, &[f64])]) -> EmissionsTable {
        EmissionsTable {
            years: years.iter().map(|y| y.to_string()).collect(),
            rows: entries
                .iter()
                .map(|(region, values)| RegionEmissions {
                    region: region.to_string(),
                    values: values.to_vec(),
                })
                .collect(),
        }
    }

    #[test]
    fn join_is_inner_and_counts_drops() {
        let pop = population(&[("A", 1, 10), ("B", 2, 20), ("C", 3, 30)]);
        let emis = emissions(
            &["2010"],
            &[("B", &[1.0]), ("C", &[2.0]), ("D", &[3.0])],
        );
        let (table, report) = combine(&pop, &emis);
        let regions: Vec<&str> = table.rows.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["B", "C"]);
        assert_eq!(report.population_only, 1);
        assert_eq!(report.emissions_only, 1);
    }

    #[test]
    fn duplicate_population_regions_do_not_break_drop_accounting() {
        // Upstream guarantees unique region keys, but the accounting must not
        // panic if that ever fails to hold.
        let pop = population(&[("X", 1, 10), ("X", 0, 5), ("Y", 2, 3)]);
        let emis = emissions(&["2010"], &[("X", &[3.0])]);
        let (table, report) = combine(&pop, &emis);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(report.population_only, 1);
        assert_eq!(report.emissions_only, 0);
    }

    #[test]
    fn total_is_the_row_sum_across_years() {
        let pop = population(&[("A", 1, 100)]);
        let emis = emissions(&["2010", "2011", "2012"], &[("A", &[5.0, -2.0, 7.0])]);
        let (table, _) = combine(&pop, &emis);
        assert_eq!(table.rows[0].total_emissions, 10.0);
    }

    #[test]
    fn per_capita_times_population_recovers_total() {
        let pop = population(&[("A", 1, 250), ("B", 2, 4)]);
        let emis = emissions(&["2010"], &[("A", &[1000.0]), ("B", &[6.0])]);
        let (table, _) = combine(&pop, &emis);
        for row in &table.rows {
            assert!(
                (row.per_capita * row.population as f64 - row.total_emissions).abs() < 1e-9
            );
        }
    }

    #[test]
    fn zero_population_yields_zero_per_capita() {
        let pop = population(&[("A", 1, 0)]);
        let emis = emissions(&["2010"], &[("A", &[123.0])]);
        let (table, _) = combine(&pop, &emis);
        assert_eq!(table.rows[0].per_capita, 0.0);
        assert!(table.rows[0].per_capita.is_finite());
    }

    #[test]
    fn combined_table_keeps_the_emissions_year_set() {
        let pop = population(&[("A", 1, 1)]);
        let emis = emissions(&["2012", "2010"], &[("A", &[1.0, 2.0])]);
        let (table, _) = combine(&pop, &emis);
        assert_eq!(table.years, vec!["2012", "2010"]);
    }
}
