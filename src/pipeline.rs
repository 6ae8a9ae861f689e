// Pipeline orchestration: the three cache-gated stages in order.
//
// Each stage is skipped entirely when its artifact already exists; with a
// fully warm cache only the combined artifact is read. Cache artifacts are
// never checked for freshness against the raw spreadsheets.
use crate::cache;
use crate::combine;
use crate::config::PipelineConfig;
use crate::emissions;
use crate::population;
use crate::types::CombinedTable;
use crate::util::format_int;
use std::error::Error;

/// Build (or reload) the combined table for this configuration.
pub fn build(config: &PipelineConfig) -> Result<CombinedTable, Box<dyn Error>> {
    let population = cache::ensure(&config.population_artifact(), || population::load(config))?;
    let emissions = cache::ensure(&config.emissions_artifact(), || emissions::load(config))?;
    let combined = cache::ensure(&config.combined_artifact(), || {
        let (table, join) = combine::combine(&population, &emissions);
        if join.population_only > 0 || join.emissions_only > 0 {
            println!(
                "Note: inner join dropped {} population-only and {} emissions-only regions.",
                format_int(join.population_only as i64),
                format_int(join.emissions_only as i64)
            );
        }
        Ok(table)
    })?;
    Ok(combined)
}
