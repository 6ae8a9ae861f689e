use std::path::{Path, PathBuf};

/// Everything the pipeline needs to know about the outside world: where the
/// raw spreadsheets live, which sheet holds the emissions data, and where the
/// cache artifacts go. Built once in `main` and passed by reference into each
/// stage; there is no process-wide mutable state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub population_path: PathBuf,
    pub emissions_path: PathBuf,
    pub emissions_sheet: String,
    pub cache_dir: PathBuf,
}

pub const POPULATION_ARTIFACT: &str = "population_by_region.csv";
pub const EMISSIONS_ARTIFACT: &str = "emissions_by_region.csv";
pub const COMBINED_ARTIFACT: &str = "combined_by_region.csv";

impl PipelineConfig {
    pub fn new<P: Into<PathBuf>>(
        population_path: P,
        emissions_path: P,
        emissions_sheet: &str,
        cache_dir: P,
    ) -> Self {
        PipelineConfig {
            population_path: population_path.into(),
            emissions_path: emissions_path.into(),
            emissions_sheet: emissions_sheet.to_string(),
            cache_dir: cache_dir.into(),
        }
    }

    pub fn population_artifact(&self) -> PathBuf {
        self.cache_dir.join(POPULATION_ARTIFACT)
    }

    pub fn emissions_artifact(&self) -> PathBuf {
        self.cache_dir.join(EMISSIONS_ARTIFACT)
    }

    pub fn combined_artifact(&self) -> PathBuf {
        self.cache_dir.join(COMBINED_ARTIFACT)
    }

    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(name)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig::new(
            Path::new("population_estimates.xlsx").to_path_buf(),
            Path::new("ghg_emissions.xlsx").to_path_buf(),
            "GHG Estimates",
            Path::new(".").to_path_buf(),
        )
    }
}
