use serde::Serialize;
use tabled::Tabled;

/// One region after aggregating the municipal population source.
///
/// `region` is the join key and is unique post-aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPopulation {
    pub region: String,
    pub region_id: i64,
    pub population: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopulationTable {
    pub rows: Vec<RegionPopulation>,
}

/// One region after aggregating the emissions source. `values` is aligned
/// with the owning table's `years`; the year set is a property of the table,
/// not of individual rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionEmissions {
    pub region: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmissionsTable {
    pub years: Vec<String>,
    pub rows: Vec<RegionEmissions>,
}

/// One region of the joined table with derived metrics.
///
/// Invariants: `total_emissions` equals the sum of `values`; `per_capita`
/// is exactly `0.0` when `population` is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRecord {
    pub region: String,
    pub region_id: i64,
    pub population: i64,
    pub values: Vec<f64>,
    pub total_emissions: f64,
    pub per_capita: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    pub years: Vec<String>,
    pub rows: Vec<CombinedRecord>,
}

impl CombinedTable {
    pub fn region_names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.region.as_str()).collect()
    }
}

/// Counts of regions lost on each side of the inner join. The lossy join is
/// deliberate; these counts exist so the loss is at least visible.
#[derive(Debug, Clone, Default)]
pub struct JoinReport {
    pub population_only: usize,
    pub emissions_only: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct OverviewRow {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "Code")]
    #[tabled(rename = "Code")]
    pub code: i64,
    #[serde(rename = "Population")]
    #[tabled(rename = "Population")]
    pub population: String,
    #[serde(rename = "TotalEmissions")]
    #[tabled(rename = "TotalEmissions")]
    pub total_emissions: String,
    #[serde(rename = "PerCapita")]
    #[tabled(rename = "PerCapita")]
    pub per_capita: String,
    #[serde(rename = "SharePct")]
    #[tabled(rename = "SharePct")]
    pub share_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DetailRow {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: String,
    #[serde(rename = "Population")]
    #[tabled(rename = "Population")]
    pub population: String,
    #[serde(rename = "Emissions")]
    #[tabled(rename = "Emissions")]
    pub emissions: String,
    #[serde(rename = "PerCapita")]
    #[tabled(rename = "PerCapita")]
    pub per_capita: String,
}

/// One `(region, year, value)` triple of the long-form chart projection.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyPoint {
    pub region: String,
    pub year: i32,
    pub value: f64,
}

/// Long-form chart input: the plotted triples, the unweighted mean of every
/// plotted value (reference line), and each region's peak year for label
/// placement (first occurrence on ties).
#[derive(Debug, Clone)]
pub struct PlotProjection {
    pub points: Vec<TidyPoint>,
    pub mean: f64,
    pub peaks: Vec<(String, i32, f64)>,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub regions: usize,
    pub years: usize,
    pub total_population: i64,
    pub total_emissions: f64,
    pub overall_per_capita: f64,
}
