// Cache Gate: skip a pipeline stage when its artifact already exists.
//
// Artifacts are flat CSVs with a header row; columns are addressed by name
// on the way back in. There is deliberately no freshness check against the
// raw inputs: a stale artifact wins until the operator deletes it. That is
// an accepted limitation of the fixed-name cache, not something this module
// tries to detect.
use crate::types::{
    CombinedRecord, CombinedTable, EmissionsTable, PopulationTable, RegionEmissions,
    RegionPopulation,
};
use crate::util::is_year_label;
use std::error::Error;
use std::path::Path;

/// A table that can be persisted to and restored from a cache file.
pub trait Artifact: Sized {
    fn read_from(path: &Path) -> Result<Self, Box<dyn Error>>;
    fn write_to(&self, path: &Path) -> Result<(), Box<dyn Error>>;
}

/// Load `path` if it exists; otherwise run `produce`, persist the result
/// under `path`, and return it. The producer is never invoked on a cache
/// hit.
pub fn ensure<T, F>(path: &Path, produce: F) -> Result<T, Box<dyn Error>>
where
    T: Artifact,
    F: FnOnce() -> Result<T, Box<dyn Error>>,
{
    if path.exists() {
        return T::read_from(path);
    }
    let value = produce()?;
    value.write_to(path)?;
    Ok(value)
}

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize, Box<dyn Error>> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| format!("artifact is missing column {:?}", name).into())
}

fn field<'a>(record: &'a csv::StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("")
}

impl Artifact for PopulationTable {
    fn read_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        let mut rdr = csv::Reader::from_path(path)?;
        let headers = rdr.headers()?.clone();
        let region = column(&headers, "Region")?;
        let region_id = column(&headers, "RegionId")?;
        let population = column(&headers, "Population")?;
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(RegionPopulation {
                region: field(&record, region).to_string(),
                region_id: field(&record, region_id).parse()?,
                population: field(&record, population).parse()?,
            });
        }
        Ok(PopulationTable { rows })
    }

    fn write_to(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["Region", "RegionId", "Population"])?;
        for row in &self.rows {
            wtr.write_record([
                row.region.as_str(),
                &row.region_id.to_string(),
                &row.population.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl Artifact for EmissionsTable {
    fn read_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        let mut rdr = csv::Reader::from_path(path)?;
        let headers = rdr.headers()?.clone();
        let region = column(&headers, "Region")?;
        let year_cols: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| is_year_label(h))
            .map(|(idx, h)| (idx, h.to_string()))
            .collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let mut values = Vec::with_capacity(year_cols.len());
            for (idx, _) in &year_cols {
                values.push(field(&record, *idx).parse::<f64>()?);
            }
            rows.push(RegionEmissions {
                region: field(&record, region).to_string(),
                values,
            });
        }
        let years = year_cols.into_iter().map(|(_, label)| label).collect();
        Ok(EmissionsTable { years, rows })
    }

    fn write_to(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let mut wtr = csv::Writer::from_path(path)?;
        let mut header = vec!["Region".to_string()];
        header.extend(self.years.iter().cloned());
        wtr.write_record(&header)?;
        for row in &self.rows {
            let mut record = vec![row.region.clone()];
            record.extend(row.values.iter().map(|v| v.to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl Artifact for CombinedTable {
    fn read_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        let mut rdr = csv::Reader::from_path(path)?;
        let headers = rdr.headers()?.clone();
        let region = column(&headers, "Region")?;
        let region_id = column(&headers, "RegionId")?;
        let population = column(&headers, "Population")?;
        let total = column(&headers, "TotalEmissions")?;
        let per_capita = column(&headers, "PerCapita")?;
        let year_cols: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| is_year_label(h))
            .map(|(idx, h)| (idx, h.to_string()))
            .collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let mut values = Vec::with_capacity(year_cols.len());
            for (idx, _) in &year_cols {
                values.push(field(&record, *idx).parse::<f64>()?);
            }
            rows.push(CombinedRecord {
                region: field(&record, region).to_string(),
                region_id: field(&record, region_id).parse()?,
                population: field(&record, population).parse()?,
                values,
                total_emissions: field(&record, total).parse()?,
                per_capita: field(&record, per_capita).parse()?,
            });
        }
        let years = year_cols.into_iter().map(|(_, label)| label).collect();
        Ok(CombinedTable { years, rows })
    }

    fn write_to(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let mut wtr = csv::Writer::from_path(path)?;
        let mut header = vec![
            "Region".to_string(),
            "RegionId".to_string(),
            "Population".to_string(),
        ];
        header.extend(self.years.iter().cloned());
        header.push("TotalEmissions".to_string());
        header.push("PerCapita".to_string());
        wtr.write_record(&header)?;
        for row in &self.rows {
            let mut record = vec![
                row.region.clone(),
                row.region_id.to_string(),
                row.population.to_string(),
            ];
            record.extend(row.values.iter().map(|v| v.to_string()));
            record.push(row.total_emissions.to_string());
            record.push(row.per_capita.to_string());
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
