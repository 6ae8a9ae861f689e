// Spreadsheet oracle on top of `calamine`.
//
// The rest of the pipeline never touches the workbook format: it gets a grid
// of cell strings and addresses columns by header name.
use calamine::{open_workbook_auto, Data, Reader};
use std::error::Error;
use std::path::Path;

/// A rectangular grid of cells with the first row split off as headers.
#[derive(Debug, Clone)]
pub struct SheetGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetGrid {
    /// Build a grid from raw rows, treating `rows[skip_rows]` as the header
    /// row and everything below it as data.
    pub fn from_rows(rows: &[Vec<String>], skip_rows: usize) -> SheetGrid {
        let headers = rows.get(skip_rows).cloned().unwrap_or_default();
        let body = if skip_rows + 1 < rows.len() {
            rows[skip_rows + 1..].to_vec()
        } else {
            Vec::new()
        };
        SheetGrid { headers, rows: body }
    }

    /// Index of the first header equal to `name`, if any.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell<'a>(&'a self, row: &'a [String], col: usize) -> &'a str {
        row.get(col).map(String::as_str).unwrap_or("")
    }
}

/// Load every row of a worksheet as strings. `sheet` of `None` means the
/// first sheet in the workbook.
pub fn load_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = match sheet {
        Some(name) => workbook.worksheet_range(name)?,
        None => {
            let first = workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or("workbook has no sheets")?;
            workbook.worksheet_range(&first)?
        }
    };
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok(rows)
}

/// Render one cell as text. Whole floats drop their `.0` so numeric columns
/// read back the way they were typed.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => format!("{}", b),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::Error(e) => format!("{:?}", e),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
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
    fn from_rows_splits_header_at_offset() {
        let rows = grid(&[
            &["metadata"],
            &["STATE", "POPULATION"],
            &["AC", "100"],
            &["AL", "200"],
        ]);
        let g = SheetGrid::from_rows(&rows, 1);
        assert_eq!(g.headers, vec!["STATE", "POPULATION"]);
        assert_eq!(g.rows.len(), 2);
        assert_eq!(g.column_index("POPULATION"), Some(1));
        assert_eq!(g.column_index("MISSING"), None);
    }

    #[test]
    fn from_rows_out_of_range_offset_is_empty() {
        let rows = grid(&[&["A", "B"]]);
        let g = SheetGrid::from_rows(&rows, 5);
        assert!(g.headers.is_empty());
        assert!(g.rows.is_empty());
    }

    #[test]
    fn cell_out_of_bounds_is_blank() {
        let rows = grid(&[&["A"], &["1"]]);
        let g = SheetGrid::from_rows(&rows, 0);
        assert_eq!(g.cell(&g.rows[0], 0), "1");
        assert_eq!(g.cell(&g.rows[0], 7), "");
    }
}
