use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{}: no se encontro la columna '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}: el archivo no tiene filas de datos", path.display())]
    Empty { path: PathBuf },
}

/// An in-memory tabular file: named columns and string cells.
///
/// This is the seam between the reconciler and whatever produced the
/// file; the engine only ever sees column names mapped to values, never
/// a file format.
#[derive(Debug, Clone)]
pub struct Table {
    source: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(source: impl Into<PathBuf>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            source: source.into(),
            headers,
            rows,
        }
    }

    pub fn source(&self) -> &PathBuf {
        &self.source
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(|cells| RowView { cells })
    }

    /// Resolve a column from candidate names.
    ///
    /// Exact case-insensitive matches win over substring matches, and
    /// candidates are tried in order, so `["RUT"]` picks `Rut` before it
    /// would settle for `RUT_ASEGURADO`.
    pub fn find_column(&self, candidates: &[&str]) -> Option<usize> {
        for candidate in candidates {
            let lower = candidate.to_lowercase();
            if let Some(idx) = self
                .headers
                .iter()
                .position(|h| h.to_lowercase() == lower)
            {
                return Some(idx);
            }
        }
        for candidate in candidates {
            let lower = candidate.to_lowercase();
            if let Some(idx) = self
                .headers
                .iter()
                .position(|h| h.to_lowercase().contains(&lower))
            {
                return Some(idx);
            }
        }
        None
    }

    /// Like [`find_column`](Self::find_column), but fatal when absent.
    pub fn require_column(&self, candidates: &[&str]) -> Result<usize, TableError> {
        self.find_column(candidates)
            .ok_or_else(|| TableError::MissingColumn {
                path: self.source.clone(),
                column: candidates.join("/"),
            })
    }
}

/// Borrowed view of one row; short rows read as empty cells.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    cells: &'a [String],
}

impl<'a> RowView<'a> {
    pub fn get(&self, column: usize) -> &'a str {
        self.cells.get(column).map_or("", String::as_str)
    }

    /// Cell for an optional column index.
    pub fn get_opt(&self, column: Option<usize>) -> &'a str {
        column.map_or("", |idx| self.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(
            "test.csv",
            vec![
                "RUT_ASEGURADO".to_string(),
                "Rut".to_string(),
                "Estado".to_string(),
            ],
            vec![
                vec!["1-9".to_string(), "11".to_string(), "VERDADERO".to_string()],
                vec!["2-7".to_string()],
            ],
        )
    }

    #[test]
    fn test_exact_match_beats_substring() {
        let t = table();
        assert_eq!(t.find_column(&["Rut"]), Some(1));
        assert_eq!(t.find_column(&["RUT"]), Some(1));
        assert_eq!(t.find_column(&["RUT_ASEGURADO"]), Some(0));
    }

    #[test]
    fn test_substring_fallback() {
        let t = table();
        assert_eq!(t.find_column(&["asegurado"]), Some(0));
        assert_eq!(t.find_column(&["NOPE"]), None);
    }

    #[test]
    fn test_require_column_error() {
        let t = table();
        let err = t.require_column(&["NOPE"]).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { .. }));
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn test_short_rows_read_empty() {
        let t = table();
        let rows: Vec<_> = t.rows().collect();
        assert_eq!(rows[0].get(2), "VERDADERO");
        assert_eq!(rows[1].get(2), "");
        assert_eq!(rows[1].get_opt(None), "");
    }
}
