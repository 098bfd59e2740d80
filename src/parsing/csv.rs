use std::path::Path;

use crate::parsing::table::{Table, TableError};

/// Read a delimited file into a [`Table`].
///
/// Rows may be ragged (short rows read as empty cells) and cells are
/// trimmed. The first record is the header row.
///
/// # Errors
///
/// Returns `TableError::Io` when the file cannot be read,
/// `TableError::Csv` on malformed content, and `TableError::Empty` when
/// the file has a header but no data rows.
pub fn read_file(path: &Path, delimiter: u8) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    if rows.is_empty() {
        return Err(TableError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(Table::new(path, headers, rows))
}
