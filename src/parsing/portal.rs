use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

/// UTF-8 BOM; the portal's importer expects `utf-8-sig` files.
const BOM: &str = "\u{feff}";

/// Write an addition list in the portal's quirky quoted format.
///
/// The whole header line is wrapped in double quotes and every data
/// line is wrapped in quotes with a trailing comma:
///
/// ```text
/// "Nombre,Apellido,Email,RUT"
/// "Ana,Perez Soto,ana@x.com,123456789",
/// ```
///
/// This is the exact shape the upload portal parses; it is not RFC-4180
/// CSV, so it is emitted by hand rather than through the `csv` crate.
pub fn write_portal_rows(
    path: &Path,
    header: &[&str],
    rows: &[Vec<String>],
) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "{BOM}")?;
    writeln!(out, "\"{}\"", header.join(","))?;
    for row in rows {
        writeln!(out, "\"{}\",", row.join(","))?;
    }
    out.flush()?;
    info!(path = %path.display(), rows = rows.len(), "portal file written");
    Ok(())
}

/// Write a bare-RUT deactivation list: one quoted RUT per line with a
/// trailing comma, no header.
pub fn write_rut_list(path: &Path, ruts: &[String]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "{BOM}")?;
    for rut in ruts {
        writeln!(out, "\"{rut}\",")?;
    }
    out.flush()?;
    info!(path = %path.display(), rows = ruts.len(), "portal file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_rows_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("altas.csv");
        let rows = vec![vec![
            "Ana".to_string(),
            "Perez Soto".to_string(),
            "ana@x.com".to_string(),
            "123456789".to_string(),
        ]];
        write_portal_rows(&path, &["Nombre", "Apellido", "Email", "RUT"], &rows).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "\u{feff}\"Nombre,Apellido,Email,RUT\"\n\"Ana,Perez Soto,ana@x.com,123456789\",\n"
        );
    }

    #[test]
    fn test_rut_list_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bajas.csv");
        write_rut_list(&path, &["111".to_string(), "222".to_string()]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\u{feff}\"111\",\n\"222\",\n");
    }
}
