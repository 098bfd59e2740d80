use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::recon::engine::ResultRow;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Column order of both report files.
const COLUMNS: [&str; 6] = [
    "RUT",
    "ESTADO",
    "TIPO",
    "CANTIDAD_CARGA",
    "CANTIDAD_BICE",
    "OBSERVACION",
];

/// Split result rows into the two report tables: matches
/// (`COINCIDENCIA*`) and everything else.
pub fn split(rows: Vec<ResultRow>) -> (Vec<ResultRow>, Vec<ResultRow>) {
    rows.into_iter().partition(|r| r.outcome.is_match())
}

/// Write one report table as CSV.
pub fn write_csv(path: &Path, rows: &[ResultRow]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS)?;

    for row in rows {
        writer.write_record([
            row.rut.as_str(),
            &row.estado(),
            row.tipo(),
            &row.count_carga.to_string(),
            &row.count_bice.to_string(),
            &row.note,
        ])?;
    }

    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "report written");
    Ok(())
}

/// Aggregated numbers for one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub profile: String,
    pub generated_at: String,
    /// Rows counted per source after the active filter.
    pub counted_carga: u64,
    pub counted_bice: u64,
    /// Rows dropped for lacking a usable RUT.
    pub skipped_carga: usize,
    pub skipped_bice: usize,
    pub matches: usize,
    pub discrepancies: usize,
    /// Row count per `ESTADO` label.
    pub by_estado: BTreeMap<String, usize>,
}

impl RunSummary {
    pub fn new(
        profile: &str,
        counted_carga: u64,
        counted_bice: u64,
        skipped_carga: usize,
        skipped_bice: usize,
        matches: &[ResultRow],
        discrepancies: &[ResultRow],
    ) -> Self {
        let mut by_estado = BTreeMap::new();
        for row in matches.iter().chain(discrepancies) {
            *by_estado.entry(row.estado()).or_insert(0) += 1;
        }

        Self {
            profile: profile.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            counted_carga,
            counted_bice,
            skipped_carga,
            skipped_bice,
            matches: matches.len(),
            discrepancies: discrepancies.len(),
            by_estado,
        }
    }

    /// Human-readable summary for the terminal.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Resumen de comparacion ({})\n", self.profile));
        out.push_str(&"=".repeat(60));
        out.push('\n');
        out.push_str(&format!(
            "Registros contados: Carga={}, BICE={}\n",
            self.counted_carga, self.counted_bice
        ));
        if self.skipped_carga + self.skipped_bice > 0 {
            out.push_str(&format!(
                "Filas sin RUT omitidas: Carga={}, BICE={}\n",
                self.skipped_carga, self.skipped_bice
            ));
        }
        out.push_str(&format!("Coincidencias: {}\n", self.matches));
        out.push_str(&format!("Inconsistencias: {}\n", self.discrepancies));
        for (estado, count) in &self.by_estado {
            out.push_str(&format!("  - {estado}: {count}\n"));
        }
        out
    }

    /// One-line TSV summary for scripting.
    pub fn render_tsv(&self) -> String {
        format!(
            "profile\tmatches\tdiscrepancies\tskipped_carga\tskipped_bice\n{}\t{}\t{}\t{}\t{}",
            self.profile, self.matches, self.discrepancies, self.skipped_carga, self.skipped_bice
        )
    }
}
