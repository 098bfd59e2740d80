use serde::{Deserialize, Serialize};

/// Which side of the reconciliation a source file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Internal load sheet; every row counts.
    Carga,
    /// BICE enrollment extract; only active rows count.
    Bice,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Carga => write!(f, "Carga"),
            Self::Bice => write!(f, "BICE"),
        }
    }
}

/// Values the BICE extract uses to mark an enrollment as active.
const TRUTHY: &[&str] = &["TRUE", "VERDADERO", "SI", "SÍ", "YES", "1", "ACTIVO"];

/// Interpret a boolean-like status cell.
pub fn is_truthy_status(value: &str) -> bool {
    let upper = value.trim().to_uppercase();
    TRUTHY.contains(&upper.as_str())
}

/// Decide whether a row counts toward its source multiset.
///
/// BICE rows count only when the status flag is truthy; a BICE file with
/// no status column counts every row, matching the extract variants that
/// predate the `Estado` column. Carga rows always count.
pub fn row_counts(kind: SourceKind, status: Option<&str>) -> bool {
    match kind {
        SourceKind::Carga => true,
        SourceKind::Bice => status.map_or(true, is_truthy_status),
    }
}

/// One source row reduced to what the reconciler needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Normalized identifier (may be empty when the cell was unusable).
    pub rut: String,
    /// Category tag (e.g. OMG vs PYME) carried through to output grouping.
    pub category: Option<String>,
}

impl Record {
    pub fn new(rut: impl Into<String>, category: Option<String>) -> Self {
        Self {
            rut: rut.into(),
            category,
        }
    }
}
