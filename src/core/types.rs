use serde::{Deserialize, Serialize};

/// Classification of one RUT across the two sources.
///
/// The four variants partition the union of identifiers exhaustively
/// and exclusively: every RUT seen in either source lands in exactly
/// one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Present in both sources with equal occurrence counts.
    Match,
    /// Present in both sources with different occurrence counts.
    QuantityMismatch,
    /// Present only in the load sheet.
    OnlyInCarga,
    /// Present only in the BICE extract.
    OnlyInBice,
}

impl Outcome {
    /// Report label (`ESTADO` column), before any category suffix.
    pub fn label(self) -> &'static str {
        match self {
            Self::Match => "COINCIDENCIA",
            Self::QuantityMismatch => "DIFERENCIA_CANTIDAD",
            Self::OnlyInCarga => "CARGA_SIN_BICE",
            Self::OnlyInBice => "BICE_SIN_CARGA",
        }
    }

    /// Sort rank for report ordering: matches first, extras last.
    pub fn rank(self) -> u8 {
        match self {
            Self::Match => 1,
            Self::QuantityMismatch => 2,
            Self::OnlyInCarga => 3,
            Self::OnlyInBice => 4,
        }
    }

    /// Whether this outcome belongs in the matches file rather than the
    /// discrepancies file.
    pub fn is_match(self) -> bool {
        matches!(self, Self::Match)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Outcome::Match.label(), "COINCIDENCIA");
        assert_eq!(Outcome::QuantityMismatch.label(), "DIFERENCIA_CANTIDAD");
        assert_eq!(Outcome::OnlyInCarga.label(), "CARGA_SIN_BICE");
        assert_eq!(Outcome::OnlyInBice.label(), "BICE_SIN_CARGA");
    }

    #[test]
    fn test_rank_order() {
        assert!(Outcome::Match.rank() < Outcome::QuantityMismatch.rank());
        assert!(Outcome::QuantityMismatch.rank() < Outcome::OnlyInCarga.rank());
        assert!(Outcome::OnlyInCarga.rank() < Outcome::OnlyInBice.rank());
    }

    #[test]
    fn test_only_match_is_match() {
        assert!(Outcome::Match.is_match());
        assert!(!Outcome::QuantityMismatch.is_match());
        assert!(!Outcome::OnlyInCarga.is_match());
        assert!(!Outcome::OnlyInBice.is_match());
    }
}
