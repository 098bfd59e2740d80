//! Variant profiles: the per-company parameterization of the reconciler.
//!
//! Each company comparison that used to be its own script is one
//! [`VariantProfile`]: which columns hold the identifier, whether the
//! verifier digit lives in its own column, how load rows map to a
//! category, and which status column gates the BICE extract. The real
//! variants ship embedded in the binary; `--profile-file` loads a
//! custom set.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read profiles: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse profiles: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Profile '{0}' not found (available: {1})")]
    NotFound(String, String),
}

/// Profile set version for compatibility checking.
pub const PROFILES_VERSION: &str = "1.0.0";

/// Serializable profile set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSet {
    pub version: String,
    pub profiles: Vec<VariantProfile>,
}

/// One reconciliation variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantProfile {
    pub id: String,
    pub display_name: String,
    pub carga: CargaSpec,
    pub bice: BiceSpec,
}

/// How to read the load sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CargaSpec {
    /// Candidate identifier column names, in preference order.
    pub rut_columns: Vec<String>,

    /// Separate verifier-digit column, when the sheet splits RUT and DV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dv_column: Option<String>,

    /// Column holding the contracting company, for category tagging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_column: Option<String>,

    /// Category for rows no rule matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_category: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_rules: Vec<CategoryRule>,
}

/// Company-name based category assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    /// Case-insensitive substrings matched against the company cell.
    pub company_contains: Vec<String>,
}

/// How to read the BICE extract(s).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiceSpec {
    pub rut_columns: Vec<String>,

    /// Candidate status column names, in preference order.
    #[serde(default = "default_status_columns")]
    pub status_columns: Vec<String>,

    /// Category tags this variant expects one extract file for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

fn default_status_columns() -> Vec<String> {
    vec!["Estado".to_string()]
}

impl CargaSpec {
    /// Category tag for a company cell, or the default when no rule
    /// matches. `None` when the variant does not categorize at all.
    pub fn categorize(&self, company: &str) -> Option<String> {
        let upper = company.trim().to_uppercase();
        for rule in &self.category_rules {
            if rule
                .company_contains
                .iter()
                .any(|needle| upper.contains(&needle.to_uppercase()))
            {
                return Some(rule.category.clone());
            }
        }
        self.default_category.clone()
    }

    /// Whether this variant splits output by category.
    pub fn has_categories(&self) -> bool {
        self.category_column.is_some()
    }
}

impl ProfileSet {
    /// Load the embedded default profiles.
    pub fn load_embedded() -> Result<Self, ProfileError> {
        const EMBEDDED_PROFILES: &str = include_str!("../../profiles/variants.json");
        Self::from_json(EMBEDDED_PROFILES)
    }

    /// Load profiles from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let set: Self = serde_json::from_str(json)?;
        if set.version != PROFILES_VERSION {
            eprintln!(
                "Warning: profile set version mismatch (expected {}, found {})",
                PROFILES_VERSION, set.version
            );
        }
        Ok(set)
    }

    pub fn get(&self, id: &str) -> Result<&VariantProfile, ProfileError> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ProfileError::NotFound(id.to_string(), self.ids().join(", ")))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
