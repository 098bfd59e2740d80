//! # bice-recon
//!
//! A library and CLI for cross-checking membership/benefit enrollment
//! between internal "Carga" load sheets and the BICE
//! benefits-administration extract.
//!
//! Both sides are reduced to multisets of normalized RUTs; every
//! identifier in the union is then classified into exactly one outcome
//! (match, quantity mismatch, only in Carga, only in BICE) and emitted
//! into two report tables. The per-company variations that used to be
//! separate scripts are variant profiles: column names, verifier-digit
//! handling and category tagging, never different algorithms.
//!
//! ## Example
//!
//! ```rust
//! use bice_recon::core::normalize::normalize_rut;
//! use bice_recon::core::RutMultiset;
//! use bice_recon::recon::reconcile;
//!
//! let carga: RutMultiset = ["12.345.678-9", "11.111.111-1"]
//!     .into_iter()
//!     .map(normalize_rut)
//!     .collect();
//! let bice: RutMultiset = ["123456789"].into_iter().map(String::from).collect();
//!
//! let rows = reconcile(&carga, &bice, None);
//! for row in rows {
//!     println!("{} {} ({}/{})", row.rut, row.estado(), row.count_carga, row.count_bice);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: RUT normalization, records, multisets, outcomes
//! - [`recon`]: reconciliation engine and report tables
//! - [`roster`]: ResPets alta/baja workflow and duplicate suffixing
//! - [`parsing`]: tabular input/output (CSV, portal format)
//! - [`profile`]: per-company variant profiles
//! - [`cli`]: command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod profile;
pub mod recon;
pub mod roster;

// Re-export commonly used types for convenience
pub use crate::core::multiset::{CategorizedMultisets, RutMultiset};
pub use crate::core::types::Outcome;
pub use crate::profile::{ProfileSet, VariantProfile};
pub use crate::recon::engine::{reconcile, reconcile_categories, ResultRow};
pub use crate::roster::sync::RosterPlan;
