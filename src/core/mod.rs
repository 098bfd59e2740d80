//! Core data types: RUT normalization, source records, multisets and
//! reconciliation outcomes.

pub mod multiset;
pub mod normalize;
pub mod record;
pub mod types;

pub use multiset::{CategorizedMultisets, RutMultiset};
pub use record::{Record, SourceKind};
pub use types::Outcome;
