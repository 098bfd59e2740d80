//! Tabular input and output.
//!
//! Input files arrive through [`table::Table`], a plain columns-and-cells
//! view, so the reconciler never depends on a file format. The concrete
//! reader is CSV ([`csv::read_file`]); reports are written as standard
//! CSV by `recon::report`, and roster outputs use the portal's quoted
//! line format ([`portal`]).

pub mod csv;
pub mod portal;
pub mod table;

pub use table::{RowView, Table, TableError};
