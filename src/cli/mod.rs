//! Command-line interface for bice-recon.
//!
//! Available commands:
//!
//! - **reconcile**: cross-check a Carga load sheet against BICE extracts
//! - **roster**: compute the ResPets alta/baja upload lists
//! - **profiles**: list or inspect the built-in variant profiles
//!
//! ## Usage
//!
//! ```text
//! # Sonda: one load sheet against one extract
//! bice-recon reconcile --profile sonda --carga nomina.csv --bice users.csv
//!
//! # Pyme: categorized extracts
//! bice-recon reconcile --profile pyme --carga carga.csv \
//!     --bice OMG=bice_omg.csv --bice PYME=bice_pyme.csv --out-dir resultado
//!
//! # ResPets roster sync
//! bice-recon roster --activos activos.csv --inactivos inactivos.csv \
//!     --users respets_users.csv --out-dir resultado
//!
//! # JSON summary for scripting
//! bice-recon reconcile --profile sonda --carga a.csv --bice b.csv --format json
//! ```

use clap::{Parser, Subcommand};

pub mod profiles;
pub mod reconcile;
pub mod roster;

#[derive(Parser)]
#[command(name = "bice-recon")]
#[command(author = "Pawer Ops")]
#[command(version)]
#[command(about = "Reconcile membership load sheets against BICE enrollment extracts")]
#[command(
    long_about = "bice-recon cross-checks the RUTs in an internal load sheet (Carga) against the\nBICE benefits-administration extract and reports, per identifier, whether the\ntwo sides agree.\n\nIt replaces the per-company comparison scripts with one reconciler driven by a\nvariant profile, and covers the ResPets roster synchronization (altas/bajas)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for run summaries
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cross-check a Carga load sheet against BICE extract(s)
    Reconcile(reconcile::ReconcileArgs),

    /// Compute ResPets alta/baja upload lists
    Roster(roster::RosterArgs),

    /// List or inspect variant profiles
    Profiles(profiles::ProfilesArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
