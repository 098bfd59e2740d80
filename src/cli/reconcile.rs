use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::core::multiset::CategorizedMultisets;
use crate::core::normalize::{combine_rut_dv, normalize_rut};
use crate::core::record::{row_counts, Record, SourceKind};
use crate::parsing::csv::read_file;
use crate::parsing::table::Table;
use crate::profile::{ProfileSet, VariantProfile};
use crate::recon::engine::reconcile_categories;
use crate::recon::report::{split, write_csv, RunSummary};

#[derive(Args)]
pub struct ReconcileArgs {
    /// Variant profile id (see `bice-recon profiles`)
    #[arg(long, default_value = "generic")]
    pub profile: String,

    /// Path to a custom profile JSON file
    #[arg(long)]
    pub profile_file: Option<PathBuf>,

    /// Carga load sheet (CSV)
    #[arg(long, required = true)]
    pub carga: PathBuf,

    /// BICE extract, optionally labeled: `FILE` or `CATEGORY=FILE`.
    /// Repeat for categorized variants.
    #[arg(long, required = true)]
    pub bice: Vec<String>,

    /// Directory for the two report files
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Field delimiter of the input files
    #[arg(long, default_value = ",")]
    pub delimiter: char,
}

pub fn run(args: ReconcileArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let profiles = match &args.profile_file {
        Some(path) => ProfileSet::load_from_file(path)
            .with_context(|| format!("loading profiles from {}", path.display()))?,
        None => ProfileSet::load_embedded()?,
    };
    let profile = profiles.get(&args.profile)?;
    let delimiter = u8::try_from(args.delimiter as u32).context("delimiter must be ASCII")?;

    // Read everything up front; any missing file or column aborts the
    // run before a single output row is written.
    let carga_table = read_file(&args.carga, delimiter)
        .with_context(|| format!("reading carga file {}", args.carga.display()))?;
    let carga = build_carga(&carga_table, profile)?;

    if verbose {
        eprintln!(
            "Carga: {} rows, {} counted, {} skipped",
            carga_table.len(),
            carga.total(),
            carga.skipped()
        );
    }

    let mut bice = CategorizedMultisets::new();
    let mut bice_filtered = 0usize;
    for spec in &args.bice {
        let (category, path) = parse_bice_spec(spec, profile)?;
        let table = read_file(Path::new(path), delimiter)
            .with_context(|| format!("reading BICE file {path}"))?;
        bice_filtered += add_bice(&mut bice, &table, profile, category.as_deref())?;

        if verbose {
            eprintln!(
                "BICE{}: {} rows",
                category.as_deref().map(|c| format!(" {c}")).unwrap_or_default(),
                table.len()
            );
        }
    }
    debug!(filtered = bice_filtered, "inactive BICE rows filtered");

    let rows = reconcile_categories(&carga, &bice);
    let (matches, discrepancies) = split(rows);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let matches_path = args.out_dir.join("comparacion_coincidencias.csv");
    let discrepancies_path = args.out_dir.join("comparacion_inconsistencias.csv");
    write_csv(&matches_path, &matches)?;
    write_csv(&discrepancies_path, &discrepancies)?;

    let summary = RunSummary::new(
        &profile.id,
        carga.total(),
        bice.total(),
        carga.skipped(),
        bice.skipped(),
        &matches,
        &discrepancies,
    );

    match format {
        OutputFormat::Text => {
            print!("{}", summary.render_text());
            println!(
                "Archivos: {} / {}",
                matches_path.display(),
                discrepancies_path.display()
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => println!("{}", summary.render_tsv()),
    }

    Ok(())
}

/// Build the carga multisets per the profile's column spec.
fn build_carga(
    table: &Table,
    profile: &VariantProfile,
) -> anyhow::Result<CategorizedMultisets> {
    let spec = &profile.carga;
    let rut_candidates: Vec<&str> = spec.rut_columns.iter().map(String::as_str).collect();
    let rut_col = table.require_column(&rut_candidates)?;

    let dv_col = match &spec.dv_column {
        Some(name) => Some(table.require_column(&[name.as_str()])?),
        None => None,
    };
    let category_col = match &spec.category_column {
        Some(name) => Some(table.require_column(&[name.as_str()])?),
        None => None,
    };

    let records = table.rows().map(|row| {
        let rut = match dv_col {
            Some(dv) => normalize_rut(&combine_rut_dv(row.get(rut_col), row.get(dv))),
            None => normalize_rut(row.get(rut_col)),
        };
        let category = match category_col {
            Some(col) => spec.categorize(row.get(col)),
            None => None,
        };
        Record::new(rut, category)
    });

    Ok(CategorizedMultisets::from_records(records, "carga"))
}

/// Add one BICE extract to the multisets; returns how many inactive
/// rows the status filter dropped.
fn add_bice(
    sets: &mut CategorizedMultisets,
    table: &Table,
    profile: &VariantProfile,
    category: Option<&str>,
) -> anyhow::Result<usize> {
    let spec = &profile.bice;
    let rut_candidates: Vec<&str> = spec.rut_columns.iter().map(String::as_str).collect();
    let rut_col = table.require_column(&rut_candidates)?;

    let status_candidates: Vec<&str> = spec.status_columns.iter().map(String::as_str).collect();
    // Status column is optional: extracts that predate it count all rows.
    let status_col = table.find_column(&status_candidates);

    let mut filtered = 0usize;
    for row in table.rows() {
        let status = status_col.map(|col| row.get(col));
        if !row_counts(SourceKind::Bice, status) {
            filtered += 1;
            continue;
        }
        sets.add(category.map(str::to_string), &normalize_rut(row.get(rut_col)));
    }
    Ok(filtered)
}

/// Parse a `--bice` argument: `FILE` or `CATEGORY=FILE`.
fn parse_bice_spec<'a>(
    spec: &'a str,
    profile: &VariantProfile,
) -> anyhow::Result<(Option<String>, &'a str)> {
    let expects_categories = !profile.bice.categories.is_empty();

    match spec.split_once('=') {
        Some((category, path)) => {
            let category = category.trim().to_uppercase();
            if expects_categories && !profile.bice.categories.iter().any(|c| *c == category) {
                anyhow::bail!(
                    "profile '{}' does not define BICE category '{}' (expected: {})",
                    profile.id,
                    category,
                    profile.bice.categories.join(", ")
                );
            }
            Ok((Some(category), path))
        }
        None if expects_categories => anyhow::bail!(
            "profile '{}' splits BICE by category; label each file as CATEGORY=FILE (expected: {})",
            profile.id,
            profile.bice.categories.join(", ")
        ),
        None => Ok((None, spec)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pyme() -> VariantProfile {
        ProfileSet::load_embedded()
            .unwrap()
            .get("pyme")
            .unwrap()
            .clone()
    }

    fn sonda() -> VariantProfile {
        ProfileSet::load_embedded()
            .unwrap()
            .get("sonda")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_parse_bice_spec_labeled() {
        let (category, path) = parse_bice_spec("omg=/tmp/x.csv", &pyme()).unwrap();
        assert_eq!(category.as_deref(), Some("OMG"));
        assert_eq!(path, "/tmp/x.csv");
    }

    #[test]
    fn test_parse_bice_spec_unknown_category() {
        assert!(parse_bice_spec("SONDA=/tmp/x.csv", &pyme()).is_err());
    }

    #[test]
    fn test_parse_bice_spec_requires_label_for_categorized() {
        assert!(parse_bice_spec("/tmp/x.csv", &pyme()).is_err());
    }

    #[test]
    fn test_parse_bice_spec_plain() {
        let (category, path) = parse_bice_spec("/tmp/x.csv", &sonda()).unwrap();
        assert!(category.is_none());
        assert_eq!(path, "/tmp/x.csv");
    }

    #[test]
    fn test_build_carga_with_dv_column() {
        let table = Table::new(
            "carga.csv",
            vec![
                "RUT_ASEGURADO".to_string(),
                "DV_ASEGURADO".to_string(),
                "NOMBRE_CONTRATANTE".to_string(),
            ],
            vec![
                vec![
                    "20640480.0".to_string(),
                    "9.0".to_string(),
                    "OMD CHILE SPA".to_string(),
                ],
                vec![
                    "12345678".to_string(),
                    "K".to_string(),
                    "FERRETERIA LTDA".to_string(),
                ],
            ],
        );

        let sets = build_carga(&table, &pyme()).unwrap();
        assert_eq!(sets.get(Some("OMG")).unwrap().count("206404809"), 1);
        assert_eq!(sets.get(Some("PYME")).unwrap().count("12345678K"), 1);
    }

    #[test]
    fn test_add_bice_filters_inactive() {
        let table = Table::new(
            "bice.csv",
            vec!["RUT".to_string(), "Estado".to_string()],
            vec![
                vec!["111".to_string(), "VERDADERO".to_string()],
                vec!["222".to_string(), "FALSO".to_string()],
            ],
        );

        let mut sets = CategorizedMultisets::new();
        let filtered = add_bice(&mut sets, &table, &sonda(), None).unwrap();
        assert_eq!(filtered, 1);
        let set = sets.get(None).unwrap();
        assert_eq!(set.count("111"), 1);
        assert_eq!(set.count("222"), 0);
    }
}
