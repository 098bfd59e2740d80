use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::core::normalize::{combine_surnames, normalize_email, normalize_rut, title_case};
use crate::parsing::csv::read_file;
use crate::parsing::portal::{write_portal_rows, write_rut_list};
use crate::parsing::table::Table;
use crate::roster::sync::{plan, MemberRow, RosterPlan, UserRow};

/// Column candidates in the Base Asegurados sheets.
const COL_RUT: &[&str] = &["rut_pagador", "rut"];
const COL_NOMBRE: &[&str] = &["nombre_pagador", "nombre"];
const COL_AP_PATERNO: &[&str] = &["apellidopat_pagador", "apellido_paterno", "paterno"];
const COL_AP_MATERNO: &[&str] = &["apellidomat_pagador", "apellido_materno", "materno"];
const COL_EMAIL: &[&str] = &["titular_email", "email"];

/// Column candidates in the current users export.
const COL_USER_RUT: &[&str] = &["RUT"];
const COL_USER_EMAIL: &[&str] = &["Email"];
const COL_USER_ESTADO: &[&str] = &["Estado"];

#[derive(Args)]
pub struct RosterArgs {
    /// "Activos" reference sheet (CSV)
    #[arg(long, required = true)]
    pub activos: PathBuf,

    /// "Inactivos" reference sheet (CSV)
    #[arg(long, required = true)]
    pub inactivos: PathBuf,

    /// Current users export from the target system (CSV)
    #[arg(long, required = true)]
    pub users: PathBuf,

    /// Directory for the upload lists
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Field delimiter of the input files
    #[arg(long, default_value = ",")]
    pub delimiter: char,
}

pub fn run(args: RosterArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let delimiter = u8::try_from(args.delimiter as u32).context("delimiter must be ASCII")?;

    let activos_table = read_file(&args.activos, delimiter)
        .with_context(|| format!("reading Activos sheet {}", args.activos.display()))?;
    let inactivos_table = read_file(&args.inactivos, delimiter)
        .with_context(|| format!("reading Inactivos sheet {}", args.inactivos.display()))?;
    let users_table = read_file(&args.users, delimiter)
        .with_context(|| format!("reading users export {}", args.users.display()))?;

    let activos = read_members(&activos_table)?;
    let inactivos = read_members(&inactivos_table)?;
    let users = read_users(&users_table)?;

    if verbose {
        eprintln!(
            "Activos: {} rows, Inactivos: {} rows, users: {} ({} active)",
            activos.len(),
            inactivos.len(),
            users.len(),
            users.iter().filter(|u| u.active).count()
        );
    }

    let plan = plan(&activos, &inactivos, &users);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let written = write_outputs(&plan, &args.out_dir)?;

    match format {
        OutputFormat::Text => {
            println!("Resumen roster ResPets");
            println!("{}", "=".repeat(60));
            println!("Altas: {}", plan.altas.len());
            println!("Altas sin email (error): {}", plan.altas_sin_email.len());
            println!("Activos fuera de la base: {}", plan.orphan_active.len());
            println!("Bajas (hoja Inactivos): {}", plan.bajas.len());
            println!("Total unico de bajas: {}", plan.total_bajas());
            for path in &written {
                println!("  -> {}", path.display());
            }
            if written.is_empty() {
                println!("Sin cambios: no se generaron archivos");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Tsv => {
            println!("altas\taltas_sin_email\torphan_active\tbajas\ttotal_bajas");
            println!(
                "{}\t{}\t{}\t{}\t{}",
                plan.altas.len(),
                plan.altas_sin_email.len(),
                plan.orphan_active.len(),
                plan.bajas.len(),
                plan.total_bajas()
            );
        }
    }

    Ok(())
}

fn read_members(table: &Table) -> anyhow::Result<Vec<MemberRow>> {
    let rut_col = table.require_column(COL_RUT)?;
    let nombre_col = table.find_column(COL_NOMBRE);
    let paterno_col = table.find_column(COL_AP_PATERNO);
    let materno_col = table.find_column(COL_AP_MATERNO);
    let email_col = table.find_column(COL_EMAIL);

    Ok(table
        .rows()
        .map(|row| MemberRow {
            rut: normalize_rut(row.get(rut_col)),
            nombre: title_case(row.get_opt(nombre_col)),
            apellido: title_case(&combine_surnames(
                row.get_opt(paterno_col),
                row.get_opt(materno_col),
            )),
            email: normalize_email(row.get_opt(email_col)),
        })
        .collect())
}

fn read_users(table: &Table) -> anyhow::Result<Vec<UserRow>> {
    let rut_col = table.require_column(COL_USER_RUT)?;
    let estado_col = table.require_column(COL_USER_ESTADO)?;
    let email_col = table.find_column(COL_USER_EMAIL);

    Ok(table
        .rows()
        .map(|row| UserRow {
            rut: normalize_rut(row.get(rut_col)),
            email: normalize_email(row.get_opt(email_col)),
            active: crate::core::record::is_truthy_status(row.get(estado_col)),
        })
        .collect())
}

/// Write the non-empty output lists; returns the paths written.
fn write_outputs(plan: &RosterPlan, out_dir: &std::path::Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if !plan.altas.is_empty() {
        let path = out_dir.join("altas_respets_activacion.csv");
        let rows: Vec<Vec<String>> = plan
            .altas
            .iter()
            .map(|a| {
                vec![
                    a.nombre.clone(),
                    a.apellido.clone(),
                    a.email.clone(),
                    a.rut.clone(),
                ]
            })
            .collect();
        write_portal_rows(&path, &["Nombre", "Apellido", "Email", "RUT"], &rows)?;
        written.push(path);
    }

    if !plan.altas_sin_email.is_empty() {
        let path = out_dir.join("error_altas_sin_email.csv");
        let rows: Vec<Vec<String>> = plan
            .altas_sin_email
            .iter()
            .map(|a| {
                vec![
                    a.nombre.clone(),
                    a.apellido.clone(),
                    a.email.clone(),
                    a.rut.clone(),
                ]
            })
            .collect();
        write_portal_rows(&path, &["Nombre", "Apellido", "Email", "RUT"], &rows)?;
        written.push(path);
    }

    if !plan.orphan_active.is_empty() {
        let path = out_dir.join("bajas_respets_no_en_base.csv");
        write_rut_list(&path, &plan.orphan_active)?;
        written.push(path);
    }

    if !plan.bajas.is_empty() {
        let path = out_dir.join("bajas_respets_desactivacion.csv");
        write_rut_list(&path, &plan.bajas)?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_members_combines_surnames() {
        let table = Table::new(
            "activos.csv",
            vec![
                "rut_pagador".to_string(),
                "nombre_pagador".to_string(),
                "apellidopat_pagador".to_string(),
                "apellidomat_pagador".to_string(),
                "titular_email".to_string(),
            ],
            vec![vec![
                "12.345.678-9".to_string(),
                "Ana".to_string(),
                "Perez".to_string(),
                "Soto".to_string(),
                " ANA@X.COM ".to_string(),
            ]],
        );

        let members = read_members(&table).unwrap();
        assert_eq!(members[0].rut, "123456789");
        assert_eq!(members[0].apellido, "Perez Soto");
        assert_eq!(members[0].email, "ana@x.com");
    }

    #[test]
    fn test_read_users_status() {
        let table = Table::new(
            "users.csv",
            vec![
                "RUT".to_string(),
                "Email".to_string(),
                "Estado".to_string(),
            ],
            vec![
                vec![
                    "111".to_string(),
                    "a@x.com".to_string(),
                    "VERDADERO".to_string(),
                ],
                vec!["222".to_string(), "b@x.com".to_string(), "FALSO".to_string()],
            ],
        );

        let users = read_users(&table).unwrap();
        assert!(users[0].active);
        assert!(!users[1].active);
    }
}
