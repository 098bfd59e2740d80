use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::profile::ProfileSet;

#[derive(Args)]
pub struct ProfilesArgs {
    /// Show the full definition of one profile
    #[arg(long)]
    pub show: Option<String>,

    /// Path to a custom profile JSON file
    #[arg(long)]
    pub profile_file: Option<PathBuf>,
}

pub fn run(args: ProfilesArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let profiles = match &args.profile_file {
        Some(path) => ProfileSet::load_from_file(path)
            .with_context(|| format!("loading profiles from {}", path.display()))?,
        None => ProfileSet::load_embedded()?,
    };

    if let Some(id) = &args.show {
        let profile = profiles.get(id)?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(profile)?),
            _ => {
                println!("{} - {}", profile.id, profile.display_name);
                println!("  Carga RUT: {}", profile.carga.rut_columns.join(" / "));
                if let Some(dv) = &profile.carga.dv_column {
                    println!("  Carga DV: {dv}");
                }
                if let Some(col) = &profile.carga.category_column {
                    println!("  Categoria por: {col}");
                    for rule in &profile.carga.category_rules {
                        println!(
                            "    {} <- {}",
                            rule.category,
                            rule.company_contains.join(", ")
                        );
                    }
                    if let Some(default) = &profile.carga.default_category {
                        println!("    {default} <- (resto)");
                    }
                }
                println!("  BICE RUT: {}", profile.bice.rut_columns.join(" / "));
                println!("  BICE estado: {}", profile.bice.status_columns.join(" / "));
                if !profile.bice.categories.is_empty() {
                    println!("  BICE archivos: {}", profile.bice.categories.join(", "));
                }
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profiles)?),
        _ => {
            println!("Perfiles disponibles ({}):", profiles.len());
            for profile in &profiles.profiles {
                println!("  {:12} {}", profile.id, profile.display_name);
            }
        }
    }

    Ok(())
}
