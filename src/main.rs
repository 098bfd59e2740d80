use bice_recon::cli::{self, Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("bice_recon=debug,info")
    } else {
        EnvFilter::new("bice_recon=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Reconcile(args) => {
            cli::reconcile::run(args, cli.format, cli.verbose)?;
        }
        Commands::Roster(args) => {
            cli::roster::run(args, cli.format, cli.verbose)?;
        }
        Commands::Profiles(args) => {
            cli::profiles::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
