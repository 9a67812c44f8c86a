//! parcelgen command-line tool
//!
//! Runs the `@ParcelField` processor over a declaration model and writes the
//! generated companion classes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "parcelgen")]
#[command(about = "Parcel marshalling code generator for @ParcelField", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one processing round and write the generated sources
    Process {
        /// Declaration model (JSON)
        model: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "generated")]
        out_dir: PathBuf,
        /// Configuration file (defaults to the nearest parcelgen.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Diagnostic format
        #[arg(long, default_value = "pretty", value_parser = ["pretty", "json"])]
        format: String,
        /// Colored output
        #[arg(long, value_parser = ["auto", "always", "never"])]
        color: Option<String>,
    },

    /// Validate and classify without writing anything
    Check {
        /// Declaration model (JSON)
        model: PathBuf,
        /// Configuration file (defaults to the nearest parcelgen.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Diagnostic format
        #[arg(long, default_value = "pretty", value_parser = ["pretty", "json"])]
        format: String,
        /// Colored output
        #[arg(long, value_parser = ["auto", "always", "never"])]
        color: Option<String>,
    },

    /// Show whether a declared type is a structural subtype of a target
    Inspect {
        /// Declaration model (JSON)
        model: PathBuf,
        /// Qualified name of the declaration to inspect
        ty: String,
        /// Qualified name of the supertype to test against
        target: String,
        /// Colored output
        #[arg(long, value_parser = ["auto", "always", "never"])]
        color: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parcelgen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let report = match cli.command {
        Commands::Process {
            model,
            out_dir,
            config,
            format,
            color,
        } => commands::process::execute(model, out_dir, config, format, color)?,

        Commands::Check {
            model,
            config,
            format,
            color,
        } => commands::check::execute(model, config, format, color)?,

        Commands::Inspect {
            model,
            ty,
            target,
            color,
        } => {
            commands::inspect::execute(model, ty, target, color)?;
            return Ok(());
        }
    };

    if report.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}
