//! Command-line interface for the Itsuki trip-planning engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod export;
mod optimize;

pub use error::CliError;

pub(crate) const ARG_OPTIMIZE_PLAN: &str = "plan";
pub(crate) const ENV_OPTIMIZE_PLAN: &str = "ITSUKI_CMDS_OPTIMIZE_PLAN";
pub(crate) const ARG_EXPORT_PLANS_DB: &str = "plans-db";
pub(crate) const ENV_EXPORT_PLANS_DB: &str = "ITSUKI_CMDS_EXPORT_PLANS_DB";

/// Run the Itsuki CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Optimize(args) => optimize::run_optimize(args),
        Command::Export(args) => export::run_export(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "itsuki",
    about = "Trip-planning utilities for the Itsuki engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Optimise the visiting order of a plan file.
    Optimize(optimize::OptimizeArgs),
    /// Export stored plans as JSON or CSV.
    Export(export::ExportArgs),
}
