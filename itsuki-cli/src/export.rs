//! Export command implementation for the Itsuki CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use itsuki_core::{OwnerId, SqlitePlanStore};
use itsuki_service::{NullDirectory, PlanService};

use crate::{ARG_EXPORT_PLANS_DB, CliError, ENV_EXPORT_PLANS_DB};

/// Output format for the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum FormatArg {
    /// Pretty-printed JSON document.
    #[default]
    Json,
    /// One CSV row per plan item.
    Csv,
}

/// CLI arguments for the `export` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Export stored plans from a SQLite plan store. JSON keeps \
                 item payloads verbatim; CSV flattens to one row per plan \
                 item with metadata serialized inline. Owner contact details \
                 are left blank offline.",
    about = "Export stored plans as JSON or CSV"
)]
#[ortho_config(prefix = "ITSUKI")]
pub(crate) struct ExportArgs {
    /// Path to the SQLite plan store.
    #[arg(long = ARG_EXPORT_PLANS_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) plans_db: Option<Utf8PathBuf>,
    /// Output format.
    #[arg(long, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<FormatArg>,
    /// Restrict the export to a single owner id.
    #[arg(long, value_name = "id")]
    #[serde(default)]
    pub(crate) owner: Option<String>,
}

/// Resolved `export` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ExportConfig {
    plans_db: Utf8PathBuf,
    format: FormatArg,
    owner: Option<OwnerId>,
}

impl ExportArgs {
    fn into_config(self) -> Result<ExportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        let plans_db = merged.plans_db.ok_or(CliError::MissingArgument {
            field: ARG_EXPORT_PLANS_DB,
            env: ENV_EXPORT_PLANS_DB,
        })?;
        Ok(ExportConfig {
            plans_db,
            format: merged.format.unwrap_or_default(),
            owner: merged.owner.map(OwnerId::new),
        })
    }
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_export_with(args, &mut stdout)
}

fn run_export_with(args: ExportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let store = SqlitePlanStore::open(config.plans_db.as_std_path())?;
    let service = PlanService::new(store);
    let rendered = match config.format {
        FormatArg::Json => service.export_plans_json(config.owner.as_ref(), &NullDirectory)?,
        FormatArg::Csv => service.export_plans_csv(config.owner.as_ref(), &NullDirectory)?,
    };
    writer
        .write_all(rendered.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
