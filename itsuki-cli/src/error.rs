//! Error types emitted by the Itsuki CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use itsuki_core::{OptimizeError, SqlitePlanStoreError};
use itsuki_service::ServiceError;
use thiserror::Error;

/// Errors emitted by the Itsuki CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing argument.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The plan file could not be opened.
    #[error("failed to open plan file {path}: {source}")]
    OpenPlan {
        /// Location of the plan file.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The plan file held unparseable JSON.
    #[error("failed to parse plan file {path}: {source}")]
    ParsePlan {
        /// Location of the plan file.
        path: Utf8PathBuf,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The plan file parsed but was neither an item array nor an object
    /// with an `items` array.
    #[error("plan file {path} must be a JSON array of items or {{\"items\": [...]}}")]
    InvalidPlanShape {
        /// Location of the plan file.
        path: Utf8PathBuf,
    },
    /// The optimizer rejected the stop list.
    #[error(transparent)]
    Optimize(#[from] OptimizeError),
    /// Opening the SQLite plan store failed.
    #[error(transparent)]
    OpenStore(#[from] SqlitePlanStoreError),
    /// An export operation failed.
    #[error(transparent)]
    Export(#[from] ServiceError),
    /// The route result could not be serialised.
    #[error("failed to serialise route result: {0}")]
    SerialiseRoute(#[source] serde_json::Error),
    /// Writing to the output stream failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
