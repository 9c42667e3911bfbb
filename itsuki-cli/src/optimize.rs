//! Optimize command implementation for the Itsuki CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use clap::ValueEnum;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use itsuki_core::{PlanItem, RouteOptimizer, RouteResult, TravelMode, TravelSettings};
use itsuki_optimizer_nn::NearestNeighbourOptimizer;

use crate::{ARG_OPTIMIZE_PLAN, CliError, ENV_OPTIMIZE_PLAN};

/// Travel mode accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ModeArg {
    /// Passenger car.
    Car,
    /// Motorcycle.
    Motorcycle,
}

impl From<ModeArg> for TravelMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Car => Self::Car,
            ModeArg::Motorcycle => Self::Motorcycle,
        }
    }
}

/// CLI arguments for the `optimize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Optimise a plan's visiting order with the nearest-neighbour \
                 heuristic. The plan is provided as a JSON file holding either \
                 an array of items or an object with an `items` array; stops \
                 without coordinates are left out of the tour. The result is \
                 a straight-line approximation, not road-network routing.",
    about = "Optimise the visiting order of a plan"
)]
#[ortho_config(prefix = "ITSUKI")]
pub(crate) struct OptimizeArgs {
    /// Path to a JSON file containing plan items.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) plan_path: Option<Utf8PathBuf>,
    /// Travel mode used for the time estimate.
    #[arg(long, value_enum)]
    #[serde(default)]
    pub(crate) mode: Option<ModeArg>,
    /// Assume toll roads are avoided (slower average speed).
    #[arg(long)]
    #[serde(default)]
    pub(crate) avoid_tolls: bool,
}

impl OptimizeArgs {
    fn into_config(self) -> Result<OptimizeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        let plan_path = merged.plan_path.ok_or(CliError::MissingArgument {
            field: ARG_OPTIMIZE_PLAN,
            env: ENV_OPTIMIZE_PLAN,
        })?;
        let settings = TravelSettings {
            mode: merged.mode.map_or_else(TravelMode::default, Into::into),
            avoid_tolls: merged.avoid_tolls,
        };
        Ok(OptimizeConfig {
            plan_path,
            settings,
        })
    }
}

/// Resolved `optimize` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OptimizeConfig {
    plan_path: Utf8PathBuf,
    settings: TravelSettings,
}

pub(crate) fn run_optimize(args: OptimizeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_optimize_with(args, &mut stdout)
}

fn run_optimize_with(args: OptimizeArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let items = load_plan_items(&config.plan_path)?;
    let result = NearestNeighbourOptimizer.optimize(&items, config.settings)?;
    write_route_result(writer, &result)
}

/// Loads and sanitises plan items from a JSON file.
///
/// Accepts both a bare item array and an object wrapping one under
/// `items`, matching the plan upsert body. Unparseable items are dropped
/// silently, exactly as the write boundary would.
fn load_plan_items(path: &Utf8Path) -> Result<Vec<PlanItem>, CliError> {
    let payload = std::fs::read_to_string(path).map_err(|source| CliError::OpenPlan {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&payload).map_err(|source| CliError::ParsePlan {
        path: path.to_path_buf(),
        source,
    })?;
    let raw_items = match &document {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(fields) => fields
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| CliError::InvalidPlanShape {
                path: path.to_path_buf(),
            })?,
        _ => {
            return Err(CliError::InvalidPlanShape {
                path: path.to_path_buf(),
            });
        }
    };
    Ok(raw_items.iter().filter_map(PlanItem::sanitise).collect())
}

fn write_route_result(writer: &mut dyn Write, result: &RouteResult) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(result).map_err(CliError::SerialiseRoute)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    fn write_plan(dir: &Path, payload: &str) -> Utf8PathBuf {
        let path = dir.join("plan.json");
        std::fs::write(&path, payload).expect("write plan file");
        Utf8PathBuf::from_path_buf(path).expect("utf-8 path")
    }

    #[rstest]
    fn loads_a_bare_item_array() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_plan(dir.path(), r#"[{"id": "a"}, {"title": "no id"}]"#);
        let items = load_plan_items(&path).expect("load");
        assert_eq!(items.len(), 1);
    }

    #[rstest]
    fn loads_a_wrapped_item_array() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_plan(dir.path(), r#"{"items": [{"id": "a"}, {"id": "b"}]}"#);
        let items = load_plan_items(&path).expect("load");
        assert_eq!(items.len(), 2);
    }

    #[rstest]
    #[case(r#""just a string""#)]
    #[case(r#"{"no_items": []}"#)]
    fn rejects_other_document_shapes(#[case] payload: &str) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_plan(dir.path(), payload);
        let error = load_plan_items(&path).expect_err("invalid shape");
        assert!(matches!(error, CliError::InvalidPlanShape { .. }));
    }

    #[rstest]
    fn optimize_writes_route_json() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_plan(
            dir.path(),
            r#"[
                {"id": "a", "location": {"lat": 35.0, "lng": 139.0}},
                {"id": "b", "location": {"lat": 34.0, "lng": 138.0}}
            ]"#,
        );
        let args = OptimizeArgs {
            plan_path: Some(path),
            mode: Some(ModeArg::Car),
            avoid_tolls: false,
        };
        let mut output = Vec::new();
        run_optimize_with(args, &mut output).expect("optimize");
        let parsed: Value = serde_json::from_slice(&output).expect("valid JSON");
        assert_eq!(
            parsed["ordered_items"].as_array().map(Vec::len),
            Some(2)
        );
        assert!(parsed["total_distance_km"].as_f64().unwrap() > 0.0);
    }
}
