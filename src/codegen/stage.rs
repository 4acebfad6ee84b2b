//! Two-pass generation driver.
//!
//! A single unified pass cannot work: model emission needs raw-name
//! normalization while operation return types need envelope-prefix stripping,
//! and the two rules collide on the same names. The controller therefore runs
//! the shared generation routine twice, once with only the model namespace
//! visible and once with only the api namespace visible, flipping a glob
//! exclusion filter on disk between the passes. The stage value is threaded
//! explicitly through every call; there is no process-wide flag.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::GenError;
use crate::spec::ApiSpec;

use super::cleanup::{self, CleanupReport};
use super::operations::post_process;
use super::records::{build_model_records, build_operation_records};
use super::render::{RenderContext, Renderer};

/// Name of the exclusion filter file in the output root. Overwritten, never
/// appended, before each pass.
pub const IGNORE_FILE: &str = ".codegen-ignore";

/// Directory the renderer writes model classes into.
pub const MODEL_DIR: &str = "model";
/// Directory the renderer writes api interfaces into.
pub const API_DIR: &str = "api";

/// Generation stage. Read by the name normalizer to select which rules apply;
/// set once per pass, never mid-pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Model,
    Api,
}

impl Stage {
    /// Glob pattern hiding the *other* namespace from the renderer during
    /// this stage.
    pub fn ignore_pattern(self) -> String {
        match self {
            Stage::Model => format!("**/{API_DIR}/*"),
            Stage::Api => format!("**/{MODEL_DIR}/*"),
        }
    }
}

/// Run the full pipeline: recreate the output directory, generate in two
/// sequential passes, then sweep stray envelope-model files.
///
/// A renderer failure aborts immediately; partial output is left on disk for
/// diagnosis, and the cleanup pass does not run.
pub fn run(spec: &ApiSpec, out_dir: &Path, renderer: &dyn Renderer) -> Result<CleanupReport, GenError> {
    recreate_dir(out_dir)?;

    for stage in [Stage::Model, Stage::Api] {
        run_stage(spec, out_dir, renderer, stage)?;
    }

    let report = cleanup::remove_envelope_models(&out_dir.join(MODEL_DIR));
    info!(
        deleted = report.deleted,
        failed = report.failed.len(),
        "envelope cleanup finished"
    );
    Ok(report)
}

fn run_stage(
    spec: &ApiSpec,
    out_dir: &Path,
    renderer: &dyn Renderer,
    stage: Stage,
) -> Result<(), GenError> {
    info!(?stage, "starting generation pass");

    // Records are rebuilt from the IR for every pass; nothing survives from
    // the previous stage except the files already on disk.
    let models = build_model_records(spec, stage)?;
    let operations = post_process(build_operation_records(spec)?);

    let ignore = stage.ignore_pattern();
    let filter_path = out_dir.join(IGNORE_FILE);
    fs::write(&filter_path, &ignore).map_err(|e| GenError::io(&filter_path, e))?;

    renderer.render(
        &RenderContext {
            models: &models,
            operations: &operations,
            stage,
            ignore: &ignore,
        },
        out_dir,
    )
}

fn recreate_dir(dir: &Path) -> Result<(), GenError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(GenError::io(dir, e)),
    }
    fs::create_dir_all(dir).map_err(|e| GenError::io(dir, e))
}
