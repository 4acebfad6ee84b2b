//! Kotlin client generation pipeline.
//!
//! The pipeline turns a parsed API description into a typed Kotlin client in
//! two sequential passes over the same input. The MODEL pass emits one data
//! class per model under `model/`; the API pass emits one Retrofit interface
//! per tag under `api/`. Between the passes the stage controller flips an
//! on-disk glob filter so each pass sees only its own namespace, and after
//! both passes a cleanup sweep removes the envelope-model files the MODEL
//! pass emitted before prefix stripping could fold them away.
//!
//! Module map:
//! - [`naming`]: stage-aware model-name normalization
//! - [`types`]: primitive mapping, return-type resolution, imports
//! - [`records`]: renderer-facing model and operation records
//! - [`operations`]: path, parameter and content-type post-processing
//! - [`stage`]: the two-pass driver and the exclusion filter
//! - [`cleanup`]: post-run sweep of stray envelope models
//! - [`render`]: the renderer seam and the built-in tera implementation

pub mod cleanup;
pub mod naming;
pub mod operations;
pub mod records;
pub mod render;
pub mod stage;
pub mod types;

use std::path::Path;

use tracing::info;

use crate::error::GenError;
use crate::spec::ApiSpec;

pub use cleanup::CleanupReport;
pub use render::{RenderContext, Renderer, TeraRenderer};
pub use stage::Stage;

/// Parse an API description and generate the full client into `out_dir`.
pub fn generate(
    json: &str,
    out_dir: &Path,
    renderer: &dyn Renderer,
) -> Result<CleanupReport, GenError> {
    let spec = ApiSpec::from_json(json)?;
    info!(
        models = spec.models.len(),
        operations = spec.operations.len(),
        out_dir = %out_dir.display(),
        "starting client generation"
    );
    stage::run(&spec, out_dir, renderer)
}
