//! Rendering boundary.
//!
//! The pipeline hands finished records to a [`Renderer`] and treats it as a
//! black box: deterministic for identical records and identical visibility
//! filter. [`TeraRenderer`] is the built-in implementation: embedded tera
//! templates producing gson data classes and Retrofit/RxJava interfaces,
//! matching the shape of the hand-written client it replaces.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tera::Tera;
use tracing::{debug, info};

use crate::error::GenError;

use super::records::{ModelRecord, OperationRecord};
use super::stage::{Stage, API_DIR, MODEL_DIR};
use super::types::{API_PACKAGE, MODEL_PACKAGE};

/// Everything a renderer sees for one pass.
#[derive(Debug)]
pub struct RenderContext<'a> {
    pub models: &'a [ModelRecord],
    pub operations: &'a [OperationRecord],
    pub stage: Stage,
    /// Active exclusion pattern, `**/<namespace>/*`. The same value is on
    /// disk in the ignore file; it is passed here so a renderer does not have
    /// to read it back.
    pub ignore: &'a str,
}

/// External collaborator that turns records into source files.
pub trait Renderer {
    fn render(&self, ctx: &RenderContext<'_>, out_dir: &Path) -> Result<(), GenError>;
}

const MODEL_TEMPLATE: &str = "model.kt";
const API_TEMPLATE: &str = "api.kt";

/// Tera-backed Kotlin renderer.
#[derive(Debug)]
pub struct TeraRenderer {
    tera: Tera,
    model_package: String,
    api_package: String,
}

impl TeraRenderer {
    pub fn new() -> Result<Self, GenError> {
        Self::with_args(&[])
    }

    /// Build a renderer, applying `key=value` pass-through arguments.
    /// Recognized keys: `model_package`, `api_package`. Unknown keys are
    /// ignored; they may belong to another renderer implementation.
    pub fn with_args(args: &[String]) -> Result<Self, GenError> {
        let mut tera = Tera::default();
        tera.add_raw_templates([
            (MODEL_TEMPLATE, include_str!("../../templates/model.kt.tera")),
            (API_TEMPLATE, include_str!("../../templates/api.kt.tera")),
        ])?;

        let mut model_package = MODEL_PACKAGE.to_string();
        let mut api_package = API_PACKAGE.to_string();
        for arg in args {
            match arg.split_once('=') {
                Some(("model_package", v)) => model_package = v.to_string(),
                Some(("api_package", v)) => api_package = v.to_string(),
                _ => debug!(arg = %arg, "ignoring unrecognized renderer argument"),
            }
        }

        Ok(TeraRenderer {
            tera,
            model_package,
            api_package,
        })
    }

    fn render_models(&self, ctx: &RenderContext<'_>, out_dir: &Path) -> Result<usize, GenError> {
        let mut written = 0;
        for model in ctx.models {
            let rel = format!("{MODEL_DIR}/{}.kt", model.effective_name);
            if is_excluded(ctx.ignore, &rel) {
                continue;
            }

            let mut context = tera::Context::new();
            context.insert("model_package", &self.model_package);
            context.insert("model", model);
            let source = self.tera.render(MODEL_TEMPLATE, &context)?;
            write_file(&out_dir.join(&rel), &source)?;
            written += 1;
        }
        Ok(written)
    }

    fn render_apis(&self, ctx: &RenderContext<'_>, out_dir: &Path) -> Result<usize, GenError> {
        let mut written = 0;
        for (tag, operations) in group_by_tag(ctx.operations) {
            let rel = format!("{API_DIR}/{tag}Api.kt");
            if is_excluded(ctx.ignore, &rel) {
                continue;
            }

            let imports: BTreeSet<&String> =
                operations.iter().flat_map(|op| &op.imports).collect();

            let mut context = tera::Context::new();
            context.insert("api_package", &self.api_package);
            context.insert("tag", &tag);
            context.insert("imports", &imports);
            context.insert("operations", &operations);
            let source = self.tera.render(API_TEMPLATE, &context)?;
            write_file(&out_dir.join(&rel), &source)?;
            written += 1;
        }
        Ok(written)
    }
}

impl Renderer for TeraRenderer {
    fn render(&self, ctx: &RenderContext<'_>, out_dir: &Path) -> Result<(), GenError> {
        let models = self.render_models(ctx, out_dir)?;
        let apis = self.render_apis(ctx, out_dir)?;
        info!(?ctx.stage, models, apis, "render pass complete");
        Ok(())
    }
}

/// Group operations by tag, preserving first-seen tag order and source order
/// within each group.
fn group_by_tag(operations: &[OperationRecord]) -> Vec<(String, Vec<&OperationRecord>)> {
    let mut groups: Vec<(String, Vec<&OperationRecord>)> = Vec::new();
    for op in operations {
        match groups.iter_mut().find(|(tag, _)| *tag == op.tag) {
            Some((_, ops)) => ops.push(op),
            None => groups.push((op.tag.clone(), vec![op])),
        }
    }
    groups
}

/// Match the `**/<namespace>/*` exclusion shape the stage controller writes.
/// Anything else never excludes; an unknown pattern must not hide output.
fn is_excluded(pattern: &str, rel_path: &str) -> bool {
    let Some(namespace) = pattern
        .strip_prefix("**/")
        .and_then(|p| p.strip_suffix("/*"))
    else {
        return false;
    };
    rel_path.starts_with(&format!("{namespace}/"))
}

fn write_file(path: &Path, content: &str) -> Result<(), GenError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| GenError::io(path, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::codegen::records::{ParamKind, ParameterRecord, PropertyRecord};
    use std::collections::BTreeSet;

    fn model(effective_name: &str) -> ModelRecord {
        ModelRecord {
            name: effective_name.to_string(),
            effective_name: effective_name.to_string(),
            properties: vec![
                PropertyRecord {
                    name: "email".to_string(),
                    ty: "String".to_string(),
                    required: true,
                    nullable: false,
                },
                PropertyRecord {
                    name: "rememberMe".to_string(),
                    ty: "Boolean".to_string(),
                    required: false,
                    nullable: false,
                },
            ],
            parent_name: None,
            imports: BTreeSet::new(),
        }
    }

    fn operation(id: &str, tag: &str) -> OperationRecord {
        OperationRecord {
            http_method: "GET".to_string(),
            raw_path: "/Pet/Get".to_string(),
            path: "Pet/Get".to_string(),
            parameters: vec![ParameterRecord {
                name: "id".to_string(),
                kind: ParamKind::Path,
                ty: "String".to_string(),
                required: true,
            }],
            return_type: Some("PetAPIModel".to_string()),
            consumes: Vec::new(),
            is_multipart: false,
            operation_id: id.to_string(),
            tag: tag.to_string(),
            imports: ["cz.synetech.app.data.model.PetAPIModel".to_string()].into(),
        }
    }

    #[test]
    fn test_is_excluded() {
        assert!(is_excluded("**/api/*", "api/PetApi.kt"));
        assert!(!is_excluded("**/api/*", "model/Pet.kt"));
        assert!(is_excluded("**/model/*", "model/Pet.kt"));
        assert!(!is_excluded("garbage", "model/Pet.kt"));
    }

    #[test]
    fn test_model_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = TeraRenderer::new().unwrap();
        let models = vec![model("LoginRequestModel")];
        let ctx = RenderContext {
            models: &models,
            operations: &[],
            stage: Stage::Model,
            ignore: "**/api/*",
        };

        renderer.render(&ctx, dir.path()).unwrap();

        let source =
            fs::read_to_string(dir.path().join("model/LoginRequestModel.kt")).unwrap();
        assert!(source.contains("package cz.synetech.app.data.model"));
        assert!(source.contains("data class LoginRequestModel("));
        assert!(source.contains("@SerializedName(\"email\") val email: String"));
        // Optional property becomes nullable.
        assert!(source.contains("@SerializedName(\"rememberMe\") val rememberMe: Boolean?"));
    }

    #[test]
    fn test_api_rendering_and_model_exclusion() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = TeraRenderer::new().unwrap();
        let models = vec![model("LoginRequestModel")];
        let operations = vec![operation("getPetGet", "Pet")];
        let ctx = RenderContext {
            models: &models,
            operations: &operations,
            stage: Stage::Api,
            ignore: "**/model/*",
        };

        renderer.render(&ctx, dir.path()).unwrap();

        // The model namespace is hidden during the API stage.
        assert!(!dir.path().join("model/LoginRequestModel.kt").exists());

        let source = fs::read_to_string(dir.path().join("api/PetApi.kt")).unwrap();
        assert!(source.contains("package cz.synetech.app.data.api"));
        assert!(source.contains("interface PetApi {"));
        assert!(source.contains("@GET(\"Pet/Get\")"));
        assert!(source.contains("fun getPetGet("));
        assert!(source.contains("@Path(\"id\") id: String"));
        assert!(source.contains(": Single<PetAPIModel>"));
        assert!(source.contains("import cz.synetech.app.data.model.PetAPIModel"));
    }

    #[test]
    fn test_unresolved_return_type_renders_as_unit() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = TeraRenderer::new().unwrap();
        let mut op = operation("getGhost", "Ghost");
        op.return_type = None;
        op.imports.clear();
        let operations = vec![op];
        let ctx = RenderContext {
            models: &[],
            operations: &operations,
            stage: Stage::Api,
            ignore: "**/model/*",
        };

        renderer.render(&ctx, dir.path()).unwrap();
        let source = fs::read_to_string(dir.path().join("api/GhostApi.kt")).unwrap();
        assert!(source.contains(": Single<Unit>"));
    }

    #[test]
    fn test_multipart_annotation() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = TeraRenderer::new().unwrap();
        let mut op = operation("postUpload", "Upload");
        op.is_multipart = true;
        op.http_method = "POST".to_string();
        let operations = vec![op];
        let ctx = RenderContext {
            models: &[],
            operations: &operations,
            stage: Stage::Api,
            ignore: "**/model/*",
        };

        renderer.render(&ctx, dir.path()).unwrap();
        let source = fs::read_to_string(dir.path().join("api/UploadApi.kt")).unwrap();
        assert!(source.contains("@Multipart"));
        assert!(source.contains("@POST(\"Pet/Get\")"));
    }

    #[test]
    fn test_package_override_args() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = TeraRenderer::with_args(&[
            "model_package=com.acme.model".to_string(),
            "unknown=whatever".to_string(),
        ])
        .unwrap();
        let models = vec![model("PetAPIModel")];
        let ctx = RenderContext {
            models: &models,
            operations: &[],
            stage: Stage::Model,
            ignore: "**/api/*",
        };

        renderer.render(&ctx, dir.path()).unwrap();
        let source = fs::read_to_string(dir.path().join("model/PetAPIModel.kt")).unwrap();
        assert!(source.contains("package com.acme.model"));
    }

    #[test]
    fn test_operations_grouped_by_tag() {
        let ops = vec![
            operation("a", "Pet"),
            operation("b", "User"),
            operation("c", "Pet"),
        ];
        let groups = group_by_tag(&ops);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Pet");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "User");
    }
}
