//! Per-model and per-operation records handed to the renderer.
//!
//! Records are built fresh from the IR at the start of every generation pass
//! and never mutated after hand-off. Model naming depends on the active stage;
//! operation return types always resolve under API-stage naming, which is the
//! reason the two passes exist at all.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::error::GenError;
use crate::spec::{ApiSpec, ModelDef, OperationDef};

use super::naming::{normalize_model_name, strip_illegal_chars};
use super::operations::derive_operation_id;
use super::stage::Stage;
use super::types::{
    collect_imports, has_import_mapping, referenced_symbols, resolve_field_type,
    resolve_return_type,
};

/// A data model ready for templating.
#[derive(Debug, Clone, Serialize)]
pub struct ModelRecord {
    /// Raw spec identifier.
    pub name: String,
    /// Normalized class name, unique within the emitted set.
    pub effective_name: String,
    pub properties: Vec<PropertyRecord>,
    /// Inheritance is disabled for this client; always `None`.
    pub parent_name: Option<String>,
    /// Import lines required by the emitted class.
    pub imports: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub required: bool,
    pub nullable: bool,
}

/// An operation ready for templating.
#[derive(Debug, Clone, Serialize)]
pub struct OperationRecord {
    pub http_method: String,
    /// Path template as declared in the input description.
    pub raw_path: String,
    /// Path with the leading separator stripped (filled by post-processing).
    pub path: String,
    pub parameters: Vec<ParameterRecord>,
    /// Effective, envelope-unwrapped return type. `None` means "no typed
    /// response" and is not an error.
    pub return_type: Option<String>,
    /// Consumed content types, prioritized by post-processing.
    pub consumes: Vec<String>,
    pub is_multipart: bool,
    /// Derived identifier, unique within the operation set.
    pub operation_id: String,
    /// Interface grouping tag.
    pub tag: String,
    pub imports: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterRecord {
    pub name: String,
    pub kind: ParamKind,
    #[serde(rename = "type")]
    pub ty: String,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Path,
    Query,
    Header,
    Body,
}

impl ParamKind {
    fn from_location(location: &str) -> Self {
        match location {
            "path" => ParamKind::Path,
            "header" => ParamKind::Header,
            "body" => ParamKind::Body,
            _ => ParamKind::Query,
        }
    }
}

/// Build model records for one pass. Two raw names collapsing onto the same
/// effective name would silently overwrite each other's output file, so that
/// is a hard error in the model pass. In the api pass no model files are
/// written and collisions are expected: an envelope and its payload type
/// normalize onto the same name there, which is what the prefix stripping is
/// for.
pub fn build_model_records(spec: &ApiSpec, stage: Stage) -> Result<Vec<ModelRecord>, GenError> {
    let mut records = Vec::with_capacity(spec.models.len());
    let mut seen = HashSet::new();

    for model in &spec.models {
        let record = build_model_record(model, stage);
        if !seen.insert(record.effective_name.clone()) && stage == Stage::Model {
            return Err(GenError::DuplicateModel(record.effective_name));
        }
        records.push(record);
    }

    Ok(records)
}

fn build_model_record(model: &ModelDef, stage: Stage) -> ModelRecord {
    let properties: Vec<PropertyRecord> = model
        .fields
        .iter()
        .map(|f| PropertyRecord {
            name: strip_illegal_chars(&f.name),
            ty: resolve_field_type(&f.ty, stage),
            required: f.required,
            nullable: f.nullable,
        })
        .collect();

    // Only the qualified-import types need importing inside the model
    // package; sibling model classes are already in scope.
    let symbols: BTreeSet<&str> = properties
        .iter()
        .flat_map(|p| referenced_symbols(&p.ty))
        .filter(|s| has_import_mapping(s))
        .collect();
    let imports = collect_imports(symbols);

    ModelRecord {
        name: model.name.clone(),
        effective_name: normalize_model_name(&model.name, stage),
        properties,
        parent_name: None,
        imports,
    }
}

/// Build operation records for one pass. Post-processing (path normalization,
/// parameter partition, content-type prioritization) runs separately on the
/// finished set.
pub fn build_operation_records(spec: &ApiSpec) -> Result<Vec<OperationRecord>, GenError> {
    let mut records = Vec::with_capacity(spec.operations.len());
    let mut seen = HashSet::new();

    for op in &spec.operations {
        let record = build_operation_record(op, spec);
        if !seen.insert(record.operation_id.clone()) {
            return Err(GenError::DuplicateOperation(record.operation_id));
        }
        records.push(record);
    }

    Ok(records)
}

fn build_operation_record(op: &OperationDef, spec: &ApiSpec) -> OperationRecord {
    let return_type = resolve_return_type(op, spec);

    let parameters: Vec<ParameterRecord> = op
        .parameters
        .iter()
        .map(|p| ParameterRecord {
            name: strip_illegal_chars(&p.name),
            kind: ParamKind::from_location(&p.location),
            ty: p
                .ty
                .as_ref()
                .map(|t| resolve_field_type(t, Stage::Api))
                .unwrap_or_else(|| "String".to_string()),
            required: p.required,
        })
        .collect();

    let mut symbols: Vec<&str> = parameters
        .iter()
        .flat_map(|p| referenced_symbols(&p.ty))
        .collect();
    if let Some(ret) = &return_type {
        symbols.extend(referenced_symbols(ret));
    }
    let imports = collect_imports(symbols);

    OperationRecord {
        http_method: op.method.to_uppercase(),
        raw_path: op.path.clone(),
        path: op.path.clone(),
        parameters,
        return_type,
        consumes: op.consumes.clone(),
        is_multipart: false,
        operation_id: derive_operation_id(&op.method, &op.path),
        tag: op.tag.clone().unwrap_or_else(|| "Default".to_string()),
        imports,
    }
}
