//! Spec-type to Kotlin type mapping and return-type resolution.
//!
//! Field types map through a fixed primitive table; references map through the
//! name normalizer. Return types additionally get container unwrapping
//! (array-of-ref becomes `List<Inner>`) and one level of transport-envelope
//! unwrapping: a reference to an envelope model whose `content` field is
//! itself a reference resolves to the payload type. Anything the resolver
//! cannot place stays unresolved; that is a soft failure, not an error.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use tracing::debug;

use crate::spec::{ApiSpec, OperationDef, TypeNode};

use super::naming::{
    is_language_type, normalize_model_name, strip_envelope_prefix, has_envelope_prefix,
};
use super::stage::Stage;

/// Return type for operations without a response body.
pub const NO_CONTENT_TYPE: &str = "Unit";

/// Field name that carries the payload inside an envelope model.
pub const PAYLOAD_FIELD: &str = "content";

/// Kotlin package emitted model classes live in.
pub const MODEL_PACKAGE: &str = "cz.synetech.app.data.model";
/// Kotlin package emitted api interfaces live in.
pub const API_PACKAGE: &str = "cz.synetech.app.data.api";

/// Spec primitive -> Kotlin type. `uuid` resolves as a plain string; the
/// client treats identifiers as opaque.
static TYPE_MAPPING: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("integer", "Int"),
        ("long", "Long"),
        ("float", "Float"),
        ("double", "Double"),
        ("string", "String"),
        ("byte", "Byte"),
        ("binary", "ByteArray"),
        ("boolean", "Boolean"),
        ("date", "Date"),
        ("dateTime", "Date"),
        ("password", "String"),
        ("array", "List"),
        ("map", "Map"),
        ("uuid", "String"),
    ]
    .into_iter()
    .collect()
});

/// Kotlin types that need a `java.util` import.
static IMPORT_MAPPING: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [("Date", "java.util.Date"), ("UUID", "java.util.UUID")]
        .into_iter()
        .collect()
});

/// Map a spec primitive name to its Kotlin type, if known.
pub fn map_primitive(spec_type: &str) -> Option<&'static str> {
    TYPE_MAPPING.get(spec_type).copied()
}

/// Whether a Kotlin type imports from a qualified package rather than the
/// model package.
pub fn has_import_mapping(symbol: &str) -> bool {
    IMPORT_MAPPING.contains_key(symbol)
}

/// Resolve the Kotlin type of a model field or parameter.
///
/// References normalize with the current stage's naming rules; unknown
/// primitive names fall back to `Any` so a single odd field never sinks the
/// whole model.
pub fn resolve_field_type(node: &TypeNode, stage: Stage) -> String {
    if let Some(ref_name) = &node.ref_name {
        return normalize_model_name(ref_name, stage);
    }
    if node.is_array() {
        let inner = node
            .items
            .as_deref()
            .map(|i| resolve_field_type(i, stage))
            .unwrap_or_else(|| "Any".to_string());
        return format!("List<{inner}>");
    }
    if node.is_map() {
        let inner = node
            .items
            .as_deref()
            .map(|i| resolve_field_type(i, stage))
            .unwrap_or_else(|| "Any".to_string());
        return format!("Map<String, {inner}>");
    }
    match &node.name {
        Some(name) => map_primitive(name)
            .map(str::to_string)
            .unwrap_or_else(|| "Any".to_string()),
        None => "Any".to_string(),
    }
}

/// Resolve an operation's effective return type.
///
/// `None` signals "no typed response" to the renderer: a reference that
/// cannot be found in the IR, or a container nesting the resolver does not
/// recognize. An operation without a declared body resolves to [`NO_CONTENT_TYPE`].
pub fn resolve_return_type(op: &OperationDef, spec: &ApiSpec) -> Option<String> {
    let Some(node) = &op.response else {
        return Some(NO_CONTENT_TYPE.to_string());
    };

    if let Some(ref_name) = &node.ref_name {
        return resolve_ref_return(ref_name, spec, op);
    }

    if node.is_array() {
        let Some(items) = node.items.as_deref() else {
            debug!(method = %op.method, path = %op.path, "array response without item type");
            return None;
        };
        if items.is_array() || items.is_map() {
            // Deeper container nesting is left unresolved rather than guessed.
            debug!(method = %op.method, path = %op.path, "nested container response left unresolved");
            return None;
        }
        if let Some(inner_ref) = &items.ref_name {
            if spec.model(inner_ref).is_none() {
                debug!(method = %op.method, path = %op.path, model = %inner_ref, "unknown model in array response");
                return None;
            }
            return Some(format!(
                "List<{}>",
                normalize_model_name(inner_ref, Stage::Api)
            ));
        }
        let inner = items.name.as_deref().and_then(map_primitive)?;
        return Some(format!("List<{inner}>"));
    }

    node.name.as_deref().and_then(map_primitive).map(str::to_string)
}

fn resolve_ref_return(ref_name: &str, spec: &ApiSpec, op: &OperationDef) -> Option<String> {
    let Some(model) = spec.model(ref_name) else {
        debug!(method = %op.method, path = %op.path, model = %ref_name, "unknown model reference, leaving return type unset");
        return None;
    };

    // One level of envelope unwrapping: a prefixed wrapper whose payload field
    // references another type resolves to the payload itself. No recursion;
    // an envelope-of-envelope stays at the first payload.
    if has_envelope_prefix(&model.name) {
        let payload = model
            .fields
            .iter()
            .find(|f| f.name == PAYLOAD_FIELD)
            .and_then(|f| f.ty.ref_name.as_deref());
        if let Some(payload_ref) = payload {
            return Some(normalize_model_name(payload_ref, Stage::Api));
        }
    }

    Some(normalize_model_name(ref_name, Stage::Api))
}

/// Collect import lines for a set of type symbols used by an operation.
///
/// Every symbol passes through the same envelope-prefix stripping as model
/// names so generated imports refer to the unwrapped classes; Kotlin built-ins
/// never need importing and are dropped, except the `java.util` types which
/// map to their qualified names.
pub fn collect_imports<'a>(symbols: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let mut imports = BTreeSet::new();
    for symbol in symbols {
        let symbol = strip_envelope_prefix(symbol);
        if let Some(mapped) = IMPORT_MAPPING.get(symbol) {
            imports.insert((*mapped).to_string());
        } else if !is_language_type(symbol) {
            imports.insert(format!("{MODEL_PACKAGE}.{symbol}"));
        }
    }
    imports
}

/// Type symbols referenced by a resolved Kotlin type string, for import
/// collection. `List<PetAPIModel>` yields `PetAPIModel`; plain types yield
/// themselves.
pub fn referenced_symbols(resolved: &str) -> Vec<&str> {
    resolved
        .split(['<', '>', ',', ' '])
        .filter(|s| !s.is_empty())
        .collect()
}
