//! Operation post-processing.
//!
//! Applied once per generation pass to the finished operation set: path
//! normalization, the stable path-before-query parameter partition,
//! content-type prioritization, multipart detection. Each step builds new
//! records instead of mutating shared fields in place, so no rule can observe
//! another rule's half-applied output.

use super::naming::{capitalize_first, strip_illegal_chars};
use super::records::{OperationRecord, ParamKind, ParameterRecord};

/// Operation id for the bare root path.
const ROOT_SEGMENT: &str = "root";

/// Content type that flags an operation as multipart.
const MULTIPART_MIME: &str = "multipart/form-data";

/// Post-process a pass's operation set.
pub fn post_process(operations: Vec<OperationRecord>) -> Vec<OperationRecord> {
    operations
        .into_iter()
        .map(|op| {
            let is_multipart = is_multipart(&op.consumes);
            let consumes = if is_multipart {
                op.consumes
            } else {
                prioritize_content_types(op.consumes)
            };
            OperationRecord {
                path: normalize_path(&op.raw_path).to_string(),
                parameters: partition_parameters(op.parameters),
                consumes,
                is_multipart,
                ..op
            }
        })
        .collect()
}

/// Strip a single leading path separator. Idempotent: an already-normalized
/// path passes through unchanged.
pub fn normalize_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Stable partition: all path parameters precede all query parameters, with
/// original relative order preserved inside each group. Only the slots held
/// by those two kinds are reordered; header and body parameters keep their
/// exact positions.
pub fn partition_parameters(params: Vec<ParameterRecord>) -> Vec<ParameterRecord> {
    let mut slots = Vec::new();
    let mut paths = Vec::new();
    let mut queries = Vec::new();
    let mut out: Vec<Option<ParameterRecord>> = Vec::with_capacity(params.len());

    for (i, param) in params.into_iter().enumerate() {
        match param.kind {
            ParamKind::Path => {
                slots.push(i);
                paths.push(param);
                out.push(None);
            }
            ParamKind::Query => {
                slots.push(i);
                queries.push(param);
                out.push(None);
            }
            _ => out.push(Some(param)),
        }
    }

    let mut reordered = paths.into_iter().chain(queries);
    for slot in slots {
        out[slot] = reordered.next();
    }

    out.into_iter().flatten().collect()
}

/// Reorder a consumes list as [vendor-JSON…, generic-JSON…, everything
/// else…], preserving source order within each bucket. Lists of length <= 1
/// are returned as-is.
pub fn prioritize_content_types(consumes: Vec<String>) -> Vec<String> {
    if consumes.len() <= 1 {
        return consumes;
    }

    let mut vendor_json = Vec::new();
    let mut generic_json = Vec::new();
    let mut rest = Vec::new();

    for mime in consumes {
        if is_json_vendor_mime(&mime) {
            vendor_json.push(mime);
        } else if is_json_mime(&mime) {
            generic_json.push(mime);
        } else {
            rest.push(mime);
        }
    }

    vendor_json.extend(generic_json);
    vendor_json.extend(rest);
    vendor_json
}

/// Whether the operation consumes multipart form data: decided by the first
/// declared content type alone.
pub fn is_multipart(consumes: &[String]) -> bool {
    consumes.first().map(String::as_str) == Some(MULTIPART_MIME)
}

/// MIME essence: the part before any `;` parameters, lowercased.
fn mime_essence(mime: &str) -> String {
    mime.split(';').next().unwrap_or(mime).trim().to_lowercase()
}

/// `application/json`, optionally followed by parameters, any case.
pub fn is_json_mime(mime: &str) -> bool {
    mime_essence(mime) == "application/json"
}

/// `application/vnd.<anything>+json`, optionally followed by parameters,
/// any case.
pub fn is_json_vendor_mime(mime: &str) -> bool {
    let essence = mime_essence(mime);
    essence.starts_with("application/vnd.") && essence.ends_with("+json")
}

/// Derive a lowerCamelCase operation id from the HTTP method and path.
///
/// Placeholder braces are stripped, the lowercased method leads, every later
/// non-empty segment is capitalized, and a bare `/` path maps to the reserved
/// `root` segment. The result passes through the same illegal-character
/// stripping as model names.
pub fn derive_operation_id(method: &str, path: &str) -> String {
    let stripped: String = path.chars().filter(|c| *c != '{' && *c != '}').collect();
    let joined = format!("{}/{}", method.to_lowercase(), stripped);

    let mut parts: Vec<&str> = joined.split('/').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }

    let mut id = String::new();
    if stripped == "/" {
        id.push_str(ROOT_SEGMENT);
    }
    for part in parts {
        if part.is_empty() {
            continue;
        }
        if id.is_empty() {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                id.extend(first.to_lowercase());
                id.extend(chars);
            }
        } else {
            id.push_str(&capitalize_first(part));
        }
    }

    strip_illegal_chars(&id)
}
