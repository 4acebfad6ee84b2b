//! Model name normalization.
//!
//! All naming rules live here as pure string transforms: identifier
//! sanitization, the `Viewmodel` -> `RequestModel` postfix rewrite, the
//! `APIModel` default postfix, and stage-scoped envelope-prefix stripping.
//! Every function is a total function of its inputs; the same raw name yields
//! the same output for the whole duration of a stage.

use std::collections::HashSet;
use std::sync::LazyLock;

use super::stage::Stage;

/// Postfix searched for in raw model names (case-insensitive).
pub const SEARCH_SUFFIX: &str = "Viewmodel";
/// Replacement for [`SEARCH_SUFFIX`].
pub const REPLACE_SUFFIX: &str = "RequestModel";
/// Postfix appended to every other non-builtin model name.
pub const DEFAULT_SUFFIX: &str = "APIModel";

/// Transport-envelope markers stripped from names during the API stage and
/// matched against file names by the cleanup pass. Priority order: the
/// compound marker first, then its constituent simple markers. Only the first
/// matching rule fires.
pub const ENVELOPE_PREFIXES: [&str; 3] = ["MetaResponse", "Meta", "Response"];

/// Kotlin built-ins that must never be suffixed, prefixed or re-capitalized.
/// A spec that names one of these as a type is referring to the language
/// built-in, not to a domain model.
static LANGUAGE_TYPES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "Boolean", "Double", "Float", "Long", "Int", "Short", "Byte", "String", "ByteArray",
        "Date", "UUID", "Unit", "Any", "List", "Map",
    ]
    .into_iter()
    .collect()
});

/// Whether a name refers to a Kotlin built-in type.
pub fn is_language_type(name: &str) -> bool {
    LANGUAGE_TYPES.contains(name)
}

/// Remove every character that is not legal in a Kotlin identifier.
/// This covers the bracket characters (`[`, `]`) the source specs are known
/// to leak into names.
pub fn strip_illegal_chars(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Strip a leading envelope marker, compound marker first. A strip that would
/// leave the name empty does not fire (the marker itself is a legal, if odd,
/// model name).
pub fn strip_envelope_prefix(name: &str) -> &str {
    for prefix in ENVELOPE_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            if !rest.is_empty() {
                return rest;
            }
        }
    }
    name
}

/// Whether a name begins with one of the envelope markers.
pub fn has_envelope_prefix(name: &str) -> bool {
    ENVELOPE_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Normalize a raw spec model name into the emitted Kotlin class name.
///
/// Rules, in order:
/// 1. strip illegal characters;
/// 2. built-in type names are returned unchanged;
/// 3. during the API stage, strip a leading envelope marker;
/// 4. a trailing `Viewmodel` (any case) becomes `RequestModel`;
/// 5. anything else gets `APIModel` appended, unless it already carries one of
///    the two postfixes (re-normalizing an already-normalized name is a no-op);
/// 6. capitalize the first letter.
pub fn normalize_model_name(raw: &str, stage: Stage) -> String {
    let name = strip_illegal_chars(raw);
    if is_language_type(&name) {
        return name;
    }

    let name = match stage {
        Stage::Api => strip_envelope_prefix(&name).to_string(),
        Stage::Model => name,
    };

    let renamed = if ends_with_ignore_case(&name, SEARCH_SUFFIX) {
        format!("{}{}", &name[..name.len() - SEARCH_SUFFIX.len()], REPLACE_SUFFIX)
    } else if name.ends_with(DEFAULT_SUFFIX) || name.ends_with(REPLACE_SUFFIX) {
        name
    } else {
        format!("{name}{DEFAULT_SUFFIX}")
    };

    capitalize_first(&renamed)
}

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
