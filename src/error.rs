//! Error taxonomy for the generation pipeline.
//!
//! Unresolvable type references are deliberately *not* errors: they degrade to
//! an unset return type so generation stays best-effort. Only structural
//! problems (unparseable input, name collisions after normalization) and
//! renderer/filesystem failures abort a run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("failed to parse API description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("renderer failed: {0}")]
    Render(String),

    #[error("duplicate model name '{0}' after normalization")]
    DuplicateModel(String),

    #[error("duplicate operation id '{0}'")]
    DuplicateOperation(String),
}

impl GenError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}
