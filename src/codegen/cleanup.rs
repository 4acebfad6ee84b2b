//! Post-run sweep of stray envelope-model files.
//!
//! The MODEL pass emits every model as a standalone file, including transport
//! envelopes, since the API-stage prefix stripping that folds them into their
//! payload types has not run yet at that point. This pass deletes those
//! orphans afterwards, matching on the *file name*, not the symbol inside.
//! Deletions are independent and best-effort; a failure is recorded and the
//! sweep moves on.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::naming::has_envelope_prefix;

/// Outcome of one cleanup sweep.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Files successfully removed.
    pub deleted: usize,
    /// Files that matched but could not be removed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Delete every file in `model_dir` whose name begins with an envelope
/// marker. A missing directory is not an error; a spec with no models never
/// creates one.
pub fn remove_envelope_models(model_dir: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();

    let entries = match fs::read_dir(model_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %model_dir.display(), error = %e, "model directory not readable, nothing to sweep");
            return report;
        }
    };

    for entry in entries.filter_map(Result::ok) {
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !has_envelope_prefix(name) {
            continue;
        }

        let path = entry.path();
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(file = %path.display(), "removed stray envelope model");
                report.deleted += 1;
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to remove envelope model");
                report.failed.push((path, e.to_string()));
            }
        }
    }

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deletes_envelope_files_and_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["ResponseFoo.kt", "MetaBar.kt", "User.kt"] {
            fs::write(dir.path().join(name), "class X").unwrap();
        }

        let report = remove_envelope_models(dir.path());
        assert_eq!(report.deleted, 2);
        assert!(report.failed.is_empty());
        assert!(!dir.path().join("ResponseFoo.kt").exists());
        assert!(!dir.path().join("MetaBar.kt").exists());
        assert!(dir.path().join("User.kt").exists());
    }

    #[test]
    fn test_matches_file_name_not_symbol() {
        let dir = tempfile::tempdir().unwrap();
        // The content mentions no envelope at all; only the file name counts.
        fs::write(dir.path().join("MetaResponseUser.kt"), "class User").unwrap();
        fs::write(dir.path().join("UserResponse.kt"), "class Response").unwrap();

        let report = remove_envelope_models(dir.path());
        assert_eq!(report.deleted, 1);
        assert!(dir.path().join("UserResponse.kt").exists());
    }

    #[test]
    fn test_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("ResponseStuff")).unwrap();

        let report = remove_envelope_models(dir.path());
        assert_eq!(report.deleted, 0);
        assert!(dir.path().join("ResponseStuff").exists());
    }

    #[test]
    fn test_missing_directory_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let report = remove_envelope_models(&dir.path().join("nope"));
        assert_eq!(report.deleted, 0);
        assert!(report.failed.is_empty());
    }
}
