//! Layout of the upload directory.
//!
//! ```text
//! <upload_root>/<scenario_id>/<item_id>_<file name>   uploaded files
//! <upload_root>/<task_id>/                           simulation results
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::types::DbId;

/// Longest file name kept from an upload (after sanitizing).
pub const MAX_FILE_NAME_LEN: usize = 120;

/// Name used when an upload has no usable file name.
pub const FALLBACK_FILE_NAME: &str = "upload.bin";

/// Runs of characters not allowed in a stored file name.
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));

/// Reduce a client-supplied file name to a safe single path component.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned = UNSAFE_CHARS.replace_all(base, "_");
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        return FALLBACK_FILE_NAME.to_string();
    }
    trimmed.chars().take(MAX_FILE_NAME_LEN).collect()
}

/// Path of an uploaded file relative to the upload root.
pub fn upload_relative_path(scenario_id: Uuid, item_id: Uuid, file_name: &str) -> PathBuf {
    PathBuf::from(scenario_id.to_string()).join(format!(
        "{item_id}_{}",
        sanitize_file_name(file_name)
    ))
}

/// Folder holding the results of task `task_id`.
pub fn results_folder(upload_root: &Path, task_id: DbId) -> PathBuf {
    upload_root.join(task_id.to_string())
}

/// Remove the results folder of `task_id`.
///
/// Returns `Ok(false)` if the folder did not exist. Any other I/O failure is
/// returned to the caller.
pub async fn remove_results_folder(upload_root: &Path, task_id: DbId) -> io::Result<bool> {
    let folder = results_folder(upload_root, task_id);
    match tokio::fs::remove_dir_all(&folder).await {
        Ok(()) => {
            tracing::info!(task_id, folder = %folder.display(), "Removed results folder");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(task_id, folder = %folder.display(), "Results folder does not exist");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name(r"C:\data\load.csv"), "load.csv");
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("solar profile 2030.csv"), "solar_profile_2030.csv");
    }

    #[test]
    fn sanitize_falls_back_for_empty_names() {
        assert_eq!(sanitize_file_name(""), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name(".."), FALLBACK_FILE_NAME);
    }

    #[test]
    fn sanitize_truncates_long_names() {
        let long = "a".repeat(500);
        assert_eq!(sanitize_file_name(&long).len(), MAX_FILE_NAME_LEN);
    }

    #[test]
    fn upload_path_is_scoped_by_scenario() {
        let scenario = Uuid::nil();
        let item = Uuid::from_u128(1);
        let path = upload_relative_path(scenario, item, "wind.csv");
        assert_eq!(
            path,
            PathBuf::from(scenario.to_string()).join(format!("{item}_wind.csv"))
        );
    }

    #[tokio::test]
    async fn remove_existing_results_folder() {
        let root = tempfile::tempdir().unwrap();
        let folder = results_folder(root.path(), 42);
        tokio::fs::create_dir_all(folder.join("nested")).await.unwrap();
        tokio::fs::write(folder.join("nested/out.csv"), b"1,2").await.unwrap();

        assert!(remove_results_folder(root.path(), 42).await.unwrap());
        assert!(!folder.exists());
    }

    #[tokio::test]
    async fn missing_results_folder_is_tolerated() {
        let root = tempfile::tempdir().unwrap();
        assert!(!remove_results_folder(root.path(), 7).await.unwrap());
    }

    #[tokio::test]
    async fn other_io_errors_propagate() {
        let root = tempfile::tempdir().unwrap();
        // A plain file where a directory is expected cannot be removed as a tree.
        tokio::fs::write(root.path().join("9"), b"not a dir").await.unwrap();
        assert!(remove_results_folder(root.path(), 9).await.is_err());
    }
}
