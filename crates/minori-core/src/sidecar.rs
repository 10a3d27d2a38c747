use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MinoriError;

/// Name of the per-directory metadata file.
pub const SIDECAR_FILE: &str = ".anilist.json";

/// Resolved tracking identifier for one anime directory.
///
/// The automatic file-load flow only ever creates this file; once present
/// it short-circuits re-prompting. Forced re-resolution may overwrite it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sidecar {
    pub media_id: i64,
}

/// Path of the sidecar file inside `dir`.
pub fn path_for(dir: &Path) -> PathBuf {
    dir.join(SIDECAR_FILE)
}

/// Whether `dir` already has a resolved media identifier.
pub fn exists(dir: &Path) -> bool {
    path_for(dir).is_file()
}

/// Read the sidecar, `None` when the directory is unresolved.
pub fn load(dir: &Path) -> Result<Option<Sidecar>, MinoriError> {
    let path = path_for(dir);
    if !path.is_file() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Persist the resolved identifier. A failure leaves no sidecar behind.
pub fn write(dir: &Path, media_id: i64) -> Result<(), MinoriError> {
    let content = serde_json::to_string(&Sidecar { media_id })?;
    std::fs::write(path_for(dir), content)?;
    tracing::info!(dir = %dir.display(), media_id, "sidecar written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!exists(dir.path()));
        assert_eq!(load(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), 114236).unwrap();
        assert!(exists(dir.path()));
        assert_eq!(load(dir.path()).unwrap(), Some(Sidecar { media_id: 114236 }));
    }

    #[test]
    fn test_write_into_missing_dir_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(write(&missing, 1).is_err());
        assert!(!exists(&missing));
    }

    #[test]
    fn test_corrupt_sidecar_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(path_for(dir.path()), "not json").unwrap();
        assert!(load(dir.path()).is_err());
    }
}
