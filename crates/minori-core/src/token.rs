use std::path::{Path, PathBuf};

use crate::error::MinoriError;

/// Name of the access-token file the helper reads from its `SCRIPT_DIR`.
pub const TOKEN_FILE: &str = ".anilist.jwt";

/// Path of the token file inside the plugin state directory.
pub fn path_for(state_dir: &Path) -> PathBuf {
    state_dir.join(TOKEN_FILE)
}

/// Overwrite the token file wholesale with the pasted token.
///
/// The token is not validated here; the next helper invocation that
/// consumes it decides whether it works.
pub fn write(state_dir: &Path, token: &str) -> Result<(), MinoriError> {
    std::fs::write(path_for(state_dir), token.trim())?;
    tracing::info!(dir = %state_dir.display(), "access token written");
    Ok(())
}
