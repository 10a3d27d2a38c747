use std::path::{Path, PathBuf};
use std::process::Command;

use crate::envelope::Envelope;
use crate::error::MinoriError;

/// Environment variable telling the helper where its state (the token
/// file) lives.
const SCRIPT_DIR_ENV: &str = "SCRIPT_DIR";

/// Handle to the external helper executable.
///
/// Every stateful operation — auth, search, progress reporting, scoring —
/// goes through `invoke`. The call is synchronous and blocks the calling
/// event handler until the helper exits.
#[derive(Debug, Clone)]
pub struct Helper {
    program: PathBuf,
    script_dir: PathBuf,
}

impl Helper {
    pub fn new(program: impl Into<PathBuf>, script_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            script_dir: script_dir.into(),
        }
    }

    pub fn script_dir(&self) -> &Path {
        &self.script_dir
    }

    /// Run the helper with the given arguments and decode its reply.
    pub fn invoke(&self, args: &[&str]) -> Result<Envelope, MinoriError> {
        tracing::debug!(program = %self.program.display(), ?args, "invoking helper");

        let output = Command::new(&self.program)
            .args(args)
            .env(SCRIPT_DIR_ENV, &self.script_dir)
            .output()
            .map_err(MinoriError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(
                code = ?output.status.code(),
                stderr = %stderr,
                "helper exited with failure"
            );
            return Err(MinoriError::HelperExit {
                code: output.status.code(),
                stderr,
            });
        }

        let envelope: Envelope = serde_json::from_slice(&output.stdout)?;
        tracing::debug!(message = ?envelope.message(), "helper reply decoded");
        Ok(envelope)
    }
}
