use crate::bridge::Helper;
use crate::envelope::Envelope;

/// Outcome of the startup auth gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Stored token accepted; automatic resolution may run.
    Authorized,
    /// The helper wants a fresh token pasted in.
    NeedsToken(String),
    /// Auth failed outright.
    Failed(String),
}

impl AuthState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthState::Authorized)
    }
}

/// Validate the stored token, once at plugin load.
///
/// An `ok` reply carries the token itself in `message`, so the message is
/// deliberately kept out of the logs on that path.
pub fn check(helper: &Helper) -> AuthState {
    match helper.invoke(&["auth"]) {
        Ok(Envelope::Ok { .. }) => {
            tracing::info!("access token accepted");
            AuthState::Authorized
        }
        Ok(Envelope::TokenUpdate { message }) => {
            let message =
                message.unwrap_or_else(|| "Access token needs to be updated.".to_string());
            tracing::warn!(%message, "token update required");
            AuthState::NeedsToken(message)
        }
        Ok(Envelope::Error { message }) => {
            let message = message.unwrap_or_else(|| "Authentication failed.".to_string());
            tracing::warn!(%message, "auth failed");
            AuthState::Failed(message)
        }
        Err(e) => {
            tracing::warn!(error = %e, "auth invocation failed");
            AuthState::Failed(e.to_string())
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    fn replying_helper(dir: &Path, reply: &str) -> PathBuf {
        let path = dir.join("helper.sh");
        std::fs::write(&path, format!("#!/bin/sh\necho '{reply}'\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn test_ok_is_authorized() {
        let dir = tempfile::tempdir().unwrap();
        let helper = Helper::new(
            replying_helper(dir.path(), r#"{"status": "ok", "message": "aaa.bbb.ccc"}"#),
            dir.path(),
        );
        assert_eq!(check(&helper), AuthState::Authorized);
    }

    #[test]
    fn test_tokenupdate_needs_token() {
        let dir = tempfile::tempdir().unwrap();
        let helper = Helper::new(
            replying_helper(
                dir.path(),
                r#"{"status": "tokenupdate", "message": "Access token has expired"}"#,
            ),
            dir.path(),
        );
        assert_eq!(
            check(&helper),
            AuthState::NeedsToken("Access token has expired".to_string())
        );
    }

    #[test]
    fn test_error_is_failed() {
        let dir = tempfile::tempdir().unwrap();
        let helper = Helper::new(
            replying_helper(dir.path(), r#"{"status": "error", "message": "boom"}"#),
            dir.path(),
        );
        assert_eq!(check(&helper), AuthState::Failed("boom".to_string()));
    }

    #[test]
    fn test_launch_failure_is_failed() {
        let dir = tempfile::tempdir().unwrap();
        let helper = Helper::new(dir.path().join("no-such-helper"), dir.path());
        assert!(matches!(check(&helper), AuthState::Failed(_)));
    }
}
