use thiserror::Error;

#[derive(Debug, Error)]
pub enum MinoriError {
    #[error("helper did not start: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("helper exited with status {code:?}: {stderr}")]
    HelperExit { code: Option<i32>, stderr: String },

    #[error("helper reply was not understood: {0}")]
    Reply(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
