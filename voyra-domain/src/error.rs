use crate::backend::BackendError;

/// Error taxonomy shared by both transports. Each variant carries enough
/// context for the caller to decide whether a retry makes sense; only
/// `BackendUnavailable` is generally retryable (with backoff).
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("operation not supported by this plugin: {0}")]
    UnsupportedCapability(&'static str),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl PluginError {
    /// Stable machine-readable kind, used in response bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PluginError::Configuration(_) => "CONFIGURATION_ERROR",
            PluginError::UnsupportedCapability(_) => "UNSUPPORTED_CAPABILITY",
            PluginError::InvalidState(_) => "INVALID_STATE",
            PluginError::NotFound(_) => "NOT_FOUND",
            PluginError::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
        }
    }
}

impl From<BackendError> for PluginError {
    fn from(err: BackendError) -> Self {
        PluginError::BackendUnavailable(err.to_string())
    }
}
