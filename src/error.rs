use std::fmt;
use std::sync::Arc;

/// Opaque failure payload carried through completion handles.
///
/// The orchestrator never inspects the contents; it only forwards or
/// discards the payload according to the precedence rules (primary failure
/// wins over sub-pipeline failures). Cloning is cheap and the payload stays
/// valid across thread and ownership boundaries.
#[derive(Clone)]
pub struct Failure {
    inner: Arc<anyhow::Error>,
}

impl Failure {
    /// Create a failure from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(anyhow::Error::msg(message.into())),
        }
    }

    /// Create a failure from any error, preserving its source chain.
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(anyhow::Error::new(error)),
        }
    }

    /// Top-level diagnostic message of the payload.
    pub fn message(&self) -> String {
        self.inner.to_string()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

/// Fatal programming error: the same logical unit of pending work was
/// released twice. This is never a recoverable runtime condition.
#[derive(Debug, thiserror::Error)]
#[error("completion handle released twice for the same pending unit of work")]
pub struct DoubleReleaseError;

#[derive(Debug, Clone, PartialEq)]
pub enum ConductorError {
    ConfigurationError(String),
    EventError(String),
    OrchestrationError(String),
}

impl fmt::Display for ConductorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConductorError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            ConductorError::EventError(msg) => write!(f, "Event error: {msg}"),
            ConductorError::OrchestrationError(msg) => write!(f, "Orchestration error: {msg}"),
        }
    }
}

impl std::error::Error for ConductorError {}

pub type Result<T> = std::result::Result<T, ConductorError>;
