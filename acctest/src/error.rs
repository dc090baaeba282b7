//! Error types for acctest

/// Error type for acceptance test operations
#[derive(Debug, thiserror::Error)]
pub enum AcctestError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Not found: {0}")]
    MissingResource(String),

    #[error("{resource}: Attribute '{key}' not found")]
    MissingAttribute { resource: String, key: String },

    #[error("{0}")]
    CheckFailed(String),

    #[error("Step {step} failed: {source}")]
    StepFailed {
        step: usize,
        #[source]
        source: Box<AcctestError>,
    },

    #[error("ImportStateVerify attributes not equivalent: {0}")]
    ImportVerify(String),

    #[error("Check destroy failed: {0}")]
    DestroyCheck(String),

    #[error("terraform {command} failed: {stderr}")]
    Terraform { command: String, stderr: String },

    #[error("Sweeper {name} failed: {message}")]
    Sweep { name: String, message: String },

    #[error("Timeout after {0:?} waiting for condition")]
    Timeout(std::time::Duration),

    #[error("Sweeper dependency cycle detected at {0}")]
    DependencyCycle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// Result type alias for acctest operations
pub type Result<T> = std::result::Result<T, AcctestError>;

impl AcctestError {
    /// Wraps an error with the 1-based index of the step that produced it
    pub fn in_step(self, step: usize) -> Self {
        AcctestError::StepFailed {
            step,
            source: Box::new(self),
        }
    }
}

impl From<String> for AcctestError {
    fn from(s: String) -> Self {
        AcctestError::Custom(s)
    }
}

impl From<&str> for AcctestError {
    fn from(s: &str) -> Self {
        AcctestError::Custom(s.to_string())
    }
}

/// An error returned by a cloud service call that may carry an HTTP status.
///
/// Destroy checks and sweepers only need to tell a `404` apart from every
/// other failure, so this is all they see of a client's error type.
pub trait ServiceFailure: std::error::Error + Send + Sync + 'static {
    fn http_status(&self) -> Option<u16>;

    fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }
}
