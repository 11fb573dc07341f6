//! Worker error types.

use thiserror::Error;

use clipforge_media::MediaError;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid job: {0}")]
    InvalidJob(String),

    #[error("Job timed out after {0} seconds")]
    Timeout(u64),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn invalid_job(msg: impl Into<String>) -> Self {
        Self::InvalidJob(msg.into())
    }

    /// Whether the job itself is malformed, as opposed to failing while it ran.
    pub fn is_bad_input(&self) -> bool {
        match self {
            Self::InvalidJob(_) | Self::Json(_) => true,
            Self::Media(e) => e.is_validation(),
            _ => false,
        }
    }

    /// Process exit code: 2 for malformed jobs, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_bad_input() {
            2
        } else {
            1
        }
    }
}
