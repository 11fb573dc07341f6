//! Structured job logging utilities.
//!
//! Provides consistent, structured logging for job processing with
//! tracing spans and contextual information.

use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn, Span};

/// Job logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job: String,
    steps: usize,
}

impl JobLogger {
    /// Create a logger for a job with `steps` operations.
    pub fn new(job: impl Into<String>, steps: usize) -> Self {
        Self {
            job: job.into(),
            steps,
        }
    }

    /// Log the start of a job.
    pub fn log_start(&self, input: &Path) {
        info!(
            job = %self.job,
            steps = self.steps,
            input = %input.display(),
            "Job started"
        );
    }

    /// Log a warning during job execution.
    pub fn log_warning(&self, message: &str) {
        warn!(job = %self.job, "Job warning: {}", message);
    }

    /// Log an error during job execution.
    pub fn log_error(&self, message: &str) {
        error!(job = %self.job, "Job error: {}", message);
    }

    /// Log the completion of a job.
    pub fn log_completion(&self, output: &Path, elapsed: Duration) {
        info!(
            job = %self.job,
            output = %output.display(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Job completed"
        );
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Create a tracing span for this job.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("job", job = %self.job, steps = self.steps)
    }
}
