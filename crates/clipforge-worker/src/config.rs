//! Worker configuration.

use std::time::Duration;

use clipforge_media::EditorConfig;

/// Default bound on a whole job.
pub const DEFAULT_JOB_TIMEOUT: Duration = Duration::from_secs(3600);

/// Worker configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    /// Editor settings (tool paths, working directory, encoding)
    pub editor: EditorConfig,
    /// Upper bound on a whole job; `None` waits forever
    pub job_timeout: Option<Duration>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            job_timeout: Some(DEFAULT_JOB_TIMEOUT),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    ///
    /// `CLIPFORGE_JOB_TIMEOUT_SECS=0` disables the job timeout.
    pub fn from_env() -> Self {
        let job_timeout = match std::env::var("CLIPFORGE_JOB_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_JOB_TIMEOUT),
        };

        Self {
            editor: EditorConfig::from_env(),
            job_timeout,
        }
    }

    pub fn with_editor(mut self, editor: EditorConfig) -> Self {
        self.editor = editor;
        self
    }

    pub fn with_job_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.job_timeout = timeout;
        self
    }
}
