//! JSON editing jobs.
//!
//! A job names an input file and a chain of operations. Each step reads the
//! previous step's output. The final file is optionally copied to a
//! destination, after which the editor's working directory is cleaned up.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::Instrument;

use clipforge_media::pipeline::{self, StepOutcome};
use clipforge_media::VideoEditor;
use clipforge_models::Operation;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;

fn default_cleanup() -> bool {
    true
}

/// A chain of operations over one input file.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Label used in logs; defaults to the input's file name
    #[serde(default)]
    pub name: Option<String>,
    pub input: PathBuf,
    /// Raw operation objects, decoded by [`Job::operations`]
    pub steps: Vec<serde_json::Value>,
    /// Where to copy the final file
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Remove intermediates when the job ends
    #[serde(default = "default_cleanup")]
    pub cleanup: bool,
}

impl Job {
    pub fn from_json(json: &str) -> WorkerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a job file.
    pub async fn load(path: impl AsRef<Path>) -> WorkerResult<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .input
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| self.input.display().to_string()),
        }
    }

    /// Decode every step. Fails on the first bad one, naming it.
    pub fn operations(&self) -> WorkerResult<Vec<Operation>> {
        if self.steps.is_empty() {
            return Err(WorkerError::invalid_job("job has no steps"));
        }
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                pipeline::parse_operation(step.clone())
                    .map_err(|e| WorkerError::invalid_job(format!("step {}: {}", i + 1, e)))
            })
            .collect()
    }
}

/// What a finished job produced.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job: String,
    pub input: PathBuf,
    /// Final file: the copy destination, or the last step's output
    pub output: PathBuf,
    pub steps: Vec<StepOutcome>,
    pub elapsed_ms: u64,
    /// Whether intermediates were removed
    pub cleaned_up: bool,
}

/// Run a job to completion.
///
/// Steps are decoded before any tool is checked or spawned. When cleanup is
/// requested but the final file lives in the working directory (no `output`
/// and no explicit path on the last step), the working directory is kept.
pub async fn run_job(config: &WorkerConfig, job: Job) -> WorkerResult<JobReport> {
    let steps = job.operations()?;
    let logger = JobLogger::new(job.label(), steps.len());
    let mut editor = VideoEditor::new(config.editor.clone())?;
    let started = Instant::now();
    logger.log_start(&job.input);

    let result = run_steps(&mut editor, &job, steps, config.job_timeout)
        .instrument(logger.create_span())
        .await;

    let result_in_work_dir = matches!(&result, Ok((_, output)) if output.starts_with(editor.work_dir()));
    let cleaned_up = job.cleanup && !result_in_work_dir;
    if cleaned_up {
        editor.cleanup();
    } else if job.cleanup {
        logger.log_warning(&format!(
            "final file is inside {}, keeping the working directory",
            editor.work_dir().display()
        ));
    }

    match result {
        Ok((steps, output)) => {
            let elapsed = started.elapsed();
            logger.log_completion(&output, elapsed);
            Ok(JobReport {
                job: logger.job().to_string(),
                input: job.input,
                output,
                steps,
                elapsed_ms: elapsed.as_millis() as u64,
                cleaned_up,
            })
        }
        Err(e) => {
            logger.log_error(&e.to_string());
            Err(e)
        }
    }
}

async fn run_steps(
    editor: &mut VideoEditor,
    job: &Job,
    steps: Vec<Operation>,
    timeout: Option<Duration>,
) -> WorkerResult<(Vec<StepOutcome>, PathBuf)> {
    let chain = pipeline::run_chain(editor, &job.input, steps);
    let outcomes = match timeout {
        Some(limit) => tokio::time::timeout(limit, chain)
            .await
            .map_err(|_| WorkerError::Timeout(limit.as_secs()))??,
        None => chain.await?,
    };

    let last = pipeline::final_output(&job.input, &outcomes).to_path_buf();
    let output = match &job.output {
        Some(dest) if *dest != last => {
            if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::copy(&last, dest).await?;
            dest.clone()
        }
        Some(dest) => dest.clone(),
        None => last,
    };

    Ok((outcomes, output))
}
