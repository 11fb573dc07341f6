//! Editing job runner binary.
//!
//! Usage: `clipforge-worker <job.json>`. The job report is printed to
//! stdout as JSON; logs go to stderr.

use anyhow::Context;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clipforge_worker::{run_job, Job, WorkerConfig, WorkerError};

fn init_tracing() -> anyhow::Result<()> {
    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("clipforge=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .try_init()?;
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let job_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: clipforge-worker <job.json>")?;

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let job = Job::load(&job_path)
        .await
        .with_context(|| format!("Failed to load job {}", job_path.display()))?;
    let report = run_job(&config, job).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting clipforge-worker");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Job failed: {:#}", e);
            let code = e
                .downcast_ref::<WorkerError>()
                .map(WorkerError::exit_code)
                .unwrap_or(2);
            ExitCode::from(code)
        }
    }
}
