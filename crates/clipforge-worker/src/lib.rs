//! Job runner for the clipforge editing pipeline.
//!
//! This crate provides:
//! - JSON job loading and step decoding
//! - Chain execution with a whole-job timeout
//! - Delivery of the final file and working-directory cleanup
//! - Structured job logging

pub mod config;
pub mod error;
pub mod job;
pub mod logging;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use job::{run_job, Job, JobReport};
pub use logging::JobLogger;
