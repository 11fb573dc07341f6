//! Video encoder selection.
//!
//! The choice is computed for every re-encoding operation and passed into
//! the command builder.

use tracing::debug;

use clipforge_models::EncodingConfig;

/// Codec plus the parameter list that follows `-c:v <codec>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderChoice {
    pub codec: String,
    pub params: Vec<String>,
}

impl EncoderChoice {
    /// `-c:v <codec> <params...>`
    pub fn video_args(&self) -> Vec<String> {
        let mut args = vec!["-c:v".to_string(), self.codec.clone()];
        args.extend(self.params.iter().cloned());
        args
    }
}

/// Whether a hardware video encoder could be used on this host.
pub fn gpu_available() -> bool {
    which::which("nvidia-smi").is_ok()
}

/// Number of threads handed to the encoder (at least 1).
pub fn thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(1)
}

/// Choose the encoder for one re-encoding pass.
pub fn choose_encoder(config: &EncodingConfig) -> EncoderChoice {
    select_encoder(config, gpu_available(), thread_count())
}

/// Pure selection policy.
///
/// A detected GPU still resolves to the software encoder.
pub fn select_encoder(config: &EncodingConfig, gpu: bool, threads: usize) -> EncoderChoice {
    let software = EncoderChoice {
        codec: config.codec.clone(),
        params: vec![
            "-preset".to_string(),
            config.preset.clone(),
            "-crf".to_string(),
            config.crf.to_string(),
            "-threads".to_string(),
            threads.max(1).to_string(),
        ],
    };

    if gpu {
        debug!("GPU detected, using software encoder {}", software.codec);
    }
    software
}
