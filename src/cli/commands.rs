// ============================================================
// Layer 1 — CLI Arguments
// ============================================================
// The flags of a run. Flag names keep their underscores
// (`--load_ckpt`, not `--load-ckpt`) because the installer
// that drives this binary passes them that way.
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::Args;

use crate::application::train_use_case::PipelineConfig;

#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Password export to train on (.txt, .csv or .json).
    /// Without it only the checkpoint is loaded, saved or exported.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// CSV column holding the password; negative counts from the end
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub col: i64,

    /// Number of full passes through the corpus
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Checkpoint to start from; a missing file means fresh parameters
    #[arg(long = "load_ckpt")]
    pub load_ckpt: Option<PathBuf>,

    /// Where to write the trained checkpoint
    #[arg(long = "save_ckpt")]
    pub save_ckpt: Option<PathBuf>,

    /// Where to write the ONNX graph; the vocabulary goes next to it as .json
    #[arg(long = "export_onnx")]
    pub export_onnx: Option<PathBuf>,

    /// Where to write the pattern report (needs --data)
    #[arg(long)]
    pub patterns: Option<PathBuf>,

    /// Per-epoch CSV of loss and perplexity
    #[arg(long)]
    pub metrics: Option<PathBuf>,

    /// Seed for parameter init and batch order
    #[arg(long, env = "PASSWORD_LSTM_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Threads preparing batches; 0 prepares them on the main thread
    #[arg(long, env = "PASSWORD_LSTM_WORKERS", default_value_t = 0)]
    pub workers: usize,
}

/// The application layer never sees clap types.
impl From<PipelineArgs> for PipelineConfig {
    fn from(a: PipelineArgs) -> Self {
        PipelineConfig {
            data:        a.data,
            col:         a.col,
            epochs:      a.epochs,
            load_ckpt:   a.load_ckpt,
            save_ckpt:   a.save_ckpt,
            export_onnx: a.export_onnx,
            patterns:    a.patterns,
            metrics:     a.metrics,
            seed:        a.seed,
            workers:     a.workers,
        }
    }
}
