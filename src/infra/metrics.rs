// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one CSV row per training epoch.
//
// Why log metrics to CSV?
//   - Opens in any spreadsheet or plotting tool
//   - A learning curve shows whether the run converged
//   - The file stays behind as a record of the run
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - mean_loss:  token-weighted masked cross-entropy
//   - perplexity: exp(mean_loss)
//   - tokens:     real characters scored this epoch
//
// Example CSV output:
//   epoch,mean_loss,perplexity,tokens
//   1,4.102311,60.480120,18230
//   2,3.511870,33.513004,18230
//
// How to read the metrics:
//   - Perplexity should fall each epoch while the model learns
//   - A flat curve near 96 means nothing is being learned
//   - tokens is the same every epoch for the same corpus
//
// The header is written when the logger is created. Each row
// is appended and the file closed as soon as its epoch ends, so
// an interrupted run keeps every finished epoch.
//
// Reference: Rust Book §12 (I/O and File Handling)

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::infra::artifacts::write_atomic;

/// Training statistics for a single epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean masked cross-entropy per real character; NaN if none were seen
    pub mean_loss: f64,

    /// exp(mean_loss)
    pub perplexity: f64,

    /// Unmasked positions that contributed to the loss
    pub tokens: usize,

    /// Optimiser steps taken (all-padding batches are skipped)
    pub steps: usize,
}

impl EpochMetrics {
    /// Build from the token-weighted loss sum of an epoch.
    pub fn new(epoch: usize, weighted_loss: f64, tokens: usize, steps: usize) -> Self {
        let mean_loss = if tokens > 0 {
            weighted_loss / tokens as f64
        } else {
            f64::NAN
        };
        Self {
            epoch,
            mean_loss,
            perplexity: mean_loss.exp(),
            tokens,
            steps,
        }
    }
}

/// Writes epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Start a fresh CSV at `path`, replacing any previous log.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = path.into();
        write_atomic(&csv_path, b"epoch,mean_loss,perplexity,tokens\n")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        Ok(Self { csv_path })
    }

    /// Append one epoch as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .map_err(|e| PipelineError::io(&self.csv_path, e))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{}",
            m.epoch, m.mean_loss, m.perplexity, m.tokens,
        )
        .map_err(|e| PipelineError::io(&self.csv_path, e))?;

        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
