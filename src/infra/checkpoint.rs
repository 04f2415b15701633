// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the model's parameters.
//
// File layout:
//
//   b"PWLSTM"            magic
//   u8                   format version
//   u32 (LE)             header length
//   header               JSON { "architecture": PasswordLstmConfig }
//   record               burn NamedMpk bytes, full precision
//
// The architecture header is checked before the record is
// decoded, so a checkpoint from a differently shaped model is
// a CheckpointLoad error instead of a silently broken model.
//
// Load outcomes:
//   no path given         → ColdStart
//   path given, missing   → ColdStart (callers wanting strict
//                           behaviour check existence first)
//   path given, readable  → Loaded, or CheckpointLoad error

use std::fs;
use std::path::{Path, PathBuf};

use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkBytesRecorder, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::infra::artifacts::write_atomic;
use crate::ml::model::{PasswordLstm, PasswordLstmConfig};

const MAGIC: &[u8; 6] = b"PWLSTM";
const FORMAT_VERSION: u8 = 1;

/// Which way the model's initial parameters were obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Parameters restored from this checkpoint.
    Loaded(PathBuf),
    /// Fresh parameters. `missing` is the requested path when one was
    /// given but does not exist.
    ColdStart { missing: Option<PathBuf> },
}

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointHeader {
    architecture: PasswordLstmConfig,
}

type ParamRecorder = NamedMpkBytesRecorder<FullPrecisionSettings>;

pub struct CheckpointManager {
    architecture: PasswordLstmConfig,
}

impl CheckpointManager {
    pub fn new(architecture: PasswordLstmConfig) -> Self {
        Self { architecture }
    }

    /// Serialise `model`'s parameters to `path`.
    pub fn save<B: Backend>(&self, model: &PasswordLstm<B>, path: &Path) -> Result<()> {
        let header = serde_json::to_vec(&CheckpointHeader {
            architecture: self.architecture.clone(),
        })?;

        let record = ParamRecorder::default()
            .record(model.clone().into_record(), ())
            .map_err(|e| PipelineError::Tensor(format!("cannot encode parameters: {e:?}")))?;

        let mut bytes = Vec::with_capacity(MAGIC.len() + 5 + header.len() + record.len());
        bytes.extend_from_slice(MAGIC);
        bytes.push(FORMAT_VERSION);
        bytes.extend_from_slice(&(header.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&header);
        bytes.extend_from_slice(&record);

        write_atomic(path, &bytes)?;
        tracing::info!("Saved checkpoint to '{}' ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Restore parameters into `model`, or hand it back untouched on a
    /// cold start.
    pub fn load<B: Backend>(
        &self,
        model:  PasswordLstm<B>,
        path:   Option<&Path>,
        device: &B::Device,
    ) -> Result<(PasswordLstm<B>, LoadOutcome)> {
        let Some(path) = path else {
            tracing::info!("No checkpoint requested — cold start");
            return Ok((model, LoadOutcome::ColdStart { missing: None }));
        };

        if !path.exists() {
            tracing::info!("Checkpoint '{}' not found — cold start", path.display());
            return Ok((model, LoadOutcome::ColdStart { missing: Some(path.to_path_buf()) }));
        }

        let bytes  = fs::read(path).map_err(|e| PipelineError::io(path, e))?;
        let record = self.check_envelope(path, &bytes)?;

        let record = ParamRecorder::default()
            .load(record.to_vec(), device)
            .map_err(|e| load_error(path, format!("{e:?}")))?;

        tracing::info!("Loaded checkpoint '{}'", path.display());
        Ok((model.load_record(record), LoadOutcome::Loaded(path.to_path_buf())))
    }

    /// Validate magic, version and architecture; return the record bytes.
    fn check_envelope<'a>(&self, path: &Path, bytes: &'a [u8]) -> Result<&'a [u8]> {
        let rest = bytes
            .strip_prefix(MAGIC.as_slice())
            .ok_or_else(|| load_error(path, "not a password-lstm checkpoint"))?;

        let (&version, rest) = rest
            .split_first()
            .ok_or_else(|| load_error(path, "truncated header"))?;
        if version != FORMAT_VERSION {
            return Err(load_error(path, format!("unsupported format version {version}")));
        }

        if rest.len() < 4 {
            return Err(load_error(path, "truncated header"));
        }
        let (len, rest) = rest.split_at(4);
        let len = u32::from_le_bytes([len[0], len[1], len[2], len[3]]) as usize;
        if rest.len() < len {
            return Err(load_error(path, "truncated header"));
        }
        let (header, record) = rest.split_at(len);

        let header: CheckpointHeader = serde_json::from_slice(header)
            .map_err(|e| load_error(path, format!("bad header: {e}")))?;

        if !header.architecture.same_architecture(&self.architecture) {
            return Err(load_error(
                path,
                format!(
                    "architecture mismatch: checkpoint has {:?}, model expects {:?}",
                    header.architecture, self.architecture
                ),
            ));
        }

        Ok(record)
    }
}

fn load_error(path: &Path, reason: impl Into<String>) -> PipelineError {
    PipelineError::CheckpointLoad {
        path:   path.to_path_buf(),
        reason: reason.into(),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::backend::rng_lock;
    use burn::backend::NdArray;

    type B = NdArray;

    fn small() -> PasswordLstmConfig {
        PasswordLstmConfig::new().with_embed_dim(8).with_hidden_dim(16)
    }

    fn logits(model: &PasswordLstm<B>) -> Vec<f32> {
        let device = Default::default();
        let input  = Tensor::<B, 1, Int>::from_ints([8, 1, 19, 19, 53, 63], &device).reshape([1, 6]);
        model.forward(input).into_data().iter::<f32>().collect()
    }

    #[test]
    fn test_round_trip_reproduces_logits() {
        let _rng = rng_lock();
        let device = Default::default();
        let dir    = tempfile::tempdir().unwrap();
        let path   = dir.path().join("personal.ckpt");
        let mgr    = CheckpointManager::new(small());

        let trained: PasswordLstm<B> = small().init(&device);
        mgr.save(&trained, &path).unwrap();

        let fresh: PasswordLstm<B> = small().init(&device);
        let (loaded, outcome) = mgr.load(fresh, Some(&path), &device).unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded(path.clone()));
        assert_eq!(logits(&loaded), logits(&trained));
    }

    #[test]
    fn test_no_path_is_cold_start() {
        let _rng = rng_lock();
        let device = Default::default();
        let mgr    = CheckpointManager::new(small());
        let model: PasswordLstm<B> = small().init(&device);
        let before = logits(&model);

        let (model, outcome) = mgr.load(model, None, &device).unwrap();
        assert_eq!(outcome, LoadOutcome::ColdStart { missing: None });
        assert_eq!(logits(&model), before);
    }

    #[test]
    fn test_missing_path_is_cold_start() {
        let _rng = rng_lock();
        let device = Default::default();
        let dir    = tempfile::tempdir().unwrap();
        let path   = dir.path().join("absent.ckpt");
        let mgr    = CheckpointManager::new(small());
        let model: PasswordLstm<B> = small().init(&device);

        let (_, outcome) = mgr.load(model, Some(&path), &device).unwrap();
        assert_eq!(outcome, LoadOutcome::ColdStart { missing: Some(path) });
    }

    #[test]
    fn test_architecture_mismatch_is_load_error() {
        let _rng = rng_lock();
        let device = Default::default();
        let dir    = tempfile::tempdir().unwrap();
        let path   = dir.path().join("other.ckpt");

        let other = small().with_hidden_dim(32);
        let model: PasswordLstm<B> = other.init(&device);
        CheckpointManager::new(other).save(&model, &path).unwrap();

        let model: PasswordLstm<B> = small().init(&device);
        let err = CheckpointManager::new(small())
            .load(model, Some(&path), &device)
            .unwrap_err();
        assert!(matches!(err, PipelineError::CheckpointLoad { .. }));
        assert!(err.to_string().contains("architecture mismatch"));
    }

    #[test]
    fn test_garbage_file_is_load_error() {
        let _rng = rng_lock();
        let device = Default::default();
        let dir    = tempfile::tempdir().unwrap();
        let path   = dir.path().join("garbage.ckpt");
        fs::write(&path, b"this is not a checkpoint").unwrap();

        let model: PasswordLstm<B> = small().init(&device);
        let err = CheckpointManager::new(small())
            .load(model, Some(&path), &device)
            .unwrap_err();
        assert!(matches!(err, PipelineError::CheckpointLoad { .. }));
    }

    #[test]
    fn test_truncated_record_is_load_error() {
        let _rng = rng_lock();
        let device = Default::default();
        let dir    = tempfile::tempdir().unwrap();
        let path   = dir.path().join("cut.ckpt");
        let mgr    = CheckpointManager::new(small());

        let model: PasswordLstm<B> = small().init(&device);
        mgr.save(&model, &path).unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        let err = mgr.load(model, Some(&path), &device).unwrap_err();
        assert!(matches!(err, PipelineError::CheckpointLoad { .. }));
    }
}
