// ============================================================
// Layer 6 — Atomic Artifact Writes
// ============================================================
// Every artifact (checkpoint, graph, vocabulary, report) goes
// to a temporary file in the destination directory and is
// renamed over the target only once fully written. A failed
// run leaves either the old file or nothing, never a partial
// one.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{PipelineError, Result};

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PipelineError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| PipelineError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| PipelineError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| PipelineError::io(path, e.error))?;

    tracing::debug!("Wrote {} bytes to '{}'", bytes.len(), path.display());
    Ok(())
}

/// Pretty-printed UTF-8 JSON (non-ASCII kept as-is).
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, json.as_bytes())
}
