// ============================================================
// Pipeline Errors
// ============================================================
// Every failure that can end a run. `PipelineError` says what
// went wrong, `StageError` adds which stage it happened in.
// The CLI layer turns a `StageError` into a non-zero exit.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by the data, ml and infra layers.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The five sequential stages of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Encode,
    Train,
    Analyze,
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load    => "load",
            Stage::Encode  => "encode",
            Stage::Train   => "train",
            Stage::Analyze => "analyze",
            Stage::Export  => "export",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Corpus file extension is not one of .txt / .csv / .json.
    #[error("unsupported corpus format '{extension}' for '{path}' (expected .txt, .csv or .json)")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The corpus yielded zero passwords.
    #[error("corpus '{path}' contains no passwords")]
    CorpusEmpty { path: PathBuf },

    /// Tabular column selector does not resolve to a column.
    #[error("column {col} is out of range for '{path}' ({columns} columns)")]
    ColumnOutOfRange { path: PathBuf, col: i64, columns: usize },

    /// The file has a known extension but the wrong shape.
    #[error("malformed corpus '{path}': {reason}")]
    MalformedCorpus { path: PathBuf, reason: String },

    /// A checkpoint exists but cannot be loaded into the current model.
    #[error("cannot load checkpoint '{path}': {reason}")]
    CheckpointLoad { path: PathBuf, reason: String },

    /// Graph export was requested but this build cannot produce it.
    #[error("graph export unavailable: {0}")]
    ExportDependency(String),

    #[error("i/o error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot start batch workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// Tensor data could not be read back or a record failed to encode.
    #[error("tensor error: {0}")]
    Tensor(String),
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io { path: path.into(), source }
    }
}

/// A `PipelineError` tagged with the stage that produced it.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: PipelineError,
}

/// Attach a stage to any pipeline result.
pub trait InStage<T> {
    fn in_stage(self, stage: Stage) -> std::result::Result<T, StageError>;
}

impl<T> InStage<T> for Result<T> {
    fn in_stage(self, stage: Stage) -> std::result::Result<T, StageError> {
        self.map_err(|source| StageError { stage, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_error_names_the_stage() {
        let err: Result<()> = Err(PipelineError::CorpusEmpty { path: "pw.txt".into() });
        let err = err.in_stage(Stage::Load).unwrap_err();
        assert_eq!(err.stage, Stage::Load);
        assert_eq!(err.to_string(), "load stage failed: corpus 'pw.txt' contains no passwords");
    }

    #[test]
    fn stage_display_is_lowercase() {
        let names: Vec<String> = [Stage::Load, Stage::Encode, Stage::Train, Stage::Analyze, Stage::Export]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, ["load", "encode", "train", "analyze", "export"]);
    }
}
