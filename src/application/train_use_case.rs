// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one run, strictly in order:
//
//   Step 1: Check export is possible     (Layer 6 - infra)
//   Step 2: Seed + build model           (Layer 5 - ml)
//   Step 3: Load checkpoint or cold start (Layer 6 - infra)   load
//   Step 4: Load corpus                  (Layer 4 - data)     load
//   Step 5: Encode passwords             (Layer 4 - data)     encode
//   Step 6: Run training loop            (Layer 5 - ml)       train
//   Step 7: Pattern report               (Layer 4b - analysis) analyze
//   Step 8: Save checkpoint, export      (Layer 6 - infra)    export
//
// Without a corpus, steps 4–7 are skipped and the run only
// moves a checkpoint into the requested output formats.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::patterns::PatternAnalyzer;
use crate::data::{dataset::PasswordDataset, encoder::SequenceEncoder, loader::CorpusLoader};
use crate::domain::{corpus::Corpus, traits::PasswordSource, vocab::Vocabulary};
use crate::error::{InStage, PipelineError, Stage, StageError};
use crate::infra::{
    artifacts::write_json_atomic,
    checkpoint::{CheckpointManager, LoadOutcome},
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{
    backend::{self, TrainBackend},
    model::{PasswordLstm, PasswordLstmConfig},
    trainer::{Trainer, TrainerConfig},
};

// ─── Pipeline Configuration ──────────────────────────────────────────────────
// Everything one invocation needs. Built from CLI arguments,
// serialisable so a run can be logged or replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub data:        Option<PathBuf>,
    pub col:         i64,
    pub epochs:      usize,
    pub load_ckpt:   Option<PathBuf>,
    pub save_ckpt:   Option<PathBuf>,
    pub export_onnx: Option<PathBuf>,
    pub patterns:    Option<PathBuf>,
    pub metrics:     Option<PathBuf>,
    pub seed:        u64,
    pub workers:     usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data:        None,
            col:         -1,
            epochs:      5,
            load_ckpt:   None,
            save_ckpt:   None,
            export_onnx: None,
            patterns:    None,
            metrics:     None,
            seed:        42,
            workers:     0,
        }
    }
}

/// A file written by the run, with a short label for the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: &'static str,
    pub path: PathBuf,
}

/// What a completed run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub load:      LoadOutcome,
    pub passwords: usize,
    pub history:   Vec<EpochMetrics>,
    pub artifacts: Vec<Artifact>,
}

impl RunSummary {
    pub fn final_perplexity(&self) -> Option<f64> {
        self.history.last().map(|m| m.perplexity)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: PipelineConfig,
}

impl TrainUseCase {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Execute the pipeline end to end. The first failure ends the run
    /// and names the stage it came from.
    pub fn execute(&self) -> Result<RunSummary, StageError> {
        let cfg = &self.config;
        if let Ok(json) = serde_json::to_string(cfg) {
            tracing::debug!("Pipeline config: {}", json);
        }

        // ── Step 1: Fail before training if export cannot happen ─────────────
        if cfg.export_onnx.is_some() {
            export_available().in_stage(Stage::Export)?;
        }

        // ── Step 2: Seeded model initialisation ──────────────────────────────
        backend::seed(cfg.seed);
        let device       = backend::default_device();
        let architecture = PasswordLstmConfig::new();
        let model: PasswordLstm<TrainBackend> = architecture.init(&device);

        // ── Step 3: Checkpoint (missing file is a cold start) ────────────────
        let checkpoints = CheckpointManager::new(architecture);
        let (mut model, load) = checkpoints
            .load(model, cfg.load_ckpt.as_deref(), &device)
            .in_stage(Stage::Load)?;
        match &load {
            LoadOutcome::Loaded(path) => {
                tracing::info!("Initialised from checkpoint '{}'", path.display())
            }
            LoadOutcome::ColdStart { missing: Some(path) } => tracing::warn!(
                "Checkpoint '{}' does not exist, training from fresh parameters",
                path.display()
            ),
            LoadOutcome::ColdStart { missing: None } => {
                tracing::info!("Training from fresh parameters")
            }
        }

        let vocab = Vocabulary::new();
        let mut summary = RunSummary {
            load,
            passwords: 0,
            history:   Vec::new(),
            artifacts: Vec::new(),
        };

        if let Some(data) = &cfg.data {
            // ── Step 4: Corpus ───────────────────────────────────────────────
            let corpus = CorpusLoader::new(data.clone(), cfg.col).load().in_stage(Stage::Load)?;
            tracing::info!(
                "Loaded {} passwords ({} distinct) from '{}'",
                corpus.len(),
                corpus.distinct(),
                data.display()
            );
            summary.passwords = corpus.len();

            // ── Step 5: Encoding ─────────────────────────────────────────────
            let dataset = encode(&corpus, &vocab, data).in_stage(Stage::Encode)?;

            // ── Step 6: Training ─────────────────────────────────────────────
            let (trained, history) = self.train(model, &dataset, &mut summary).in_stage(Stage::Train)?;
            model = trained;
            summary.history = history;

            // ── Step 7: Pattern report ───────────────────────────────────────
            let report = PatternAnalyzer::new().analyze(&corpus);
            if let Some(path) = &cfg.patterns {
                write_json_atomic(path, &report).in_stage(Stage::Analyze)?;
                tracing::info!("Pattern report written to '{}'", path.display());
                summary.artifacts.push(Artifact { kind: "patterns", path: path.clone() });
            }
        } else if cfg.patterns.is_some() {
            tracing::warn!("--patterns needs --data; no pattern report written");
        }

        // ── Step 8: Checkpoint + export ──────────────────────────────────────
        if let Some(path) = &cfg.save_ckpt {
            checkpoints.save(&model, path).in_stage(Stage::Export)?;
            summary.artifacts.push(Artifact { kind: "checkpoint", path: path.clone() });
        }

        if let Some(path) = &cfg.export_onnx {
            let written = export_onnx(&model, &vocab, path).in_stage(Stage::Export)?;
            summary.artifacts.extend(written);
        }

        tracing::info!("Run complete: {} artifacts written", summary.artifacts.len());
        Ok(summary)
    }

    fn train(
        &self,
        model:   PasswordLstm<TrainBackend>,
        dataset: &PasswordDataset,
        summary: &mut RunSummary,
    ) -> crate::error::Result<(PasswordLstm<TrainBackend>, Vec<EpochMetrics>)> {
        let cfg = &self.config;

        let logger = match &cfg.metrics {
            Some(path) => Some(MetricsLogger::create(path.clone())?),
            None       => None,
        };

        let trainer = Trainer::<TrainBackend>::new(
            TrainerConfig::new(cfg.epochs, cfg.seed).with_workers(cfg.workers),
            backend::default_device(),
        );
        let result = trainer.train(model, dataset, |m| match &logger {
            Some(l) => l.log(m),
            None    => Ok(()),
        })?;

        if let Some(l) = logger {
            summary.artifacts.push(Artifact { kind: "metrics", path: l.csv_path().to_path_buf() });
        }
        Ok(result)
    }
}

/// Fails with `ExportDependency` when the build has no graph exporter.
/// Checked before any work so a run never trains only to fail here.
#[cfg(feature = "onnx")]
fn export_available() -> crate::error::Result<()> {
    Ok(())
}

#[cfg(not(feature = "onnx"))]
fn export_available() -> crate::error::Result<()> {
    Err(PipelineError::ExportDependency("built without the `onnx` feature".into()))
}

#[cfg(feature = "onnx")]
fn export_onnx(
    model: &PasswordLstm<TrainBackend>,
    vocab: &Vocabulary,
    path:  &Path,
) -> crate::error::Result<Vec<Artifact>> {
    use burn::module::AutodiffModule;
    use crate::infra::export::OnnxExporter;

    let exported = OnnxExporter::export(&model.valid(), vocab, path)?;
    Ok(vec![
        Artifact { kind: "onnx",       path: exported.graph },
        Artifact { kind: "vocabulary", path: exported.vocab },
    ])
}

#[cfg(not(feature = "onnx"))]
fn export_onnx(
    _model: &PasswordLstm<TrainBackend>,
    _vocab: &Vocabulary,
    _path:  &Path,
) -> crate::error::Result<Vec<Artifact>> {
    export_available().map(|()| Vec::new())
}

/// Corpus → fixed-length training examples.
fn encode(corpus: &Corpus, vocab: &Vocabulary, source: &Path) -> crate::error::Result<PasswordDataset> {
    if corpus.is_empty() {
        return Err(PipelineError::CorpusEmpty { path: source.to_path_buf() });
    }
    let examples = SequenceEncoder::new(vocab).encode_all(corpus.passwords());
    let dataset  = PasswordDataset::new(examples);
    tracing::info!(
        "Encoded {} examples ({} real characters)",
        corpus.len(),
        dataset.total_tokens()
    );
    Ok(dataset)
}
