// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From a password export to batches of tensors:
//
//   export file (.txt / .csv / .json)
//       │
//       ▼
//   CorpusLoader      → passwords + frequency table
//       │
//       ▼
//   SequenceEncoder   → input / target / mask id sequences
//       │
//       ▼
//   PasswordDataset   → burn Dataset
//       │
//       ▼
//   EpochShuffler     → seeded batch order per epoch
//       │
//       ▼
//   PasswordBatcher   → burn Batcher, [batch, seq] tensors

/// Format-dispatched corpus reading
pub mod loader;

/// Fixed-length id sequences for training
pub mod encoder;

/// Implements burn's Dataset trait for encoded passwords
pub mod dataset;

/// Implements burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded, worker-count-independent batch ordering
pub mod shuffler;
