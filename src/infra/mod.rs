// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches artifact files:
//
//   artifacts.rs    — temp-file-then-rename writes shared by
//                     every artifact below
//
//   checkpoint.rs   — model parameters in a versioned envelope
//                     that records the architecture, so a
//                     mismatched checkpoint is refused up front
//
//   metrics.rs      — per-epoch CSV (loss, perplexity, tokens)
//
//   vocab_store.rs  — the character → id JSON map the
//                     extension encodes with
//
//   export/         — ONNX graph writer (protobuf wire format,
//                     no runtime dependency)
//
// vocab_store and export only exist in builds with the `onnx`
// feature (on by default).

/// Atomic file writes
pub mod artifacts;

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Vocabulary JSON next to the exported graph
#[cfg(feature = "onnx")]
pub mod vocab_store;

/// ONNX graph export
#[cfg(feature = "onnx")]
pub mod export;
