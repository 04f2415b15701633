// ============================================================
// Layer 4b — Corpus Analysis
// ============================================================
// Structural statistics computed straight from the Corpus. Runs
// without the model and is merged into the artifacts at the end
// of a run.

/// Masks, digit usage, substrings, leet mutations, case mixing
pub mod patterns;
