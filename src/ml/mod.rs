// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All model math lives here:
//
//   backend.rs  — which burn backend trains and where
//
//   model.rs    — embedding → 2 stacked LSTMs → vocabulary
//                 logits, plus the masked cross-entropy loss
//
//   trainer.rs  — fixed-epoch AdamW loop with seeded batch
//                 order and per-epoch perplexity
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Hochreiter & Schmidhuber (1997) Long Short-Term Memory

/// Backend aliases and seeding
pub mod backend;

/// Character-level LSTM language model
pub mod model;

/// Training loop
pub mod trainer;
