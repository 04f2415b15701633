// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Coordinates the other layers for one run. No model math,
// no parsing, no printing here.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The load → encode → train → analyze → export workflow
pub mod train_use_case;
