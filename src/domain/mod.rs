// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types shared by every other layer. No burn types,
// no file I/O.

/// Fixed character ↔ id mapping
pub mod vocab;

/// Loaded passwords and their frequencies
pub mod corpus;

/// Structural statistics written for the extension
pub mod report;

/// Abstractions implemented by the data layer
pub mod traits;
