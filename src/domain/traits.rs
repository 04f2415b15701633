// ============================================================
// Layer 3 — Core Traits
// ============================================================

use crate::domain::corpus::Corpus;
use crate::error::Result;

// ─── PasswordSource ───────────────────────────────────────────────────────────
/// Anything that can produce a password corpus.
///
/// Implementations:
///   - CorpusLoader → text, tabular or record files on disk
pub trait PasswordSource {
    /// Read every password. Fails rather than returning an empty corpus.
    fn load(&self) -> Result<Corpus>;
}
