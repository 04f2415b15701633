// ============================================================
// Layer 3 — Corpus Domain Type
// ============================================================
// The passwords read from the user's export file, in file
// order, plus how often each distinct password occurs.

use std::collections::BTreeMap;

/// Raw passwords plus their frequency table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    passwords: Vec<String>,
    counts:    BTreeMap<String, u64>,
}

impl Corpus {
    pub fn new(passwords: Vec<String>) -> Self {
        let mut counts = BTreeMap::new();
        for p in &passwords {
            *counts.entry(p.clone()).or_insert(0) += 1;
        }
        Self { passwords, counts }
    }

    pub fn passwords(&self) -> &[String] {
        &self.passwords
    }

    /// Distinct password → number of occurrences.
    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }
}

impl FromIterator<String> for Corpus {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
