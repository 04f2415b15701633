// ============================================================
// Layer 3 — PatternReport Domain Type
// ============================================================
// Corpus-wide structural statistics consumed by the browser
// extension. Serialises to the flat JSON record
//
//   { "masks": {..}, "numbers": {..}, "words": {..},
//     "zigzag": n, "password_counts": {..} }
//
// BTreeMap keeps the written artifact byte-identical between
// runs on the same corpus.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternReport {
    /// Character-class shape (e.g. "XXXXDDDS") → number of passwords with it.
    pub masks: BTreeMap<String, u64>,

    /// Digit character → number of passwords containing it at least once.
    pub numbers: BTreeMap<String, u64>,

    /// Every substring of 3..=7 characters → total occurrences.
    pub words: BTreeMap<String, u64>,

    /// Passwords mixing upper- and lower-case letters.
    pub zigzag: u64,

    /// Distinct password → frequency in the corpus.
    pub password_counts: BTreeMap<String, u64>,

    /// Passwords changed by the leet substitution table → occurrences.
    /// Kept in memory only; the artifact has no `mutations` field.
    #[serde(skip)]
    pub mutations: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialises_only_artifact_fields() {
        let mut r = PatternReport::default();
        r.mutations.insert("p@ss".into(), 1);
        r.zigzag = 3;

        let json: serde_json::Value = serde_json::to_value(&r).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["masks", "numbers", "words", "zigzag", "password_counts"]);
        assert_eq!(json["zigzag"], 3);
    }
}
