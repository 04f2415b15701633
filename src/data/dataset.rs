// ============================================================
// Layer 4 — Password Dataset
// ============================================================
// Wraps the encoded passwords in Burn's Dataset trait.
//
// What is a Dataset here?
//   Random access by index plus a length. The shuffler picks
//   the indices for each batch; the dataset only hands back
//   clones of the examples it owns.
//
// The dataset is built once per run and never modified, so
// every epoch reads exactly the same examples.
//
// Reference: Burn Book §4 (Dataset)

use burn::data::dataset::Dataset;

use crate::data::encoder::EncodedExample;

/// Encoded passwords exposed through burn's Dataset trait.
#[derive(Debug, Clone)]
pub struct PasswordDataset {
    examples: Vec<EncodedExample>,
}

impl PasswordDataset {
    pub fn new(examples: Vec<EncodedExample>) -> Self { Self { examples } }

    /// Unmasked positions across the whole dataset.
    pub fn total_tokens(&self) -> usize {
        self.examples.iter().map(EncodedExample::tokens).sum()
    }
}

impl Dataset<EncodedExample> for PasswordDataset {
    fn get(&self, index: usize) -> Option<EncodedExample> {
        self.examples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.examples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::encoder::SequenceEncoder;
    use crate::domain::vocab::Vocabulary;

    #[test]
    fn test_get_and_tokens() {
        let v   = Vocabulary::new();
        let enc = SequenceEncoder::new(&v);
        let ds  = PasswordDataset::new(vec![enc.encode("abc"), enc.encode("")]);

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.total_tokens(), 3);
        assert_eq!(ds.get(0), Some(enc.encode("abc")));
        assert!(ds.get(2).is_none());
        assert!(format!("{ds:?}").starts_with("PasswordDataset"));
    }
}
