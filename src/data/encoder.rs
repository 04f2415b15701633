// ============================================================
// Layer 4 — Sequence Encoder
// ============================================================
// Turns a raw password into three fixed-length id sequences:
//
//   password  "abc"
//   input     [a, b, c, PAD, PAD, ...]
//   target    [b, c, PAD, PAD, PAD, ...]   (input shifted left)
//   mask      [1, 1, 1, 0,   0,   ...]
//
// What does the model learn from this?
//   At every position it sees the characters so far and is
//   scored on the next one. The target is the input moved one
//   step left.
//
// The last real position predicts PAD, so the model learns
// where passwords end without a dedicated end token.
//
// Why a mask?
//   Padding positions are not part of the password. The mask
//   zeroes their loss, and the trainer divides by the mask sum
//   so short and long passwords weigh the same per character.
//
// Passwords longer than MAX_SEQ are cut; characters outside
// the vocabulary become UNK.

use serde::{Deserialize, Serialize};

use crate::domain::vocab::{Vocabulary, PAD_ID};

/// Every encoded sequence is exactly this long.
pub const MAX_SEQ: usize = 50;

/// One training example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedExample {
    pub input:  Vec<u32>,
    pub target: Vec<u32>,
    pub mask:   Vec<u32>,
}

impl EncodedExample {
    /// Number of unmasked positions.
    pub fn tokens(&self) -> usize {
        self.mask.iter().filter(|&&m| m != 0).count()
    }
}

pub struct SequenceEncoder<'a> {
    vocab:   &'a Vocabulary,
    max_seq: usize,
}

impl<'a> SequenceEncoder<'a> {
    pub fn new(vocab: &'a Vocabulary) -> Self {
        Self { vocab, max_seq: MAX_SEQ }
    }

    pub fn encode(&self, password: &str) -> EncodedExample {
        let ids: Vec<u32> = password
            .chars()
            .take(self.max_seq)
            .map(|c| self.vocab.encode(c))
            .collect();
        let len = ids.len();

        let mut input = ids.clone();
        input.resize(self.max_seq, PAD_ID);

        let mut target: Vec<u32> = ids.into_iter().skip(1).collect();
        target.resize(self.max_seq, PAD_ID);

        let mut mask = vec![1u32; len];
        mask.resize(self.max_seq, 0);

        EncodedExample { input, target, mask }
    }

    pub fn encode_all(&self, passwords: &[String]) -> Vec<EncodedExample> {
        passwords.iter().map(|p| self.encode(p)).collect()
    }
}
