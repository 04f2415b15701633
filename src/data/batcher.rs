// ============================================================
// Layer 4 — Password Batcher
// ============================================================
// Implements burn's Batcher trait: stacks N encoded passwords
// into [N, MAX_SEQ] integer tensors.
//
// What is a Batcher?
//   A Batcher takes a list of individual examples and stacks
//   them into one set of batch tensors, so the model processes
//   many passwords in a single forward pass.
//
// How batching works here:
//   Input:  Vec of N EncodedExamples, each MAX_SEQ long
//   Output: PasswordBatch with input/target/mask of [N, MAX_SEQ]
//
//   [s1_t1, ..., s1_tS, s2_t1, ..., sN_tS] → reshape [N, S]
//
// Every example is already padded to MAX_SEQ by the encoder,
// so no dynamic padding happens here.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::encoder::EncodedExample;

// ─── PasswordBatch ────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct PasswordBatch<B: Backend> {
    /// Character ids — [batch, seq]
    pub input: Tensor<B, 2, Int>,

    /// Next-character ids — [batch, seq]
    pub target: Tensor<B, 2, Int>,

    /// 1 = real character, 0 = padding — [batch, seq]
    pub mask: Tensor<B, 2, Int>,

    /// Sum of `mask`, counted on the host so the loss can be
    /// guarded without a device round trip.
    pub tokens: usize,
}

// ─── PasswordBatcher ──────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct PasswordBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> PasswordBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    fn stack(&self, rows: &[Vec<u32>], batch_size: usize, seq_len: usize) -> Tensor<B, 2, Int> {
        let flat: Vec<i32> = rows
            .iter()
            .flat_map(|row| row.iter().map(|&x| x as i32))
            .collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len])
    }
}

impl<B: Backend> Batcher<EncodedExample, PasswordBatch<B>> for PasswordBatcher<B> {
    fn batch(&self, items: Vec<EncodedExample>) -> PasswordBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map_or(0, |e| e.input.len());
        let tokens     = items.iter().map(EncodedExample::tokens).sum();

        let inputs:  Vec<Vec<u32>> = items.iter().map(|e| e.input.clone()).collect();
        let targets: Vec<Vec<u32>> = items.iter().map(|e| e.target.clone()).collect();
        let masks:   Vec<Vec<u32>> = items.into_iter().map(|e| e.mask).collect();

        PasswordBatch {
            input:  self.stack(&inputs, batch_size, seq_len),
            target: self.stack(&targets, batch_size, seq_len),
            mask:   self.stack(&masks, batch_size, seq_len),
            tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::encoder::{SequenceEncoder, MAX_SEQ};
    use crate::domain::vocab::Vocabulary;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes_and_tokens() {
        let v   = Vocabulary::new();
        let enc = SequenceEncoder::new(&v);
        let items = vec![enc.encode("abc"), enc.encode("hello!"), enc.encode("")];

        let batcher = PasswordBatcher::<NdArray>::new(Default::default());
        let batch   = batcher.batch(items);

        assert_eq!(batch.input.dims(), [3, MAX_SEQ]);
        assert_eq!(batch.target.dims(), [3, MAX_SEQ]);
        assert_eq!(batch.mask.dims(), [3, MAX_SEQ]);
        assert_eq!(batch.tokens, 9);

        let mask_sum: i64 = batch.mask.sum().into_scalar().elem::<i64>();
        assert_eq!(mask_sum, 9);
    }

    #[test]
    fn test_row_order_is_kept() {
        let v   = Vocabulary::new();
        let enc = SequenceEncoder::new(&v);
        let batcher = PasswordBatcher::<NdArray>::new(Default::default());
        let batch   = batcher.batch(vec![enc.encode("b"), enc.encode("a")]);

        let first_col: Vec<i64> = batch
            .input
            .slice([0..2, 0..1])
            .into_data()
            .iter::<i64>()
            .collect();
        assert_eq!(first_col, vec![2, 1]);
    }
}
