// ============================================================
// Layer 5 — Password LSTM
// ============================================================
// A character-level language model:
//
//   input ids      [B, L]
//   Embedding      [B, L, 64]
//   LSTM × 2       [B, L, 128]
//   Linear head    [B, L, 96]   one logit per vocabulary id
//
// What does an LSTM add over a plain embedding?
//   It carries a hidden state from left to right, so the
//   prediction at position t depends on every character before
//   it, not only on the current one.
//
// Every forward pass starts from a zero state; nothing is
// remembered between calls or between passwords.
//
// The loss is cross-entropy over the head's logits, masked so
// padding positions contribute nothing.
//
// Reference: Burn Book §3 (Building Blocks)
//            Hochreiter & Schmidhuber (1997) Long Short-Term Memory

use burn::{
    nn::{
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
    tensor::activation::log_softmax,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct PasswordLstmConfig {
    #[config(default = 96)]
    pub vocab_size: usize,
    #[config(default = 64)]
    pub embed_dim:  usize,
    #[config(default = 128)]
    pub hidden_dim: usize,
    #[config(default = 2)]
    pub num_layers: usize,
}

impl PasswordLstmConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PasswordLstm<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embed_dim).init(device);
        let layers: Vec<Lstm<B>> = (0..self.num_layers)
            .map(|i| {
                let d_input = if i == 0 { self.embed_dim } else { self.hidden_dim };
                LstmConfig::new(d_input, self.hidden_dim, true).init(device)
            })
            .collect();
        let head = LinearConfig::new(self.hidden_dim, self.vocab_size).init(device);
        PasswordLstm { embedding, layers, head }
    }

    /// Two configs describe the same parameter shapes.
    pub fn same_architecture(&self, other: &Self) -> bool {
        self.vocab_size == other.vocab_size
            && self.embed_dim == other.embed_dim
            && self.hidden_dim == other.hidden_dim
            && self.num_layers == other.num_layers
    }
}

/// Character ids → embedding → stacked LSTMs → per-position logits.
#[derive(Module, Debug)]
pub struct PasswordLstm<B: Backend> {
    pub embedding: Embedding<B>,
    pub layers:    Vec<Lstm<B>>,
    pub head:      Linear<B>,
}

impl<B: Backend> PasswordLstm<B> {
    /// input: [batch, seq] → logits: [batch, seq, vocab]
    ///
    /// Every call starts from a zero hidden state.
    pub fn forward(&self, input: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let mut x = self.embedding.forward(input);
        for layer in &self.layers {
            let (hidden, _state) = layer.forward(x, None);
            x = hidden;
        }
        self.head.forward(x)
    }

    pub fn forward_loss(
        &self,
        input:  Tensor<B, 2, Int>,
        target: Tensor<B, 2, Int>,
        mask:   Tensor<B, 2, Int>,
        tokens: usize,
    ) -> Tensor<B, 1> {
        masked_cross_entropy(self.forward(input), target, mask, tokens)
    }
}

/// Mean cross-entropy over unmasked positions.
///
/// logits [batch, seq, vocab], target/mask [batch, seq]. `tokens` is the
/// mask sum; a batch with no real positions returns 0 instead of dividing
/// by zero.
pub fn masked_cross_entropy<B: Backend>(
    logits: Tensor<B, 3>,
    target: Tensor<B, 2, Int>,
    mask:   Tensor<B, 2, Int>,
    tokens: usize,
) -> Tensor<B, 1> {
    let [batch_size, seq_len, _] = logits.dims();

    let log_probs = log_softmax(logits, 2);
    let picked = log_probs
        .gather(2, target.unsqueeze_dim::<3>(2))
        .reshape([batch_size, seq_len]);

    let nll = picked.neg() * mask.float();
    nll.sum() / tokens.max(1) as f64
}
