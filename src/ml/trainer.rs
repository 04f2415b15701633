// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Fixed-budget minibatch training: no validation split, no
// early stopping, no learning-rate schedule. The epoch count is
// the only stopping criterion.
//
// Per batch:
//   logits = model(input)                        [B, L, V]
//   loss   = Σ CE(logits, target) · mask / Σ mask
//   AdamW step (decoupled weight decay)
//
// Per epoch:
//   perplexity = exp(Σ batch_loss · tokens / Σ tokens)
//
// What is perplexity?
//   exp of the mean per-character loss. A model guessing
//   uniformly over the 96 ids scores 96; a model that always
//   knows the next character scores 1.
//
// Why weight batch losses by tokens?
//   Each batch loss is already a mean over its real characters.
//   Weighting by the token count turns the epoch figure into a
//   mean over characters, not over batches.
//
// Batches whose mask is all zero carry no signal; they are
// skipped before the backward pass.
//
// Reference: Burn Book §5 (Training)
//            Loshchilov & Hutter (2019) AdamW

use burn::{
    data::dataloader::batcher::Batcher,
    data::dataset::Dataset,
    optim::{AdamWConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::{
    batcher::PasswordBatcher,
    dataset::PasswordDataset,
    shuffler::{BatchPreparer, EpochShuffler},
};
use crate::error::Result;
use crate::infra::metrics::EpochMetrics;
use crate::ml::model::PasswordLstm;

pub const BATCH_SIZE:    usize = 64;
pub const LEARNING_RATE: f64   = 3e-4;
pub const WEIGHT_DECAY:  f32   = 0.01;

#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub epochs:       usize,
    pub batch_size:   usize,
    pub lr:           f64,
    pub weight_decay: f32,
    pub seed:         u64,
    pub workers:      usize,
}

impl TrainerConfig {
    pub fn new(epochs: usize, seed: u64) -> Self {
        Self {
            epochs,
            batch_size:   BATCH_SIZE,
            lr:           LEARNING_RATE,
            weight_decay: WEIGHT_DECAY,
            seed,
            workers:      0,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[cfg(test)]
    pub fn with_lr(mut self, lr: f64) -> Self {
        self.lr = lr;
        self
    }
}

pub struct Trainer<B: AutodiffBackend> {
    cfg:    TrainerConfig,
    device: B::Device,
}

impl<B: AutodiffBackend> Trainer<B> {
    pub fn new(cfg: TrainerConfig, device: B::Device) -> Self {
        Self { cfg, device }
    }

    /// Train `model` for the configured number of epochs.
    ///
    /// `on_epoch` sees each epoch's metrics as soon as the epoch ends;
    /// an error from it aborts training.
    pub fn train<F>(
        &self,
        mut model:    PasswordLstm<B>,
        dataset:      &PasswordDataset,
        mut on_epoch: F,
    ) -> Result<(PasswordLstm<B>, Vec<EpochMetrics>)>
    where
        F: FnMut(&EpochMetrics) -> Result<()>,
    {
        let cfg = &self.cfg;

        let mut optim    = AdamWConfig::new()
            .with_weight_decay(cfg.weight_decay)
            .init();
        let batcher      = PasswordBatcher::<B>::new(self.device.clone());
        let mut shuffler = EpochShuffler::new(cfg.seed, cfg.batch_size);
        let preparer     = BatchPreparer::new(cfg.workers)?;

        tracing::info!(
            "Training on {} passwords ({} tokens), batch={}, epochs={}, lr={}, seed={}, workers={}",
            dataset.len(),
            dataset.total_tokens(),
            cfg.batch_size,
            cfg.epochs,
            cfg.lr,
            cfg.seed,
            cfg.workers,
        );

        let mut history = Vec::with_capacity(cfg.epochs);

        for epoch in 1..=cfg.epochs {
            let plan    = shuffler.next_epoch(dataset.len());
            let batches = preparer.gather(dataset, &plan);

            let mut loss_sum = 0.0f64;
            let mut tokens   = 0usize;
            let mut steps    = 0usize;

            for items in batches {
                let batch = batcher.batch(items);
                if batch.tokens == 0 {
                    tracing::debug!("Epoch {}: skipping batch with no real characters", epoch);
                    continue;
                }

                let loss = model.forward_loss(batch.input, batch.target, batch.mask, batch.tokens);
                let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
                loss_sum += loss_val * batch.tokens as f64;
                tokens   += batch.tokens;
                steps    += 1;

                // Backward pass + AdamW update
                let grads = loss.backward();
                let grads = GradientsParams::from_grads(grads, &model);
                model = optim.step(cfg.lr, model, grads);
            }

            let metrics = EpochMetrics::new(epoch, loss_sum, tokens, steps);
            if tokens == 0 {
                tracing::warn!("Epoch {}: no unmasked positions, perplexity undefined", epoch);
            }

            println!("Epoch {}: ppl={:.2}", epoch, metrics.perplexity);
            tracing::info!(
                "Epoch {:>3}/{} | loss={:.4} | ppl={:.2} | steps={}",
                epoch, cfg.epochs, metrics.mean_loss, metrics.perplexity, steps,
            );

            on_epoch(&metrics)?;
            history.push(metrics);
        }

        tracing::info!("Training complete!");
        Ok((model, history))
    }
}
