// ============================================================
// Layer 4 — Seeded Epoch Shuffler
// ============================================================
// Decides the batch order for every epoch from one explicit
// seed, then gathers the batch contents (optionally on a small
// worker pool).
//
// How one epoch is planned:
//   1. indices 0..N are permuted (Fisher-Yates via
//      rand::seq::SliceRandom)
//   2. the permutation is cut into chunks of batch_size; the
//      last chunk may be short
//   3. each chunk is gathered into a Vec<EncodedExample>
//
// Why can workers not change the result?
//   The permutation is drawn on the control thread from a
//   single ChaCha stream. Workers only copy examples by index,
//   and rayon's indexed collect keeps batch order. Batch order
//   and contents depend on (seed, dataset, epoch), never on the
//   number of workers.
//
// workers = 0 gathers on the calling thread.

use burn::data::dataset::Dataset;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::data::encoder::EncodedExample;
use crate::error::Result;

/// Produces a fresh permutation per epoch. The generator advances
/// across epochs, so epoch 2 differs from epoch 1 but both repeat
/// exactly on the next run with the same seed.
pub struct EpochShuffler {
    rng:        ChaCha8Rng,
    batch_size: usize,
}

impl EpochShuffler {
    pub fn new(seed: u64, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            batch_size,
        }
    }

    /// Index lists for one epoch; the last batch may be short.
    pub fn next_epoch(&mut self, len: usize) -> Vec<Vec<usize>> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut self.rng);

        order
            .chunks(self.batch_size)
            .map(<[usize]>::to_vec)
            .collect()
    }
}

/// Copies planned batches out of a dataset.
pub struct BatchPreparer {
    pool: Option<rayon::ThreadPool>,
}

impl BatchPreparer {
    /// `workers == 0` gathers on the calling thread.
    pub fn new(workers: usize) -> Result<Self> {
        let pool = if workers == 0 {
            None
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("batch-worker-{i}"))
                .build()?;
            Some(pool)
        };
        Ok(Self { pool })
    }

    pub fn gather<D>(&self, dataset: &D, plan: &[Vec<usize>]) -> Vec<Vec<EncodedExample>>
    where
        D: Dataset<EncodedExample>,
    {
        let fetch = |indices: &Vec<usize>| -> Vec<EncodedExample> {
            indices.iter().filter_map(|&i| dataset.get(i)).collect()
        };

        match &self.pool {
            // par_iter().collect() keeps plan order
            Some(pool) => pool.install(|| plan.par_iter().map(fetch).collect()),
            None       => plan.iter().map(fetch).collect(),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::PasswordDataset;
    use crate::data::encoder::SequenceEncoder;
    use crate::domain::vocab::Vocabulary;

    fn dataset(n: usize) -> PasswordDataset {
        let v   = Vocabulary::new();
        let enc = SequenceEncoder::new(&v);
        PasswordDataset::new((0..n).map(|i| enc.encode(&format!("pw{i}"))).collect())
    }

    #[test]
    fn test_every_index_once_per_epoch() {
        let mut s = EpochShuffler::new(42, 64);
        let plan  = s.next_epoch(150);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[2].len(), 22);

        let mut all: Vec<usize> = plan.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, (0..150).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a = EpochShuffler::new(7, 8);
        let mut b = EpochShuffler::new(7, 8);
        for _ in 0..3 {
            assert_eq!(a.next_epoch(100), b.next_epoch(100));
        }
    }

    #[test]
    fn test_different_seed_different_order() {
        let mut a = EpochShuffler::new(1, 8);
        let mut b = EpochShuffler::new(2, 8);
        assert_ne!(a.next_epoch(100), b.next_epoch(100));
    }

    #[test]
    fn test_epochs_differ() {
        let mut s = EpochShuffler::new(42, 8);
        assert_ne!(s.next_epoch(100), s.next_epoch(100));
    }

    #[test]
    fn test_empty_dataset_has_no_batches() {
        let mut s = EpochShuffler::new(42, 64);
        assert!(s.next_epoch(0).is_empty());
    }

    #[test]
    fn test_worker_count_does_not_change_batches() {
        let ds   = dataset(130);
        let plan = EpochShuffler::new(42, 16).next_epoch(ds.len());

        let inline   = BatchPreparer::new(0).unwrap().gather(&ds, &plan);
        let parallel = BatchPreparer::new(4).unwrap().gather(&ds, &plan);
        assert_eq!(inline, parallel);
        assert_eq!(inline.len(), plan.len());
    }
}
