// ============================================================
// Layer 5 — Compute Backend
// ============================================================
// Which Burn backend the model trains on.
//
//   InnerBackend   NdArray (CPU) by default, Wgpu with the
//                  `wgpu` feature
//   TrainBackend   Autodiff<InnerBackend>, records the graph
//                  so loss.backward() can compute gradients
//
// Parameter initialisation draws from the backend's global
// RNG. Seeding it right before the model is built makes two
// runs with the same --seed start from identical weights.
//
// Reference: Burn Book §2 (Backends)

use burn::tensor::backend::Backend;

#[cfg(not(feature = "wgpu"))]
pub type InnerBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type InnerBackend = burn::backend::Wgpu;

pub type TrainBackend = burn::backend::Autodiff<InnerBackend>;

pub fn default_device() -> <InnerBackend as Backend>::Device {
    Default::default()
}

/// Seed the backend RNG used for parameter initialisation.
pub fn seed(seed: u64) {
    TrainBackend::seed(seed);
}

/// Serialises tests that build models. The backend RNG is global to
/// the process, and a test running in parallel would otherwise draw
/// from it between another test's `seed` and its initialisation.
#[cfg(test)]
pub(crate) fn rng_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::Mutex;

    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
