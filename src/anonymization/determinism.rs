//! Determinism controller
//!
//! Every anonymization operation can be run as a pure function of its parameters: a seed is
//! derived from the operation name, its serialized parameters and the global seed, and the
//! owner's random stream is swapped for one seeded with it for the duration of the call.
//! The swap is undone by a drop guard, so the previous stream is restored on every exit
//! path, nested calls restore in LIFO order, and no other owner's stream is touched.

use std::ops::{Deref, DerefMut};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Seed used when determinism is on and no seed is configured
pub const DEFAULT_SEED: u64 = 740;

/// A private random stream owned by a single anonymizer
#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: StdRng,
}

impl RandomStream {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// Anything that owns a [`RandomStream`] that can be temporarily reseeded
pub trait StreamOwner {
    fn stream_mut(&mut self) -> &mut RandomStream;
}

/// Derives a per-call seed from an operation and its parameters.
///
/// Parameters are serialized with `serde_json`, which keeps tuple and struct field order,
/// so the same ordered parameters always hash to the same seed.
pub fn derive_seed<P: Serialize + ?Sized>(operation: &str, params: &P, global_seed: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(operation.as_bytes());
    hasher.update([0u8]);
    if let Ok(bytes) = serde_json::to_vec(params) {
        hasher.update(&bytes);
    }
    hasher.update([0u8]);
    hasher.update(global_seed.to_be_bytes());
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head)
}

/// Swaps in a seeded stream and restores the captured one on drop
pub struct ScopedSeed<'a, T: StreamOwner> {
    owner: &'a mut T,
    saved: Option<RandomStream>,
}

impl<'a, T: StreamOwner> ScopedSeed<'a, T> {
    pub fn new(owner: &'a mut T, seed: u64) -> Self {
        let saved = std::mem::replace(owner.stream_mut(), RandomStream::seeded(seed));
        Self {
            owner,
            saved: Some(saved),
        }
    }
}

impl<T: StreamOwner> Deref for ScopedSeed<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.owner
    }
}

impl<T: StreamOwner> DerefMut for ScopedSeed<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.owner
    }
}

impl<T: StreamOwner> Drop for ScopedSeed<'_, T> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            *self.owner.stream_mut() = saved;
        }
    }
}
