use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Stable 64-bit hash of a task id: the first 8 bytes of its SHA-256 digest.
///
/// `DefaultHasher` is not stable across Rust releases, and synthesized
/// decisions must reproduce across builds.
pub fn task_hash(task_id: &str) -> u64 {
    let digest = Sha256::digest(task_id.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Combine caller seed material into the seed of one task's stream.
pub fn make_seed(seed: u64, turn_index: u64, task_id: &str) -> u64 {
    seed ^ turn_index ^ task_hash(task_id)
}

/// Deterministic stream of draws from an integer seed.
pub struct SeededStream {
    rng: SmallRng,
}

impl SeededStream {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn for_task(seed: u64, turn_index: u64, task_id: &str) -> Self {
        Self::new(make_seed(seed, turn_index, task_id))
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform float in `[low, high)`; returns `low` for an empty range.
    pub fn range_f64(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        low + self.next_f64() * (high - low)
    }

    /// Uniform integer in `[low, high]`.
    pub fn range_u32(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..items.len());
        items.get(idx)
    }

    /// Weighted pick over `(item, weight)` pairs. Zero-weight items never win.
    pub fn pick_weighted<'a, T>(&mut self, items: &'a [(T, u32)]) -> Option<&'a T> {
        let total: u32 = items.iter().map(|(_, w)| *w).sum();
        if total == 0 {
            return None;
        }
        let mut roll = self.rng.random_range(0..total);
        for (item, weight) in items {
            if roll < *weight {
                return Some(item);
            }
            roll -= weight;
        }
        None
    }
}
