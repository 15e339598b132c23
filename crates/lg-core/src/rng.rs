//! Random number generation for level generation
//!
//! Every random decision the generator makes goes through [`RandomSource`],
//! so a run can be replayed from its seed or driven by a scripted source in
//! tests. [`GameRng`] is the default, seeded ChaCha implementation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of randomness used by the partitioner, materializer and populator.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn value(&mut self) -> f64;

    /// Uniform value in `[lo, hi]`. Returns `lo` when the range is empty.
    fn range_f64(&mut self, lo: f64, hi: f64) -> f64;

    /// Uniform integer in `[lo, hi]` (inclusive). Returns `lo` when `hi <= lo`.
    fn range_usize(&mut self, lo: usize, hi: usize) -> usize;

    /// Fair coin flip
    fn coin(&mut self) -> bool {
        self.value() > 0.5
    }

    /// Choose a random element from a slice
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.range_usize(0, items.len() - 1)])
        }
    }
}

/// Seeded generator
///
/// Wraps ChaCha8Rng for reproducible generation.
/// Note: RNG state is not serialized - a deserialized rng restarts from its seed.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

// Custom serialization - only serialize seed, recreate RNG on deserialize
impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(GameRng::new(seed))
    }
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn value(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        if !(hi > lo) {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    fn range_usize(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let v = rng.value();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_range_f64_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let v = rng.range_f64(5.0, 7.5);
            assert!((5.0..=7.5).contains(&v));
        }
    }

    #[test]
    fn test_range_usize_inclusive() {
        let mut rng = GameRng::new(7);
        let mut seen = [false; 4];
        for _ in 0..1000 {
            let n = rng.range_usize(1, 3);
            assert!((1..=3).contains(&n));
            seen[n] = true;
        }
        assert!(seen[1] && seen[2] && seen[3]);
    }

    #[test]
    fn test_empty_ranges() {
        let mut rng = GameRng::new(42);
        assert_eq!(rng.range_f64(3.0, 3.0), 3.0);
        assert_eq!(rng.range_f64(3.0, 1.0), 3.0);
        assert_eq!(rng.range_usize(4, 4), 4);
        assert_eq!(rng.range_usize(4, 2), 4);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn test_reproducibility() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.range_f64(0.0, 100.0), rng2.range_f64(0.0, 100.0));
            assert_eq!(rng1.range_usize(0, 9), rng2.range_usize(0, 9));
        }
    }

    #[test]
    fn test_serde_keeps_seed() {
        let rng = GameRng::new(1234);
        let json = serde_json::to_string(&rng).unwrap();
        let restored: GameRng = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.seed(), 1234);
    }
}
