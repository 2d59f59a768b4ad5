//! Random number generation for layout generators
//!
//! Uses a seeded ChaCha RNG so a seed reproduces a layout exactly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of uniform draws averaged by [`DungeonRng::approx_normal`]
const APPROX_NORMAL_DRAWS: i32 = 4;

/// Dungeon random number generator
///
/// Wraps ChaCha8Rng and remembers its seed so a run can be reported and replayed.
#[derive(Debug, Clone)]
pub struct DungeonRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl DungeonRng {
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

    /// Uniform integer in `lo..hi`
    ///
    /// Returns `lo` if the range is empty.
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// Uniform integer in `lo..=hi`
    ///
    /// Returns `lo` if the range is empty.
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Index in `0..len`, or 0 for an empty collection
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    /// Integer in `lo..=hi` biased toward the middle of the range
    ///
    /// Averages four uniform draws, which approximates a normal distribution
    /// and makes the extremes rare.
    pub fn approx_normal(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let sum: i32 = (0..APPROX_NORMAL_DRAWS)
            .map(|_| self.range_inclusive(lo, hi))
            .sum();
        sum.div_euclid(APPROX_NORMAL_DRAWS)
    }

    /// Returns true with probability `p` (clamped to 0..=1)
    pub fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.rng.gen_bool(p)
    }

    /// Returns true with probability 1/n
    pub fn one_in(&mut self, n: u32) -> bool {
        n != 0 && self.rng.gen_range(0..n) == 0
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }

    /// Choose an element with probability proportional to its weight
    ///
    /// Returns None if the slice is empty or every weight is zero.
    pub fn choose_weighted<'a, T>(
        &mut self,
        items: &'a [T],
        weight: impl Fn(&T) -> u32,
    ) -> Option<&'a T> {
        let total: u64 = items.iter().map(|item| u64::from(weight(item))).sum();
        if total == 0 {
            return None;
        }
        let mut r = self.rng.gen_range(0..total);
        for item in items {
            let w = u64::from(weight(item));
            if r < w {
                return Some(item);
            }
            r -= w;
        }
        None
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

impl Default for DungeonRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        let mut rng = DungeonRng::new(42);
        for _ in 0..1000 {
            let n = rng.range(-3, 10);
            assert!((-3..10).contains(&n));
        }
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let mut rng = DungeonRng::new(42);
        let mut seen_hi = false;
        for _ in 0..1000 {
            let n = rng.range_inclusive(1, 6);
            assert!((1..=6).contains(&n));
            seen_hi |= n == 6;
        }
        assert!(seen_hi);
    }

    #[test]
    fn test_approx_normal_bounds() {
        let mut rng = DungeonRng::new(7);
        for _ in 0..1000 {
            let n = rng.approx_normal(3, 9);
            assert!((3..=9).contains(&n));
        }
        assert_eq!(rng.approx_normal(5, 5), 5);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = DungeonRng::new(1);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn test_choose_weighted_skips_zero_weights() {
        let mut rng = DungeonRng::new(3);
        let items = [("never", 0), ("always", 5)];
        for _ in 0..100 {
            let picked = rng.choose_weighted(&items, |(_, w)| *w).unwrap();
            assert_eq!(picked.0, "always");
        }
        let empty: [(&str, u32); 1] = [("none", 0)];
        assert!(rng.choose_weighted(&empty, |(_, w)| *w).is_none());
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = DungeonRng::new(9);
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_reproducibility() {
        let mut rng1 = DungeonRng::new(42);
        let mut rng2 = DungeonRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.range(0, 100), rng2.range(0, 100));
        }
        assert_eq!(rng1.seed(), 42);
    }

    #[test]
    fn test_empty_ranges() {
        let mut rng = DungeonRng::new(42);
        assert_eq!(rng.range(5, 5), 5);
        assert_eq!(rng.range_inclusive(5, 2), 5);
        assert_eq!(rng.index(0), 0);
        assert!(!rng.one_in(0));
        assert!(rng.choose::<u8>(&[]).is_none());
    }
}
