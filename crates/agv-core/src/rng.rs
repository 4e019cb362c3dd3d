//! Deterministic engine-wide PRNG.
//!
//! # Why not `rand`
//!
//! Testable property 1 (§8) requires byte-identical map generation and
//! auto-pilot choices for a given seed *across independent implementations*
//! of this spec (this crate is one port among several; a JS reference
//! implementation is another). That guarantee only holds if every port runs
//! the exact same bit-mixing steps — `rand::rngs::SmallRng` does not commit
//! to a stable algorithm across crate versions and targets, so it cannot be
//! used here. `Rng` instead hand-rolls the generator `spec.md` §4.1
//! specifies verbatim: a 32-bit `seed` advanced by
//!
//! ```text
//! t = seed += 0x6D2B79F5
//! t = (t ^ t >> 15) * (t | 1)
//! t ^= t + (t ^ t >> 7) * (t | 61)
//! return (t ^ t >> 14) / 2^32
//! ```
//!
//! All arithmetic is wrapping unsigned 32-bit, matching the reference
//! implementation's use of JavaScript's `>>>`/`Math.imul`-free integer ops.

/// Derive a 32-bit seed from a configuration string via the polynomial hash
/// `h = h*31 + c`, truncated to 32 bits at every step (mirroring JS's `| 0`
/// int32 coercion) and taken absolute at the end.
pub fn seed_from_str(s: &str) -> u32 {
    let mut h: i32 = 0;
    for c in s.chars() {
        h = h.wrapping_mul(31).wrapping_add(c as i32);
    }
    h.unsigned_abs()
}

/// Deterministic 32-bit non-cryptographic generator (mulberry32-family).
///
/// Used for both seeded map generation and auto-pilot target selection —
/// the same stream, not a separate one per concern, since §4.1 only
/// specifies a single engine-wide generator.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rng {
    seed: u32,
}

impl Rng {
    /// Seed directly from a raw 32-bit value.
    #[inline]
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Seed from a configuration string, via [`seed_from_str`].
    #[inline]
    pub fn from_str_seed(s: &str) -> Self {
        Self::new(seed_from_str(s))
    }

    /// Advance the generator and return the next raw 32-bit word.
    fn next_u32(&mut self) -> u32 {
        self.seed = self.seed.wrapping_add(0x6D2B_79F5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value in `[0.0, 1.0)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0 // 2^32
    }

    /// `true` with probability `p` (clamped to `[0, 1]`).
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p.clamp(0.0, 1.0)
    }

    /// Integer uniformly distributed in `0..bound` (`bound` must be > 0).
    pub fn gen_range(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "gen_range bound must be positive");
        (self.next_f64() * bound as f64) as usize % bound
    }

    /// Fisher-Yates in-place shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        if slice.len() < 2 {
            return;
        }
        for i in (1..slice.len()).rev() {
            let j = self.gen_range(i + 1);
            slice.swap(i, j);
        }
    }

    /// Choose a uniformly random element from a non-empty slice.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            slice.get(self.gen_range(slice.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Rng::new(1);
        let mut b = Rng::new(2);
        let seq_a: Vec<f64> = (0..10).map(|_| a.next_f64()).collect();
        let seq_b: Vec<f64> = (0..10).map(|_| b.next_f64()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let mut r = Rng::new(7);
        for _ in 0..10_000 {
            let v = r.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn string_seed_is_deterministic() {
        assert_eq!(seed_from_str("warehouse-42"), seed_from_str("warehouse-42"));
    }

    #[test]
    fn string_seed_differs_for_different_strings() {
        assert_ne!(seed_from_str("a"), seed_from_str("b"));
    }

    #[test]
    fn gen_range_stays_in_bounds() {
        let mut r = Rng::new(99);
        for _ in 0..1_000 {
            assert!(r.gen_range(7) < 7);
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut r = Rng::new(5);
        let mut v: Vec<u32> = (0..20).collect();
        r.shuffle(&mut v);
        let mut sorted = v.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
