//! Deterministic random number generation.
//!
//! RULE: Nothing in the engine may call any platform RNG.
//! All randomness flows through a GameRng derived from the engine seed.
//!
//! Randomness only feeds informational output (the target marker drawn
//! on the tactical map). Deltas and warnings never depend on it.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

pub struct GameRng {
    inner: Pcg64Mcg,
}

impl GameRng {
    /// Create a stream from the engine seed and a stable stream index
    /// (the game's command sequence number).
    pub fn new(master_seed: u64, stream: u64) -> Self {
        let derived_seed = master_seed ^ (stream.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::Rng;
        assert!(n > 0, "n must be > 0");
        self.inner.gen_range(0..n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_and_stream_repeat() {
        let mut a = GameRng::new(42, 7);
        let mut b = GameRng::new(42, 7);
        for _ in 0..16 {
            assert_eq!(a.next_u64_below(1_000_000), b.next_u64_below(1_000_000));
        }
    }

    #[test]
    fn below_stays_in_range() {
        let mut rng = GameRng::new(1, 1);
        for _ in 0..1000 {
            assert!(rng.next_u64_below(100) < 100);
        }
    }
}
