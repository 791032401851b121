// Seeded, portable random numbers for asteroid generation.
//
// `AsteroidRng` is xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64
// seed expansion, written out by hand so that a given seed carves the same
// tunnels on every platform and toolchain. The generators in
// `asteroid_sim::generate` never touch OS entropy; they take any
// `RandomSource`, which lets tests drive them with a fixed script of draws.
//
// The trait's provided methods (`next_f64`, `random_bool`, ranges) are built
// only on `next_u64`, so an implementor supplies one method and inherits the
// exact sampling behaviour of `AsteroidRng`.
//
// **Critical constraint: determinism.** Integer arithmetic only inside the
// generator core. Floating point appears solely when converting an already
// drawn `u64` into `[0, 1)`.

use serde::{Deserialize, Serialize};

/// A stream of uniformly distributed 64-bit values plus the derived
/// samplers the generators need.
pub trait RandomSource {
    /// Next raw 64-bit value.
    fn next_u64(&mut self) -> u64;

    /// Uniform `f64` in `[0, 1)` from the upper 53 bits of a draw.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// `true` with probability `p`. `p <= 0.0` is always false and
    /// `p >= 1.0` always true.
    fn random_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform integer in `[low, high)`, without modulo bias.
    ///
    /// Panics if `low >= high`.
    fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        // Values below this threshold would bias the low residues.
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % span);
            }
        }
    }

    /// Uniform integer in `[low, high]`.
    ///
    /// Panics if `low > high`.
    fn range_u32_inclusive(&mut self, low: u32, high: u32) -> u32 {
        assert!(low <= high, "range_u32_inclusive: low must be <= high");
        self.range_u64(low as u64, high as u64 + 1) as u32
    }
}

/// Xoshiro256++ generator used for every random decision in asteroid
/// generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AsteroidRng {
    s: [u64; 4],
}

impl AsteroidRng {
    /// Seed a generator. Equal seeds yield equal streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }
}

impl RandomSource for AsteroidRng {
    fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }
}

/// SplitMix64 step, used only to expand a 64-bit seed into xoshiro state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of raw draws, cycling when exhausted.
    struct Scripted {
        draws: Vec<u64>,
        next: usize,
    }

    impl RandomSource for Scripted {
        fn next_u64(&mut self) -> u64 {
            let v = self.draws[self.next % self.draws.len()];
            self.next += 1;
            v
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = AsteroidRng::new(42);
        let mut b = AsteroidRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = AsteroidRng::new(42);
        let mut b = AsteroidRng::new(43);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn f64_stays_in_unit_interval() {
        let mut rng = AsteroidRng::new(12345);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "f64 out of range: {v}");
        }
    }

    #[test]
    fn inclusive_range_reaches_both_ends() {
        let mut rng = AsteroidRng::new(7);
        let mut seen = [false; 12];
        for _ in 0..10_000 {
            let v = rng.range_u32_inclusive(0, 11);
            assert!(v <= 11, "range_u32_inclusive out of range: {v}");
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every level index should be drawn");
    }

    #[test]
    fn range_u64_handles_non_power_of_two_spans() {
        let mut rng = AsteroidRng::new(999);
        for _ in 0..10_000 {
            let v = rng.range_u64(10, 23);
            assert!((10..23).contains(&v), "range_u64 out of range: {v}");
        }
    }

    #[test]
    fn coin_flip_is_roughly_fair() {
        let mut rng = AsteroidRng::new(42);
        let n = 10_000;
        let heads = (0..n).filter(|_| rng.random_bool(0.5)).count();
        let pct = heads as f64 / n as f64;
        assert!(
            (0.45..0.55).contains(&pct),
            "random_bool(0.5) should be ~50%, got {:.1}%",
            pct * 100.0
        );
    }

    #[test]
    fn random_bool_extremes_are_fixed() {
        let mut rng = AsteroidRng::new(3);
        for _ in 0..100 {
            assert!(!rng.random_bool(0.0));
            assert!(rng.random_bool(1.0));
        }
    }

    #[test]
    fn scripted_source_drives_provided_methods() {
        // Top bit set -> next_f64 >= 0.5; zero -> 0.0.
        let mut src = Scripted {
            draws: vec![u64::MAX, 0],
            next: 0,
        };
        assert!(!src.random_bool(0.5));
        assert!(src.random_bool(0.5));
        // Power-of-two span masks the draw directly.
        assert_eq!(src.range_u64(0, 4), 3);
        assert_eq!(src.range_u32_inclusive(5, 8), 5);
    }

    #[test]
    fn state_survives_serialization_mid_stream() {
        let mut rng = AsteroidRng::new(42);
        for _ in 0..100 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: AsteroidRng = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
