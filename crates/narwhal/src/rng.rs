//! Reproducible randomness for tie-breaking.
//!
//! Ordering flips a coin to break ties between equal medians and to take neutral adjacent
//! swaps. The source is passed in explicitly so tests pin it with a seed and independent layout
//! calls can still vary it.

/// Source of fair coin flips.
pub trait Coin {
    fn head_of_the_coin(&mut self) -> bool;
}

/// xorshift64* generator.
#[derive(Debug, Clone)]
pub struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_unit(&mut self) -> f64 {
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }
}

impl Coin for XorShift64Star {
    fn head_of_the_coin(&mut self) -> bool {
        // The high bit; the low bits of xorshift-style generators are the weakest.
        self.next_u64() >> 63 == 1
    }
}
