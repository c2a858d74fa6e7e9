use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_core::RngCore;

/// Seeded ChaCha8 stream, so that every sampled ring element is reproducible.
pub struct Source {
    source: ChaCha8Rng,
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    /// Rejection samples `x & mask` until it is below `max`.
    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }

    /// Uniform value in `[0, max)`.
    #[inline(always)]
    pub fn next_u64_below(&mut self, max: u64) -> u64 {
        debug_assert!(max != 0, "max=0");
        let mask: u64 = u64::MAX >> max.leading_zeros();
        self.next_u64n(max, mask)
    }

    /// Uniform value in `[-bound, bound]`.
    #[inline(always)]
    pub fn next_i64_centered(&mut self, bound: u64) -> i64 {
        debug_assert!(bound < (1 << 62), "bound={} too large", bound);
        self.next_u64_below(2 * bound + 1) as i64 - bound as i64
    }

    #[inline(always)]
    pub fn next_i64(&mut self) -> i64 {
        self.next_u64() as i64
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}
