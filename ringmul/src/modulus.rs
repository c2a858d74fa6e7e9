pub mod barrett;
pub mod prime;
pub mod prime_generator;
pub mod shoup;

/// Largest supported prime bit-size: lazy butterflies keep values below `4q`.
pub const MAX_PRIME_BITS: u32 = 61;

pub trait WordOps<O> {
    /// ceil(log2(self)).
    fn log2(self) -> O;
    /// Reverses the `n` least significant bits.
    fn reverse_bits_msb(self, n: u32) -> O;
}

impl WordOps<usize> for usize {
    #[inline(always)]
    fn log2(self) -> usize {
        (usize::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> usize {
        debug_assert!(n != 0 && n <= usize::BITS, "n={} out of range", n);
        self.reverse_bits() >> (usize::BITS - n)
    }
}

pub trait ReduceOnce<O> {
    /// Assigns self-q to self if self >= q.
    /// User must ensure that 2q fits in O.
    fn reduce_once_assign(&mut self, q: O);
    /// Returns self-q if self >= q else self.
    /// User must ensure that 2q fits in O.
    fn reduce_once(&self, q: O) -> O;
}

impl ReduceOnce<u64> for u64 {
    #[inline(always)]
    fn reduce_once_assign(&mut self, q: u64) {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        *self = (*self).min(self.wrapping_sub(q))
    }

    #[inline(always)]
    fn reduce_once(&self, q: u64) -> u64 {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        (*self).min(self.wrapping_sub(q))
    }
}
