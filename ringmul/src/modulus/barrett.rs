use crate::modulus::ReduceOnce;

/// Barrett reciprocal for products of two residues modulo q.
///
/// With `k = bitlen(q)` and `shift = max(2k, 64)`, stores
/// `ratio = floor(2^shift / q)`. Any product `a * b < q^2` is reduced with
/// two word multiplications and at most two corrections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrettPrecomp {
    pub q: u64,
    pub shift: u32,
    pub ratio: u64,
}

impl BarrettPrecomp {
    pub fn new(q: u64) -> Self {
        debug_assert!(q > 1, "invalid q={}", q);
        let bits: u32 = u64::BITS - q.leading_zeros();
        let shift: u32 = (2 * bits).max(64);
        Self {
            q,
            shift,
            ratio: ((1u128 << shift) / q as u128) as u64,
        }
    }

    /// Returns x mod q in [0, 3q) for x < q^2.
    #[inline(always)]
    pub fn reduce_u128_lazy(&self, x: u128) -> u64 {
        let lo: u128 = (x as u64) as u128;
        let hi: u128 = x >> 64;
        let ratio: u128 = self.ratio as u128;
        let t: u128 = ((lo * ratio) >> 64) + hi * ratio;
        let quo: u128 = t >> (self.shift - 64);
        (x - quo * self.q as u128) as u64
    }

    /// Returns a * b mod q in [0, q) for a, b in [0, q).
    #[inline(always)]
    pub fn mul_external(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.q, "a={} >= q={}", a, self.q);
        debug_assert!(b < self.q, "b={} >= q={}", b, self.q);
        self.reduce_u128_lazy(a as u128 * b as u128)
            .reduce_once(self.q << 1)
            .reduce_once(self.q)
    }

    #[inline(always)]
    pub fn mul_external_assign(&self, a: u64, b: &mut u64) {
        *b = self.mul_external(a, *b);
    }
}
