use crate::modulus::ReduceOnce;

/// A multiplicand `value` < q together with its Shoup quotient
/// `floor(value * 2^64 / q)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Shoup(pub u64, pub u64);

impl Shoup {
    #[inline(always)]
    pub fn value(&self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub fn quotient(&self) -> u64 {
        self.1
    }
}

/// Shoup-scaled multiplication by fixed operands and division-free
/// reduction of machine words modulo q.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShoupPrecomp {
    pub q: u64,
    /// Shoup form of 1, whose quotient is `floor(2^64 / q)`.
    pub one: Shoup,
    /// Shoup form of `2^64 mod q`, used to fold multi-word integers.
    pub two64: Shoup,
}

impl ShoupPrecomp {
    pub fn new(q: u64) -> Self {
        debug_assert!(q > 1 && q < 1 << 63, "invalid q={}", q);
        let mut precomp: ShoupPrecomp = Self {
            q,
            one: Shoup::default(),
            two64: Shoup::default(),
        };
        precomp.one = precomp.prepare(1);
        precomp.two64 = precomp.prepare(((1u128 << 64) % q as u128) as u64);
        precomp
    }

    #[inline(always)]
    pub fn prepare(&self, v: u64) -> Shoup {
        debug_assert!(v < self.q, "v={} >= q={}", v, self.q);
        let quotient: u64 = (((v as u128) << 64) / self.q as u128) as _;
        Shoup(v, quotient)
    }

    /// Returns lhs * rhs mod q in [0, q) for any rhs.
    #[inline(always)]
    pub fn mul_external(&self, lhs: Shoup, rhs: u64) -> u64 {
        self.mul_external_lazy(lhs, rhs).reduce_once(self.q)
    }

    #[inline(always)]
    pub fn mul_external_assign(&self, lhs: Shoup, rhs: &mut u64) {
        *rhs = self.mul_external(lhs, *rhs);
    }

    /// Returns lhs * rhs mod q in [0, 2q) for any rhs.
    #[inline(always)]
    pub fn mul_external_lazy(&self, lhs: Shoup, rhs: u64) -> u64 {
        let t: u64 = ((lhs.quotient() as u128 * rhs as u128) >> 64) as _;
        rhs.wrapping_mul(lhs.value())
            .wrapping_sub(self.q.wrapping_mul(t))
    }

    /// Returns x mod q in [0, q).
    #[inline(always)]
    pub fn reduce(&self, x: u64) -> u64 {
        self.reduce_lazy(x).reduce_once(self.q)
    }

    /// Returns x mod q in [0, 2q).
    #[inline(always)]
    pub fn reduce_lazy(&self, x: u64) -> u64 {
        let t: u64 = ((self.one.quotient() as u128 * x as u128) >> 64) as _;
        x - self.q * t
    }

    /// Reduces the little-endian base-2^64 integer `digits` modulo q.
    #[inline(always)]
    pub fn reduce_digits(&self, digits: &[u64]) -> u64 {
        digits.iter().rev().fold(0u64, |r, d| {
            (self.mul_external(self.two64, r) + self.reduce(*d)).reduce_once(self.q)
        })
    }
}
