use crate::error::{Error, Result};
use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::shoup::ShoupPrecomp;
use crate::modulus::MAX_PRIME_BITS;
use primality_test::is_prime;

/// An NTT prime q < 2^61 with its reduction constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prime {
    pub q: u64,
    pub barrett: BarrettPrecomp,
    pub shoup: ShoupPrecomp,
}

impl Prime {
    /// Returns a new instance of [Prime].
    /// Errors if q is not a prime > 2 or if q >= 2^61.
    pub fn new(q: u64) -> Result<Self> {
        if q <= 2 || !is_prime(q) {
            return Err(Error::NotPrime(q));
        }
        Self::new_unchecked(q)
    }

    /// Returns a new instance of [Prime] without primality check.
    pub fn new_unchecked(q: u64) -> Result<Self> {
        if u64::BITS - q.leading_zeros() > MAX_PRIME_BITS {
            return Err(Error::InvalidParameters(format!(
                "q={} exceeds {} bits",
                q, MAX_PRIME_BITS
            )));
        }
        Ok(Self {
            q,
            barrett: BarrettPrecomp::new(q),
            shoup: ShoupPrecomp::new(q),
        })
    }

    #[inline(always)]
    pub fn q(&self) -> u64 {
        self.q
    }

    /// Returns x^exponent mod q.
    pub fn pow(&self, x: u64, exponent: u64) -> u64 {
        let mut x: u64 = self.shoup.reduce(x);
        let mut y: u64 = 1;
        let mut i: u64 = exponent;
        while i > 0 {
            if i & 1 == 1 {
                y = self.barrett.mul_external(x, y);
            }
            x = self.barrett.mul_external(x, x);
            i >>= 1;
        }
        y
    }

    /// Returns x^-1 mod q.
    /// User must ensure that x is not divisible by q.
    #[inline(always)]
    pub fn inv(&self, x: u64) -> u64 {
        debug_assert!(x % self.q != 0, "x={} has no inverse mod q={}", x, self.q);
        self.pow(x, self.q - 2)
    }

    /// Returns a primitive `order`-th root of unity mod q.
    ///
    /// Candidates `c^((q-1)/order)` are tested against every distinct prime
    /// factor f of `order`, so only `order` needs to be factored.
    pub fn primitive_nth_root(&self, order: u64) -> Result<u64> {
        let missing: Error = Error::MissingRoot { q: self.q, order };
        if order == 0 || (self.q - 1) % order != 0 {
            return Err(missing);
        }
        let factors: Vec<u64> = distinct_prime_factors(order);
        let cofactor: u64 = (self.q - 1) / order;
        (2..self.q)
            .map(|c| self.pow(c, cofactor))
            .find(|y| factors.iter().all(|f| self.pow(*y, order / f) != 1))
            .ok_or(missing)
    }
}

/// Trial division, `n` is a small transform order.
fn distinct_prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors: Vec<u64> = Vec::new();
    let mut f: u64 = 2;
    while f * f <= n {
        if n % f == 0 {
            factors.push(f);
            while n % f == 0 {
                n /= f;
            }
        }
        f += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}
