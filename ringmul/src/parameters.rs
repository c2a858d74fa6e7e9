//! Ring shape and prime configuration.

use crate::error::{params_err, Error, Result};
use crate::modulus::prime_generator::NTTFriendlyPrimesGenerator;
use crate::modulus::MAX_PRIME_BITS;
use primality_test::is_prime;
use serde::{Deserialize, Serialize};

/// Default log2 of N1: M1 = 257.
pub const LOG_N1: usize = 8;

fn default_log_n1() -> usize {
    LOG_N1
}

/// Shape of Z[X,Y]/(X^N0 + 1, Phi_M1(Y)) and the RNS primes, with
/// N0 = 2^log_n0, N1 = 2^log_n1 and M1 = N1 + 1 prime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub log_n0: usize,
    #[serde(default = "default_log_n1")]
    pub log_n1: usize,
    /// Ordered RNS primes; the number of primes is the maximum limb count.
    pub primes: Vec<u64>,
}

impl Parameters {
    pub fn new(log_n0: usize, primes: Vec<u64>) -> Self {
        Self {
            log_n0,
            log_n1: LOG_N1,
            primes,
        }
    }

    pub fn with_log_n1(mut self, log_n1: usize) -> Self {
        self.log_n1 = log_n1;
        self
    }

    /// Draws `count` NTT-friendly primes near 2^bit_size.
    pub fn generate(log_n0: usize, log_n1: usize, bit_size: u32, count: usize) -> Result<Self> {
        let mut params: Parameters = Parameters::new(log_n0, Vec::new()).with_log_n1(log_n1);
        params.check_shape()?;
        if !(2..=MAX_PRIME_BITS).contains(&bit_size) {
            return Err(params_err!("bit_size={} not in [2, {}]", bit_size, MAX_PRIME_BITS));
        }
        let mut generator = NTTFriendlyPrimesGenerator::new(bit_size, params.nth_root());
        params.primes = generator.next_alternating_primes(count).ok_or_else(|| {
            params_err!(
                "fewer than {} primes = 1 mod {} near 2^{}",
                count,
                params.nth_root(),
                bit_size
            )
        })?;
        Ok(params)
    }

    pub fn n0(&self) -> usize {
        1 << self.log_n0
    }

    pub fn n1(&self) -> usize {
        1 << self.log_n1
    }

    /// Ring degree N = N0 * N1.
    pub fn n(&self) -> usize {
        self.n0() * self.n1()
    }

    /// Cyclotomic conductor of the Y axis.
    pub fn m1(&self) -> usize {
        self.n1() + 1
    }

    pub fn max_limbs(&self) -> usize {
        self.primes.len()
    }

    /// Every prime must be 1 mod this value: it carries the 2N0-th root of the
    /// X axis, the N1-th root of the cyclic sub-transform and the M1-th root.
    pub fn nth_root(&self) -> u64 {
        (num_integer::lcm(2 * self.n0(), self.n1()) * self.m1()) as u64
    }

    fn check_shape(&self) -> Result<()> {
        if !(1..=20).contains(&self.log_n0) {
            return Err(params_err!("log_n0={} not in [1, 20]", self.log_n0));
        }
        if !(1..=16).contains(&self.log_n1) || !is_prime(self.m1() as u64) {
            return Err(params_err!(
                "log_n1={}: N1 + 1 = {} must be a Fermat prime",
                self.log_n1,
                (1u64 << self.log_n1.min(32)) + 1
            ));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.check_shape()?;
        if self.primes.is_empty() {
            return Err(params_err!("primes cannot be empty"));
        }
        let nth_root: u64 = self.nth_root();
        for (i, q) in self.primes.iter().enumerate() {
            if u64::BITS - q.leading_zeros() > MAX_PRIME_BITS {
                return Err(params_err!("q={} exceeds {} bits", q, MAX_PRIME_BITS));
            }
            if *q <= 2 || !is_prime(*q) {
                return Err(Error::NotPrime(*q));
            }
            if q % nth_root != 1 {
                return Err(Error::NotNttFriendly { q: *q, nth_root });
            }
            if self.primes[..i].contains(q) {
                return Err(params_err!("q={} appears more than once", q));
            }
        }
        Ok(())
    }
}
