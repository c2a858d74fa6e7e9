use crate::modulus::prime::Prime;
use crate::modulus::shoup::{Shoup, ShoupPrecomp};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};

/// CRT constants for the first `j` primes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrtLevel {
    /// P = p_0 * ... * p_{j-1}
    modulus: BigInt,
    /// floor(P / 2)
    half: BigInt,
    /// P / p_i
    hat: Vec<BigInt>,
    /// (P / p_i)^-1 mod p_i
    hat_inv: Vec<Shoup>,
}

impl CrtLevel {
    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    pub fn limbs(&self) -> usize {
        self.hat.len()
    }
}

/// Triangular table of [CrtLevel]: entry j-1 reconstructs from exactly the
/// first j configured primes, in configuration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrtTable {
    shoup: Vec<ShoupPrecomp>,
    levels: Vec<CrtLevel>,
}

impl CrtTable {
    pub fn new(primes: &[Prime]) -> Self {
        let levels: Vec<CrtLevel> = (1..=primes.len())
            .map(|j| {
                let modulus: BigInt = primes[..j]
                    .iter()
                    .fold(BigInt::one(), |acc, p| acc * p.q());
                let hat: Vec<BigInt> = primes[..j]
                    .iter()
                    .map(|p| &modulus / p.q())
                    .collect();
                let hat_inv: Vec<Shoup> = hat_inverses(&hat, &primes[..j]);
                CrtLevel {
                    half: &modulus >> 1,
                    modulus,
                    hat,
                    hat_inv,
                }
            })
            .collect();
        Self {
            shoup: primes.iter().map(|p| p.shoup).collect(),
            levels,
        }
    }

    /// Largest supported number of limbs.
    pub fn max_limbs(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, limbs: usize) -> &CrtLevel {
        assert!(
            limbs >= 1 && limbs <= self.max_limbs(),
            "invalid limbs={}: must be in [1, {}]",
            limbs,
            self.max_limbs()
        );
        &self.levels[limbs - 1]
    }

    /// Returns the unique x in [-P/2, P/2] with x = residues[i] mod p_i,
    /// where P is the product of the first `residues.len()` primes.
    pub fn reconstruct_centered<I>(&self, residues: I, limbs: usize) -> BigInt
    where
        I: Iterator<Item = u64>,
    {
        let level: &CrtLevel = self.level(limbs);
        let mut acc: BigInt = BigInt::zero();
        residues
            .zip(level.hat.iter())
            .zip(level.hat_inv.iter())
            .zip(self.shoup.iter())
            .for_each(|(((r, hat), hat_inv), shoup)| {
                acc += hat * shoup.mul_external(*hat_inv, r);
            });
        acc %= &level.modulus;
        if acc > level.half {
            acc -= &level.modulus;
        }
        acc
    }

    /// Reconstructs then reduces into [0, q).
    pub fn reconstruct<I>(&self, residues: I, limbs: usize, q: &BigInt) -> BigInt
    where
        I: Iterator<Item = u64>,
    {
        self.reconstruct_centered(residues, limbs).mod_floor(q)
    }
}

fn hat_inverses(hat: &[BigInt], primes: &[Prime]) -> Vec<Shoup> {
    hat.iter()
        .zip(primes.iter())
        .map(|(h, p)| {
            let (_, digits) = h.to_u64_digits();
            p.shoup.prepare(p.inv(p.shoup.reduce_digits(&digits)))
        })
        .collect()
}
