//! Axis-1 transform over Z_q[Y]/(Phi_m(Y)) for a prime conductor m = n + 1.
//!
//! The evaluation points are the primitive m-th roots zeta^k, k in Z_m^*.
//! Ordering them by a generator g of Z_m^* turns the length-n evaluation into
//! a cyclic convolution of length n (Rader), computed with [CyclicTable]:
//!
//! ```text
//! a(zeta^(g^m)) = zeta^(-g^m) * sum_i a[g^(-i) - 1] * zeta^(g^(m-i))
//! ```
//!
//! The forward output at index m is `a(zeta^(g^m))`. The lazy forward variant
//! leaves the extra factor `zeta^(g^m)` in place and must only be consumed by
//! the lazy backward variant, which expects it.

use crate::dft::cyclic::CyclicTable;
use crate::dft::DFT;
use crate::error::{Error, Result};
use crate::modulus::prime::Prime;
use crate::modulus::shoup::Shoup;
use primality_test::is_prime;
use std::sync::Arc;

/// Discrete logarithm tables of Z_m^*, shared by all primes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscreteLog {
    m: usize,
    generator: usize,
    /// pows[k] = g^k mod m for k <= n, with pows[n] = 1.
    pows: Vec<usize>,
    /// logs[g^k mod m] = k, logs[0] is unused.
    logs: Vec<usize>,
    /// gather[i] = g^(-i) - 1, the coefficient read at position i.
    gather: Vec<usize>,
}

impl DiscreteLog {
    /// Builds the tables for the conductor m = n + 1, n a power of two.
    pub fn new(n: usize) -> Result<Self> {
        let m: usize = n + 1;
        if n < 2 || n & (n - 1) != 0 || !is_prime(m as u64) {
            return Err(Error::InvalidParameters(format!(
                "conductor m={} is not a prime of the form 2^k+1",
                m
            )));
        }

        // Z_m^* is cyclic of order n = 2^k: g generates it iff g^(n/2) != 1.
        let pow_mod = |x: usize, e: usize| -> usize {
            (0..e).fold(1usize, |acc, _| acc * x % m)
        };
        let generator: usize = (2..m)
            .find(|g| pow_mod(*g, n >> 1) != 1)
            .ok_or_else(|| Error::InvalidParameters(format!("no generator mod m={}", m)))?;

        let mut pows: Vec<usize> = Vec::with_capacity(n + 1);
        let mut logs: Vec<usize> = vec![0; m];
        let mut x: usize = 1;
        (0..n).for_each(|k| {
            pows.push(x);
            logs[x] = k;
            x = x * generator % m;
        });
        pows.push(1);

        let gather: Vec<usize> = (0..n).map(|i| pows[n - i] - 1).collect();

        Ok(Self {
            m,
            generator,
            pows,
            logs,
            gather,
        })
    }

    /// Conductor m.
    pub fn m(&self) -> usize {
        self.m
    }

    /// Transform length n = m - 1.
    pub fn n(&self) -> usize {
        self.m - 1
    }

    pub fn generator(&self) -> usize {
        self.generator
    }

    /// g^k mod m.
    #[inline(always)]
    pub fn pow(&self, k: usize) -> usize {
        self.pows[k % self.n()]
    }

    /// log_g(x) for x in Z_m^*.
    #[inline(always)]
    pub fn log(&self, x: usize) -> usize {
        debug_assert!(x % self.m != 0, "x={} is not a unit mod m={}", x, self.m);
        self.logs[x % self.m]
    }

    #[inline(always)]
    pub fn gather(&self) -> &[usize] {
        &self.gather
    }
}

pub struct RaderTable {
    prime: Prime,
    dlog: Arc<DiscreteLog>,
    cyclic: CyclicTable,
    zeta: u64,
    /// zeta^(g^k)
    twist: Vec<Shoup>,
    /// zeta^(m - g^k)
    twist_inv: Vec<Shoup>,
    /// Cyclic transform of k -> zeta^(g^k).
    kernel: Vec<Shoup>,
    kernel_inv: Vec<Shoup>,
}

impl RaderTable {
    pub fn new(prime: Prime, dlog: Arc<DiscreteLog>) -> Result<RaderTable> {
        let n: usize = dlog.n();
        let m: u64 = dlog.m() as u64;

        let zeta: u64 = prime.primitive_nth_root(m)?;
        let cyclic: CyclicTable = CyclicTable::new(prime, n)?;

        let zeta_pows: Vec<u64> = (0..m)
            .scan(1u64, |x, _| {
                let y: u64 = *x;
                *x = prime.barrett.mul_external(zeta, *x);
                Some(y)
            })
            .collect();

        let twist: Vec<Shoup> = (0..n)
            .map(|k| prime.shoup.prepare(zeta_pows[dlog.pow(k)]))
            .collect();
        let twist_inv: Vec<Shoup> = (0..n)
            .map(|k| prime.shoup.prepare(zeta_pows[m as usize - dlog.pow(k)]))
            .collect();

        let mut kernel_plain: Vec<u64> = twist.iter().map(|w| w.value()).collect();
        cyclic.forward_inplace(&mut kernel_plain);

        if kernel_plain.iter().any(|k| *k == 0) {
            return Err(Error::SingularKernel(prime.q()));
        }

        let kernel: Vec<Shoup> = kernel_plain
            .iter()
            .map(|k| prime.shoup.prepare(*k))
            .collect();
        let kernel_inv: Vec<Shoup> = kernel_plain
            .iter()
            .map(|k| prime.shoup.prepare(prime.inv(*k)))
            .collect();

        Ok(Self {
            prime,
            dlog,
            cyclic,
            zeta,
            twist,
            twist_inv,
            kernel,
            kernel_inv,
        })
    }

    /// Primitive m-th root of unity the table is built from.
    pub fn zeta(&self) -> u64 {
        self.zeta
    }

    pub fn discrete_log(&self) -> &DiscreteLog {
        &self.dlog
    }

    #[inline(always)]
    fn va_mul_shoup_inplace(&self, w: &[Shoup], a: &mut [u64]) {
        a.iter_mut()
            .zip(w.iter())
            .for_each(|(a, w)| self.prime.shoup.mul_external_assign(*w, a));
    }

    /// Forward transform of `tmp`, which holds the input already permuted
    /// as `tmp[i] = a[gather[i]]`. Output is in natural evaluation order.
    pub fn forward_permuted<const LAZY: bool>(&self, tmp: &mut [u64]) {
        debug_assert!(tmp.len() == self.n(), "tmp.len()={} != n={}", tmp.len(), self.n());
        self.cyclic.forward_inplace(tmp);
        self.va_mul_shoup_inplace(&self.kernel, tmp);
        self.cyclic.backward_inplace(tmp);
        if !LAZY {
            self.va_mul_shoup_inplace(&self.twist_inv, tmp);
        }
    }

    /// Backward transform of `tmp`, leaving the output permuted: the caller
    /// writes `a[gather[i]] = tmp[i]`.
    pub fn backward_permuted<const LAZY: bool>(&self, tmp: &mut [u64]) {
        debug_assert!(tmp.len() == self.n(), "tmp.len()={} != n={}", tmp.len(), self.n());
        if !LAZY {
            self.va_mul_shoup_inplace(&self.twist, tmp);
        }
        self.cyclic.forward_inplace(tmp);
        self.va_mul_shoup_inplace(&self.kernel_inv, tmp);
        self.cyclic.backward_inplace(tmp);
    }

    pub fn forward_inplace_core<const LAZY: bool>(&self, a: &mut [u64], tmp: &mut [u64]) {
        debug_assert!(a.len() == self.n(), "a.len()={} != n={}", a.len(), self.n());
        tmp.iter_mut()
            .zip(self.dlog.gather())
            .for_each(|(t, j)| *t = a[*j]);
        self.forward_permuted::<LAZY>(tmp);
        a.copy_from_slice(tmp);
    }

    pub fn backward_inplace_core<const LAZY: bool>(&self, a: &mut [u64], tmp: &mut [u64]) {
        debug_assert!(a.len() == self.n(), "a.len()={} != n={}", a.len(), self.n());
        tmp.copy_from_slice(a);
        self.backward_permuted::<LAZY>(tmp);
        tmp.iter()
            .zip(self.dlog.gather())
            .for_each(|(t, j)| a[*j] = *t);
    }

    pub fn forward_inplace_lazy(&self, a: &mut [u64]) {
        let mut tmp: Vec<u64> = vec![0; self.n()];
        self.forward_inplace_core::<true>(a, &mut tmp)
    }

    pub fn backward_inplace_lazy(&self, a: &mut [u64]) {
        let mut tmp: Vec<u64> = vec![0; self.n()];
        self.backward_inplace_core::<true>(a, &mut tmp)
    }
}

impl DFT<u64> for RaderTable {
    fn n(&self) -> usize {
        self.dlog.n()
    }

    fn forward_inplace(&self, a: &mut [u64]) {
        let mut tmp: Vec<u64> = vec![0; self.n()];
        self.forward_inplace_core::<false>(a, &mut tmp)
    }

    fn backward_inplace(&self, a: &mut [u64]) {
        let mut tmp: Vec<u64> = vec![0; self.n()];
        self.backward_inplace_core::<false>(a, &mut tmp)
    }
}
