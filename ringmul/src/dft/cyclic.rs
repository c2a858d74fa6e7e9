use crate::dft::DFT;
use crate::error::Result;
use crate::modulus::prime::Prime;
use crate::modulus::shoup::Shoup;
use crate::modulus::{ReduceOnce, WordOps};
use itertools::izip;

/// Cyclic NTT of length n over Z_q[Y]/(Y^n-1), natural order in and out.
///
/// This is the power-of-two sub-transform of the Rader reduction: bit-reversal
/// followed by iterative radix-2 decimation-in-time butterflies.
pub struct CyclicTable {
    prime: Prime,
    log_n: usize,
    /// omega^j for j < n/2.
    omega_pows: Vec<Shoup>,
    /// omega^-j for j < n/2.
    omega_inv_pows: Vec<Shoup>,
    n_inv: Shoup,
}

impl CyclicTable {
    pub fn new(prime: Prime, n: usize) -> Result<CyclicTable> {
        assert!(
            n >= 2 && n & (n - 1) == 0,
            "invalid argument: n = {} is not a power of two >= 2",
            n
        );

        let omega: u64 = prime.primitive_nth_root(n as u64)?;
        let omega_inv: u64 = prime.inv(omega);

        let powers = |root: u64| -> Vec<Shoup> {
            let mut x: u64 = 1;
            (0..n >> 1)
                .map(|_| {
                    let w: Shoup = prime.shoup.prepare(x);
                    x = prime.barrett.mul_external(root, x);
                    w
                })
                .collect()
        };

        Ok(Self {
            prime,
            log_n: n.log2(),
            omega_pows: powers(omega),
            omega_inv_pows: powers(omega_inv),
            n_inv: prime.shoup.prepare(prime.inv(n as u64)),
        })
    }

    fn bit_reverse(&self, a: &mut [u64]) {
        (0..a.len()).for_each(|i| {
            let j: usize = i.reverse_bits_msb(self.log_n as u32);
            if i < j {
                a.swap(i, j);
            }
        });
    }

    /// Butterfly network, inputs in [0, q), outputs in [0, 4q).
    fn butterflies(&self, a: &mut [u64], roots: &[Shoup]) {
        let n: usize = self.n();
        let q: u64 = self.prime.q();
        let two_q: u64 = q << 1;
        for s in 0..self.log_n {
            let half: usize = 1 << s;
            let stride: usize = n >> (s + 1);
            a.chunks_exact_mut(2 * half).for_each(|block| {
                let (lo, hi) = block.split_at_mut(half);
                izip!(lo, hi, roots.iter().step_by(stride)).for_each(|(x, y, w)| {
                    x.reduce_once_assign(two_q);
                    let t: u64 = self.prime.shoup.mul_external_lazy(*w, *y);
                    *y = *x + two_q - t;
                    *x += t;
                });
            });
        }
    }
}

impl DFT<u64> for CyclicTable {
    fn n(&self) -> usize {
        1 << self.log_n
    }

    fn forward_inplace(&self, a: &mut [u64]) {
        debug_assert!(a.len() == self.n(), "a.len()={} != n={}", a.len(), self.n());
        let q: u64 = self.prime.q();
        self.bit_reverse(a);
        self.butterflies(a, &self.omega_pows);
        a.iter_mut().for_each(|x| {
            x.reduce_once_assign(q << 1);
            x.reduce_once_assign(q);
        });
    }

    fn backward_inplace(&self, a: &mut [u64]) {
        debug_assert!(a.len() == self.n(), "a.len()={} != n={}", a.len(), self.n());
        self.bit_reverse(a);
        self.butterflies(a, &self.omega_inv_pows);
        a.iter_mut()
            .for_each(|x| self.prime.shoup.mul_external_assign(self.n_inv, x));
    }
}
