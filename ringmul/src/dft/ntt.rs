use crate::dft::DFT;
use crate::error::Result;
use crate::modulus::prime::Prime;
use crate::modulus::shoup::Shoup;
use crate::modulus::{ReduceOnce, WordOps};
use itertools::izip;

/// Negacyclic NTT of length n over Z_q[X]/(X^n+1).
///
/// Twiddles are the powers of a primitive 2n-th root psi, stored in
/// bit-reversed order and Shoup-scaled. The forward transform is a
/// Cooley-Tukey network with Harvey's lazy butterflies (values stay in
/// [0, 4q)), the backward transform is the mirrored Gentleman-Sande network
/// with the n^-1 scaling merged into its last layer.
pub struct Table {
    prime: Prime,
    log_n: usize,
    psi: u64,
    psi_forward_rev: Vec<Shoup>,
    psi_backward_rev: Vec<Shoup>,
    n_inv: Shoup,
    n_inv_psi: Shoup,
    q: u64,
    two_q: u64,
}

impl Table {
    pub fn new(prime: Prime, n: usize) -> Result<Table> {
        assert!(
            n >= 2 && n & (n - 1) == 0,
            "invalid argument: n = {} is not a power of two >= 2",
            n
        );

        let psi: u64 = prime.primitive_nth_root(2 * n as u64)?;
        let psi_inv: u64 = prime.inv(psi);

        let log_n: usize = n.log2();

        let mut psi_forward_rev: Vec<Shoup> = vec![Shoup::default(); n];
        let mut psi_backward_rev: Vec<Shoup> = vec![Shoup::default(); n];

        let mut powers_forward: u64 = 1u64;
        let mut powers_backward: u64 = 1u64;

        for i in 0..n {
            let i_rev: usize = i.reverse_bits_msb(log_n as u32);
            psi_forward_rev[i_rev] = prime.shoup.prepare(powers_forward);
            psi_backward_rev[i_rev] = prime.shoup.prepare(powers_backward);
            powers_forward = prime.barrett.mul_external(psi, powers_forward);
            powers_backward = prime.barrett.mul_external(psi_inv, powers_backward);
        }

        let n_inv: u64 = prime.inv(n as u64);
        let n_inv_psi: u64 = prime
            .barrett
            .mul_external(n_inv, psi_backward_rev[1].value());

        let q: u64 = prime.q();

        Ok(Self {
            prime,
            log_n,
            psi,
            psi_forward_rev,
            psi_backward_rev,
            n_inv: prime.shoup.prepare(n_inv),
            n_inv_psi: prime.shoup.prepare(n_inv_psi),
            q,
            two_q: q << 1,
        })
    }

    /// Primitive 2n-th root of unity the table is built from.
    pub fn psi(&self) -> u64 {
        self.psi
    }
}

impl DFT<u64> for Table {
    fn n(&self) -> usize {
        1 << self.log_n
    }

    fn forward_inplace(&self, a: &mut [u64]) {
        self.forward_inplace_lazy(a);
        a.iter_mut().for_each(|x| {
            x.reduce_once_assign(self.two_q);
            x.reduce_once_assign(self.q);
        });
    }

    fn backward_inplace(&self, a: &mut [u64]) {
        self.backward_inplace_core(a);
    }
}

impl Table {
    /// Forward transform with outputs left in [0, 4q).
    pub fn forward_inplace_lazy(&self, a: &mut [u64]) {
        let n: usize = self.n();
        debug_assert!(a.len() == n, "a.len()={} != n={}", a.len(), n);

        for layer in 0..self.log_n {
            let (m, size) = (1 << layer, n >> (layer + 1));
            izip!(a.chunks_exact_mut(2 * size), &self.psi_forward_rev[m..]).for_each(
                |(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dit_inplace(a, b, *psi));
                },
            );
        }
    }

    /// Inputs in [0, 2q), outputs in [0, q).
    fn backward_inplace_core(&self, a: &mut [u64]) {
        let n: usize = self.n();
        debug_assert!(a.len() == n, "a.len()={} != n={}", a.len(), n);

        for layer in (1..self.log_n).rev() {
            let (m, size) = (1 << layer, n >> (layer + 1));
            izip!(a.chunks_exact_mut(2 * size), &self.psi_backward_rev[m..]).for_each(
                |(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dif_inplace(a, b, *psi));
                },
            );
        }

        let (a, b) = a.split_at_mut(n >> 1);
        izip!(a, b).for_each(|(a, b)| self.dif_last_inplace(a, b));
    }

    /// (a, b) <- (a + psi*b, a - psi*b), inputs and outputs in [0, 4q).
    #[inline(always)]
    fn dit_inplace(&self, a: &mut u64, b: &mut u64, psi: Shoup) {
        debug_assert!(*a < 4 * self.q, "a:{} q:{}", a, self.q);
        debug_assert!(*b < 4 * self.q, "b:{} q:{}", b, self.q);
        a.reduce_once_assign(self.two_q);
        let bt: u64 = self.prime.shoup.mul_external_lazy(psi, *b);
        *b = *a + self.two_q - bt;
        *a += bt;
    }

    /// (a, b) <- (a + b, (a - b) * psi), inputs and outputs in [0, 2q).
    #[inline(always)]
    fn dif_inplace(&self, a: &mut u64, b: &mut u64, psi: Shoup) {
        debug_assert!(*a < self.two_q, "a:{} q:{}", a, self.q);
        debug_assert!(*b < self.two_q, "b:{} q:{}", b, self.q);
        let d: u64 = self
            .prime
            .shoup
            .mul_external_lazy(psi, *a + self.two_q - *b);
        *a = (*a + *b).reduce_once(self.two_q);
        *b = d;
    }

    /// Last Gentleman-Sande layer with the n^-1 scaling, outputs in [0, q).
    #[inline(always)]
    fn dif_last_inplace(&self, a: &mut u64, b: &mut u64) {
        debug_assert!(*a < self.two_q, "a:{} q:{}", a, self.q);
        debug_assert!(*b < self.two_q, "b:{} q:{}", b, self.q);
        let d: u64 = self
            .prime
            .shoup
            .mul_external(self.n_inv_psi, *a + self.two_q - *b);
        *a = self.prime.shoup.mul_external(self.n_inv, *a + *b);
        *b = d;
    }
}
