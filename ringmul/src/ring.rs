use crate::dft::ntt::Table;
use crate::dft::rader::{DiscreteLog, RaderTable};
use crate::dft::DFT;
use crate::error::Result;
use crate::modulus::prime::Prime;
use crate::modulus::ReduceOnce;
use crate::poly::{Broadcast, Layout};
use itertools::izip;
use num_bigint::Sign;
use std::sync::Arc;
use tracing::debug;

/// All constants of Z_q[X,Y]/(X^N0 + 1, Phi_M1(Y)) for one prime q.
///
/// Elements are stored row-major: coefficient of X^c Y^r at `c + r * N0`.
/// Axis-0 transforms act on the N1 contiguous rows, axis-1 transforms on the
/// N0 strided columns.
pub struct Ring {
    pub n0: usize,
    pub n1: usize,
    pub prime: Prime,
    pub x0: Table,
    pub x1: RaderTable,
}

impl Ring {
    pub fn new(q: u64, log_n0: usize, dlog: Arc<DiscreteLog>) -> Result<Self> {
        let prime: Prime = Prime::new(q)?;
        let n0: usize = 1 << log_n0;
        let n1: usize = dlog.n();
        let x0: Table = Table::new(prime, n0)?;
        let x1: RaderTable = RaderTable::new(prime, dlog)?;
        debug!(
            q,
            psi = x0.psi(),
            zeta = x1.zeta(),
            n0,
            n1,
            "ring tables"
        );
        Ok(Self {
            n0,
            n1,
            prime,
            x0,
            x1,
        })
    }

    pub fn n(&self) -> usize {
        self.n0 * self.n1
    }

    pub fn q(&self) -> u64 {
        self.prime.q()
    }

    /// Writes `x mod q` for every signed base-2^64 integer of `coeffs` into `a`.
    pub fn from_digits(&self, coeffs: &[(Sign, Vec<u64>)], a: &mut [u64]) {
        debug_assert!(
            coeffs.len() == a.len(),
            "coeffs.len()={} != a.len()={}",
            coeffs.len(),
            a.len()
        );
        let q: u64 = self.q();
        izip!(coeffs.iter(), a.iter_mut()).for_each(|((sign, digits), a)| {
            let r: u64 = self.prime.shoup.reduce_digits(digits);
            *a = if *sign == Sign::Minus && r != 0 { q - r } else { r };
        });
    }
}

impl Ring {
    pub fn ntt_x0_inplace(&self, a: &mut [u64]) {
        debug_assert!(a.len() == self.n0, "a.len()={} != n0={}", a.len(), self.n0);
        self.x0.forward_inplace(a)
    }

    pub fn intt_x0_inplace(&self, a: &mut [u64]) {
        debug_assert!(a.len() == self.n0, "a.len()={} != n0={}", a.len(), self.n0);
        self.x0.backward_inplace(a)
    }

    pub fn ntt_x1_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        debug_assert!(a.len() == self.n1, "a.len()={} != n1={}", a.len(), self.n1);
        let mut tmp: Vec<u64> = vec![0; self.n1];
        self.x1.forward_inplace_core::<LAZY>(a, &mut tmp)
    }

    pub fn intt_x1_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        debug_assert!(a.len() == self.n1, "a.len()={} != n1={}", a.len(), self.n1);
        let mut tmp: Vec<u64> = vec![0; self.n1];
        self.x1.backward_inplace_core::<LAZY>(a, &mut tmp)
    }

    /// Axis-0 transform of every row.
    pub fn ntt_rows_inplace(&self, a: &mut [u64]) {
        debug_assert!(a.len() == self.n(), "a.len()={} != n={}", a.len(), self.n());
        a.chunks_exact_mut(self.n0)
            .for_each(|row| self.x0.forward_inplace(row));
    }

    pub fn intt_rows_inplace(&self, a: &mut [u64]) {
        debug_assert!(a.len() == self.n(), "a.len()={} != n={}", a.len(), self.n());
        a.chunks_exact_mut(self.n0)
            .for_each(|row| self.x0.backward_inplace(row));
    }

    /// Axis-1 transform of every column. Columns are gathered through the
    /// discrete-log permutation straight into the scratch buffer.
    pub fn ntt_columns_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        debug_assert!(a.len() == self.n(), "a.len()={} != n={}", a.len(), self.n());
        let n0: usize = self.n0;
        let gather: &[usize] = self.x1.discrete_log().gather();
        let mut tmp: Vec<u64> = vec![0; self.n1];
        (0..n0).for_each(|c| {
            izip!(tmp.iter_mut(), gather.iter()).for_each(|(t, r)| *t = a[c + r * n0]);
            self.x1.forward_permuted::<LAZY>(&mut tmp);
            izip!(tmp.iter(), a[c..].iter_mut().step_by(n0)).for_each(|(t, a)| *a = *t);
        });
    }

    pub fn intt_columns_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        debug_assert!(a.len() == self.n(), "a.len()={} != n={}", a.len(), self.n());
        let n0: usize = self.n0;
        let gather: &[usize] = self.x1.discrete_log().gather();
        let mut tmp: Vec<u64> = vec![0; self.n1];
        (0..n0).for_each(|c| {
            izip!(tmp.iter_mut(), a[c..].iter().step_by(n0)).for_each(|(t, a)| *t = *a);
            self.x1.backward_permuted::<LAZY>(&mut tmp);
            izip!(tmp.iter(), gather.iter()).for_each(|(t, r)| a[c + r * n0] = *t);
        });
    }

    /// Rows then columns.
    pub fn ntt_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        self.ntt_rows_inplace(a);
        self.ntt_columns_inplace::<LAZY>(a);
    }

    /// Columns then rows.
    pub fn intt_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        self.intt_columns_inplace::<LAZY>(a);
        self.intt_rows_inplace(a);
    }

    /// Forward transform of a coefficient-domain limb into `layout`.
    pub fn ntt_layout_inplace(&self, layout: Layout, a: &mut [u64]) {
        match layout {
            Layout::Full => self.ntt_inplace::<false>(a),
            Layout::FullLazy => self.ntt_inplace::<true>(a),
            Layout::Rows => self.ntt_rows_inplace(a),
            Layout::Columns => self.ntt_columns_inplace::<false>(a),
            Layout::ColumnsLazy => self.ntt_columns_inplace::<true>(a),
            Layout::X0 => self.ntt_x0_inplace(a),
            Layout::X1 => self.ntt_x1_inplace::<false>(a),
            Layout::X1Lazy => self.ntt_x1_inplace::<true>(a),
        }
    }

    /// Inverse of [Ring::ntt_layout_inplace].
    pub fn intt_layout_inplace(&self, layout: Layout, a: &mut [u64]) {
        match layout {
            Layout::Full => self.intt_inplace::<false>(a),
            Layout::FullLazy => self.intt_inplace::<true>(a),
            Layout::Rows => self.intt_rows_inplace(a),
            Layout::Columns => self.intt_columns_inplace::<false>(a),
            Layout::ColumnsLazy => self.intt_columns_inplace::<true>(a),
            Layout::X0 => self.intt_x0_inplace(a),
            Layout::X1 => self.intt_x1_inplace::<false>(a),
            Layout::X1Lazy => self.intt_x1_inplace::<true>(a),
        }
    }
}

impl Ring {
    // vec(b) <- vec(a) * vec(b).
    #[inline(always)]
    pub fn va_mul_vb_into_vb(&self, a: &[u64], b: &mut [u64]) {
        debug_assert!(a.len() == b.len(), "a.len()={} != b.len()={}", a.len(), b.len());
        izip!(a.iter(), b.iter_mut())
            .for_each(|(a, b)| self.prime.barrett.mul_external_assign(*a, b));
    }

    // vec(a) <- vec(a)^2.
    #[inline(always)]
    pub fn va_square_into_va(&self, a: &mut [u64]) {
        a.iter_mut()
            .for_each(|a| *a = self.prime.barrett.mul_external(*a, *a));
    }

    // vec(b) <- vec(a) + vec(b).
    #[inline(always)]
    pub fn va_add_vb_into_vb(&self, a: &[u64], b: &mut [u64]) {
        debug_assert!(a.len() == b.len(), "a.len()={} != b.len()={}", a.len(), b.len());
        let q: u64 = self.q();
        izip!(a.iter(), b.iter_mut()).for_each(|(a, b)| *b = (*a + *b).reduce_once(q));
    }

    /// Multiplies `b` (N entries) by `a`, spread over `b` according to `broadcast`.
    pub fn va_mul_vb_broadcast_into_vb(&self, broadcast: Broadcast, a: &[u64], b: &mut [u64]) {
        match broadcast {
            Broadcast::None => self.va_mul_vb_into_vb(a, b),
            Broadcast::Rows => {
                debug_assert!(a.len() == self.n0, "a.len()={} != n0={}", a.len(), self.n0);
                b.chunks_exact_mut(self.n0)
                    .for_each(|row| self.va_mul_vb_into_vb(a, row));
            }
            Broadcast::Columns => {
                debug_assert!(a.len() == self.n1, "a.len()={} != n1={}", a.len(), self.n1);
                izip!(a.iter(), b.chunks_exact_mut(self.n0)).for_each(|(a, row)| {
                    row.iter_mut()
                        .for_each(|b| self.prime.barrett.mul_external_assign(*a, b))
                });
            }
        }
    }
}
