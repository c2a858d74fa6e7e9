//! The RNS ring bank and the multiplication surface built on it.
//!
//! Every product follows the same pipeline:
//!
//! | stage       | work                                            | parallel over |
//! |-------------|-------------------------------------------------|---------------|
//! | reduce      | big integers to residues mod each prime         | limbs         |
//! | forward     | axis-0 rows and/or axis-1 columns               | limbs         |
//! | pointwise   | Barrett products, possibly broadcast            | limbs         |
//! | inverse     | selected by the operand [Layout]s               | limbs         |
//! | reconstruct | CRT at the operand level, then floor mod q      | coefficients  |
//!
//! Operands already in transformed form ([NttPolyRNS]) skip the first two stages.
//! When exactly one operand carries a deferred axis-1 twist, the lazy inverse
//! is used, which saves one twist pass per product.

use crate::crt::CrtTable;
use crate::dft::rader::DiscreteLog;
use crate::error::Result;
use crate::modulus::prime::Prime;
use crate::parameters::Parameters;
use crate::poly::{Layout, NttPolyRNS, PolyRNS};
use crate::ring::Ring;
use num_bigint::{BigInt, Sign};
use num_traits::Signed;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Read-only bank of per-prime [Ring]s with the shared discrete-log tables
/// and the CRT table. Built once, then shared by reference across threads.
pub struct RingRNS {
    params: Parameters,
    dlog: Arc<DiscreteLog>,
    rings: Vec<Ring>,
    crt: CrtTable,
}

/// Input of the multiplication pipeline.
enum Operand<'a> {
    /// Coefficients to reduce and transform into the given layout.
    Coeffs(&'a [BigInt], Layout),
    /// Already transformed operand.
    Ntt(&'a NttPolyRNS),
}

impl RingRNS {
    #[instrument(skip_all, fields(log_n0 = params.log_n0, log_n1 = params.log_n1, limbs = params.max_limbs()))]
    pub fn try_new(params: &Parameters) -> Result<Self> {
        params.validate()?;
        let dlog: Arc<DiscreteLog> = Arc::new(DiscreteLog::new(params.n1())?);
        let rings: Vec<Ring> = params
            .primes
            .par_iter()
            .map(|q| Ring::new(*q, params.log_n0, dlog.clone()))
            .collect::<Result<Vec<Ring>>>()?;
        let primes: Vec<Prime> = rings.iter().map(|ring| ring.prime).collect();
        let crt: CrtTable = CrtTable::new(&primes);
        debug!(generator = dlog.generator(), n = params.n(), "ring bank ready");
        Ok(Self {
            params: params.clone(),
            dlog,
            rings,
            crt,
        })
    }

    /// As [RingRNS::try_new].
    ///
    /// # Panics
    ///
    /// If the parameters are invalid or a prime lacks a required root.
    pub fn new(params: &Parameters) -> Self {
        match Self::try_new(params) {
            Ok(ring) => ring,
            Err(err) => panic!("invalid ring parameters: {}", err),
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn n0(&self) -> usize {
        self.params.n0()
    }

    pub fn n1(&self) -> usize {
        self.params.n1()
    }

    pub fn n(&self) -> usize {
        self.params.n()
    }

    pub fn max_limbs(&self) -> usize {
        self.rings.len()
    }

    pub fn ring(&self, i: usize) -> &Ring {
        &self.rings[i]
    }

    pub fn crt(&self) -> &CrtTable {
        &self.crt
    }

    pub fn discrete_log(&self) -> &DiscreteLog {
        &self.dlog
    }

    fn check_limbs(&self, np: usize) {
        assert!(
            np >= 1 && np <= self.max_limbs(),
            "invalid np={}: must be in [1, {}]",
            np,
            self.max_limbs()
        );
    }
}

impl RingRNS {
    /// Residues of `a` modulo each of the first `np` primes.
    pub fn reduce(&self, a: &[BigInt], np: usize) -> PolyRNS {
        self.check_limbs(np);
        let digits: Vec<(Sign, Vec<u64>)> = a.par_iter().map(|c| c.to_u64_digits()).collect();
        let mut poly: PolyRNS = PolyRNS::new(a.len(), np);
        poly.par_iter_mut()
            .zip(self.rings.par_iter())
            .for_each(|(limb, ring)| ring.from_digits(&digits, limb));
        poly
    }

    /// CRT reconstruction of every coefficient at level `a.limbs()`, reduced into [0, q).
    pub fn reconstruct(&self, a: &PolyRNS, q: &BigInt) -> Vec<BigInt> {
        let mut out: Vec<BigInt> = vec![BigInt::default(); a.n()];
        self.reconstruct_into(a, q, &mut out);
        out
    }

    pub fn reconstruct_into(&self, a: &PolyRNS, q: &BigInt, out: &mut [BigInt]) {
        let np: usize = a.limbs();
        self.check_limbs(np);
        assert!(q.is_positive(), "invalid q={}: must be positive", q);
        assert!(out.len() == a.n(), "out.len()={} != a.n()={}", out.len(), a.n());
        out.par_iter_mut().enumerate().for_each(|(j, c)| {
            *c = self.crt.reconstruct(a.iter().map(|limb| limb[j]), np, q);
        });
    }

    /// Reduces `a` and transforms it into `layout`.
    pub fn to_ntt_layout(&self, a: &[BigInt], np: usize, layout: Layout) -> NttPolyRNS {
        let len: usize = layout.len(self.n0(), self.n1());
        assert!(a.len() == len, "a.len()={} != {} for {:?}", a.len(), len, layout);
        let mut poly: PolyRNS = self.reduce(a, np);
        poly.par_iter_mut()
            .zip(self.rings.par_iter())
            .for_each(|(limb, ring)| ring.ntt_layout_inplace(layout, limb));
        NttPolyRNS::new(layout, poly)
    }

    /// Full transform of a ring element.
    pub fn to_ntt(&self, a: &[BigInt], np: usize) -> NttPolyRNS {
        self.to_ntt_layout(a, np, Layout::Full)
    }

    /// Full transform with the axis-1 twist deferred.
    pub fn to_ntt_lazy(&self, a: &[BigInt], np: usize) -> NttPolyRNS {
        self.to_ntt_layout(a, np, Layout::FullLazy)
    }

    /// Axis-0 transform of a polynomial in X (N0 coefficients).
    pub fn to_ntt_x0(&self, a: &[BigInt], np: usize) -> NttPolyRNS {
        self.to_ntt_layout(a, np, Layout::X0)
    }

    /// Axis-1 transform of a polynomial in Y (N1 coefficients).
    pub fn to_ntt_x1(&self, a: &[BigInt], np: usize) -> NttPolyRNS {
        self.to_ntt_layout(a, np, Layout::X1)
    }

    pub fn to_ntt_x1_lazy(&self, a: &[BigInt], np: usize) -> NttPolyRNS {
        self.to_ntt_layout(a, np, Layout::X1Lazy)
    }

    /// Axis-0 transform of every row of a ring element.
    pub fn to_ntt_rows(&self, a: &[BigInt], np: usize) -> NttPolyRNS {
        self.to_ntt_layout(a, np, Layout::Rows)
    }

    /// Axis-1 transform of every column of a ring element.
    pub fn to_ntt_columns(&self, a: &[BigInt], np: usize) -> NttPolyRNS {
        self.to_ntt_layout(a, np, Layout::Columns)
    }

    /// Inverse transform and reconstruction of a transformed operand.
    pub fn from_ntt(&self, ra: &NttPolyRNS, q: &BigInt) -> Vec<BigInt> {
        let ra: NttPolyRNS = ra.clone();
        let np: usize = ra.limbs();
        self.check_limbs(np);
        self.reconstruct(&self.inverse(ra), q)
    }

    /// ra <- ra + rb on the first `np` limbs. Both operands must share a layout.
    pub fn add_ntt_inplace(&self, ra: &mut NttPolyRNS, rb: &NttPolyRNS, np: usize) {
        self.check_limbs(np);
        assert!(
            ra.layout == rb.layout,
            "ra.layout={:?} != rb.layout={:?}",
            ra.layout,
            rb.layout
        );
        assert!(ra.limbs() >= np, "ra.limbs()={} < np={}", ra.limbs(), np);
        assert!(rb.limbs() >= np, "rb.limbs()={} < np={}", rb.limbs(), np);
        ra.poly
            .par_iter_mut()
            .zip(rb.poly.par_iter())
            .zip(self.rings[..np].par_iter())
            .for_each(|((a, b), ring)| ring.va_add_vb_into_vb(b, a));
    }
}

impl RingRNS {
    fn resolve(&self, a: Operand<'_>, np: usize) -> NttPolyRNS {
        match a {
            Operand::Coeffs(a, layout) => self.to_ntt_layout(a, np, layout),
            Operand::Ntt(a) => {
                assert!(a.limbs() >= np, "a.limbs()={} < np={}", a.limbs(), np);
                NttPolyRNS::new(a.layout, a.poly.sub_level(np))
            }
        }
    }

    fn mul_pointwise(&self, acc: &mut NttPolyRNS, b: &NttPolyRNS) {
        let Some((layout, broadcast)) = acc.layout.product(&b.layout) else {
            panic!("invalid product {:?} * {:?}", acc.layout, b.layout);
        };
        assert!(
            b.limbs() >= acc.limbs(),
            "b.limbs()={} < acc.limbs()={}",
            b.limbs(),
            acc.limbs()
        );
        acc.poly
            .par_iter_mut()
            .zip(b.poly.par_iter())
            .zip(self.rings.par_iter())
            .for_each(|((a, b), ring)| ring.va_mul_vb_broadcast_into_vb(broadcast, b, a));
        acc.layout = layout;
    }

    fn square_pointwise(&self, acc: &mut NttPolyRNS) {
        let Some((layout, _)) = acc.layout.product(&acc.layout) else {
            panic!("invalid square of {:?}", acc.layout);
        };
        acc.poly
            .par_iter_mut()
            .zip(self.rings.par_iter())
            .for_each(|(a, ring)| ring.va_square_into_va(a));
        acc.layout = layout;
    }

    fn inverse(&self, mut acc: NttPolyRNS) -> PolyRNS {
        let layout: Layout = acc.layout;
        acc.poly
            .par_iter_mut()
            .zip(self.rings.par_iter())
            .for_each(|(a, ring)| ring.intt_layout_inplace(layout, a));
        acc.poly
    }

    /// Transformed product `a * b`, or `a * a` when `b` is None, back in
    /// coefficient domain.
    fn pipeline(&self, op: &'static str, a: Operand<'_>, b: Option<Operand<'_>>, np: usize) -> PolyRNS {
        self.check_limbs(np);
        let mut acc: NttPolyRNS = self.resolve(a, np);
        match b {
            None => self.square_pointwise(&mut acc),
            Some(Operand::Ntt(b)) => self.mul_pointwise(&mut acc, b),
            Some(Operand::Coeffs(b, layout)) => {
                let b: NttPolyRNS = self.to_ntt_layout(b, np, layout);
                self.mul_pointwise(&mut acc, &b)
            }
        }
        trace!(op, np, layout = ?acc.layout, "inverse");
        self.inverse(acc)
    }

    fn expect_layout(op: &str, ra: &NttPolyRNS, expected: &[Layout]) {
        assert!(
            expected.contains(&ra.layout),
            "{}: operand layout {:?} not in {:?}",
            op,
            ra.layout,
            expected
        );
    }
}

/// Products of two ring elements.
impl RingRNS {
    /// Returns a * b mod (X^N0 + 1, Phi_M1(Y), q) using the first `np` primes.
    pub fn mul(&self, a: &[BigInt], b: &[BigInt], np: usize, q: &BigInt) -> Vec<BigInt> {
        let c: PolyRNS = self.pipeline(
            "mul",
            Operand::Coeffs(a, Layout::Full),
            Some(Operand::Coeffs(b, Layout::FullLazy)),
            np,
        );
        self.reconstruct(&c, q)
    }

    /// a <- a * b.
    pub fn mul_inplace(&self, a: &mut [BigInt], b: &[BigInt], np: usize, q: &BigInt) {
        let c: PolyRNS = self.pipeline(
            "mul_inplace",
            Operand::Coeffs(a, Layout::Full),
            Some(Operand::Coeffs(b, Layout::FullLazy)),
            np,
        );
        self.reconstruct_into(&c, q, a)
    }

    pub fn square(&self, a: &[BigInt], np: usize, q: &BigInt) -> Vec<BigInt> {
        let c: PolyRNS = self.pipeline("square", Operand::Coeffs(a, Layout::Full), None, np);
        self.reconstruct(&c, q)
    }

    pub fn square_inplace(&self, a: &mut [BigInt], np: usize, q: &BigInt) {
        let c: PolyRNS = self.pipeline("square_inplace", Operand::Coeffs(a, Layout::Full), None, np);
        self.reconstruct_into(&c, q, a)
    }

    /// Returns a * rb, where rb comes from [RingRNS::to_ntt].
    pub fn mul_ntt(&self, a: &[BigInt], rb: &NttPolyRNS, np: usize, q: &BigInt) -> Vec<BigInt> {
        Self::expect_layout("mul_ntt", rb, &[Layout::Full]);
        let c: PolyRNS = self.pipeline(
            "mul_ntt",
            Operand::Coeffs(a, Layout::FullLazy),
            Some(Operand::Ntt(rb)),
            np,
        );
        self.reconstruct(&c, q)
    }

    pub fn mul_ntt_inplace(&self, a: &mut [BigInt], rb: &NttPolyRNS, np: usize, q: &BigInt) {
        Self::expect_layout("mul_ntt_inplace", rb, &[Layout::Full]);
        let c: PolyRNS = self.pipeline(
            "mul_ntt_inplace",
            Operand::Coeffs(a, Layout::FullLazy),
            Some(Operand::Ntt(rb)),
            np,
        );
        self.reconstruct_into(&c, q, a)
    }

    /// Returns a * rb, where rb comes from [RingRNS::to_ntt_lazy].
    pub fn mul_ntt_lazy(&self, a: &[BigInt], rb: &NttPolyRNS, np: usize, q: &BigInt) -> Vec<BigInt> {
        Self::expect_layout("mul_ntt_lazy", rb, &[Layout::FullLazy]);
        let c: PolyRNS = self.pipeline(
            "mul_ntt_lazy",
            Operand::Coeffs(a, Layout::Full),
            Some(Operand::Ntt(rb)),
            np,
        );
        self.reconstruct(&c, q)
    }

    pub fn mul_ntt_lazy_inplace(&self, a: &mut [BigInt], rb: &NttPolyRNS, np: usize, q: &BigInt) {
        Self::expect_layout("mul_ntt_lazy_inplace", rb, &[Layout::FullLazy]);
        let c: PolyRNS = self.pipeline(
            "mul_ntt_lazy_inplace",
            Operand::Coeffs(a, Layout::Full),
            Some(Operand::Ntt(rb)),
            np,
        );
        self.reconstruct_into(&c, q, a)
    }

    /// Returns ra * rb for two transformed ring elements, at most one of them lazy.
    pub fn mul_dntt(&self, ra: &NttPolyRNS, rb: &NttPolyRNS, np: usize, q: &BigInt) -> Vec<BigInt> {
        Self::expect_layout("mul_dntt", ra, &[Layout::Full, Layout::FullLazy]);
        let c: PolyRNS = self.pipeline("mul_dntt", Operand::Ntt(ra), Some(Operand::Ntt(rb)), np);
        self.reconstruct(&c, q)
    }

    pub fn square_ntt(&self, ra: &NttPolyRNS, np: usize, q: &BigInt) -> Vec<BigInt> {
        Self::expect_layout("square_ntt", ra, &[Layout::Full]);
        let c: PolyRNS = self.pipeline("square_ntt", Operand::Ntt(ra), None, np);
        self.reconstruct(&c, q)
    }
}

/// Products of a ring element with a polynomial in X only (N0 coefficients).
impl RingRNS {
    pub fn mul_x0(&self, a: &[BigInt], b: &[BigInt], np: usize, q: &BigInt) -> Vec<BigInt> {
        let c: PolyRNS = self.pipeline(
            "mul_x0",
            Operand::Coeffs(a, Layout::Rows),
            Some(Operand::Coeffs(b, Layout::X0)),
            np,
        );
        self.reconstruct(&c, q)
    }

    pub fn mul_x0_inplace(&self, a: &mut [BigInt], b: &[BigInt], np: usize, q: &BigInt) {
        let c: PolyRNS = self.pipeline(
            "mul_x0_inplace",
            Operand::Coeffs(a, Layout::Rows),
            Some(Operand::Coeffs(b, Layout::X0)),
            np,
        );
        self.reconstruct_into(&c, q, a)
    }

    /// rb comes from [RingRNS::to_ntt_x0].
    pub fn mul_ntt_x0(&self, a: &[BigInt], rb: &NttPolyRNS, np: usize, q: &BigInt) -> Vec<BigInt> {
        Self::expect_layout("mul_ntt_x0", rb, &[Layout::X0]);
        let c: PolyRNS = self.pipeline(
            "mul_ntt_x0",
            Operand::Coeffs(a, Layout::Rows),
            Some(Operand::Ntt(rb)),
            np,
        );
        self.reconstruct(&c, q)
    }

    pub fn mul_ntt_x0_inplace(&self, a: &mut [BigInt], rb: &NttPolyRNS, np: usize, q: &BigInt) {
        Self::expect_layout("mul_ntt_x0_inplace", rb, &[Layout::X0]);
        let c: PolyRNS = self.pipeline(
            "mul_ntt_x0_inplace",
            Operand::Coeffs(a, Layout::Rows),
            Some(Operand::Ntt(rb)),
            np,
        );
        self.reconstruct_into(&c, q, a)
    }

    /// ra comes from [RingRNS::to_ntt_rows], rb from [RingRNS::to_ntt_x0].
    pub fn mul_dntt_x0(&self, ra: &NttPolyRNS, rb: &NttPolyRNS, np: usize, q: &BigInt) -> Vec<BigInt> {
        Self::expect_layout("mul_dntt_x0", ra, &[Layout::Rows]);
        let c: PolyRNS = self.pipeline("mul_dntt_x0", Operand::Ntt(ra), Some(Operand::Ntt(rb)), np);
        self.reconstruct(&c, q)
    }
}

/// Products of a ring element with a polynomial in Y only (N1 coefficients).
impl RingRNS {
    pub fn mul_x1(&self, a: &[BigInt], b: &[BigInt], np: usize, q: &BigInt) -> Vec<BigInt> {
        let c: PolyRNS = self.pipeline(
            "mul_x1",
            Operand::Coeffs(a, Layout::Columns),
            Some(Operand::Coeffs(b, Layout::X1)),
            np,
        );
        self.reconstruct(&c, q)
    }

    pub fn mul_x1_inplace(&self, a: &mut [BigInt], b: &[BigInt], np: usize, q: &BigInt) {
        let c: PolyRNS = self.pipeline(
            "mul_x1_inplace",
            Operand::Coeffs(a, Layout::Columns),
            Some(Operand::Coeffs(b, Layout::X1)),
            np,
        );
        self.reconstruct_into(&c, q, a)
    }

    /// rb comes from [RingRNS::to_ntt_x1] or [RingRNS::to_ntt_x1_lazy].
    pub fn mul_ntt_x1(&self, a: &[BigInt], rb: &NttPolyRNS, np: usize, q: &BigInt) -> Vec<BigInt> {
        Self::expect_layout("mul_ntt_x1", rb, &[Layout::X1, Layout::X1Lazy]);
        let c: PolyRNS = self.pipeline(
            "mul_ntt_x1",
            Operand::Coeffs(a, Layout::Columns),
            Some(Operand::Ntt(rb)),
            np,
        );
        self.reconstruct(&c, q)
    }

    pub fn mul_ntt_x1_inplace(&self, a: &mut [BigInt], rb: &NttPolyRNS, np: usize, q: &BigInt) {
        Self::expect_layout("mul_ntt_x1_inplace", rb, &[Layout::X1, Layout::X1Lazy]);
        let c: PolyRNS = self.pipeline(
            "mul_ntt_x1_inplace",
            Operand::Coeffs(a, Layout::Columns),
            Some(Operand::Ntt(rb)),
            np,
        );
        self.reconstruct_into(&c, q, a)
    }

    /// ra comes from [RingRNS::to_ntt_columns], rb from [RingRNS::to_ntt_x1].
    pub fn mul_dntt_x1(&self, ra: &NttPolyRNS, rb: &NttPolyRNS, np: usize, q: &BigInt) -> Vec<BigInt> {
        Self::expect_layout("mul_dntt_x1", ra, &[Layout::Columns, Layout::ColumnsLazy]);
        let c: PolyRNS = self.pipeline("mul_dntt_x1", Operand::Ntt(ra), Some(Operand::Ntt(rb)), np);
        self.reconstruct(&c, q)
    }
}
