use rayon::prelude::*;
use std::slice::{ChunksExact, ChunksExactMut};

/// RNS limbs stored contiguously: limb i occupies `data[i*n..(i+1)*n]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolyRNS {
    n: usize,
    data: Vec<u64>,
}

impl PolyRNS {
    pub fn new(n: usize, limbs: usize) -> Self {
        assert!(n != 0, "invalid n: n=0");
        Self {
            n,
            data: vec![0; n * limbs],
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of limbs.
    pub fn limbs(&self) -> usize {
        self.data.len() / self.n
    }

    pub fn at(&self, i: usize) -> &[u64] {
        assert!(i < self.limbs(), "i={} >= limbs={}", i, self.limbs());
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn at_mut(&mut self, i: usize) -> &mut [u64] {
        assert!(i < self.limbs(), "i={} >= limbs={}", i, self.limbs());
        &mut self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn iter(&self) -> ChunksExact<'_, u64> {
        self.data.chunks_exact(self.n)
    }

    pub fn iter_mut(&mut self) -> ChunksExactMut<'_, u64> {
        self.data.chunks_exact_mut(self.n)
    }

    pub fn par_iter(&self) -> rayon::slice::ChunksExact<'_, u64> {
        self.data.par_chunks_exact(self.n)
    }

    pub fn par_iter_mut(&mut self) -> rayon::slice::ChunksExactMut<'_, u64> {
        self.data.par_chunks_exact_mut(self.n)
    }

    /// Drops every limb past the first `limbs`.
    pub fn truncate(&mut self, limbs: usize) {
        self.data.truncate(limbs * self.n);
    }

    /// Copy of the first `limbs` limbs.
    pub fn sub_level(&self, limbs: usize) -> Self {
        assert!(limbs <= self.limbs(), "limbs={} > self.limbs()={}", limbs, self.limbs());
        Self {
            n: self.n,
            data: self.data[..limbs * self.n].to_vec(),
        }
    }

    pub fn raw(&self) -> &[u64] {
        &self.data
    }
}

/// Which axes of an operand are in transformed form.
///
/// `N` is the full ring degree N0*N1, stored row-major with X as the fast axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// N coefficients, rows and columns transformed.
    Full,
    /// As [Layout::Full] with the axis-1 twist deferred.
    FullLazy,
    /// N coefficients, only the N1 rows (X axis) transformed.
    Rows,
    /// N coefficients, only the N0 columns (Y axis) transformed.
    Columns,
    /// As [Layout::Columns] with the axis-1 twist deferred.
    ColumnsLazy,
    /// N0 coefficients of a polynomial in X, transformed.
    X0,
    /// N1 coefficients of a polynomial in Y, transformed.
    X1,
    /// As [Layout::X1] with the axis-1 twist deferred.
    X1Lazy,
}

/// How the second operand of a pointwise product is applied to the first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Broadcast {
    /// Both operands have N entries.
    None,
    /// The second operand has N0 entries, reused on every row.
    Rows,
    /// The second operand has N1 entries, entry i scales row i.
    Columns,
}

impl Layout {
    /// Number of coefficients per limb.
    pub fn len(&self, n0: usize, n1: usize) -> usize {
        match self {
            Layout::X0 => n0,
            Layout::X1 | Layout::X1Lazy => n1,
            _ => n0 * n1,
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Layout::FullLazy | Layout::ColumnsLazy | Layout::X1Lazy)
    }

    /// Layout of the pointwise product `self * other`, where `self` is the
    /// operand with the larger number of coefficients. Returns None when the
    /// product is not a ring product, including when both operands are lazy.
    pub fn product(&self, other: &Layout) -> Option<(Layout, Broadcast)> {
        if self.is_lazy() && other.is_lazy() {
            return None;
        }
        let lazy: bool = self.is_lazy() || other.is_lazy();
        match (self, other) {
            (Layout::Full | Layout::FullLazy, Layout::Full | Layout::FullLazy) => Some((
                if lazy { Layout::FullLazy } else { Layout::Full },
                Broadcast::None,
            )),
            (Layout::Rows, Layout::X0) => Some((Layout::Rows, Broadcast::Rows)),
            (Layout::Columns | Layout::ColumnsLazy, Layout::X1 | Layout::X1Lazy) => Some((
                if lazy {
                    Layout::ColumnsLazy
                } else {
                    Layout::Columns
                },
                Broadcast::Columns,
            )),
            _ => None,
        }
    }
}

/// An RNS polynomial in (partially) transformed form, tagged with its [Layout]
/// so that it can only be consumed by the matching inverse path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NttPolyRNS {
    pub(crate) layout: Layout,
    pub(crate) poly: PolyRNS,
}

impl NttPolyRNS {
    pub(crate) fn new(layout: Layout, poly: PolyRNS) -> Self {
        Self { layout, poly }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn limbs(&self) -> usize {
        self.poly.limbs()
    }

    pub fn poly(&self) -> &PolyRNS {
        &self.poly
    }
}
