pub mod cyclic;
pub mod ntt;
pub mod rader;

/// In-place transform over the residues of a single prime.
///
/// Inputs are expected in `[0, q)`, outputs are returned in `[0, q)`.
pub trait DFT<O> {
    /// Transform length.
    fn n(&self) -> usize;
    fn forward_inplace(&self, a: &mut [O]);
    fn backward_inplace(&self, a: &mut [O]);
}
