//! Multiplication in Z[X,Y]/(X^N0 + 1, Phi_M1(Y)) over big-integer coefficients.
//!
//! Coefficients are split over RNS primes, multiplied with a two-dimensional
//! NTT (negacyclic along X, Rader over the prime conductor M1 = N1 + 1 along
//! Y) and recombined with the CRT. See [ring_rns] for the operation surface.

pub mod crt;
pub mod dft;
pub mod error;
pub mod modulus;
pub mod parameters;
pub mod poly;
pub mod ring;
pub mod ring_rns;

pub use error::{Error, Result};
pub use parameters::Parameters;
pub use poly::{Layout, NttPolyRNS, PolyRNS};
pub use ring_rns::RingRNS;
