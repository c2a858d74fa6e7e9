//! Construction errors of the ring bank.
//!
//! Every failure here is a configuration problem detected while building the
//! tables. Once a [crate::ring_rns::RingRNS] exists, its operations cannot fail.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Inconsistent ring shape or limb configuration.
    InvalidParameters(String),
    /// A configured modulus is not prime.
    NotPrime(u64),
    /// A configured prime does not satisfy `q = 1 mod nth_root`.
    NotNttFriendly { q: u64, nth_root: u64 },
    /// No primitive root of the requested order exists modulo `q`.
    MissingRoot { q: u64, order: u64 },
    /// The axis-1 convolution kernel has a zero entry modulo `q`.
    SingularKernel(u64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameters(msg) => write!(f, "invalid parameters: {}", msg),
            Error::NotPrime(q) => write!(f, "q={} is not prime", q),
            Error::NotNttFriendly { q, nth_root } => {
                write!(f, "q={} is not 1 mod nth_root={}", q, nth_root)
            }
            Error::MissingRoot { q, order } => {
                write!(f, "no primitive {}-th root of unity mod q={}", order, q)
            }
            Error::SingularKernel(q) => write!(f, "axis-1 kernel is not invertible mod q={}", q),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Creates an [Error::InvalidParameters] with format string support.
macro_rules! params_err {
    ($($arg:tt)*) => {
        $crate::error::Error::InvalidParameters(format!($($arg)*))
    };
}

pub(crate) use params_err;
