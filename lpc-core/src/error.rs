//! The crate's error type and result taxonomy.
//!
//! Mirrors the result codes a C-style LPC core would return, but as a plain
//! enum with manual `Display`/`Error` impls rather than a numeric tag, the
//! way `symphonia_core::errors::Error` does for the surrounding codec family.

use core::fmt;

/// Every way a call into this crate can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A precondition on an argument was violated (null/zero caps, unknown
    /// window tag, `rshift == 0`, non-positive precision, etc).
    InvalidArgument,
    /// Requested predictor order exceeds the Calculator's `max_order`.
    ExceedMaxOrder,
    /// Sample block length exceeds the Calculator's `max_num_samples`.
    ExceedMaxNumSamples,
    /// An estimator could not produce a usable result and recovery was not
    /// applicable (distinct from the locally-recovered all-zero predictor
    /// case, which returns `Ok` with a zero predictor instead).
    FailedToCalculation,
    /// Internal: a Cholesky pivot was non-positive. Never escapes the crate
    /// boundary — callers of the solvers that use Cholesky (the
    /// auxiliary-function method) convert this into a zero predictor.
    SingularMatrix,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidArgument => "invalid argument",
            Error::ExceedMaxOrder => "requested order exceeds calculator's max_order",
            Error::ExceedMaxNumSamples => "sample count exceeds calculator's max_num_samples",
            Error::FailedToCalculation => "calculation failed",
            Error::SingularMatrix => "matrix is singular",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Error {}

/// Shorthand used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
