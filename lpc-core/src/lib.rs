//! Linear predictive coding core for a lossless audio codec.
//!
//! A [`Calculator`] turns a block of real-valued samples into the
//! coefficients of an all-pole predictor, by one of three estimators
//! ([`Calculator::calculate_lpc_coefficients`] for Levinson-Durbin,
//! [`Calculator::calculate_lpc_coefficients_af`] for the auxiliary-function
//! IRLS method, [`Calculator::calculate_lpc_coefficients_burg`] for Burg's
//! lattice method). [`quantize::quantize_coefficients`] turns the resulting
//! float coefficients into the fixed-point `(int_coef[], rshift)` pair a
//! bit-stream actually carries, and [`filter::predict`] /
//! [`filter::synthesize`] apply that fixed-point predictor to integer
//! sample blocks. [`Calculator::estimate_code_length`] and
//! [`Calculator::calculate_mdl`] are the two scalar diagnostics the
//! enclosing codec uses to choose a predictor order; this crate does not
//! choose the order itself.
//!
//! Everything here operates on complete, in-memory blocks: there is no
//! streaming mode, no SIMD, and no automatic order search. A `Calculator`
//! is not `Sync` in spirit even though the type system doesn't enforce it —
//! give each worker its own instance.

pub mod autocorrelation;
pub mod aux_function;
pub mod burg;
mod calculator;
pub mod cholesky;
pub mod diagnostics;
mod error;
pub mod filter;
pub mod levinson;
pub mod quantize;
pub mod window;
pub mod workspace;

pub use calculator::{ArenaCalculator, Calculator};
pub use error::{Error, Result};
pub use window::WindowType;
pub use workspace::calculate_work_size;
