//! Integer predict/synthesize filters.
//!
//! `predict` turns samples into residuals, reading from `input` and
//! writing to `output`; `synthesize` is its inverse, operating on one
//! buffer in place since recovering sample `t` needs the samples already
//! recovered at `t-1, t-2, ...` as history.

use crate::error::{Error, Result};

/// `residual[t] = x[t] + ((2^(rshift-1) + sum_o coef[o] * x[t-o-1]) >> rshift)`,
/// using `t' = min(t, P)` taps. The accumulator is a 32-bit signed integer,
/// matching the reference's wraparound behaviour at that width; do not
/// widen it to `i64`, which would silently diverge from the reference on
/// high-order, high-amplitude blocks.
pub fn predict(input: &[i32], coef: &[i32], rshift: u32, output: &mut [i32]) -> Result<()> {
    if rshift == 0 || output.len() != input.len() {
        return Err(Error::InvalidArgument);
    }
    let p = coef.len();
    let rounding: i32 = 1i32 << (rshift - 1);

    for t in 0..input.len() {
        let taps = t.min(p);
        let mut acc: i32 = rounding;
        for o in 0..taps {
            acc = acc.wrapping_add(coef[o].wrapping_mul(input[t - o - 1]));
        }
        let pred = acc >> rshift;
        output[t] = input[t].wrapping_add(pred);
    }
    Ok(())
}

/// Inverse of `predict`. Each sample recovered so far becomes history for
/// the next, which is exactly what makes this the inverse of the forward
/// filter's use of input history.
pub fn synthesize(x: &mut [i32], coef: &[i32], rshift: u32) -> Result<()> {
    if rshift == 0 {
        return Err(Error::InvalidArgument);
    }
    let p = coef.len();
    let rounding: i32 = 1i32 << (rshift - 1);

    for t in 0..x.len() {
        let taps = t.min(p);
        let mut acc: i32 = rounding;
        for o in 0..taps {
            acc = acc.wrapping_add(coef[o].wrapping_mul(x[t - o - 1]));
        }
        let pred = acc >> rshift;
        x[t] = x[t].wrapping_sub(pred);
    }
    Ok(())
}
