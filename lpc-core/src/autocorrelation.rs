//! Lagged sample autocorrelation.
//!
//! `r[t] = sum_{i=0}^{n-t-1} x[i] * x[i+t]`. The blocked kernel processes
//! the `n - t` terms of that sum two at a time, so each pass through the
//! loop issues four loads and two multiply-adds into one accumulator
//! instead of the single multiply-add a naive loop does per iteration; an
//! odd leftover term is folded in directly. This is the same numeric order
//! as the direct double loop (not a reassociation), so results match it
//! exactly modulo the usual floating-point rounding of the final sum.

use crate::error::{Error, Result};

/// Small lag counts (or short signals) aren't worth blocking; below this
/// threshold the direct double loop is used instead.
const DIRECT_THRESHOLD: usize = 32;

/// Computes `dst[0..lag_count)` from `x`.
///
/// `1 <= lag_count <= x.len()`.
pub fn autocorrelate(x: &[f64], lag_count: usize, dst: &mut [f64]) -> Result<()> {
    let n = x.len();
    if lag_count == 0 || lag_count > n || dst.len() != lag_count {
        return Err(Error::InvalidArgument);
    }

    dst[0] = x.iter().map(|&v| v * v).sum();

    if n < DIRECT_THRESHOLD {
        for t in 1..lag_count {
            dst[t] = direct_lag(x, t);
        }
        return Ok(());
    }

    for t in 1..lag_count {
        dst[t] = blocked_lag(x, t);
    }
    Ok(())
}

fn direct_lag(x: &[f64], t: usize) -> f64 {
    let n = x.len();
    let mut acc = 0.0;
    for i in 0..n - t {
        acc += x[i] * x[i + t];
    }
    acc
}

/// Computes `r[t]` for `t >= 1` two terms per iteration.
fn blocked_lag(x: &[f64], t: usize) -> f64 {
    let n = x.len();
    let m = n - t; // number of terms in the sum
    let mut acc = 0.0;
    let mut i = 0;
    while i + 2 <= m {
        acc += x[i] * x[i + t] + x[i + 1] * x[i + 1 + t];
        i += 2;
    }
    if i < m {
        acc += x[i] * x[i + t];
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(x: &[f64], lag_count: usize) -> Vec<f64> {
        let n = x.len();
        (0..lag_count)
            .map(|t| (0..n - t).map(|i| x[i] * x[i + t]).sum())
            .collect()
    }

    #[test]
    fn matches_direct_definition_small() {
        let x = [2.0, 3.0, -1.0, -2.0, 1.0, 4.0, 1.0];
        let mut dst = vec![0.0; 6];
        autocorrelate(&x, 6, &mut dst).unwrap();
        let expect = reference(&x, 6);
        for (a, b) in dst.iter().zip(expect.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn matches_direct_definition_large_uses_blocked_path() {
        let n = 256;
        let x: Vec<f64> = (0..n)
            .map(|i| (i as f64 * 0.037).sin() * 1000.0)
            .collect();
        let lag_count = 32;
        let mut dst = vec![0.0; lag_count];
        autocorrelate(&x, lag_count, &mut dst).unwrap();
        let expect = reference(&x, lag_count);
        for (t, (a, b)) in dst.iter().zip(expect.iter()).enumerate() {
            let tol = 1e-6 * b.abs().max(1.0);
            assert!((a - b).abs() <= tol, "lag {t}: {a} vs {b}");
        }
    }

    #[test]
    fn rejects_bad_lag_count() {
        let x = [1.0, 2.0, 3.0];
        let mut dst = vec![0.0; 4];
        assert_eq!(
            autocorrelate(&x, 4, &mut dst),
            Err(Error::InvalidArgument)
        );
        let mut dst0 = vec![0.0; 0];
        assert_eq!(
            autocorrelate(&x, 0, &mut dst0),
            Err(Error::InvalidArgument)
        );
    }
}
