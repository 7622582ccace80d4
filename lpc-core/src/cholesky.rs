//! In-place Cholesky (L L^T) solve for symmetric positive-definite systems.
//!
//! `a` is overwritten: its lower triangle (including the diagonal) becomes
//! `L`, and `inv_sqrt_diag[i]` receives `1/sqrt(pivot_i)` for the pivot at
//! row `i`, reused by both substitution passes instead of dividing by the
//! diagonal each time. Inverse square roots go through `powf(-0.5)` rather
//! than `1.0 / sqrt(x)` to keep a reproducible rounding path with the
//! bit-stream format this crate's output has to interoperate with.

use ndarray::ArrayViewMut2;

use crate::error::{Error, Result};

/// Solves `a * x = b` for symmetric positive-definite `a` of dimension `d`.
///
/// `a` is `d x d`, `b` and `x` are length `d`, `inv_sqrt_diag` is a scratch
/// vector of length `d`. Returns `Error::SingularMatrix` if any diagonal
/// pivot is non-positive; `a` may be left partially factored in that case.
pub fn cholesky_solve(
    mut a: ArrayViewMut2<'_, f64>,
    b: &[f64],
    x: &mut [f64],
    inv_sqrt_diag: &mut [f64],
) -> Result<()> {
    let d = b.len();
    if a.nrows() != d || a.ncols() != d || x.len() != d || inv_sqrt_diag.len() != d {
        return Err(Error::InvalidArgument);
    }

    // Factorize A = L L^T in place: for each pivot row i, subtract the
    // contribution of previously-factored columns to get the squared
    // diagonal entry, then scale column i below the diagonal by its
    // inverse square root (stored for reuse in the substitution passes).
    for i in 0..d {
        let mut pivot = a[[i, i]];
        for k in 0..i {
            pivot -= a[[i, k]] * a[[i, k]];
        }
        if pivot <= 0.0 {
            return Err(Error::SingularMatrix);
        }
        let inv_sqrt = pivot.powf(-0.5);
        inv_sqrt_diag[i] = inv_sqrt;
        a[[i, i]] = pivot * inv_sqrt; // L[i][i] = sqrt(pivot)

        for j in (i + 1)..d {
            let mut s = a[[j, i]];
            for k in 0..i {
                s -= a[[j, k]] * a[[i, k]];
            }
            a[[j, i]] = s * inv_sqrt;
        }
    }

    // Forward substitution: L * y = b. Reuse `x` as scratch for `y`.
    for i in 0..d {
        let mut s = b[i];
        for k in 0..i {
            s -= a[[i, k]] * x[k];
        }
        x[i] = s * inv_sqrt_diag[i];
    }

    // Back substitution: L^T * x = y.
    for i in (0..d).rev() {
        let mut s = x[i];
        for k in (i + 1)..d {
            s -= a[[k, i]] * x[k];
        }
        x[i] = s * inv_sqrt_diag[i];
    }

    Ok(())
}
