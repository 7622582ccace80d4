//! Burg lattice solver, autocovariance-matrix formulation.
//!
//! Unlike Levinson-Durbin, Burg's method needs no window: it minimises
//! forward and backward prediction error directly against the raw signal.

use ndarray::ArrayViewMut2;

use crate::error::{Error, Result};

/// Fills the `(p+1) x (p+1)` autocovariance matrix `c[i][j]` (`i <= j`) with
/// the autocorrelation of `x[0..n-i)` at lag `j-i`, then mirrors to the
/// lower triangle.
fn build_autocovariance(x: &[f64], n: usize, p: usize, c: &mut ArrayViewMut2<'_, f64>) {
    for i in 0..=p {
        for j in i..=p {
            let lag = j - i;
            let count = n - j;
            let mut acc = 0.0;
            for k in 0..count {
                acc += x[k] * x[k + lag];
            }
            c[[i, j]] = acc;
            c[[j, i]] = acc;
        }
    }
}

/// Runs the lattice recursion over `x[0..n)`, writing `P` coefficients (no
/// implicit leading `1`, matching the AF/Levinson-Durbin convention of
/// delivering `a_1..a_P`) into `coef_out`.
///
/// `c_matrix` is `(p+1) x (p+1)` scratch; `a` is scratch of length at least
/// `p + 1`.
pub fn solve_burg(
    x: &[f64],
    n: usize,
    p: usize,
    c_matrix: &mut ArrayViewMut2<'_, f64>,
    a: &mut [f64],
    coef_out: &mut [f64],
) -> Result<()> {
    if p == 0 || n <= p || coef_out.len() != p || a.len() < p + 1 {
        return Err(Error::InvalidArgument);
    }
    if c_matrix.nrows() != p + 1 || c_matrix.ncols() != p + 1 {
        return Err(Error::InvalidArgument);
    }

    build_autocovariance(x, n, p, c_matrix);

    a[0] = 1.0;
    for i in 1..=p {
        a[i] = 0.0;
    }

    for k in 0..p {
        let mut fkpbk = 0.0;
        for i in 0..=k {
            fkpbk += a[i] * a[i] * (c_matrix[[i, i]] + c_matrix[[k + 1 - i, k + 1 - i]]);
        }
        let mut cross = 0.0;
        for i in 0..=k {
            for j in (i + 1)..=k {
                cross += a[i] * a[j] * (c_matrix[[i, j]] + c_matrix[[k + 1 - i, k + 1 - j]]);
            }
        }
        fkpbk += 2.0 * cross;

        let mut ck = 0.0;
        for i in 0..=k {
            for j in 0..=k {
                ck += a[i] * a[j] * c_matrix[[i, k + 1 - j]];
            }
        }

        if fkpbk == 0.0 {
            log::warn!("burg solver: degenerate system at order {k}, returning zero predictor");
            coef_out.fill(0.0);
            return Ok(());
        }

        let mu = -2.0 * ck / fkpbk;
        debug_assert!(mu.abs() <= 1.0 + 1e-9, "burg: reflection coefficient exceeded unit magnitude");

        for i in 0..=(k + 1) / 2 {
            let ai = a[i];
            let akp1mi = a[k + 1 - i];
            a[i] = ai + mu * akp1mi;
            a[k + 1 - i] = mu * ai + akp1mi;
        }
    }

    coef_out.copy_from_slice(&a[1..=p]);
    Ok(())
}
