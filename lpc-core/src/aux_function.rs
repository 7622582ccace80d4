//! Auxiliary-function (IRLS) solver: minimises the mean absolute
//! forward-prediction residual by iteratively reweighted least squares,
//! seeded from Levinson-Durbin.

use ndarray::ArrayViewMut2;

use crate::cholesky::cholesky_solve;
use crate::error::{Error, Result};
use crate::levinson::levinson_durbin;

const RESIDUAL_FLOOR: f64 = 1e-6;
const CONVERGENCE_EPS: f64 = 1e-8;

/// Scratch buffers the solver needs, borrowed from the Calculator's arena.
pub struct AuxFunctionScratch<'a> {
    pub autocorr: &'a mut [f64],
    pub lpc_seed: &'a mut [f64],
    pub parcor_seed: &'a mut [f64],
    pub a: &'a mut [f64],
    pub u: &'a mut [f64],
    pub v: &'a mut [f64],
    pub m_matrix: ArrayViewMut2<'a, f64>,
    pub b_vec: &'a mut [f64],
    pub inv_sqrt_diag: &'a mut [f64],
    pub sol: &'a mut [f64],
}

/// Runs the IRLS loop on windowed signal `x[0..n)`, writing `P` coefficients
/// (no implicit leading `1`, unlike Levinson-Durbin's output layout) into
/// `coef_out`.
pub fn solve_auxiliary_function(
    x: &[f64],
    n: usize,
    p: usize,
    max_iter: usize,
    scratch: &mut AuxFunctionScratch<'_>,
    coef_out: &mut [f64],
) -> Result<()> {
    if p == 0 || n <= p || coef_out.len() != p {
        return Err(Error::InvalidArgument);
    }

    autocorrelate_seed(x, n, p, scratch)?;
    levinson_durbin(
        &scratch.autocorr[..p + 1],
        p,
        scratch.a,
        scratch.u,
        scratch.v,
        scratch.lpc_seed,
        scratch.parcor_seed,
    )?;
    coef_out.copy_from_slice(&scratch.lpc_seed[1..=p]);

    let mut prev_obj = f64::INFINITY;

    for iter in 0..max_iter {
        let mut obj = 0.0;
        let mut count = 0usize;

        for j in 0..p {
            scratch.b_vec[j] = 0.0;
            for i in 0..p {
                scratch.m_matrix[[j, i]] = 0.0;
            }
        }

        for t in p..n {
            let mut residual = x[t];
            for i in 0..p {
                residual += coef_out[i] * x[t - i - 1];
            }
            obj += residual.abs();
            count += 1;

            let w = 1.0 / residual.abs().max(RESIDUAL_FLOOR);
            for i in 0..p {
                let xi = x[t - i - 1];
                scratch.b_vec[i] -= w * x[t] * xi;
                for j in 0..p {
                    scratch.m_matrix[[i, j]] += w * xi * x[t - j - 1];
                }
            }
        }
        obj /= count.max(1) as f64;
        log::trace!("auxiliary-function solver: iter {iter} objective {obj}");

        match cholesky_solve(
            scratch.m_matrix.view_mut(),
            &scratch.b_vec[..p],
            &mut scratch.sol[..p],
            &mut scratch.inv_sqrt_diag[..p],
        ) {
            Ok(()) => coef_out.copy_from_slice(&scratch.sol[..p]),
            Err(Error::SingularMatrix) => {
                log::warn!("auxiliary-function solver: singular system, returning zero predictor");
                coef_out.fill(0.0);
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        if (prev_obj - obj).abs() < CONVERGENCE_EPS {
            break;
        }
        prev_obj = obj;
    }

    Ok(())
}

fn autocorrelate_seed(
    x: &[f64],
    n: usize,
    p: usize,
    scratch: &mut AuxFunctionScratch<'_>,
) -> Result<()> {
    crate::autocorrelation::autocorrelate(&x[..n], p + 1, &mut scratch.autocorr[..p + 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn with_scratch<F: FnOnce(&mut AuxFunctionScratch<'_>)>(p: usize, f: F) {
        let mut autocorr = vec![0.0; p + 1];
        let mut lpc_seed = vec![0.0; p + 1];
        let mut parcor_seed = vec![0.0; p + 1];
        let mut a = vec![0.0; p + 2];
        let mut u = vec![0.0; p + 2];
        let mut v = vec![0.0; p + 2];
        let mut m = Array2::<f64>::zeros((p, p));
        let mut b_vec = vec![0.0; p];
        let mut inv_sqrt_diag = vec![0.0; p];
        let mut sol = vec![0.0; p];
        let mut scratch = AuxFunctionScratch {
            autocorr: &mut autocorr,
            lpc_seed: &mut lpc_seed,
            parcor_seed: &mut parcor_seed,
            a: &mut a,
            u: &mut u,
            v: &mut v,
            m_matrix: m.view_mut(),
            b_vec: &mut b_vec,
            inv_sqrt_diag: &mut inv_sqrt_diag,
            sol: &mut sol,
        };
        f(&mut scratch);
    }

    #[test]
    fn silence_yields_zero_predictor() {
        let x = vec![0.0; 128];
        let p = 10;
        with_scratch(p, |scratch| {
            let mut coef = vec![0.0; p];
            solve_auxiliary_function(&x, x.len(), p, 8, scratch, &mut coef).unwrap();
            assert!(coef.iter().all(|&v| v == 0.0));
        });
    }

    #[test]
    fn sine_signal_reduces_residual_energy() {
        let n = 512;
        let p = 8;
        let x: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 32.0).sin())
            .collect();
        with_scratch(p, |scratch| {
            let mut coef = vec![0.0; p];
            solve_auxiliary_function(&x, x.len(), p, 8, scratch, &mut coef).unwrap();

            let input_energy: f64 = x[p..].iter().map(|&v| v * v).sum();
            let residual_energy: f64 = (p..n)
                .map(|t| {
                    let mut r = x[t];
                    for i in 0..p {
                        r += coef[i] * x[t - i - 1];
                    }
                    r * r
                })
                .sum();
            let reduction_db = 10.0 * (input_energy / residual_energy.max(1e-12)).log10();
            assert!(reduction_db >= 20.0, "only {reduction_db} dB reduction");
        });
    }
}
