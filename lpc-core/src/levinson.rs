//! Levinson-Durbin recursion: solves the Yule-Walker system for a Toeplitz
//! autocorrelation matrix, producing both LPC and PARCOR coefficients in
//! one pass.

use crate::error::{Error, Result};

/// `r[0..=p]` in, `lpc_out[0..=p]` / `parcor_out[0..=p]` out. `a`, `u`, `v`
/// are scratch vectors of length at least `p + 2`. `lpc_out[0]` is always
/// `1.0` (the implicit leading coefficient); `parcor_out[0]` is always `0`
/// (unused).
///
/// Degenerate input (`r[0]` below `f32::MIN_POSITIVE`) yields the all-zero
/// "silence predictor" rather than dividing by a near-zero energy.
pub fn levinson_durbin(
    r: &[f64],
    p: usize,
    a: &mut [f64],
    u: &mut [f64],
    v: &mut [f64],
    lpc_out: &mut [f64],
    parcor_out: &mut [f64],
) -> Result<()> {
    if r.len() <= p || lpc_out.len() <= p || parcor_out.len() <= p {
        return Err(Error::InvalidArgument);
    }
    if a.len() < p + 1 || u.len() < p + 1 || v.len() < p + 1 {
        return Err(Error::InvalidArgument);
    }

    if p == 0 {
        lpc_out[0] = 1.0;
        parcor_out[0] = 0.0;
        return Ok(());
    }

    if r[0] < f32::MIN_POSITIVE as f64 {
        log::warn!("levinson-durbin: r[0] underflowed, returning silence predictor");
        for i in 0..=p {
            lpc_out[i] = 0.0;
            parcor_out[i] = 0.0;
        }
        return Ok(());
    }

    a[0] = 1.0;
    a[1] = -r[1] / r[0];
    let mut e = r[0] + r[1] * a[1];
    parcor_out[0] = 0.0;
    parcor_out[1] = r[1] / r[0];

    for m in 1..p {
        let mut acc = 0.0;
        for i in 0..=m {
            acc += a[i] * r[m + 1 - i];
        }
        let gamma = -acc / e;

        debug_assert!(e >= 0.0, "levinson-durbin: error energy went negative");
        debug_assert!(gamma.abs() < 1.0, "levinson-durbin: reflection coefficient exceeded unit magnitude");

        e *= 1.0 - gamma * gamma;

        for i in 0..=m {
            u[i] = a[i];
        }
        u[m + 1] = 0.0;
        v[0] = 0.0;
        for i in 0..=m {
            v[i + 1] = a[m - i];
        }

        for i in 0..=m + 1 {
            a[i] = u[i] + gamma * v[i];
        }
        parcor_out[m + 1] = -gamma;
    }

    lpc_out[..=p].copy_from_slice(&a[..=p]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocorrelation::autocorrelate;

    fn run(x: &[f64], p: usize) -> (Vec<f64>, Vec<f64>) {
        let mut r = vec![0.0; p + 1];
        autocorrelate(x, p + 1, &mut r).unwrap();
        let mut a = vec![0.0; p + 2];
        let mut u = vec![0.0; p + 2];
        let mut v = vec![0.0; p + 2];
        let mut lpc = vec![0.0; p + 1];
        let mut parcor = vec![0.0; p + 1];
        levinson_durbin(&r, p, &mut a, &mut u, &mut v, &mut lpc, &mut parcor).unwrap();
        (lpc, parcor)
    }

    #[test]
    fn matches_known_coefficients() {
        // Same fixture and expected coefficients as the formant-analysis
        // predecessor of this module.
        let x7 = [2.0, 3.0, -1.0, -2.0, 1.0, 4.0, 1.0];
        let expect = [1.0, -0.69190537, 0.76150628, -0.34575153];
        let (lpc, _) = run(&x7, 3);
        for (a, b) in lpc.iter().zip(expect.iter()) {
            assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }
    }

    #[test]
    fn silence_yields_zero_predictor() {
        let x = vec![0.0; 64];
        let (lpc, parcor) = run(&x, 4);
        assert!(lpc.iter().all(|&v| v == 0.0));
        assert!(parcor.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn alternating_signal_has_strong_first_reflection() {
        let x: Vec<f64> = (0..64).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let (_, parcor) = run(&x, 4);
        assert!(parcor[1].abs() > 0.99, "k1 = {}", parcor[1]);
    }
}
