//! Float to fixed-point coefficient quantization with error diffusion.

use crate::error::{Error, Result};

/// Binary exponent `e` such that `m` lies in `[2^(e-1), 2^e)`, for a finite
/// non-zero `m > 0`. Extracted from the IEEE-754 exponent field directly
/// (equivalent to `frexp`) rather than through `log2`, to avoid rounding
/// near exact powers of two.
fn binary_exponent(m: f64) -> i32 {
    debug_assert!(m > 0.0 && m.is_finite());
    let bits = m.to_bits();
    let raw_exp = ((bits >> 52) & 0x7ff) as i32 - 1023;
    raw_exp + 1
}

/// Quantizes `coef[0..P)` to `bits`-bit fixed point, writing `int_coef[0..P)`
/// and returning the right-shift `rshift` such that `coef_i ≈ int_coef_i *
/// 2^(-rshift)`.
pub fn quantize_coefficients(
    coef: &[f64],
    bits: u32,
    int_coef: &mut [i32],
) -> Result<u32> {
    let p = coef.len();
    if bits == 0 || int_coef.len() != p {
        return Err(Error::InvalidArgument);
    }

    let m = coef.iter().fold(0.0_f64, |acc, &c| acc.max(c.abs()));

    let half_lsb_floor = 2f64.powi(-((bits as i32) - 1));
    if m <= half_lsb_floor {
        int_coef.fill(0);
        return Ok(bits);
    }

    let ndigit = binary_exponent(m);
    let rshift_signed = (bits as i32 - 1) - ndigit;
    debug_assert!(rshift_signed > 0, "quantizer: computed non-positive rshift");
    let rshift = rshift_signed.max(0) as u32;

    let scale = 2f64.powi(rshift as i32);
    let lo = -(1i64 << (bits - 1));
    let hi = (1i64 << (bits - 1)) - 1;

    let mut err = 0.0_f64;
    for i in (0..p).rev() {
        err += coef[i] * scale;
        let mut q = err.round() as i64;
        q = q.clamp(lo, hi);
        err -= q as f64;
        int_coef[i] = q as i32;
    }

    Ok(rshift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_coefficients_quantize_to_zero_with_full_rshift() {
        let coef = [0.0; 4];
        let mut int_coef = [0; 4];
        let rshift = quantize_coefficients(&coef, 12, &mut int_coef).unwrap();
        assert_eq!(rshift, 12);
        assert_eq!(int_coef, [0; 4]);
    }

    #[test]
    fn reconstruction_error_bounded() {
        let coef = [0.9, -0.5, 0.25, -0.125, 0.0625];
        let bits = 12u32;
        let mut int_coef = [0; 5];
        let rshift = quantize_coefficients(&coef, bits, &mut int_coef).unwrap();
        let scale = 2f64.powi(-(rshift as i32));
        for (c, q) in coef.iter().zip(int_coef.iter()) {
            let recon = *q as f64 * scale;
            assert!(
                (c - recon).abs() <= scale,
                "c={c} recon={recon} scale={scale}"
            );
        }
    }

    #[test]
    fn rejects_zero_bits() {
        let coef = [0.1];
        let mut int_coef = [0];
        assert_eq!(
            quantize_coefficients(&coef, 0, &mut int_coef),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn clamps_coefficients_near_full_scale() {
        let coef = [1.0, -1.0];
        let mut int_coef = [0; 2];
        let rshift = quantize_coefficients(&coef, 4, &mut int_coef).unwrap();
        let max_mag = 1i32 << 3;
        for q in int_coef {
            assert!(q.unsigned_abs() <= max_mag as u32);
        }
        assert!(rshift >= 1);
    }
}
