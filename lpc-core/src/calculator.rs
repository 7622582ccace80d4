//! The reusable compute context: caps on max order and max sample count,
//! an owned scratch arena, and the three estimator entry points plus the
//! two diagnostics.
//!
//! `Calculator` owns its scratch arena as a `Vec<f64>` (a builder producing
//! an owned context). `ArenaCalculator` is the bring-your-own-arena variant
//! for embedders that pre-size memory up front; it reinterprets a
//! caller-supplied byte buffer in place via `bytemuck`, the way
//! `symphonia-core` reinterprets raw buffers elsewhere in this codec
//! family, instead of copying into owned storage.

use std::ops::DerefMut;

use ndarray::{s, ArrayViewMut2};

use crate::aux_function::{solve_auxiliary_function, AuxFunctionScratch};
use crate::autocorrelation::autocorrelate;
use crate::burg::solve_burg;
use crate::diagnostics::{calculate_mdl as calculate_mdl_score, estimate_code_length as estimate_code_length_score};
use crate::error::{Error, Result};
use crate::levinson::levinson_durbin;
use crate::window::{apply_window, WindowType};
use crate::workspace::{calculate_work_size, Region, WorkspaceLayout};

struct Regions<'a> {
    autocorr: &'a mut [f64],
    parcor: &'a mut [f64],
    lpc: &'a mut [f64],
    a: &'a mut [f64],
    u: &'a mut [f64],
    v: &'a mut [f64],
    r: &'a mut [f64],
    windowed: &'a mut [f64],
    b: &'a mut [f64],
    inv_sqrt_diag: &'a mut [f64],
    sol: &'a mut [f64],
}

fn take<'a>(
    layout: &WorkspaceLayout,
    region: Region,
    data: &'a mut [f64],
) -> (&'a mut [f64], &'a mut [f64]) {
    let (_, len) = layout.range(region);
    let gap = layout.gap_after(region);
    let (chunk, remainder) = data.split_at_mut(len);
    let (_, remainder) = remainder.split_at_mut(gap);
    (chunk, remainder)
}

fn split_regions<'a>(layout: &WorkspaceLayout, data: &'a mut [f64]) -> Regions<'a> {
    let (autocorr, rest) = take(layout, Region::Autocorr, data);
    let (parcor, rest) = take(layout, Region::Parcor, rest);
    let (lpc, rest) = take(layout, Region::Lpc, rest);
    let (a, rest) = take(layout, Region::A, rest);
    let (u, rest) = take(layout, Region::U, rest);
    let (v, rest) = take(layout, Region::V, rest);
    let (r, rest) = take(layout, Region::R, rest);
    let (windowed, rest) = take(layout, Region::Windowed, rest);
    let (b, rest) = take(layout, Region::B, rest);
    let (inv_sqrt_diag, rest) = take(layout, Region::InvSqrtDiag, rest);
    let (sol, _rest) = take(layout, Region::Sol, rest);
    Regions { autocorr, parcor, lpc, a, u, v, r, windowed, b, inv_sqrt_diag, sol }
}

/// The operations shared by the owned and arena-backed calculators. Lives
/// on `Engine` so both public wrapper types (`Calculator`,
/// `ArenaCalculator`) get identical behaviour without duplicating the
/// estimator orchestration.
pub(crate) struct Engine<S> {
    layout: WorkspaceLayout,
    data: S,
}

impl<S: DerefMut<Target = [f64]>> Engine<S> {
    fn new(layout: WorkspaceLayout, data: S) -> Self {
        Self { layout, data }
    }

    fn check_bounds(&self, p: usize, n: usize) -> Result<()> {
        if p == 0 || p > self.layout.max_order {
            return Err(Error::ExceedMaxOrder);
        }
        if n == 0 || n > self.layout.max_num_samples {
            return Err(Error::ExceedMaxNumSamples);
        }
        Ok(())
    }

    /// `CalculateLPCCoefficients`: Levinson-Durbin. `out` receives `a[1..=P]`
    /// (the implicit leading `1.0` is not delivered).
    pub fn calculate_lpc_coefficients(
        &mut self,
        x: &[f64],
        n: usize,
        out: &mut [f64],
        p: usize,
        window: WindowType,
    ) -> Result<()> {
        self.check_bounds(p, n)?;
        if x.len() != n || out.len() != p {
            return Err(Error::InvalidArgument);
        }

        let mut regions = split_regions(&self.layout, &mut self.data[..]);
        apply_window(x, &mut regions.windowed[..n], window)?;
        let windowed: &[f64] = &regions.windowed[..n];

        autocorrelate(windowed, p + 1, &mut regions.autocorr[..p + 1])?;
        levinson_durbin(
            &regions.autocorr[..p + 1],
            p,
            regions.a,
            regions.u,
            regions.v,
            &mut regions.lpc[..p + 1],
            &mut regions.parcor[..p + 1],
        )?;

        out.copy_from_slice(&regions.lpc[1..=p]);
        Ok(())
    }

    /// `CalculateLPCCoefficientsAF`: auxiliary-function (IRLS) method.
    /// `out` receives `P` coefficients with no implicit leading `1`.
    pub fn calculate_lpc_coefficients_af(
        &mut self,
        x: &[f64],
        n: usize,
        out: &mut [f64],
        p: usize,
        max_iter: usize,
        window: WindowType,
    ) -> Result<()> {
        self.check_bounds(p, n)?;
        if x.len() != n || out.len() != p {
            return Err(Error::InvalidArgument);
        }

        let m = self.layout.max_order;
        let mut regions = split_regions(&self.layout, &mut self.data[..]);
        apply_window(x, &mut regions.windowed[..n], window)?;

        let r_full = ArrayViewMut2::from_shape((m + 1, m + 1), regions.r)
            .expect("R buffer sized for (max_order+1)^2 elements");
        let m_matrix = r_full.slice_move(s![0..p, 0..p]);

        let windowed: &[f64] = &regions.windowed[..n];
        let mut scratch = AuxFunctionScratch {
            autocorr: regions.autocorr,
            lpc_seed: regions.lpc,
            parcor_seed: regions.parcor,
            a: regions.a,
            u: regions.u,
            v: regions.v,
            m_matrix,
            b_vec: &mut regions.b[..p],
            inv_sqrt_diag: &mut regions.inv_sqrt_diag[..p],
            sol: &mut regions.sol[..p],
        };
        solve_auxiliary_function(windowed, n, p, max_iter, &mut scratch, out)
    }

    /// `CalculateLPCCoefficientsBurg`: lattice method. `out` receives `P`
    /// coefficients with no implicit leading `1`.
    pub fn calculate_lpc_coefficients_burg(
        &mut self,
        x: &[f64],
        n: usize,
        out: &mut [f64],
        p: usize,
    ) -> Result<()> {
        self.check_bounds(p, n)?;
        if x.len() != n || out.len() != p {
            return Err(Error::InvalidArgument);
        }

        let m = self.layout.max_order;
        let mut regions = split_regions(&self.layout, &mut self.data[..]);

        let mut r_full = ArrayViewMut2::from_shape((m + 1, m + 1), regions.r)
            .expect("R buffer sized for (max_order+1)^2 elements");
        let mut c_matrix = r_full.slice_mut(s![0..=p, 0..=p]);

        solve_burg(x, n, p, &mut c_matrix, &mut regions.a[..p + 1], out)
    }

    /// `EstimateCodeLength`: runs Levinson-Durbin internally and derives
    /// the bits/sample estimate from its `r[0]` and PARCOR output.
    pub fn estimate_code_length(
        &mut self,
        x: &[f64],
        n: usize,
        bps: u32,
        p: usize,
        window: WindowType,
    ) -> Result<f64> {
        self.check_bounds(p, n)?;
        if x.len() != n {
            return Err(Error::InvalidArgument);
        }

        let mut regions = split_regions(&self.layout, &mut self.data[..]);
        apply_window(x, &mut regions.windowed[..n], window)?;
        let windowed: &[f64] = &regions.windowed[..n];

        autocorrelate(windowed, p + 1, &mut regions.autocorr[..p + 1])?;
        levinson_durbin(
            &regions.autocorr[..p + 1],
            p,
            regions.a,
            regions.u,
            regions.v,
            &mut regions.lpc[..p + 1],
            &mut regions.parcor[..p + 1],
        )?;

        Ok(estimate_code_length_score(
            regions.autocorr[0],
            n,
            bps,
            &regions.parcor[..p + 1],
            p,
        ))
    }

    /// `CalculateMDL`: runs Levinson-Durbin internally and scores the
    /// order via its PARCOR output.
    pub fn calculate_mdl(&mut self, x: &[f64], n: usize, p: usize, window: WindowType) -> Result<f64> {
        self.check_bounds(p, n)?;
        if x.len() != n {
            return Err(Error::InvalidArgument);
        }

        let mut regions = split_regions(&self.layout, &mut self.data[..]);
        apply_window(x, &mut regions.windowed[..n], window)?;
        let windowed: &[f64] = &regions.windowed[..n];

        autocorrelate(windowed, p + 1, &mut regions.autocorr[..p + 1])?;
        levinson_durbin(
            &regions.autocorr[..p + 1],
            p,
            regions.a,
            regions.u,
            regions.v,
            &mut regions.lpc[..p + 1],
            &mut regions.parcor[..p + 1],
        )?;

        Ok(calculate_mdl_score(n, &regions.parcor[..p + 1], p))
    }
}

/// Owned compute context: allocates its arena once at construction and
/// reuses it for every call.
pub struct Calculator(Engine<Vec<f64>>);

impl Calculator {
    /// `Create`. Fails if either cap is zero.
    pub fn new(max_order: u32, max_num_samples: u32) -> Result<Self> {
        let layout = WorkspaceLayout::new(max_order, max_num_samples)?;
        let data = vec![0.0; layout.total_elems()];
        Ok(Self(Engine::new(layout, data)))
    }

    pub fn max_order(&self) -> u32 {
        self.0.layout.max_order as u32
    }

    pub fn max_num_samples(&self) -> u32 {
        self.0.layout.max_num_samples as u32
    }

    pub fn calculate_lpc_coefficients(
        &mut self,
        x: &[f64],
        n: usize,
        out: &mut [f64],
        p: usize,
        window: WindowType,
    ) -> Result<()> {
        self.0.calculate_lpc_coefficients(x, n, out, p, window)
    }

    pub fn calculate_lpc_coefficients_af(
        &mut self,
        x: &[f64],
        n: usize,
        out: &mut [f64],
        p: usize,
        max_iter: usize,
        window: WindowType,
    ) -> Result<()> {
        self.0
            .calculate_lpc_coefficients_af(x, n, out, p, max_iter, window)
    }

    pub fn calculate_lpc_coefficients_burg(
        &mut self,
        x: &[f64],
        n: usize,
        out: &mut [f64],
        p: usize,
    ) -> Result<()> {
        self.0.calculate_lpc_coefficients_burg(x, n, out, p)
    }

    pub fn estimate_code_length(
        &mut self,
        x: &[f64],
        n: usize,
        bps: u32,
        p: usize,
        window: WindowType,
    ) -> Result<f64> {
        self.0.estimate_code_length(x, n, bps, p, window)
    }

    pub fn calculate_mdl(&mut self, x: &[f64], n: usize, p: usize, window: WindowType) -> Result<f64> {
        self.0.calculate_mdl(x, n, p, window)
    }
}

/// Bring-your-own-arena compute context: reinterprets a caller-supplied
/// byte buffer as the scratch arena in place, for embedders who pre-size
/// memory up front and want a raw-arena variant for embedded targets.
pub struct ArenaCalculator<'a>(Engine<&'a mut [f64]>);

impl<'a> ArenaCalculator<'a> {
    /// `Create` with a caller-supplied arena. Fails if either cap is zero,
    /// or if `arena` is smaller than `calculate_work_size(max_order,
    /// max_num_samples)` bytes or is not suitably aligned for `f64`.
    pub fn from_arena(max_order: u32, max_num_samples: u32, arena: &'a mut [u8]) -> Result<Self> {
        let layout = WorkspaceLayout::new(max_order, max_num_samples)?;
        let needed = calculate_work_size(max_order, max_num_samples)?;
        if arena.len() < needed {
            return Err(Error::InvalidArgument);
        }
        let data: &'a mut [f64] = bytemuck::try_cast_slice_mut(&mut arena[..needed])
            .map_err(|_| Error::InvalidArgument)?;
        Ok(Self(Engine::new(layout, data)))
    }

    pub fn max_order(&self) -> u32 {
        self.0.layout.max_order as u32
    }

    pub fn max_num_samples(&self) -> u32 {
        self.0.layout.max_num_samples as u32
    }

    pub fn calculate_lpc_coefficients(
        &mut self,
        x: &[f64],
        n: usize,
        out: &mut [f64],
        p: usize,
        window: WindowType,
    ) -> Result<()> {
        self.0.calculate_lpc_coefficients(x, n, out, p, window)
    }

    pub fn calculate_lpc_coefficients_af(
        &mut self,
        x: &[f64],
        n: usize,
        out: &mut [f64],
        p: usize,
        max_iter: usize,
        window: WindowType,
    ) -> Result<()> {
        self.0
            .calculate_lpc_coefficients_af(x, n, out, p, max_iter, window)
    }

    pub fn calculate_lpc_coefficients_burg(
        &mut self,
        x: &[f64],
        n: usize,
        out: &mut [f64],
        p: usize,
    ) -> Result<()> {
        self.0.calculate_lpc_coefficients_burg(x, n, out, p)
    }

    pub fn estimate_code_length(
        &mut self,
        x: &[f64],
        n: usize,
        bps: u32,
        p: usize,
        window: WindowType,
    ) -> Result<f64> {
        self.0.estimate_code_length(x, n, bps, p, window)
    }

    pub fn calculate_mdl(&mut self, x: &[f64], n: usize, p: usize, window: WindowType) -> Result<f64> {
        self.0.calculate_mdl(x, n, p, window)
    }
}
