//! Single-arena layout for all of a Calculator's scratch buffers.
//! A `WorkspaceLayout` knows, for a given `(max_order, max_num_samples)`,
//! the exact element offset and length of every region within one flat
//! `[f64]` buffer — whether that buffer is an owned `Vec` or a
//! caller-supplied arena.

use crate::error::{Error, Result};

/// Required byte alignment for the arena.
pub const ARENA_ALIGN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Region {
    Autocorr = 0,
    Parcor = 1,
    Lpc = 2,
    A = 3,
    U = 4,
    V = 5,
    R = 6,
    Windowed = 7,
    B = 8,
    InvSqrtDiag = 9,
    Sol = 10,
}

const REGION_COUNT: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkspaceLayout {
    pub(crate) max_order: usize,
    pub(crate) max_num_samples: usize,
    offsets: [usize; REGION_COUNT],
    lens: [usize; REGION_COUNT],
    total_elems: usize,
}

/// Rounds an element count up so the *next* region starts 16-byte aligned
/// (i.e. on an even `f64` boundary).
fn align_up_elems(len: usize) -> usize {
    (len + 1) & !1
}

impl WorkspaceLayout {
    pub fn new(max_order: u32, max_num_samples: u32) -> Result<Self> {
        if max_order == 0 || max_num_samples == 0 {
            return Err(Error::InvalidArgument);
        }
        let m = max_order as usize;
        let n = max_num_samples as usize;

        let lens = [
            m + 1,             // Autocorr
            m + 1,             // Parcor
            m + 1,             // Lpc
            m + 2,             // A
            m + 2,             // U
            m + 2,             // V
            (m + 1) * (m + 1), // R
            n,                 // Windowed
            m,                 // B (IRLS weighted right-hand side)
            m,                 // InvSqrtDiag (Cholesky pivot scratch)
            m,                 // Sol (IRLS solution scratch)
        ];

        let mut offsets = [0usize; REGION_COUNT];
        let mut cursor = 0usize;
        for i in 0..REGION_COUNT {
            offsets[i] = cursor;
            cursor += align_up_elems(lens[i]);
        }

        Ok(Self {
            max_order: m,
            max_num_samples: n,
            offsets,
            lens,
            total_elems: cursor,
        })
    }

    /// Exact number of bytes a backing arena must provide.
    pub fn byte_size(&self) -> usize {
        self.total_elems * std::mem::size_of::<f64>()
    }

    pub(crate) fn total_elems(&self) -> usize {
        self.total_elems
    }

    pub(crate) fn range(&self, region: Region) -> (usize, usize) {
        let i = region as usize;
        (self.offsets[i], self.lens[i])
    }

    pub(crate) fn gap_after(&self, region: Region) -> usize {
        let i = region as usize;
        align_up_elems(self.lens[i]) - self.lens[i]
    }
}

/// `CalculateWorkSize` — the exact byte count an arena must be for a
/// Calculator built with these caps. Fails if either cap is zero.
pub fn calculate_work_size(max_order: u32, max_num_samples: u32) -> Result<usize> {
    WorkspaceLayout::new(max_order, max_num_samples).map(|l| l.byte_size())
}
