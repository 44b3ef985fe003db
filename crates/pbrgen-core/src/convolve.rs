//! Generic 2D convolution over single-channel fields.
//!
//! The engine computes a correlation: the kernel is applied as written, not
//! flipped, so a kernel whose right column is positive responds positively to
//! intensity increasing to the right. Borders are handled by replicating the
//! edge pixels outward by `size / 2`, so the output always has the input's
//! shape.

use thiserror::Error;

use crate::field::IntensityField;

/// Errors from kernel construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KernelError {
    #[error("kernel must not be empty")]
    Empty,

    #[error("kernel size must be odd, got {0}x{0}")]
    EvenSize(usize),

    #[error("kernel must be square: row {row} has {len} weights, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// An odd-sized square matrix of weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

/// Horizontal Sobel operator.
pub const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];

/// Vertical Sobel operator.
pub const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

impl Kernel {
    /// Build a kernel from rows of weights.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self, KernelError> {
        let size = rows.len();
        if size == 0 {
            return Err(KernelError::Empty);
        }
        if size % 2 == 0 {
            return Err(KernelError::EvenSize(size));
        }

        let mut weights = Vec::with_capacity(size * size);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != size {
                return Err(KernelError::Ragged {
                    row,
                    len: r.len(),
                    expected: size,
                });
            }
            weights.extend_from_slice(r);
        }

        Ok(Self { size, weights })
    }

    /// Build a 3x3 kernel from a fixed array. Always valid.
    pub fn from_3x3(rows: [[f32; 3]; 3]) -> Self {
        Self {
            size: 3,
            weights: rows.iter().flatten().copied().collect(),
        }
    }

    /// The horizontal Sobel kernel.
    pub fn sobel_x() -> Self {
        Self::from_3x3(SOBEL_X)
    }

    /// The vertical Sobel kernel.
    pub fn sobel_y() -> Self {
        Self::from_3x3(SOBEL_Y)
    }

    /// Kernel with a single 1 at the center.
    pub fn identity(size: usize) -> Result<Self, KernelError> {
        let mut rows = vec![vec![0.0f32; size]; size];
        if size % 2 == 1 {
            rows[size / 2][size / 2] = 1.0;
        }
        Self::from_rows(&rows)
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Weight at row `ky`, column `kx`.
    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> f32 {
        self.weights[ky * self.size + kx]
    }
}

/// Correlate `field` with `kernel` using edge-replicated padding.
///
/// Output has the same dimensions as `field`. Cost is O(W * H * K^2).
pub fn convolve(field: &IntensityField, kernel: &Kernel) -> IntensityField {
    let pad = (kernel.size() / 2) as i64;
    let k = kernel.size();
    let mut out = IntensityField::new(field.width, field.height, 0.0);

    for y in 0..field.height {
        for x in 0..field.width {
            let mut sum = 0.0f32;
            for ky in 0..k {
                let sy = y as i64 + ky as i64 - pad;
                for kx in 0..k {
                    let w = kernel.weight(kx, ky);
                    if w == 0.0 {
                        continue;
                    }
                    let sx = x as i64 + kx as i64 - pad;
                    sum += w * field.get_clamped(sx, sy);
                }
            }
            out.set(x, y, sum);
        }
    }

    out
}

/// Horizontal and vertical Sobel gradients of `field`.
pub fn sobel_gradients(field: &IntensityField) -> (IntensityField, IntensityField) {
    (
        convolve(field, &Kernel::sobel_x()),
        convolve(field, &Kernel::sobel_y()),
    )
}
