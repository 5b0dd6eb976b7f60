// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::fmt;
use std::sync::OnceLock;

/// Largest block side supported by [`DctMatrix`].
pub const MAX_BLOCK_DIM: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    /// The transform only operates on square blocks.
    NonSquare { rows: usize, cols: usize },
    /// The block is square but does not match the size of the basis matrix.
    SizeMismatch { expected: usize, found: usize },
    /// The buffer length does not match `rows * cols`.
    BufferLength { expected: usize, found: usize },
    UnsupportedSize(usize),
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::NonSquare { rows, cols } => {
                write!(f, "Transform input must be square, got {rows}x{cols}")
            }
            TransformError::SizeMismatch { expected, found } => write!(
                f,
                "Transform block size mismatch: matrix is {expected}x{expected}, block is {found}x{found}"
            ),
            TransformError::BufferLength { expected, found } => {
                write!(f, "Transform buffer has {found} samples, expected {expected}")
            }
            TransformError::UnsupportedSize(size) => write!(
                f,
                "Unsupported transform size {size}, must be in 1..={MAX_BLOCK_DIM}"
            ),
        }
    }
}

impl std::error::Error for TransformError {}

#[inline(always)]
fn alpha(u: usize) -> f64 {
    if u == 0 { FRAC_1_SQRT_2 } else { 1.0 }
}

/// Orthonormal DCT-II basis for `size x size` blocks.
///
/// `basis[x * size + u] = alpha(u) * sqrt(2 / size) * cos((2x + 1) * u * PI / (2 * size))`,
/// i.e. column `u` holds the `u`-th cosine basis vector. With this matrix `A`,
/// the forward transform is `A^T * X * A` and the inverse is `A * Y * A^T`.
///
/// Building the matrix costs `size^2` cosine evaluations; callers are expected to
/// build it once per block size and reuse it for every block.
#[derive(Clone, Debug, PartialEq)]
pub struct DctMatrix {
    size: usize,
    basis: Vec<f64>,
}

impl DctMatrix {
    pub fn new(size: usize) -> Result<DctMatrix, TransformError> {
        if size == 0 || size > MAX_BLOCK_DIM {
            return Err(TransformError::UnsupportedSize(size));
        }
        Ok(Self::build(size))
    }

    /// Shared basis for the default 8x8 block size.
    pub fn block8() -> &'static DctMatrix {
        static BLOCK8: OnceLock<DctMatrix> = OnceLock::new();
        BLOCK8.get_or_init(|| Self::build(8))
    }

    fn build(size: usize) -> DctMatrix {
        let scale = (2.0 / size as f64).sqrt();
        let mut basis = vec![0.0f64; size * size];
        for (x, row) in basis.chunks_exact_mut(size).enumerate() {
            for (u, coeff) in row.iter_mut().enumerate() {
                *coeff = alpha(u)
                    * scale
                    * ((2 * x + 1) as f64 * u as f64 * PI / (2 * size) as f64).cos();
            }
        }
        DctMatrix { size, basis }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major `size x size` basis, indexed by `[spatial * size + frequency]`.
    pub fn basis(&self) -> &[f64] {
        &self.basis
    }

    fn check_shape(&self, rows: usize, cols: usize, len: usize) -> Result<(), TransformError> {
        if rows != cols {
            return Err(TransformError::NonSquare { rows, cols });
        }
        if rows != self.size {
            return Err(TransformError::SizeMismatch {
                expected: self.size,
                found: rows,
            });
        }
        if len != rows * cols {
            return Err(TransformError::BufferLength {
                expected: rows * cols,
                found: len,
            });
        }
        Ok(())
    }

    /// In-place forward 2-D DCT of a row-major `rows x cols` block.
    pub fn forward(&self, rows: usize, cols: usize, data: &mut [f64]) -> Result<(), TransformError> {
        self.check_shape(rows, cols, data.len())?;
        let n = self.size;
        let a = &self.basis;
        let mut tmp = [0.0f64; MAX_BLOCK_DIM * MAX_BLOCK_DIM];
        // tmp = A^T * X
        for u in 0..n {
            for y in 0..n {
                let mut sum = 0.0;
                for x in 0..n {
                    sum += a[x * n + u] * data[x * n + y];
                }
                tmp[u * n + y] = sum;
            }
        }
        // out = tmp * A
        for u in 0..n {
            for v in 0..n {
                let mut sum = 0.0;
                for y in 0..n {
                    sum += tmp[u * n + y] * a[y * n + v];
                }
                data[u * n + v] = sum;
            }
        }
        Ok(())
    }

    /// In-place inverse 2-D DCT of a row-major `rows x cols` block of coefficients.
    pub fn inverse(&self, rows: usize, cols: usize, data: &mut [f64]) -> Result<(), TransformError> {
        self.check_shape(rows, cols, data.len())?;
        let n = self.size;
        let a = &self.basis;
        let mut tmp = [0.0f64; MAX_BLOCK_DIM * MAX_BLOCK_DIM];
        // tmp = A * Y
        for x in 0..n {
            for v in 0..n {
                let mut sum = 0.0;
                for u in 0..n {
                    sum += a[x * n + u] * data[u * n + v];
                }
                tmp[x * n + v] = sum;
            }
        }
        // out = tmp * A^T
        for x in 0..n {
            for y in 0..n {
                let mut sum = 0.0;
                for v in 0..n {
                    sum += tmp[x * n + v] * a[y * n + v];
                }
                data[x * n + y] = sum;
            }
        }
        Ok(())
    }
}
