// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Plane resampling and block tiling.
//!
//! Every padding step replicates the last row and column, which keeps the
//! borders of the block grid free of artificial edges.

use crate::{
    error::{Error, Result},
    image::{Image, ImageDataType, Plane},
    util::{CeilDiv, round_up_to, tracing_wrappers::*},
};

/// Chroma planes are stored at half resolution in both directions.
pub const CHROMA_FACTOR: usize = 2;

/// Returns `plane` extended to multiples of `multiple` in both directions by
/// replicating its last column and row.
pub fn pad_to_multiple<T: ImageDataType>(plane: &Image<T>, multiple: usize) -> Result<Image<T>> {
    let (xsize, ysize) = plane.size();
    let padded_size = (round_up_to(xsize, multiple), round_up_to(ysize, multiple));
    if padded_size == plane.size() {
        return Ok(plane.clone());
    }
    let mut padded = Image::new(padded_size)?;
    for y in 0..padded_size.1 {
        let src = plane.row(y.min(ysize - 1));
        let dst = padded.row_mut(y);
        dst[..xsize].copy_from_slice(src);
        let last = src[xsize - 1];
        dst[xsize..].fill(last);
    }
    Ok(padded)
}

/// Size of a plane after [downsample] by `factor`.
pub fn downsampled_size(size: (usize, usize), factor: usize) -> (usize, usize) {
    (size.0.ceil_div(factor), size.1.ceil_div(factor))
}

/// Averages each `factor`×`factor` window of the edge-padded plane.
#[instrument(level = "trace", err)]
pub fn downsample(plane: &Plane, factor: usize) -> Result<Plane> {
    let padded = pad_to_multiple(plane, factor)?;
    let out_size = downsampled_size(plane.size(), factor);
    let mut out = Image::new(out_size)?;
    let norm = 1.0 / (factor * factor) as f64;
    for oy in 0..out_size.1 {
        let dst = out.row_mut(oy);
        for dy in 0..factor {
            let src = padded.row(oy * factor + dy);
            for (ox, v) in dst.iter_mut().enumerate() {
                *v += src[ox * factor..(ox + 1) * factor].iter().sum::<f64>();
            }
        }
        dst.iter_mut().for_each(|v| *v *= norm);
    }
    Ok(out)
}

/// Replicates each sample into a `factor`×`factor` square and crops the
/// result to `target_size`.
#[instrument(level = "trace", err)]
pub fn upsample(plane: &Plane, factor: usize, target_size: (usize, usize)) -> Result<Plane> {
    let (xsize, ysize) = plane.size();
    if target_size.0 > xsize * factor || target_size.1 > ysize * factor {
        return Err(Error::InvalidImageSize(target_size.0, target_size.1));
    }
    let mut out = Image::new(target_size)?;
    for y in 0..target_size.1 {
        let src = plane.row(y / factor);
        for (x, v) in out.row_mut(y).iter_mut().enumerate() {
            *v = src[x / factor];
        }
    }
    Ok(out)
}

/// A plane cut into square blocks, stored in row-major block order; each
/// block holds `block_size²` samples in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockGrid<T> {
    block_size: usize,
    blocks_x: usize,
    blocks_y: usize,
    blocks: Vec<Vec<T>>,
}

/// Number of blocks along x and y needed to cover `size`.
pub fn block_grid_size(size: (usize, usize), block_size: usize) -> (usize, usize) {
    (size.0.ceil_div(block_size), size.1.ceil_div(block_size))
}

impl<T> BlockGrid<T> {
    pub fn from_blocks(
        block_size: usize,
        blocks_x: usize,
        blocks_y: usize,
        blocks: Vec<Vec<T>>,
    ) -> Result<Self> {
        let expected = blocks_x * blocks_y;
        if blocks.len() != expected {
            return Err(Error::BlockCountMismatch {
                expected,
                found: blocks.len(),
            });
        }
        let area = block_size * block_size;
        if let Some(bad) = blocks.iter().find(|b| b.len() != area) {
            return Err(Error::BlockSizeMismatch {
                expected: area,
                found: bad.len(),
            });
        }
        Ok(BlockGrid {
            block_size,
            blocks_x,
            blocks_y,
            blocks,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// `(blocks_x, blocks_y)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.blocks_x, self.blocks_y)
    }

    pub fn blocks(&self) -> &[Vec<T>] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Vec<T>> {
        self.blocks
    }

    /// Applies `f` to every block, in parallel when the `parallel` feature is on.
    pub fn try_map<U, E, F>(&self, f: F) -> std::result::Result<BlockGrid<U>, E>
    where
        T: Sync,
        U: Send,
        E: Send,
        F: Fn(&[T]) -> std::result::Result<Vec<U>, E> + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        let blocks = {
            use rayon::prelude::*;
            self.blocks
                .par_iter()
                .map(|b| f(b.as_slice()))
                .collect::<std::result::Result<Vec<_>, E>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let blocks = self
            .blocks
            .iter()
            .map(|b| f(b.as_slice()))
            .collect::<std::result::Result<Vec<_>, E>>()?;
        Ok(BlockGrid {
            block_size: self.block_size,
            blocks_x: self.blocks_x,
            blocks_y: self.blocks_y,
            blocks,
        })
    }
}

/// Edge-pads `plane` to a multiple of `block_size` and cuts it into blocks.
#[instrument(level = "trace", err)]
pub fn split_blocks(plane: &Plane, block_size: usize) -> Result<BlockGrid<f64>> {
    let padded = pad_to_multiple(plane, block_size)?;
    let (blocks_x, blocks_y) = block_grid_size(plane.size(), block_size);
    let mut blocks = vec![];
    blocks.try_reserve_exact(blocks_x * blocks_y)?;
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let mut block = Vec::with_capacity(block_size * block_size);
            for y in by * block_size..(by + 1) * block_size {
                block.extend_from_slice(&padded.row(y)[bx * block_size..(bx + 1) * block_size]);
            }
            blocks.push(block);
        }
    }
    trace!(blocks_x, blocks_y, "split plane");
    Ok(BlockGrid {
        block_size,
        blocks_x,
        blocks_y,
        blocks,
    })
}

/// Inverse of [split_blocks]: returns the padded plane.
pub fn merge_blocks(grid: &BlockGrid<f64>) -> Result<Plane> {
    let n = grid.block_size;
    let size = (grid.blocks_x * n, grid.blocks_y * n);
    let mut plane = Image::new(size)?;
    for (i, block) in grid.blocks.iter().enumerate() {
        if block.len() != n * n {
            return Err(Error::BlockSizeMismatch {
                expected: n * n,
                found: block.len(),
            });
        }
        let (bx, by) = (i % grid.blocks_x, i / grid.blocks_x);
        for (r, src) in block.chunks_exact(n).enumerate() {
            plane.row_mut(by * n + r)[bx * n..(bx + 1) * n].copy_from_slice(src);
        }
    }
    Ok(plane)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::test::assert_all_almost_eq;
    use test_log::test;

    fn ramp(size: (usize, usize)) -> Plane {
        let data = (0..size.0 * size.1).map(|i| i as f64).collect();
        Image::from_vec(size, data).unwrap()
    }

    #[test]
    fn pad_replicates_edges() -> Result<()> {
        let plane = ramp((3, 2));
        let padded = pad_to_multiple(&plane, 4)?;
        assert_eq!(padded.size(), (4, 4));
        assert_eq!(padded.row(0), &[0.0, 1.0, 2.0, 2.0]);
        assert_eq!(padded.row(1), &[3.0, 4.0, 5.0, 5.0]);
        assert_eq!(padded.row(3), &[3.0, 4.0, 5.0, 5.0]);
        Ok(())
    }

    #[test]
    fn downsample_averages_windows() -> Result<()> {
        let plane = Image::from_vec((2, 2), vec![1.0, 3.0, 5.0, 7.0])?;
        let half = downsample(&plane, 2)?;
        assert_eq!(half.size(), (1, 1));
        assert_eq!(half.row(0), &[4.0]);
        Ok(())
    }

    #[test]
    fn downsample_odd_size() -> Result<()> {
        let plane = ramp((3, 3));
        let half = downsample(&plane, 2)?;
        assert_eq!(half.size(), (2, 2));
        // Windows: [0 1 3 4], [2 2 5 5], [6 7 6 7], [8 8 8 8].
        assert_all_almost_eq!(half.data(), [2.0, 3.5, 6.5, 8.0], 1e-12);
        Ok(())
    }

    #[test]
    fn upsample_replicates_and_crops() -> Result<()> {
        let plane = Image::from_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0])?;
        let full = upsample(&plane, 2, (3, 3))?;
        assert_eq!(full.data(), &[1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 3.0, 3.0, 4.0]);
        assert!(upsample(&plane, 2, (5, 4)).is_err());
        Ok(())
    }

    #[test]
    fn split_merge_round_trip() -> Result<()> {
        let plane = ramp((10, 9));
        let grid = split_blocks(&plane, 4)?;
        assert_eq!(grid.dims(), (3, 3));
        assert_eq!(grid.blocks()[0][..4], [0.0, 1.0, 2.0, 3.0]);
        assert_eq!(grid.blocks()[0][4..8], [10.0, 11.0, 12.0, 13.0]);
        let merged = merge_blocks(&grid)?;
        assert_eq!(merged.size(), (12, 12));
        assert_eq!(merged.crop((10, 9))?, plane);
        // The padding replicates the last column.
        assert_eq!(merged.row(0)[10..], [9.0, 9.0]);
        Ok(())
    }

    #[test]
    fn from_blocks_validates() {
        assert!(matches!(
            BlockGrid::from_blocks(2, 2, 1, vec![vec![0.0; 4]]),
            Err(Error::BlockCountMismatch {
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            BlockGrid::from_blocks(2, 1, 1, vec![vec![0.0; 3]]),
            Err(Error::BlockSizeMismatch {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn try_map_keeps_layout() -> Result<()> {
        let grid = split_blocks(&ramp((4, 4)), 2)?;
        let doubled = grid.try_map(|b| Ok::<_, Error>(b.iter().map(|v| v * 2.0).collect()))?;
        assert_eq!(doubled.dims(), (2, 2));
        assert_eq!(merge_blocks(&doubled)?.row(3), &[24.0, 26.0, 28.0, 30.0]);
        Ok(())
    }
}
