// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Full-range BT.601 (JFIF) conversion between interleaved RGB and YCbCr planes.
//!
//! ```text
//! Y  =  0.299    R + 0.587    G + 0.114    B
//! Cb = -0.168736 R - 0.331264 G + 0.5      B + 128
//! Cr =  0.5      R - 0.418688 G - 0.081312 B + 128
//! ```

use crate::{
    error::Result,
    image::{Image, Plane, RgbImage},
    util::tracing_wrappers::*,
};

const CHROMA_OFFSET: f64 = 128.0;

#[inline]
pub fn rgb_to_ycbcr(rgb: [u8; 3]) -> [f64; 3] {
    let [r, g, b] = rgb.map(f64::from);
    [
        0.299 * r + 0.587 * g + 0.114 * b,
        CHROMA_OFFSET - 0.168736 * r - 0.331264 * g + 0.5 * b,
        CHROMA_OFFSET + 0.5 * r - 0.418688 * g - 0.081312 * b,
    ]
}

/// Inverse of [rgb_to_ycbcr]; results are clamped to [0, 255] and rounded.
#[inline]
pub fn ycbcr_to_rgb(ycbcr: [f64; 3]) -> [u8; 3] {
    let [y, cb, cr] = ycbcr;
    let cb = cb - CHROMA_OFFSET;
    let cr = cr - CHROMA_OFFSET;
    [
        y + 1.402 * cr,
        y - 0.344136 * cb - 0.714136 * cr,
        y + 1.772 * cb,
    ]
    .map(|v| v.clamp(0.0, 255.0).round() as u8)
}

/// Splits an RGB image into full-resolution Y, Cb and Cr planes.
#[instrument(level = "debug", err)]
pub fn to_planes(image: &RgbImage) -> Result<[Plane; 3]> {
    let size = (image.width(), image.height());
    let mut planes = [
        Image::new(size)?,
        Image::new(size)?,
        Image::new(size)?,
    ];
    for y in 0..size.1 {
        let src = &image.data()[y * size.0 * 3..(y + 1) * size.0 * 3];
        for (x, px) in src.chunks_exact(3).enumerate() {
            let ycbcr = rgb_to_ycbcr([px[0], px[1], px[2]]);
            for (plane, v) in planes.iter_mut().zip(ycbcr) {
                plane.row_mut(y)[x] = v;
            }
        }
    }
    Ok(planes)
}

/// Merges three planes of equal size back into an RGB image.
#[instrument(level = "debug", skip_all, err)]
pub fn from_planes(planes: &[Plane; 3]) -> Result<RgbImage> {
    let (xsize, ysize) = planes[0].size();
    for plane in &planes[1..] {
        if plane.size() != (xsize, ysize) {
            let (found_x, found_y) = plane.size();
            return Err(crate::error::Error::PixelBufferSize {
                expected: xsize * ysize,
                found: found_x * found_y,
            });
        }
    }
    let mut data = vec![];
    data.try_reserve_exact(xsize * ysize * 3)?;
    for y in 0..ysize {
        let rows = [planes[0].row(y), planes[1].row(y), planes[2].row(y)];
        for x in 0..xsize {
            data.extend(ycbcr_to_rgb([rows[0][x], rows[1][x], rows[2][x]]));
        }
    }
    RgbImage::new(xsize, ysize, data)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::test::{assert_all_almost_eq, assert_almost_eq, random_rgb};
    use test_log::test;

    #[test]
    fn primaries() {
        assert_all_almost_eq!(rgb_to_ycbcr([0, 0, 0]), [0.0, 128.0, 128.0], 1e-9);
        assert_all_almost_eq!(rgb_to_ycbcr([255, 255, 255]), [255.0, 128.0, 128.0], 1e-3);
        assert_all_almost_eq!(rgb_to_ycbcr([255, 0, 0]), [76.245, 84.97232, 255.5], 1e-3);
        assert_all_almost_eq!(rgb_to_ycbcr([0, 0, 255]), [29.07, 255.5, 107.26544], 1e-3);
    }

    #[test]
    fn pixel_round_trip_is_within_rounding() {
        for r in (0..=255u8).step_by(15) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(51) {
                    let back = ycbcr_to_rgb(rgb_to_ycbcr([r, g, b]));
                    for (a, b) in back.iter().zip([r, g, b]) {
                        assert_almost_eq!(*a as i32, b as i32, 1);
                    }
                }
            }
        }
    }

    #[test]
    fn inverse_clamps() {
        assert_eq!(ycbcr_to_rgb([300.0, 128.0, 128.0]), [255, 255, 255]);
        assert_eq!(ycbcr_to_rgb([-20.0, 128.0, 128.0]), [0, 0, 0]);
    }

    #[test]
    fn plane_round_trip() -> Result<()> {
        let image = random_rgb(7, 5, 11);
        let planes = to_planes(&image)?;
        assert_eq!(planes[1].size(), (7, 5));
        let back = from_planes(&planes)?;
        assert_eq!(back.width(), 7);
        assert_eq!(back.height(), 5);
        for (a, b) in back.data().iter().zip(image.data()) {
            assert_almost_eq!(*a as i32, *b as i32, 1);
        }
        Ok(())
    }

    #[test]
    fn mismatched_planes_are_rejected() -> Result<()> {
        let planes = [
            Image::new((4, 4))?,
            Image::new((2, 2))?,
            Image::new((4, 4))?,
        ];
        assert!(from_planes(&planes).is_err());
        Ok(())
    }
}
