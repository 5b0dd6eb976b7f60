// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::{
    error::{Error, Result},
    util::tracing_wrappers::*,
};

mod private {
    pub trait Sealed {}
}

/// Sample types an [Image] can hold.
pub trait ImageDataType: private::Sealed + Copy + Default + 'static + Debug + PartialEq {}

impl private::Sealed for f64 {}
impl ImageDataType for f64 {}

/// A single channel of samples in row-major order. `size` is `(xsize, ysize)`.
#[derive(Clone, PartialEq)]
pub struct Image<T: ImageDataType> {
    size: (usize, usize),
    data: Vec<T>,
}

/// A channel of real-valued samples: Y, Cb or Cr.
pub type Plane = Image<f64>;

impl<T: ImageDataType> Debug for Image<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}x{}",
            std::any::type_name::<T>(),
            self.size.0,
            self.size.1
        )
    }
}

fn checked_area(size: (usize, usize)) -> Result<usize> {
    let (xsize, ysize) = size;
    // These limits let us not worry about overflows.
    if xsize as u64 >= i64::MAX as u64 / 4 || ysize as u64 >= i64::MAX as u64 / 4 {
        return Err(Error::ImageSizeTooLarge(xsize, ysize));
    }
    let total_size = xsize
        .checked_mul(ysize)
        .ok_or(Error::ImageSizeTooLarge(xsize, ysize))?;
    if xsize == 0 || ysize == 0 {
        return Err(Error::InvalidImageSize(xsize, ysize));
    }
    Ok(total_size)
}

impl<T: ImageDataType> Image<T> {
    #[instrument(err)]
    pub fn new(size: (usize, usize)) -> Result<Image<T>> {
        Self::new_with_value(size, T::default())
    }

    pub fn new_with_value(size: (usize, usize), value: T) -> Result<Image<T>> {
        let total_size = checked_area(size)?;
        trace!("trying to allocate image");
        let mut data = vec![];
        data.try_reserve_exact(total_size)?;
        data.resize(total_size, value);
        Ok(Image { size, data })
    }

    /// Wraps row-major samples; `data` must hold exactly `xsize * ysize` values.
    pub fn from_vec(size: (usize, usize), data: Vec<T>) -> Result<Image<T>> {
        let total_size = checked_area(size)?;
        if data.len() != total_size {
            return Err(Error::PixelBufferSize {
                expected: total_size,
                found: data.len(),
            });
        }
        Ok(Image { size, data })
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn row(&self, row: usize) -> &[T] {
        debug_assert!(row < self.size.1);
        let start = row * self.size.0;
        &self.data[start..start + self.size.0]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        debug_assert!(row < self.size.1);
        let start = row * self.size.0;
        &mut self.data[start..start + self.size.0]
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns the top-left `size` region as a new image.
    pub fn crop(&self, size: (usize, usize)) -> Result<Image<T>> {
        if size.0 > self.size.0 || size.1 > self.size.1 {
            return Err(Error::InvalidImageSize(size.0, size.1));
        }
        let total_size = checked_area(size)?;
        let mut data = vec![];
        data.try_reserve_exact(total_size)?;
        for y in 0..size.1 {
            data.extend_from_slice(&self.row(y)[..size.0]);
        }
        Ok(Image { size, data })
    }
}

/// An interleaved 8-bit RGB image.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Debug for RgbImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RgbImage {}x{}", self.width, self.height)
    }
}

impl RgbImage {
    /// `data` holds `width * height` pixels of 3 bytes each, row-major.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<RgbImage> {
        let expected = checked_area((width, height))?
            .checked_mul(3)
            .ok_or(Error::ImageSizeTooLarge(width, height))?;
        if data.len() != expected {
            return Err(Error::PixelBufferSize {
                expected,
                found: data.len(),
            });
        }
        Ok(RgbImage {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
