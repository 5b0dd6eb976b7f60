// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Cursor;

use color_eyre::eyre::{Result, eyre};
use jpeglite::RgbImage;

/// Decodes a PNG file into 8-bit RGB. Palette and low bit depth images are
/// expanded, 16-bit samples are stripped to their high byte, grayscale is
/// replicated into the three channels and alpha is dropped.
pub fn from_png(data: &[u8]) -> Result<RgbImage> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != png::BitDepth::Eight {
        return Err(eyre!("unsupported PNG output bit depth {:?}", bit_depth));
    }
    let (width, height) = {
        let info = reader.info();
        (info.width as usize, info.height as usize)
    };
    let samples = color_type.samples();
    let line_size = width
        .checked_mul(samples)
        .ok_or_else(|| eyre!("PNG too large: {width}x{height}"))?;
    let buffer_size = line_size
        .checked_mul(height)
        .ok_or_else(|| eyre!("PNG too large: {width}x{height}"))?;
    let mut buf = vec![0; buffer_size];
    let frame = reader.next_frame(&mut buf)?;
    if frame.line_size != line_size {
        return Err(eyre!(
            "unexpected PNG row stride {} for {width} pixels of {samples} samples",
            frame.line_size
        ));
    }

    let rgb: Vec<u8> = match color_type {
        png::ColorType::Rgb => buf,
        png::ColorType::Rgba => buf
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g]).collect(),
        png::ColorType::GrayscaleAlpha => buf.chunks_exact(2).flat_map(|p| [p[0]; 3]).collect(),
        png::ColorType::Indexed => return Err(eyre!("palette was not expanded")),
    };
    Ok(RgbImage::new(width, height, rgb)?)
}
