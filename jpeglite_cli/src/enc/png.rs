// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Write;

use color_eyre::eyre::Result;
use jpeglite::RgbImage;

/// Writes `image` as an 8-bit RGB PNG.
pub fn to_png<Writer: Write>(image: &RgbImage, buf: Writer) -> Result<()> {
    let mut encoder = png::Encoder::new(buf, image.width() as u32, image.height() as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Fast);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.data())?;
    writer.finish()?;
    Ok(())
}
