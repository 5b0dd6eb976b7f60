// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Write;

use color_eyre::eyre::{Result, eyre};
use jpeglite::{ContainerStats, EncoderOptions, Header, Quality, RgbImage, encode_with_options};

/// Compressed size at one quality setting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepPoint {
    pub quality: Quality,
    pub bytes: usize,
    pub bits_per_pixel: f64,
}

impl SweepPoint {
    pub fn kib(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }
}

/// Qualities `from, from + step, ...` up to and including `to`.
pub fn quality_range(from: u32, to: u32, step: u32) -> Result<Vec<Quality>> {
    if step == 0 {
        return Err(eyre!("sweep step must be positive"));
    }
    if from > to {
        return Err(eyre!("empty quality range {from}..={to}"));
    }
    (from..=to)
        .step_by(step as usize)
        .map(|q| Ok(Quality::new(q)?))
        .collect()
}

/// Encodes `image` once per quality and records the container size.
pub fn sweep(image: &RgbImage, qualities: &[Quality], block_size: usize) -> Result<Vec<SweepPoint>> {
    let pixels = (image.width() * image.height()) as f64;
    qualities
        .iter()
        .map(|&quality| {
            let options = EncoderOptions::default()
                .with_quality(quality)
                .with_block_size(block_size);
            let bytes = encode_with_options(image, &options)?.len();
            Ok(SweepPoint {
                quality,
                bytes,
                bits_per_pixel: bytes as f64 * 8.0 / pixels,
            })
        })
        .collect()
}

pub fn format_sweep(points: &[SweepPoint]) -> String {
    let mut out = String::from("quality     bytes       KiB       bpp\n");
    for p in points {
        let _ = writeln!(
            out,
            "{:>7} {:>9} {:>9.2} {:>9.4}",
            p.quality.get(),
            p.bytes,
            p.kib(),
            p.bits_per_pixel
        );
    }
    out
}

pub fn format_header(header: &Header) -> String {
    let (cw, ch) = header.chroma_size();
    format!(
        "Image size: {} x {}\nBlock size: {}\nQuality: {}\nChroma planes: {} x {}\n",
        header.width, header.height, header.block_size, header.quality, cw, ch
    )
}

pub fn format_stats(stats: &ContainerStats) -> String {
    let mut out = String::from("stream  entries  payload  padding  total\n");
    for s in &stats.sub_streams {
        let _ = writeln!(
            out,
            "{:<7} {:>7} {:>8} {:>8} {:>6}",
            format!("{}-{}", s.class, s.channel),
            s.entries,
            s.payload_bytes,
            s.padding,
            s.encoded_bytes
        );
    }
    let _ = writeln!(out, "Total: {} bytes", stats.total_bytes());
    out
}
