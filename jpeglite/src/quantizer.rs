// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;

use crate::error::{Error, Result};

/// Encoder quality, from 1 (smallest output) to 100 (least loss).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: Quality = Quality(1);
    pub const MAX: Quality = Quality(100);

    pub fn new(quality: u32) -> Result<Quality> {
        match quality {
            1..=100 => Ok(Quality(quality as u8)),
            _ => Err(Error::InvalidQuality(quality)),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Percentage applied to the base tables.
    pub fn scale(self) -> u32 {
        let q = self.0 as u32;
        if q < 50 { 5000 / q } else { 200 - 2 * q }
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality(75)
    }
}

impl TryFrom<u8> for Quality {
    type Error = Error;
    fn try_from(quality: u8) -> Result<Quality> {
        Quality::new(quality as u32)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    Luma,
    Chroma,
}

impl ChannelKind {
    /// Y, Cb, Cr.
    pub const ALL: [ChannelKind; 3] = [ChannelKind::Luma, ChannelKind::Chroma, ChannelKind::Chroma];

    fn base_table(self) -> &'static [u8; 64] {
        match self {
            ChannelKind::Luma => &LUMA_BASE,
            ChannelKind::Chroma => &CHROMA_BASE,
        }
    }
}

// ITU-T T.81 Annex K.1, tables K.1 and K.2.
#[rustfmt::skip]
const LUMA_BASE: [u8; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

#[rustfmt::skip]
const CHROMA_BASE: [u8; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

const BASE_DIM: usize = 8;

/// Per-position divisors for a `size`×`size` block, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantTable {
    size: usize,
    values: Vec<u16>,
}

impl QuantTable {
    /// Scales the base table of `kind` for `quality`. Block sizes other than 8
    /// sample the 8×8 base table at the nearest frequency position.
    pub fn for_quality(kind: ChannelKind, quality: Quality, size: usize) -> QuantTable {
        let base = kind.base_table();
        let scale = quality.scale();
        let mut values = Vec::with_capacity(size * size);
        for r in 0..size {
            for c in 0..size {
                let b = base[(r * BASE_DIM / size) * BASE_DIM + c * BASE_DIM / size] as u32;
                values.push(((b * scale + 50) / 100).clamp(1, 255) as u16);
            }
        }
        QuantTable { size, values }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn values(&self) -> &[u16] {
        &self.values
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len != self.values.len() {
            return Err(Error::BlockSizeMismatch {
                expected: self.values.len(),
                found: len,
            });
        }
        Ok(())
    }

    /// Divides each coefficient by its divisor and rounds half to even.
    pub fn quantize(&self, block: &[f64]) -> Result<Vec<i32>> {
        self.check_len(block.len())?;
        Ok(block
            .iter()
            .zip(&self.values)
            .map(|(&v, &q)| (v / q as f64).round_ties_even() as i32)
            .collect())
    }

    pub fn dequantize(&self, block: &[i32]) -> Result<Vec<f64>> {
        self.check_len(block.len())?;
        Ok(block
            .iter()
            .zip(&self.values)
            .map(|(&v, &q)| v as f64 * q as f64)
            .collect())
    }
}
