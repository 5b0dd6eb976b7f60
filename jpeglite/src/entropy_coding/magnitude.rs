// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Category / sign-magnitude representation of coefficient differences.
//!
//! A value `x` in category `c` is sent as `c` raw bits: `x` itself when
//! positive, `(2^c - 1) ^ |x|` when negative. The leading bit is therefore
//! 1 for positive values and 0 for negative ones.

use crate::{
    bit_reader::BitReader,
    bit_writer::BitWriter,
    error::{Error, Result},
};

/// Largest category that can appear in a stream.
pub const MAX_CATEGORY: u8 = 16;

/// Number of bits needed for `|x|`; 0 for 0.
#[inline]
pub fn category(x: i32) -> u8 {
    (u32::BITS - x.unsigned_abs().leading_zeros()) as u8
}

/// Checks a category read from a container.
pub fn check_category(category: u8) -> Result<u8> {
    if category > MAX_CATEGORY {
        return Err(Error::InvalidCategory(category));
    }
    Ok(category)
}

/// Raw `category`-bit pattern of `x`.
#[inline]
pub fn encode(x: i32, category: u8) -> u64 {
    debug_assert!(category <= MAX_CATEGORY);
    if category == 0 {
        return 0;
    }
    let mask = (1u64 << category) - 1;
    let magnitude = x.unsigned_abs() as u64;
    if x < 0 { mask ^ magnitude } else { magnitude }
}

/// Inverse of [encode].
#[inline]
pub fn decode(raw: u64, category: u8) -> i32 {
    if category == 0 {
        return 0;
    }
    let mask = (1u64 << category) - 1;
    if raw >> (category - 1) == 0 {
        -((mask - raw) as i32)
    } else {
        raw as i32
    }
}

pub fn write(bw: &mut BitWriter, x: i32, category: u8) {
    bw.put_bits(encode(x, category), category as usize);
}

pub fn read(br: &mut BitReader, category: u8) -> Result<i32> {
    let raw = br.read(category as usize)?;
    Ok(decode(raw, category))
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn categories() {
        assert_eq!(category(0), 0);
        assert_eq!(category(1), 1);
        assert_eq!(category(-1), 1);
        assert_eq!(category(2), 2);
        assert_eq!(category(3), 2);
        assert_eq!(category(-4), 3);
        assert_eq!(category(255), 8);
        assert_eq!(category(256), 9);
        assert_eq!(category(-65535), 16);
        assert_eq!(category(65536), 17);
    }

    #[test]
    fn bit_patterns() {
        assert_eq!(encode(5, 3), 0b101);
        assert_eq!(encode(-5, 3), 0b010);
        assert_eq!(encode(-1, 1), 0b0);
        assert_eq!(encode(1, 1), 0b1);
        assert_eq!(encode(0, 0), 0);
        assert_eq!(decode(0b010, 3), -5);
        assert_eq!(decode(0b0, 1), -1);
    }

    #[test]
    fn rejects_large_categories() {
        assert_eq!(check_category(16).unwrap(), 16);
        assert!(matches!(check_category(17), Err(Error::InvalidCategory(17))));
    }

    #[test]
    fn round_trip_all_values() {
        for x in -65535..=65535 {
            let c = category(x);
            assert!(c <= MAX_CATEGORY);
            assert_eq!(decode(encode(x, c), c), x, "x = {x}");
        }
    }

    #[test]
    fn bitstream_round_trip() {
        let values = [0, 7, -7, 1, -1, 1000, -32768, 12];
        let mut bw = BitWriter::new();
        for &v in &values {
            write(&mut bw, v, category(v));
        }
        let (bytes, padding) = bw.finish();
        let mut br = BitReader::new_with_padding(&bytes, padding).unwrap();
        for &v in &values {
            assert_eq!(read(&mut br, category(v)).unwrap(), v);
        }
        assert_eq!(br.total_bits_available(), 0);
    }
}
