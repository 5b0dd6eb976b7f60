// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder};

/// Reads bits from a sequence of bytes, most significant bit first.
///
/// The last byte of the data may end with up to 7 padding bits that are not
/// part of the payload; reading into them is an error.
#[derive(Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    // The next bit to be read is bit `bits_in_buf - 1`; bits above are zero.
    bit_buf: u64,
    bits_in_buf: usize,
    total_bits_read: usize,
    bits_limit: usize,
}

impl Debug for BitReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BitReader{{ data: [{} bytes], bit_buf: {:0width$b}, total_bits_read: {}, bits_limit: {} }}",
            self.data.len(),
            self.bit_buf,
            self.total_bits_read,
            self.bits_limit,
            width = self.bits_in_buf
        )
    }
}

pub const MAX_BITS_PER_CALL: usize = 56;

#[inline]
fn low_mask(num: usize) -> u64 {
    if num >= 64 { u64::MAX } else { (1u64 << num) - 1 }
}

impl<'a> BitReader<'a> {
    /// Constructs a BitReader for a given range of data.
    pub fn new(data: &'a [u8]) -> BitReader<'a> {
        BitReader {
            data,
            bit_buf: 0,
            bits_in_buf: 0,
            total_bits_read: 0,
            bits_limit: data.len() * 8,
        }
    }

    /// Constructs a BitReader whose last `padding` bits are not readable.
    /// ```
    /// # use jpeglite::bit_reader::BitReader;
    /// let mut br = BitReader::new_with_padding(&[0b1010_0000], 5)?;
    /// assert_eq!(br.read(3)?, 0b101);
    /// assert!(br.read(1).is_err());
    /// # Ok::<(), jpeglite::error::Error>(())
    /// ```
    pub fn new_with_padding(data: &'a [u8], padding: u8) -> Result<BitReader<'a>> {
        let payload_bytes = data.len();
        if padding > 7 || (payload_bytes == 0 && padding != 0) {
            return Err(Error::InvalidPadding {
                padding,
                payload_bytes,
            });
        }
        let mut br = Self::new(data);
        br.bits_limit -= padding as usize;
        Ok(br)
    }

    /// Reads `num` bits from the buffer without consuming them.
    pub fn peek(&mut self, num: usize) -> Result<u64> {
        debug_assert!(num <= MAX_BITS_PER_CALL);
        if num == 0 {
            return Ok(0);
        }
        if num > self.total_bits_available() {
            return Err(Error::OutOfBounds);
        }
        self.refill();
        if self.bits_in_buf < num {
            return Err(Error::OutOfBounds);
        }
        Ok((self.bit_buf >> (self.bits_in_buf - num)) & low_mask(num))
    }

    /// Advances by `num` bits. The bits must already be in the buffer.
    pub fn consume(&mut self, num: usize) -> Result<()> {
        if self.bits_in_buf < num || num > self.total_bits_available() {
            return Err(Error::OutOfBounds);
        }
        self.bits_in_buf -= num;
        self.bit_buf &= low_mask(self.bits_in_buf);
        self.total_bits_read += num;
        Ok(())
    }

    /// Reads `num` bits from the buffer.
    /// ```
    /// # use jpeglite::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0, 0x10]);
    /// assert_eq!(br.read(8)?, 0);
    /// assert_eq!(br.read(4)?, 1);
    /// assert_eq!(br.read(4)?, 0);
    /// assert_eq!(br.total_bits_read(), 16);
    /// assert!(br.read(1).is_err());
    /// # Ok::<(), jpeglite::error::Error>(())
    /// ```
    pub fn read(&mut self, num: usize) -> Result<u64> {
        let ret = self.peek(num)?;
        self.consume(num)?;
        Ok(ret)
    }

    /// Reads a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read(1)? == 1)
    }

    /// Returns the total number of bits that have been read.
    pub fn total_bits_read(&self) -> usize {
        self.total_bits_read
    }

    /// Returns the total number of payload bits that can still be read.
    pub fn total_bits_available(&self) -> usize {
        self.bits_limit - self.total_bits_read
    }

    fn refill(&mut self) {
        if self.data.len() >= 8 && self.bits_in_buf <= 56 {
            let bytes = (64 - self.bits_in_buf) / 8;
            let word = BigEndian::read_u64(self.data);
            let shift = bytes * 8;
            self.bit_buf = if shift == 64 {
                word
            } else {
                (self.bit_buf << shift) | (word >> (64 - shift))
            };
            self.bits_in_buf += shift;
            self.data = &self.data[bytes..];
        } else {
            self.refill_slow()
        }
    }

    #[inline(never)]
    fn refill_slow(&mut self) {
        while self.bits_in_buf <= 56 {
            let Some((&byte, rest)) = self.data.split_first() else {
                return;
            };
            self.bit_buf = (self.bit_buf << 8) | byte as u64;
            self.bits_in_buf += 8;
            self.data = rest;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn reads_msb_first() {
        let mut br = BitReader::new(&[0b1011_0001, 0b0111_1111]);
        assert_eq!(br.read(1).unwrap(), 1);
        assert_eq!(br.read(3).unwrap(), 0b011);
        assert_eq!(br.read(6).unwrap(), 0b0001_01);
        assert_eq!(br.read(6).unwrap(), 0b11_1111);
        assert_eq!(br.total_bits_available(), 0);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut br = BitReader::new(&[0xA5]);
        assert_eq!(br.peek(4).unwrap(), 0xA);
        assert_eq!(br.peek(8).unwrap(), 0xA5);
        assert_eq!(br.total_bits_read(), 0);
    }

    #[test]
    fn long_reads_cross_refills() {
        let data: Vec<u8> = (0..32).collect();
        let mut br = BitReader::new(&data);
        for chunk in data.chunks(4) {
            let expected = BigEndian::read_u32(chunk) as u64;
            assert_eq!(br.read(32).unwrap(), expected);
        }
        assert!(br.read(1).is_err());
    }

    #[test]
    fn mixed_widths_match_bit_by_bit() {
        let data: Vec<u8> = (0..40u8).map(|x| x.wrapping_mul(37) ^ 0x5A).collect();
        let mut bits = vec![];
        let mut br = BitReader::new(&data);
        while br.total_bits_available() > 0 {
            bits.push(br.read_bit().unwrap());
        }
        let mut br = BitReader::new(&data);
        let mut pos = 0;
        for width in [1, 7, 13, 56, 3, 20, 9, 0, 31, 44, 2, 48, 30] {
            let value = br.read(width).unwrap();
            let expected = bits[pos..pos + width]
                .iter()
                .fold(0u64, |acc, &b| (acc << 1) | b as u64);
            assert_eq!(value, expected, "width {width} at {pos}");
            pos += width;
        }
    }

    #[test]
    fn padding_limits_reads() {
        let mut br = BitReader::new_with_padding(&[0xFF, 0xC0], 6).unwrap();
        assert_eq!(br.total_bits_available(), 10);
        assert_eq!(br.read(10).unwrap(), 0x3FF);
        assert!(matches!(br.read(1), Err(Error::OutOfBounds)));
    }

    #[test]
    fn rejects_invalid_padding() {
        assert!(matches!(
            BitReader::new_with_padding(&[0], 8),
            Err(Error::InvalidPadding { padding: 8, .. })
        ));
        assert!(matches!(
            BitReader::new_with_padding(&[], 1),
            Err(Error::InvalidPadding { payload_bytes: 0, .. })
        ));
        assert!(BitReader::new_with_padding(&[], 0).is_ok());
    }
}
