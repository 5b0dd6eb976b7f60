// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::bit_reader::MAX_BITS_PER_CALL;

/// Packs bits into bytes, most significant bit first.
///
/// Unlike a JPEG entropy-coded segment, no byte stuffing is done: the
/// container stores payload lengths explicitly.
#[derive(Debug, Default)]
pub struct BitWriter {
    output: Vec<u8>,
    // Fewer than 8 pending bits between calls, right-aligned.
    put_buffer: u64,
    bits_in_buffer: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the `size` low bits of `code`.
    #[inline]
    pub fn put_bits(&mut self, code: u64, size: usize) {
        debug_assert!(size <= MAX_BITS_PER_CALL);
        debug_assert!(size == 64 || code >> size == 0, "code exceeds size bits");
        if size == 0 {
            return;
        }
        self.put_buffer = (self.put_buffer << size) | code;
        self.bits_in_buffer += size;
        while self.bits_in_buffer >= 8 {
            self.bits_in_buffer -= 8;
            self.output.push((self.put_buffer >> self.bits_in_buffer) as u8);
        }
        self.put_buffer &= (1u64 << self.bits_in_buffer) - 1;
    }

    /// Writes a code of up to 64 bits, splitting it when needed.
    pub fn put_long_bits(&mut self, code: u64, size: usize) {
        if size > MAX_BITS_PER_CALL {
            let low = size - 32;
            self.put_bits(code >> low, 32);
            self.put_bits(code & ((1u64 << low) - 1), low);
        } else {
            self.put_bits(code, size);
        }
    }

    /// Number of bits written so far, including pending ones.
    pub fn bits_written(&self) -> usize {
        self.output.len() * 8 + self.bits_in_buffer
    }

    /// Pads the last byte with zero bits and returns the bytes together with
    /// the number of padding bits (0..=7).
    pub fn finish(mut self) -> (Vec<u8>, u8) {
        let mut padding = 0;
        if self.bits_in_buffer > 0 {
            padding = 8 - self.bits_in_buffer;
            self.output.push((self.put_buffer << padding) as u8);
        }
        (self.output, padding as u8)
    }
}
