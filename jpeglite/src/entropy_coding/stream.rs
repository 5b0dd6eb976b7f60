// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Framing of one entropy-coded sub-stream:
//!
//! ```text
//! u16  entry count
//!      entries, ascending by symbol: symbol key, u32 count
//! u32  payload byte length
//!      payload, MSB-first
//! u8   padding bits in the last payload byte
//! ```

use std::fmt::Debug;

use crate::{
    bit_reader::BitReader,
    byte_io::{ByteReader, ByteWriter},
    entropy_coding::huffman::FrequencyTable,
    error::{Error, Result},
    util::tracing_wrappers::*,
};

/// A Huffman symbol with a fixed-size big-endian serialization.
pub trait StreamSymbol: Copy + Ord + Debug + Send + Sync {
    /// Serialized size of the symbol key, without its count.
    const KEY_BYTES: usize;

    fn write_key(&self, out: &mut ByteWriter);

    fn read_key(br: &mut ByteReader) -> Result<Self>;
}

/// Frequency table, packed payload and padding of one sub-stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubStream<S: StreamSymbol> {
    pub table: FrequencyTable<S>,
    pub payload: Vec<u8>,
    pub padding: u8,
}

impl<S: StreamSymbol> SubStream<S> {
    const ENTRY_BYTES: usize = S::KEY_BYTES + 4;

    /// Bit reader over the payload, excluding padding bits.
    pub fn bit_reader(&self) -> Result<BitReader<'_>> {
        BitReader::new_with_padding(&self.payload, self.padding)
    }

    /// Size of the serialized sub-stream in bytes.
    pub fn encoded_len(&self) -> usize {
        2 + self.table.len() * Self::ENTRY_BYTES + 4 + self.payload.len() + 1
    }

    pub fn write(&self, out: &mut ByteWriter) -> Result<()> {
        let entries = u16::try_from(self.table.len())
            .map_err(|_| Error::FrequencyTableTooLarge(self.table.len()))?;
        let payload_len = u32::try_from(self.payload.len())
            .map_err(|_| Error::PayloadTooLarge(self.payload.len()))?;
        out.write_u16(entries);
        for (symbol, count) in self.table.iter() {
            symbol.write_key(out);
            out.write_u32(count);
        }
        out.write_u32(payload_len);
        out.write_bytes(&self.payload);
        out.write_u8(self.padding);
        trace!(
            entries,
            payload_len,
            padding = self.padding,
            "wrote sub-stream"
        );
        Ok(())
    }

    pub fn read(br: &mut ByteReader) -> Result<SubStream<S>> {
        let entries = br.read_u16()? as usize;
        let needed = entries * Self::ENTRY_BYTES;
        if needed > br.remaining() {
            return Err(Error::FrequencyTableTruncated {
                entries,
                needed,
                available: br.remaining(),
            });
        }
        let mut table = FrequencyTable::new();
        let mut prev: Option<S> = None;
        for _ in 0..entries {
            let symbol = S::read_key(br)?;
            let count = br.read_u32()?;
            if prev.is_some_and(|p| p >= symbol) {
                return Err(Error::UnsortedFrequencyTable);
            }
            prev = Some(symbol);
            table.insert(symbol, count);
        }
        let payload_len = br.read_u32()? as usize;
        let payload = br.read_bytes(payload_len)?.to_vec();
        let padding = br.read_u8()?;
        if padding > 7 || (payload.is_empty() && padding != 0) {
            return Err(Error::InvalidPadding {
                padding,
                payload_bytes: payload.len(),
            });
        }
        trace!(entries, payload_len, padding, "read sub-stream");
        Ok(SubStream {
            table,
            payload,
            padding,
        })
    }
}
