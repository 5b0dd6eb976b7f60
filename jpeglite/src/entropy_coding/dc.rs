// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    bit_writer::BitWriter,
    byte_io::{ByteReader, ByteWriter},
    entropy_coding::{
        coerce_len, delta_decode, delta_encode,
        huffman::{FrequencyTable, HuffmanTree},
        magnitude,
        stream::{StreamSymbol, SubStream},
    },
    error::{Error, Result},
    util::tracing_wrappers::*,
};

/// DC symbol: the category of a DC difference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DcSymbol {
    pub category: u8,
}

impl StreamSymbol for DcSymbol {
    const KEY_BYTES: usize = 1;

    fn write_key(&self, out: &mut ByteWriter) {
        out.write_u8(self.category);
    }

    fn read_key(br: &mut ByteReader) -> Result<Self> {
        let category = magnitude::check_category(br.read_u8()?)?;
        Ok(DcSymbol { category })
    }
}

/// Codes one DC value per block, in block order.
#[instrument(level = "debug", skip_all, fields(count = values.len()), err)]
pub fn encode_dc(values: &[i32]) -> Result<SubStream<DcSymbol>> {
    let deltas = delta_encode(values);
    let mut symbols = Vec::with_capacity(deltas.len());
    for &d in &deltas {
        let category = magnitude::category(d);
        if category > magnitude::MAX_CATEGORY {
            return Err(Error::InvalidCategory(category));
        }
        symbols.push(DcSymbol { category });
    }
    let table = FrequencyTable::from_symbols(symbols.iter().copied())?;
    let codebook = HuffmanTree::build(&table)?.codebook()?;
    let mut bw = BitWriter::new();
    for (symbol, &d) in symbols.iter().zip(&deltas) {
        codebook.write_symbol(&mut bw, symbol)?;
        magnitude::write(&mut bw, d, symbol.category);
    }
    let bits = bw.bits_written();
    let (payload, padding) = bw.finish();
    debug_assert_eq!(payload.len() * 8 - padding as usize, bits);
    debug!(
        bits,
        entries = table.len(),
        payload_bytes = payload.len(),
        padding,
        "encoded DC stream"
    );
    Ok(SubStream {
        table,
        payload,
        padding,
    })
}

/// Decodes `expected` DC values; see [crate::entropy_coding::coerce_len]
/// for streams that end early.
#[instrument(level = "debug", skip(stream), err)]
pub fn decode_dc(stream: &SubStream<DcSymbol>, expected: usize) -> Result<Vec<i32>> {
    let tree = HuffmanTree::build(&stream.table)?;
    let mut br = stream.bit_reader()?;
    let mut values = Vec::new();
    values.try_reserve_exact(expected)?;
    while values.len() < expected {
        if !tree.is_degenerate() && br.total_bits_available() == 0 {
            break;
        }
        let symbol = tree.read_symbol(&mut br)?;
        values.push(magnitude::read(&mut br, symbol.category)?);
    }
    delta_decode(&mut values);
    coerce_len(&mut values, expected);
    Ok(values)
}
