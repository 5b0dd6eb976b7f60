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

/// AC symbol: a run of zero differences followed by a value of the given
/// category. Category 0 terminates the stream: every remaining difference
/// is zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AcSymbol {
    pub run: u32,
    pub category: u8,
}

impl AcSymbol {
    pub fn is_terminator(&self) -> bool {
        self.category == 0
    }
}

impl StreamSymbol for AcSymbol {
    const KEY_BYTES: usize = 5;

    fn write_key(&self, out: &mut ByteWriter) {
        out.write_u32(self.run);
        out.write_u8(self.category);
    }

    fn read_key(br: &mut ByteReader) -> Result<Self> {
        let run = br.read_u32()?;
        let category = magnitude::check_category(br.read_u8()?)?;
        Ok(AcSymbol { run, category })
    }
}

/// Splits the differenced sequence into `(symbol, value)` pairs.
fn run_length_symbols(deltas: &[i32]) -> Result<Vec<(AcSymbol, i32)>> {
    let mut out = vec![];
    let mut run = 0u32;
    for &d in deltas {
        if d == 0 {
            run = run.checked_add(1).ok_or(Error::ArithmeticOverflow)?;
            continue;
        }
        let category = magnitude::category(d);
        if category > magnitude::MAX_CATEGORY {
            return Err(Error::InvalidCategory(category));
        }
        out.push((AcSymbol { run, category }, d));
        run = 0;
    }
    if run != 0 {
        out.push((AcSymbol { run, category: 0 }, 0));
    }
    Ok(out)
}

/// Codes the AC coefficients of all blocks of a channel as one sequence.
#[instrument(level = "debug", skip_all, fields(count = values.len()), err)]
pub fn encode_ac(values: &[i32]) -> Result<SubStream<AcSymbol>> {
    let symbols = run_length_symbols(&delta_encode(values))?;
    let table = FrequencyTable::from_symbols(symbols.iter().map(|&(s, _)| s))?;
    let codebook = HuffmanTree::build(&table)?.codebook()?;
    let mut bw = BitWriter::new();
    for (symbol, value) in &symbols {
        codebook.write_symbol(&mut bw, symbol)?;
        magnitude::write(&mut bw, *value, symbol.category);
    }
    let bits = bw.bits_written();
    let (payload, padding) = bw.finish();
    debug_assert_eq!(payload.len() * 8 - padding as usize, bits);
    debug!(
        bits,
        symbols = symbols.len(),
        entries = table.len(),
        payload_bytes = payload.len(),
        padding,
        "encoded AC stream"
    );
    Ok(SubStream {
        table,
        payload,
        padding,
    })
}

/// Decodes `expected` AC values. Decoding stops at the terminator, at the
/// end of the payload, or once `expected` values are produced.
#[instrument(level = "debug", skip(stream), err)]
pub fn decode_ac(stream: &SubStream<AcSymbol>, expected: usize) -> Result<Vec<i32>> {
    let tree = HuffmanTree::build(&stream.table)?;
    let mut br = stream.bit_reader()?;
    let mut values = Vec::new();
    values.try_reserve_exact(expected)?;
    while values.len() < expected {
        if !tree.is_degenerate() && br.total_bits_available() == 0 {
            break;
        }
        let symbol = tree.read_symbol(&mut br)?;
        let zeros = (symbol.run as usize).min(expected - values.len());
        values.resize(values.len() + zeros, 0);
        if symbol.is_terminator() || values.len() == expected {
            break;
        }
        values.push(magnitude::read(&mut br, symbol.category)?);
    }
    delta_decode(&mut values);
    coerce_len(&mut values, expected);
    Ok(values)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use test_log::test;

    fn sym(run: u32, category: u8) -> AcSymbol {
        AcSymbol { run, category }
    }

    #[test]
    fn run_lengths() -> Result<()> {
        let symbols = run_length_symbols(&[0, 0, 3, -1, 0, 0, 0])?;
        assert_eq!(
            symbols,
            vec![(sym(2, 2), 3), (sym(0, 1), -1), (sym(3, 0), 0)]
        );
        // No terminator without a trailing run.
        assert_eq!(run_length_symbols(&[4])?, vec![(sym(0, 3), 4)]);
        Ok(())
    }

    #[test]
    fn symbols_sort_by_run_then_category() {
        let mut v = vec![sym(1, 0), sym(0, 5), sym(0, 2), sym(1, 1)];
        v.sort();
        assert_eq!(v, vec![sym(0, 2), sym(0, 5), sym(1, 0), sym(1, 1)]);
    }

    #[test]
    fn all_zero_channel() -> Result<()> {
        let stream = encode_ac(&[0; 63 * 4])?;
        let entries: Vec<_> = stream.table.iter().collect();
        assert_eq!(entries, vec![(sym(252, 0), 1)]);
        assert!(stream.payload.is_empty());
        assert_eq!(decode_ac(&stream, 252)?, vec![0; 252]);
        Ok(())
    }

    #[test]
    fn constant_nonzero_tail() -> Result<()> {
        // The trailing run repeats the last value after the prefix sum.
        let values = [5, 5, 5, 5, 2, 2, 2];
        let stream = encode_ac(&values)?;
        assert_eq!(decode_ac(&stream, values.len())?, values);
        Ok(())
    }

    #[test]
    fn random_round_trip() -> Result<()> {
        let mut rng = XorShiftRng::seed_from_u64(3);
        let values: Vec<i32> = (0..63 * 50)
            .map(|_| {
                if rng.random_bool(0.7) {
                    0
                } else {
                    rng.random_range(-300..300)
                }
            })
            .collect();
        let stream = encode_ac(&values)?;
        assert_eq!(decode_ac(&stream, values.len())?, values);
        Ok(())
    }

    #[test]
    fn terminator_before_expected_count() -> Result<()> {
        let stream = encode_ac(&[1, 1, 1])?;
        assert_eq!(decode_ac(&stream, 6)?, vec![1, 1, 1, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn excess_is_truncated() -> Result<()> {
        let stream = encode_ac(&[7, 0, 0, 0, 0, 9])?;
        assert_eq!(decode_ac(&stream, 3)?, vec![7, 0, 0]);
        Ok(())
    }

    #[test]
    fn payload_holds_codes_and_magnitudes() -> Result<()> {
        let values = [0, 0, 12, -12, 0, 1, 0, 0, 3];
        let stream = encode_ac(&values)?;
        let codebook = HuffmanTree::build(&stream.table)?.codebook()?;
        let mut bits = 0;
        for (symbol, _) in run_length_symbols(&delta_encode(&values))? {
            bits += codebook.code(&symbol)?.1 + symbol.category as usize;
        }
        assert_eq!(stream.payload.len() * 8 - stream.padding as usize, bits);
        Ok(())
    }

    #[test]
    fn serialized_stream_round_trip() -> Result<()> {
        let values = [0, 0, 12, -12, 0, 1, 0, 0];
        let stream = encode_ac(&values)?;
        let mut out = ByteWriter::new();
        stream.write(&mut out)?;
        assert_eq!(out.len(), stream.encoded_len());
        let bytes = out.into_inner();
        let mut br = ByteReader::new(&bytes);
        let read = SubStream::<AcSymbol>::read(&mut br)?;
        assert_eq!(read, stream);
        assert_eq!(decode_ac(&read, values.len())?, values);
        Ok(())
    }
}
