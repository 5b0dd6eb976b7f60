// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Entropy coding of quantized coefficients.
//!
//! Each channel produces two independent sub-streams: one for the DC
//! coefficients of its blocks and one for all of its AC coefficients. Both
//! are first-order differenced, mapped to Huffman symbols and packed
//! together with their frequency table.

pub mod ac;
pub mod dc;
pub mod huffman;
pub mod magnitude;
pub mod stream;

use crate::util::tracing_wrappers::*;

/// `d[0] = v[0]`, `d[i] = v[i] - v[i-1]`.
pub fn delta_encode(values: &[i32]) -> Vec<i32> {
    let mut prev = 0;
    values
        .iter()
        .map(|&v| {
            let d = v.wrapping_sub(prev);
            prev = v;
            d
        })
        .collect()
}

/// Running prefix sum, the inverse of [delta_encode].
pub fn delta_decode(values: &mut [i32]) {
    let mut acc = 0i32;
    for v in values.iter_mut() {
        acc = acc.wrapping_add(*v);
        *v = acc;
    }
}

/// Zero-fills or truncates `values` to exactly `expected` entries.
pub fn coerce_len(values: &mut Vec<i32>, expected: usize) {
    if values.len() != expected {
        debug!(
            decoded = values.len(),
            expected, "coercing decoded coefficient count"
        );
        values.resize(expected, 0);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn delta_round_trip() {
        let values = vec![5, 5, 7, -3, -3, 0, 100];
        let deltas = delta_encode(&values);
        assert_eq!(deltas, vec![5, 0, 2, -10, 0, 3, 100]);
        let mut back = deltas;
        delta_decode(&mut back);
        assert_eq!(back, values);
    }

    #[test]
    fn delta_of_empty() {
        assert!(delta_encode(&[]).is_empty());
        let mut empty: Vec<i32> = vec![];
        delta_decode(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn coerce_fills_and_truncates() {
        let mut short = vec![1, 2];
        coerce_len(&mut short, 4);
        assert_eq!(short, vec![1, 2, 0, 0]);
        let mut long = vec![1, 2, 3, 4, 5];
        coerce_len(&mut long, 3);
        assert_eq!(long, vec![1, 2, 3]);
    }
}
