// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::mem;

use crate::error::{Error, Result};

/// Diagonal scan order of an N×N block.
///
/// Anti-diagonals `d = 0..2N-1` are visited in order. On even diagonals the
/// row index increases along the diagonal, on odd ones the column index does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZigzagOrder {
    size: usize,
    // Row-major position of the i-th coefficient of the sequence.
    order: Vec<usize>,
}

impl ZigzagOrder {
    pub fn new(size: usize) -> ZigzagOrder {
        let mut order = Vec::with_capacity(size * size);
        for d in 0..(2 * size).saturating_sub(1) {
            for i in 0..(d + 1) {
                let mut row = i;
                let mut col = d - i;
                if d % 2 != 0 {
                    mem::swap(&mut row, &mut col);
                }
                if row < size && col < size {
                    order.push(row * size + col);
                }
            }
        }
        debug_assert_eq!(order.len(), size * size);
        ZigzagOrder { size, order }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major block positions in scan order.
    pub fn positions(&self) -> &[usize] {
        &self.order
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len != self.order.len() {
            return Err(Error::BlockSizeMismatch {
                expected: self.order.len(),
                found: len,
            });
        }
        Ok(())
    }

    /// Reads a row-major block in scan order.
    pub fn scan<T: Copy>(&self, block: &[T]) -> Result<Vec<T>> {
        self.check_len(block.len())?;
        Ok(self.order.iter().map(|&pos| block[pos]).collect())
    }

    /// Writes a scan-ordered sequence back into a row-major block.
    pub fn unscan<T: Copy + Default>(&self, sequence: &[T]) -> Result<Vec<T>> {
        self.check_len(sequence.len())?;
        let mut block = vec![T::default(); sequence.len()];
        for (&pos, &v) in self.order.iter().zip(sequence) {
            block[pos] = v;
        }
        Ok(block)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use arbtest::arbitrary::Unstructured;
    use test_log::test;

    #[test]
    fn order_4x4() {
        #[rustfmt::skip]
        let expected = [
            0, 4, 1, 2, 5, 8, 12, 9,
            6, 3, 7, 10, 13, 14, 11, 15,
        ];
        assert_eq!(ZigzagOrder::new(4).positions(), &expected);
    }

    #[test]
    fn order_8x8_starts_and_ends() {
        let order = ZigzagOrder::new(8);
        assert_eq!(order.positions()[..6], [0, 8, 1, 2, 9, 16]);
        assert_eq!(order.positions()[63], 63);
    }

    #[test]
    fn is_permutation() {
        for size in 1..=32 {
            let mut seen = ZigzagOrder::new(size).positions().to_vec();
            seen.sort_unstable();
            assert_eq!(seen, (0..size * size).collect::<Vec<_>>());
        }
    }

    #[test]
    fn rejects_wrong_length() {
        let order = ZigzagOrder::new(8);
        assert!(matches!(
            order.scan(&[0i32; 63]),
            Err(Error::BlockSizeMismatch {
                expected: 64,
                found: 63
            })
        ));
        assert!(order.unscan(&[0i32; 65]).is_err());
    }

    fn arbtest_round_trip(u: &mut Unstructured) -> arbtest::arbitrary::Result<()> {
        let size = u.int_in_range(1..=32)?;
        let order = ZigzagOrder::new(size);
        let mut block = Vec::with_capacity(size * size);
        for _ in 0..size * size {
            block.push(u.arbitrary::<i32>()?);
        }
        let sequence = order.scan(&block).unwrap();
        assert_eq!(sequence[0], block[0]);
        assert_eq!(order.unscan(&sequence).unwrap(), block);
        Ok(())
    }

    #[test]
    fn round_trip() {
        arbtest::arbtest(arbtest_round_trip);
    }
}
