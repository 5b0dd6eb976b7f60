// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.
use super::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use test_log::test;

use std::f64::consts::FRAC_1_SQRT_2;
use std::f64::consts::PI;

#[inline(always)]
fn alpha(u: usize) -> f64 {
    if u == 0 { FRAC_1_SQRT_2 } else { 1.0 }
}

/// Direct evaluation of the 2-D DCT-II, one output coefficient at a time.
fn slow_dct2d(n: usize, input: &[f64]) -> Vec<f64> {
    let mut output = vec![0.0; n * n];
    for u in 0..n {
        for v in 0..n {
            let mut sum = 0.0;
            for x in 0..n {
                for y in 0..n {
                    sum += input[x * n + y]
                        * ((2 * x + 1) as f64 * u as f64 * PI / (2 * n) as f64).cos()
                        * ((2 * y + 1) as f64 * v as f64 * PI / (2 * n) as f64).cos();
                }
            }
            output[u * n + v] = sum * alpha(u) * alpha(v) * 2.0 / n as f64;
        }
    }
    output
}

fn random_block(rng: &mut ChaCha12Rng, n: usize) -> Vec<f64> {
    (0..n * n).map(|_| rng.random_range(0.0..255.0)).collect()
}

fn assert_close(left: &[f64], right: &[f64], max_error: f64) {
    assert_eq!(left.len(), right.len());
    for (i, (l, r)) in left.iter().zip(right).enumerate() {
        assert!(
            (l - r).abs() <= max_error,
            "mismatch at {i}: {l} vs {r}, max_error {max_error}"
        );
    }
}

#[test]
fn basis_columns_match_reference_1d_dct() {
    // Values of alpha(u) * sqrt(2) * sum_x(x * cos((2x + 1) * u * PI / 16)) for x in 0..8,
    // which is sqrt(8) times the orthonormal DCT.
    let unnormalized = [
        2.80000000e+01,
        -1.82216412e+01,
        0.0,
        -1.90481783e+00,
        0.0,
        -5.68239222e-01,
        0.0,
        -1.43407825e-01,
    ];
    let matrix = DctMatrix::new(8).unwrap();
    let basis = matrix.basis();
    for (u, expected) in unnormalized.iter().enumerate() {
        let coeff: f64 = (0..8).map(|x| basis[x * 8 + u] * x as f64).sum();
        assert!((coeff - expected / 8f64.sqrt()).abs() < 1e-7, "u={u}: {coeff}");
    }
}

#[test]
fn basis_is_orthonormal() {
    for n in [2, 4, 8, 16, 32] {
        let matrix = DctMatrix::new(n).unwrap();
        let a = matrix.basis();
        for i in 0..n {
            for j in 0..n {
                let dot: f64 = (0..n).map(|k| a[k * n + i] * a[k * n + j]).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-12, "n={n} ({i}, {j}): {dot}");
            }
        }
    }
}

#[test]
fn forward_matches_slow_dct() {
    let mut rng = ChaCha12Rng::seed_from_u64(0);
    for n in [2, 4, 8, 16] {
        let matrix = DctMatrix::new(n).unwrap();
        let input = random_block(&mut rng, n);
        let mut output = input.clone();
        matrix.forward(n, n, &mut output).unwrap();
        assert_close(&output, &slow_dct2d(n, &input), 1e-9);
    }
}

#[test]
fn round_trip_8x8() {
    let mut rng = ChaCha12Rng::seed_from_u64(1);
    let matrix = DctMatrix::block8();
    for _ in 0..100 {
        let input = random_block(&mut rng, 8);
        let mut data = input.clone();
        matrix.forward(8, 8, &mut data).unwrap();
        matrix.inverse(8, 8, &mut data).unwrap();
        assert_close(&data, &input, 1e-6);
    }
}

#[test]
fn round_trip_other_sizes() {
    let mut rng = ChaCha12Rng::seed_from_u64(2);
    for n in 1..=MAX_BLOCK_DIM {
        let matrix = DctMatrix::new(n).unwrap();
        let input = random_block(&mut rng, n);
        let mut data = input.clone();
        matrix.forward(n, n, &mut data).unwrap();
        matrix.inverse(n, n, &mut data).unwrap();
        assert_close(&data, &input, 1e-6);
    }
}

#[test]
fn constant_block_has_only_dc() {
    let matrix = DctMatrix::block8();
    let mut data = vec![100.0; 64];
    matrix.forward(8, 8, &mut data).unwrap();
    assert!((data[0] - 800.0).abs() < 1e-9);
    assert_close(&data[1..], &[0.0; 63], 1e-9);
}

#[test]
fn rejects_bad_shapes() {
    let matrix = DctMatrix::block8();
    let mut data = vec![0.0; 32];
    assert_eq!(
        matrix.forward(8, 4, &mut data),
        Err(TransformError::NonSquare { rows: 8, cols: 4 })
    );
    assert_eq!(
        matrix.inverse(4, 4, &mut data[..16]),
        Err(TransformError::SizeMismatch {
            expected: 8,
            found: 4
        })
    );
    assert_eq!(
        matrix.forward(8, 8, &mut data),
        Err(TransformError::BufferLength {
            expected: 64,
            found: 32
        })
    );
}

#[test]
fn rejects_unsupported_sizes() {
    assert_eq!(DctMatrix::new(0), Err(TransformError::UnsupportedSize(0)));
    assert_eq!(
        DctMatrix::new(MAX_BLOCK_DIM + 1),
        Err(TransformError::UnsupportedSize(MAX_BLOCK_DIM + 1))
    );
}

#[test]
fn block8_is_shared() {
    assert!(std::ptr::eq(DctMatrix::block8(), DctMatrix::block8()));
    assert_eq!(DctMatrix::block8(), &DctMatrix::new(8).unwrap());
}
