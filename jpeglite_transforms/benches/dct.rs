// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId, Criterion, criterion_group, criterion_main};
use jpeglite_transforms::DctMatrix;
use std::hint::black_box;

fn bench_size(c: &mut BenchmarkGroup<'_, impl Measurement>, n: usize) {
    let matrix = DctMatrix::new(n).unwrap();
    let mut data: Vec<f64> = (0..n * n).map(|i| (i % 251) as f64).collect();

    let id = BenchmarkId::new("forward", format_args!("{n}x{n}"));
    c.bench_function(id, |b| {
        b.iter(|| matrix.forward(n, n, black_box(&mut data)).unwrap())
    });

    let id = BenchmarkId::new("inverse", format_args!("{n}x{n}"));
    c.bench_function(id, |b| {
        b.iter(|| matrix.inverse(n, n, black_box(&mut data)).unwrap())
    });
}

fn bench_build(c: &mut BenchmarkGroup<'_, impl Measurement>) {
    for n in [8, 16, 32] {
        let id = BenchmarkId::new("build_matrix", format_args!("{n}x{n}"));
        c.bench_function(id, |b| b.iter(|| DctMatrix::new(black_box(n)).unwrap()));
    }
}

fn dct_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("dct");
    for n in [4, 8, 16, 32] {
        bench_size(&mut group, n);
    }
    bench_build(&mut group);
    group.finish();
}

criterion_group!(benches, dct_benches);
criterion_main!(benches);
