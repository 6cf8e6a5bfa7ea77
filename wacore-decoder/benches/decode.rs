// Wacore - wacore-decoder
// Benchmarks: decode and validate throughput
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Benchmarks for decoding and validating WebAssembly modules of increasing
//! size, to track the cost of the streaming single-pass design.

#[cfg(not(feature = "std"))]
compile_error!("benchmarks require the std feature for criterion and wat");

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wacore_decoder::prelude::*;
use wacore_format::prelude::*;

/// A module with `n` small exported functions, each doing a handful of
/// arithmetic instructions on its two i32 parameters.
fn module_with_functions(n: usize) -> Vec<u8> {
    let mut functions = String::new();
    for i in 0..n {
        functions.push_str(&format!(
            "(func (export \"f{i}\") (param i32 i32) (result i32)
               local.get 0 local.get 1 i32.add
               local.get 0 i32.mul
               local.get 1 i32.sub)\n"
        ));
    }
    let text = format!("(module {functions})");
    wat::parse_str(text).expect("fixture module should be valid wat")
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_module");
    for &size in &[1usize, 16, 256] {
        let bytes = module_with_functions(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| {
                let state = decode_module(black_box(bytes), &Features::wasm_1_0()).unwrap();
                black_box(state)
            });
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_binary");
    for &size in &[1usize, 16, 256] {
        let bytes = module_with_functions(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| {
                let errors = validate_binary(black_box(bytes), &Features::wasm_1_0()).unwrap();
                black_box(errors)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_validate);
criterion_main!(benches);
