extern crate criterion;
extern crate lzwtab;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fs;

pub fn criterion_benchmark(c: &mut Criterion, file: &str) {
    let data = fs::read(file).expect("Benchmark input not found");
    let codes = lzwtab::encode(&data);

    let mut group = c.benchmark_group("codes");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_with_input(BenchmarkId::new("encode", file), &data, |b, data| {
        b.iter(|| black_box(lzwtab::encode(data)))
    });
    group.bench_with_input(BenchmarkId::new("decode", file), &codes, |b, codes| {
        b.iter(|| black_box(lzwtab::decode(codes).expect("Error")))
    });
    group.finish();
}

pub fn bench_toml(c: &mut Criterion) {
    criterion_benchmark(c, "Cargo.toml");
}

pub fn bench_lib(c: &mut Criterion) {
    criterion_benchmark(c, "src/encode.rs");
}

criterion_group!(benches, bench_toml, bench_lib);
criterion_main!(benches);
