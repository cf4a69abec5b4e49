//! Integer conversion benchmarks.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use minifmt_core::stdio::{MAXNBUF, ksprintn};
use minifmt_core::{strtoq, strtoul, strtouq};

fn bench_decoders(c: &mut Criterion) {
    let inputs: &[(&str, &[u8], u32)] = &[
        ("short_decimal", b"42", 10),
        ("max_decimal", b"18446744073709551615", 10),
        ("overflow", b"999999999999999999999999999999", 10),
        ("hex_auto", b"  0x7fffffffffffffff", 0),
        ("base36", b"3w5e11264sgsf", 36),
    ];
    let mut group = c.benchmark_group("decode");
    for &(name, text, base) in inputs {
        group.bench_with_input(BenchmarkId::new("strtoul", name), &text, |b, text| {
            b.iter(|| black_box(strtoul(black_box(text), base)));
        });
        group.bench_with_input(BenchmarkId::new("strtoq", name), &text, |b, text| {
            b.iter(|| black_box(strtoq(black_box(text), base)));
        });
        group.bench_with_input(BenchmarkId::new("strtouq", name), &text, |b, text| {
            b.iter(|| black_box(strtouq(black_box(text), base)));
        });
    }
    group.finish();
}

fn bench_encoder(c: &mut Criterion) {
    let bases: &[u32] = &[2, 8, 10, 16, 36];
    let mut group = c.benchmark_group("ksprintn");
    for &base in bases {
        group.bench_with_input(BenchmarkId::from_parameter(base), &base, |b, &base| {
            let mut nbuf = [0u8; MAXNBUF];
            b.iter(|| black_box(ksprintn(&mut nbuf, black_box(u64::MAX), base, false)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decoders, bench_encoder);
criterion_main!(benches);
