//! Formatter benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use minifmt_core::{Discard, FormatArg, snprintf, sprintf};

struct Case {
    name: &'static str,
    fmt: &'static [u8],
    args: fn() -> Vec<FormatArg<'static>>,
}

const CASES: &[Case] = &[
    Case { name: "literal", fmt: b"plain text with no directives at all", args: Vec::new },
    Case { name: "decimal", fmt: b"%d", args: || vec![FormatArg::Int(-1_234_567)] },
    Case { name: "padded_hex", fmt: b"[%#018llx]", args: || vec![FormatArg::Uint(0xdead_beef)] },
    Case { name: "string_precision", fmt: b"%-20.8s|", args: || vec!["formatted".into()] },
    Case {
        name: "mixed",
        fmt: b"%s=%d (%#x) %c%%",
        args: || vec!["key".into(), FormatArg::Int(42), FormatArg::Uint(255), FormatArg::Char(b'!')],
    },
];

fn bench_directives(c: &mut Criterion) {
    let mut group = c.benchmark_group("snprintf");
    for case in CASES {
        group.bench_function(BenchmarkId::new("directive", case.name), |b| {
            let mut dst = [0u8; 128];
            // Formatting never mutates non-`%n` operands, so one slice serves every iteration.
            let mut args = (case.args)();
            b.iter(|| black_box(snprintf(&mut dst, black_box(case.fmt), &mut args)));
        });
    }
    group.finish();
}

fn bench_truncation(c: &mut Criterion) {
    let caps: &[usize] = &[0, 8, 64, 512];
    let mut group = c.benchmark_group("snprintf_capacity");
    for &cap in caps {
        group.throughput(Throughput::Bytes(cap as u64));
        group.bench_with_input(BenchmarkId::from_parameter(cap), &cap, |b, &cap| {
            let mut dst = vec![0u8; cap];
            b.iter(|| {
                let mut args = [FormatArg::Int(600), FormatArg::Str(Some(b"padding".as_slice()))];
                black_box(snprintf(&mut dst, b"%*s", &mut args))
            });
        });
    }
    group.finish();
}

fn bench_sinks(c: &mut Criterion) {
    let mut group = c.benchmark_group("sink");
    group.bench_function("discard", |b| {
        b.iter(|| {
            let mut args = [FormatArg::Uint(u64::MAX), FormatArg::Int(i64::MIN)];
            black_box(sprintf(&mut Discard, b"%llo %lld", &mut args))
        });
    });
    group.bench_function("vec", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(64);
            let mut args = [FormatArg::Uint(u64::MAX), FormatArg::Int(i64::MIN)];
            let _ = sprintf(&mut out, b"%llo %lld", &mut args);
            black_box(out)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_directives, bench_truncation, bench_sinks);
criterion_main!(benches);
