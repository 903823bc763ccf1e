//! Benchmarks for the text → fragment pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use isopleth::Context;

/// Expressions spanning the pipeline's interesting paths.
const EXPRESSIONS: &[(&str, &str)] = &[
    ("constant", "2+3\\cdot 4-\\frac{1}{2}"),
    ("polynomial", "y=x^3-2x^2+x-7"),
    ("rational", "y=\\frac{x^2-1}{x-1}+\\frac{1}{x+2}"),
    ("transcendental", "y=\\sin{x}\\cos{x}+\\ln{\\abs{x}}"),
];

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for (name, text) in EXPRESSIONS {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| {
                let mut ctx = Context::new();
                black_box(ctx.compile_expression(black_box(text), 0).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_derivative_inlining(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline");

    for ticks in ["f{x}", "f'{x}", "f''{x}"] {
        let expr = format!("y={ticks}");
        group.bench_with_input(BenchmarkId::from_parameter(ticks), &expr, |b, expr| {
            b.iter(|| {
                let mut ctx = Context::new();
                ctx.define_function("fx", "x^4+\\sin{x}", 0).unwrap();
                black_box(ctx.compile_expression(black_box(expr), 1).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_derivative_inlining);
criterion_main!(benches);
