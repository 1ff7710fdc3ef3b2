use criterion::{black_box, criterion_group, criterion_main, Criterion};
use treecalc::compute;

const FLAT_EXPR: &str = "2 * 6 - 4 - 3 / 2 + 3 * 4 * 5 - 32 * 7 + 43 * 8";
const NESTED_EXPR: &str = "sin(2 - 1 / (cos(3 * 5))) + 5 ^ (2 / (0.5 * 4))";

fn bench_compute(c: &mut Criterion) {
    c.bench_function("compute_flat", |b| {
        b.iter(|| compute::<f64>(black_box(FLAT_EXPR)).unwrap())
    });
    c.bench_function("compute_nested", |b| {
        b.iter(|| compute::<f64>(black_box(NESTED_EXPR)).unwrap())
    });
}

criterion_group!(benches, bench_compute);
criterion_main!(benches);
