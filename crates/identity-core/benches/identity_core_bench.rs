//! Identifier-generation benchmarks

use criterion::{criterion_group, criterion_main, Criterion};
use identity_core::ids::{new_group_id, new_user_id};

fn benchmark_id_generation(c: &mut Criterion) {
    c.bench_function("new_user_id", |b| b.iter(new_user_id));
    c.bench_function("new_group_id", |b| b.iter(new_group_id));
}

criterion_group!(benches, benchmark_id_generation);
criterion_main!(benches);
