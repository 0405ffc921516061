use clap::Parser;
use criterion::{criterion_group, criterion_main, Criterion};
use identity_cli::Cli;

fn bench_parse(c: &mut Criterion) {
    let args = ["identity", "authz", "evaluate", "tok", "{}", "{}"];
    c.bench_function("cli_parse_authz_evaluate", |b| {
        b.iter(|| Cli::try_parse_from(args).unwrap())
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
