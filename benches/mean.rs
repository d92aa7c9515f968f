use criterion::{criterion_group, criterion_main, Criterion};
use errsig::Scenario;

mod common;

pub fn criterion_benchmark(c: &mut Criterion) {
    let config = common::init();
    common::bench_scenario(c, &config, Scenario::Mean);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
