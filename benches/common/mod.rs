use criterion::{BenchmarkId, Criterion};
use errsig::driver::{self, Case};
use errsig::{measure, BenchConfig, Params, RunCounters, Scenario};
use tracing::error;
use tracing_subscriber::EnvFilter;

pub fn init() -> BenchConfig {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();

    match BenchConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid benchmark configuration");
            std::process::exit(2);
        }
    }
}

/// Register one group per convention of `scenario`, with one benchmark per configured ratio.
pub fn bench_scenario(c: &mut Criterion, config: &BenchConfig, scenario: Scenario) {
    let sweep = match scenario {
        Scenario::Harmonic => &config.harmonic,
        Scenario::Mean => &config.mean,
    };
    let params = Params::from(config);
    let cases: Vec<Case> = driver::cases(config)
        .into_iter()
        .filter(|case| case.scenario == scenario)
        .collect();

    for group_cases in cases.chunk_by(|a, b| a.convention == b.convention) {
        let mut group = c.benchmark_group(group_cases[0].group());
        for case in group_cases {
            // A fresh injector per configuration, reused across every sample of it.
            let mut injector = sweep.mode.build(case.ratio);
            let mut totals = RunCounters::new(case.ratio);
            group.bench_with_input(
                BenchmarkId::from_parameter(case.ratio),
                &case.ratio,
                |b, _| {
                    b.iter_custom(|iters| {
                        let measurement =
                            measure(case.scenario, case.convention, &mut injector, params, iters);
                        totals += measurement.counters;
                        measurement.elapsed
                    })
                },
            );
            driver::report(case, &totals);
        }
        group.finish();
    }
}
