//! Timed loops and per-run counters.
//!
//! [`measure`] is what a benchmark framework's custom-timing hook calls: it runs one convention
//! `iters` times back to back, keeps every result alive with [`black_box`], and reports the
//! elapsed wall time together with the number of failures observed. Selecting the convention
//! happens once, before the clock starts.

use crate::accumulator::{self, MeanAccumulator};
use crate::convention::{
    call_by_ref, call_with_fault, call_with_option, call_with_result, call_with_tuple,
};
use crate::{BenchConfig, Convention, ErrorInjector, FailureHandler, Ratio, Recompute, Tally};
use std::fmt;
use std::hint::black_box;
use std::num::NonZeroUsize;
use std::ops::AddAssign;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// The work a benchmark case performs around the signaling convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// The convention wraps a harmonic partial sum.
    Harmonic,
    /// The convention reports the mean of a freshly filled accumulator.
    Mean,
}

impl Scenario {
    pub const ALL: [Self; 2] = [Self::Harmonic, Self::Mean];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Harmonic => "harmonic",
            Self::Mean => "mean",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sizes of the work done per call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    pub bound: u32,
    pub fill: NonZeroUsize,
}

impl From<&BenchConfig> for Params {
    fn from(config: &BenchConfig) -> Self {
        Self {
            bound: config.bound,
            fill: config.fill,
        }
    }
}

/// Auxiliary counters attached to a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunCounters {
    pub ratio: Ratio,
    pub calls: u64,
    pub errors: u64,
}

impl RunCounters {
    pub fn new(ratio: Ratio) -> Self {
        Self {
            ratio,
            calls: 0,
            errors: 0,
        }
    }

    /// Observed failures per call, `0.0` before any call.
    pub fn error_rate(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.errors as f64 / self.calls as f64
        }
    }
}

impl AddAssign for RunCounters {
    fn add_assign(&mut self, other: Self) {
        debug_assert_eq!(self.ratio, other.ratio);
        self.calls += other.calls;
        self.errors += other.errors;
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Measurement {
    pub elapsed: Duration,
    pub counters: RunCounters,
}

/// One registered benchmark: a scenario, a convention and a failure ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Case {
    pub scenario: Scenario,
    pub convention: Convention,
    pub ratio: Ratio,
}

impl Case {
    /// Group name under which the framework reports this case, e.g. `harmonic/fault`.
    pub fn group(&self) -> String {
        format!("{}/{}", self.scenario, self.convention)
    }
}

/// Every case the configuration asks for, grouped by scenario, then convention, then ratio in
/// configured order. Conventions missing from `config.conventions` are skipped.
pub fn cases(config: &BenchConfig) -> Vec<Case> {
    let mut cases = Vec::new();
    for scenario in Scenario::ALL {
        let sweep = match scenario {
            Scenario::Harmonic => &config.harmonic,
            Scenario::Mean => &config.mean,
        };
        for &convention in &config.conventions {
            cases.extend(sweep.ratios.iter().map(|&ratio| Case {
                scenario,
                convention,
                ratio,
            }));
        }
    }
    cases
}

#[inline(always)]
fn timed(iters: u64, mut call: impl FnMut() -> f64) -> Duration {
    let start = Instant::now();
    for _ in 0..iters {
        black_box(call());
    }
    start.elapsed()
}

fn harmonic<I, H>(
    iters: u64,
    injector: &mut I,
    handler: &mut H,
    bound: u32,
    call: impl Fn(&mut I, &mut H, u32) -> f64,
) -> Duration
where
    I: ErrorInjector,
    H: FailureHandler,
{
    timed(iters, || call(&mut *injector, &mut *handler, black_box(bound)))
}

fn mean<I, H>(
    iters: u64,
    injector: &mut I,
    handler: &mut H,
    fill: NonZeroUsize,
    call: impl Fn(&MeanAccumulator, &mut H) -> f64,
) -> Duration
where
    I: ErrorInjector,
    H: FailureHandler,
{
    timed(iters, || {
        let mut acc = MeanAccumulator::new();
        accumulator::fill(&mut acc, &mut *injector, black_box(fill));
        call(&acc, &mut *handler)
    })
}

/// Run `convention` in `scenario` `iters` times and time the whole batch.
///
/// The injector is consulted once per iteration and keeps its state across calls, so repeated
/// batches continue the same failure cycle. On failure the workload is recomputed once, which
/// keeps the failure path equally expensive for every convention.
pub fn measure<I: ErrorInjector>(
    scenario: Scenario,
    convention: Convention,
    injector: &mut I,
    params: Params,
    iters: u64,
) -> Measurement {
    let mut handler = Tally::new(Recompute {
        bound: params.bound,
    });
    let handler = &mut handler;
    let bound = params.bound;
    let fill = params.fill;

    let elapsed = match (scenario, convention) {
        (Scenario::Harmonic, Convention::ByRef) => {
            harmonic(iters, injector, handler, bound, call_by_ref)
        }
        (Scenario::Harmonic, Convention::Fault) => {
            harmonic(iters, injector, handler, bound, call_with_fault)
        }
        (Scenario::Harmonic, Convention::Optional) => {
            harmonic(iters, injector, handler, bound, call_with_option)
        }
        (Scenario::Harmonic, Convention::Tagged) => {
            harmonic(iters, injector, handler, bound, call_with_result)
        }
        (Scenario::Harmonic, Convention::Tuple) => {
            harmonic(iters, injector, handler, bound, call_with_tuple)
        }
        (Scenario::Mean, Convention::ByRef) => {
            mean(iters, injector, handler, fill, accumulator::mean_by_ref)
        }
        (Scenario::Mean, Convention::Fault) => {
            mean(iters, injector, handler, fill, accumulator::mean_with_fault)
        }
        (Scenario::Mean, Convention::Optional) => {
            mean(iters, injector, handler, fill, accumulator::mean_with_option)
        }
        (Scenario::Mean, Convention::Tagged) => {
            mean(iters, injector, handler, fill, accumulator::mean_with_result)
        }
        (Scenario::Mean, Convention::Tuple) => {
            mean(iters, injector, handler, fill, accumulator::mean_with_tuple)
        }
    };

    let counters = RunCounters {
        ratio: injector.ratio(),
        calls: iters,
        errors: handler.failures,
    };
    debug!(
        %scenario,
        %convention,
        ratio = counters.ratio.get(),
        errors = counters.errors,
        calls = counters.calls,
        ?elapsed,
        "batch measured"
    );
    Measurement { elapsed, counters }
}

/// Log the counters accumulated over all batches of one case.
pub fn report(case: &Case, counters: &RunCounters) {
    info!(
        scenario = %case.scenario,
        convention = %case.convention,
        ratio = counters.ratio.get(),
        errors = counters.errors,
        calls = counters.calls,
        error_rate = counters.error_rate(),
        "run finished"
    );
}
