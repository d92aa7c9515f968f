//! What does it cost to report a failure?
//!
//! This crate benchmarks five ways of telling the caller that a computation failed:
//!
//! <table width="100%">
//!     <thead>
//!         <tr>
//!             <th>Convention</th>
//!             <th>Success</th>
//!             <th>Failure</th>
//!             <th>Caller checks</th>
//!         </tr>
//!     </thead>
//!     <tbody>
//!         <tr>
//!             <td><a href="convention/fn.by_ref.html"><code>by_ref</code></a></td>
//!             <td>writes <code>&amp;mut f64</code>, returns <code>Status::Ok</code></td>
//!             <td>returns <code>Status::Fail</code></td>
//!             <td>status code</td>
//!         </tr>
//!         <tr>
//!             <td><a href="convention/fn.with_fault.html"><code>fault</code></a></td>
//!             <td>returns <code>f64</code></td>
//!             <td>unwinds</td>
//!             <td><code>catch_unwind</code></td>
//!         </tr>
//!         <tr>
//!             <td><a href="convention/fn.with_option.html"><code>optional</code></a></td>
//!             <td><code>Some(f64)</code></td>
//!             <td><code>None</code></td>
//!             <td>presence</td>
//!         </tr>
//!         <tr>
//!             <td><a href="convention/fn.with_result.html"><code>result</code></a></td>
//!             <td><code>Ok(f64)</code></td>
//!             <td><code>Err(ReasonCode)</code></td>
//!             <td>discriminant</td>
//!         </tr>
//!         <tr>
//!             <td><a href="convention/fn.with_tuple.html"><code>tuple</code></a></td>
//!             <td><code>(true, f64)</code></td>
//!             <td><code>(false, 0.0)</code></td>
//!             <td>boolean field</td>
//!         </tr>
//!     </tbody>
//! </table>
//!
//! Each convention wraps the same cheap workload, a harmonic partial sum, and consults the same
//! [`ErrorInjector`] to decide whether the call fails. On failure the caller runs the same
//! [`FailureHandler`] and substitutes `0.0`. The only thing left to differ between the five is
//! the reporting mechanism itself.
//!
//! # Injecting failures
//!
//! [`CyclicInjector`] fails exactly every `N`-th call, which makes runs comparable with each
//! other. [`RandomInjector`] fails each call with probability `1 / N`, which is closer to what a
//! real program sees.
//!
//! ```
//! use errsig::{convention, CyclicInjector, Tally, Ignore, compute_sample};
//!
//! let mut injector = CyclicInjector::new(4).unwrap();
//! let mut handler = Tally::new(Ignore);
//! let values: Vec<f64> = (0..8)
//!     .map(|_| convention::call_with_fault(&mut injector, &mut handler, 100))
//!     .collect();
//!
//! assert_eq!(handler.failures, 2);
//! assert_eq!(values[3], 0.0);
//! assert_eq!(values[7], 0.0);
//! assert_eq!(values[0], compute_sample(100));
//! ```
//!
//! # Running
//!
//! `cargo bench --bench harmonic` and `cargo bench --bench mean` run the two scenarios through
//! criterion. The per-run `errors` and `ratio` counters are logged with `tracing`; set `RUST_LOG`
//! to adjust verbosity and `ERRSIG_*` variables to change the sweep (see [`BenchConfig`]).
//!
//! The `fault` convention relies on unwinding. Building with `panic = "abort"` turns every injected
//! failure into an abort.

pub mod accumulator;
pub mod config;
pub mod convention;
pub mod driver;
mod error;
pub mod fault;
mod handler;
mod injector;
mod workload;

pub use accumulator::{MeanAccumulator, DEFAULT_FILL};
pub use config::BenchConfig;
pub use convention::{Convention, ReasonCode, Status, DEFAULT_VALUE};
pub use driver::{measure, Measurement, Params, RunCounters, Scenario};
pub use error::ConfigurationError;
pub use handler::{FailureHandler, Ignore, Recompute, Tally};
pub use injector::{
    AnyInjector, CyclicInjector, ErrorInjector, InjectionMode, RandomInjector, Ratio,
};
pub use workload::{compute_sample, DEFAULT_BOUND};
