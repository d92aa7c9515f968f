use crate::{
    ConfigurationError, Convention, InjectionMode, Ratio, DEFAULT_BOUND, DEFAULT_FILL,
};
use std::num::NonZeroUsize;
use std::str::FromStr;
use tracing::{debug, warn};

/// Failure ratios swept by the harmonic scenario.
pub const HARMONIC_RATIOS: [u32; 5] = [500, 100, 10, 5, 2];

/// Failure ratios swept by the mean scenario.
pub const MEAN_RATIOS: [u32; 10] = [2048, 1024, 512, 256, 128, 64, 16, 8, 4, 2];

pub const ENV_BOUND: &str = "ERRSIG_BOUND";
pub const ENV_FILL: &str = "ERRSIG_FILL";
pub const ENV_MODE: &str = "ERRSIG_MODE";
pub const ENV_RATIOS: &str = "ERRSIG_RATIOS";
pub const ENV_CONVENTIONS: &str = "ERRSIG_CONVENTIONS";

/// How one scenario is swept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sweep {
    pub mode: InjectionMode,
    pub ratios: Vec<Ratio>,
}

impl Sweep {
    /// A sweep over explicit raw ratios, validated eagerly.
    pub fn new(mode: InjectionMode, raw: &[u32]) -> Result<Self, ConfigurationError> {
        let ratios = raw
            .iter()
            .map(|&ratio| Ratio::new(ratio))
            .collect::<Result<_, _>>()?;
        Ok(Self { mode, ratios })
    }
}

/// Everything the benchmark binaries need to know.
///
/// The defaults reproduce the classic setup: the harmonic scenario draws failures at random, the
/// mean scenario fails on a fixed cycle. Each field may be overridden from the environment, see
/// [`from_env`](Self::from_env).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// Harmonic terms per workload call.
    pub bound: u32,
    /// Samples added to the accumulator per mean iteration.
    pub fill: NonZeroUsize,
    /// Conventions to register, in order.
    pub conventions: Vec<Convention>,
    pub harmonic: Sweep,
    pub mean: Sweep,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            bound: DEFAULT_BOUND,
            fill: DEFAULT_FILL,
            conventions: Convention::ALL.to_vec(),
            harmonic: Sweep {
                mode: InjectionMode::Random,
                ratios: HARMONIC_RATIOS.iter().filter_map(|&r| Ratio::new(r).ok()).collect(),
            },
            mean: Sweep {
                mode: InjectionMode::Cyclic,
                ratios: MEAN_RATIOS.iter().filter_map(|&r| Ratio::new(r).ok()).collect(),
            },
        }
    }
}

impl BenchConfig {
    /// Read overrides from the process environment.
    ///
    /// - `ERRSIG_BOUND`: workload bound,
    /// - `ERRSIG_FILL`: accumulator samples per iteration,
    /// - `ERRSIG_MODE`: `cyclic` or `random`, applied to both scenarios,
    /// - `ERRSIG_RATIOS`: comma-separated ratios, applied to both scenarios,
    /// - `ERRSIG_CONVENTIONS`: comma-separated convention names to run, e.g. `fault,result`.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|var| match std::env::var(var) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => {
                warn!(var, "ignoring non-unicode override");
                None
            }
        })
    }

    /// Like [`from_env`](Self::from_env), with a custom variable source.
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let mut config = Self::default();

        if let Some(bound) = parse_override::<u32>(&lookup, ENV_BOUND)? {
            config.bound = bound;
        }
        if let Some(fill) = parse_override::<usize>(&lookup, ENV_FILL)? {
            config.fill = NonZeroUsize::new(fill).ok_or(ConfigurationError::ZeroFill)?;
        }
        if let Some(mode) = lookup(ENV_MODE) {
            let mode: InjectionMode = mode.parse()?;
            config.harmonic.mode = mode;
            config.mean.mode = mode;
        }
        if let Some(ratios) = lookup(ENV_RATIOS) {
            let ratios = parse_ratios(&ratios)?;
            config.harmonic.ratios.clone_from(&ratios);
            config.mean.ratios = ratios;
        }
        if let Some(conventions) = lookup(ENV_CONVENTIONS) {
            config.conventions = parse_conventions(&conventions)?;
        }

        debug!(?config, "benchmark configuration loaded");
        Ok(config)
    }
}

fn parse_override<T: FromStr>(
    lookup: &impl Fn(&'static str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigurationError> {
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigurationError::InvalidOverride { var, value })
        })
        .transpose()
}

/// Parse `"500, 100,10"` into ratios. Every entry must be a positive integer.
pub fn parse_ratios(list: &str) -> Result<Vec<Ratio>, ConfigurationError> {
    let ratios = list
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let raw: i64 = entry
                .parse()
                .map_err(|_| ConfigurationError::InvalidOverride {
                    var: ENV_RATIOS,
                    value: list.to_string(),
                })?;
            Ratio::try_from(raw)
        })
        .collect::<Result<Vec<_>, _>>()?;
    if ratios.is_empty() {
        return Err(ConfigurationError::InvalidOverride {
            var: ENV_RATIOS,
            value: list.to_string(),
        });
    }
    Ok(ratios)
}

/// Parse `"fault, result"` into conventions, keeping the first occurrence of each.
pub fn parse_conventions(list: &str) -> Result<Vec<Convention>, ConfigurationError> {
    let mut conventions = Vec::new();
    for entry in list.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let convention: Convention = entry.parse()?;
        if !conventions.contains(&convention) {
            conventions.push(convention);
        }
    }
    if conventions.is_empty() {
        return Err(ConfigurationError::InvalidOverride {
            var: ENV_CONVENTIONS,
            value: list.to_string(),
        });
    }
    Ok(conventions)
}
