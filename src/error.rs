use thiserror::Error;

/// Rejected benchmark configuration.
///
/// Every variant is produced eagerly, at construction time. Nothing in this crate clamps a bad
/// value into range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A failure ratio of zero has no meaning: "one failure every zero calls".
    #[error("failure ratio must be at least 1, got 0")]
    ZeroRatio,

    /// A ratio parameter below zero.
    #[error("failure ratio must be positive, got {0}")]
    NegativeRatio(i64),

    /// A ratio parameter above `u32::MAX`.
    #[error("failure ratio {0} does not fit in 32 bits")]
    RatioOutOfRange(i64),

    /// An environment override was set but could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    InvalidOverride { var: &'static str, value: String },

    /// An injection mode name other than `cyclic` or `random`.
    #[error("unknown injection mode {0:?}, expected \"cyclic\" or \"random\"")]
    UnknownMode(String),

    /// A convention name that is not one of `by_ref`, `fault`, `optional`, `result`, `tuple`.
    #[error("unknown convention {0:?}")]
    UnknownConvention(String),

    /// An empty accumulator always fails, which would hide the configured ratio.
    #[error("accumulator fill size must be at least 1, got 0")]
    ZeroFill,
}
