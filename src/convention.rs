//! The five ways of reporting the outcome of a fallible call.
//!
//! Every convention comes as a pair: a *wrapper* that consults the injector and reports the outcome
//! its own way, and a *caller* that checks the outcome, runs the failure handler on failure and
//! returns either the value or `0.0`. All callers have the same signature and the same observable
//! behavior, so any difference in their timing comes from the reporting mechanism.

use crate::{compute_sample, fault, ConfigurationError, ErrorInjector, FailureHandler};
use std::fmt;
use std::str::FromStr;

/// Integer reason attached to a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReasonCode(pub i32);

impl ReasonCode {
    pub const FAIL: Self = Self(-1);
}

/// Status code returned by the by-reference convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
#[must_use]
pub enum Status {
    Ok = 0,
    Fail = -1,
}

/// Value the callers substitute when the call failed.
pub const DEFAULT_VALUE: f64 = 0.0;

/// Writes the sample to `value` and returns [`Status::Ok`], or leaves `value` untouched and
/// returns [`Status::Fail`].
#[inline(never)]
pub fn by_ref<I: ErrorInjector>(value: &mut f64, injector: &mut I, bound: u32) -> Status {
    if injector.should_fail() {
        return Status::Fail;
    }
    *value = compute_sample(bound);
    Status::Ok
}

/// Returns the sample or unwinds with [`ReasonCode::FAIL`].
#[inline(never)]
pub fn with_fault<I: ErrorInjector>(injector: &mut I, bound: u32) -> f64 {
    if injector.should_fail() {
        fault::raise(ReasonCode::FAIL);
    }
    compute_sample(bound)
}

#[inline(never)]
pub fn with_option<I: ErrorInjector>(injector: &mut I, bound: u32) -> Option<f64> {
    if injector.should_fail() {
        return None;
    }
    Some(compute_sample(bound))
}

#[inline(never)]
pub fn with_result<I: ErrorInjector>(injector: &mut I, bound: u32) -> Result<f64, ReasonCode> {
    if injector.should_fail() {
        return Err(ReasonCode::FAIL);
    }
    Ok(compute_sample(bound))
}

/// Returns `(true, sample)`, or `(false, 0.0)` on failure.
#[inline(never)]
pub fn with_tuple<I: ErrorInjector>(injector: &mut I, bound: u32) -> (bool, f64) {
    if injector.should_fail() {
        return (false, DEFAULT_VALUE);
    }
    (true, compute_sample(bound))
}

pub fn call_by_ref<I, H>(injector: &mut I, handler: &mut H, bound: u32) -> f64
where
    I: ErrorInjector,
    H: FailureHandler,
{
    let mut value = DEFAULT_VALUE;
    if by_ref(&mut value, injector, bound) == Status::Ok {
        value
    } else {
        handler.on_failure();
        DEFAULT_VALUE
    }
}

pub fn call_with_fault<I, H>(injector: &mut I, handler: &mut H, bound: u32) -> f64
where
    I: ErrorInjector,
    H: FailureHandler,
{
    match fault::catch(|| with_fault(injector, bound)) {
        Ok(value) => value,
        Err(_) => {
            handler.on_failure();
            DEFAULT_VALUE
        }
    }
}

pub fn call_with_option<I, H>(injector: &mut I, handler: &mut H, bound: u32) -> f64
where
    I: ErrorInjector,
    H: FailureHandler,
{
    match with_option(injector, bound) {
        Some(value) => value,
        None => {
            handler.on_failure();
            DEFAULT_VALUE
        }
    }
}

pub fn call_with_result<I, H>(injector: &mut I, handler: &mut H, bound: u32) -> f64
where
    I: ErrorInjector,
    H: FailureHandler,
{
    match with_result(injector, bound) {
        Ok(value) => value,
        Err(_) => {
            handler.on_failure();
            DEFAULT_VALUE
        }
    }
}

pub fn call_with_tuple<I, H>(injector: &mut I, handler: &mut H, bound: u32) -> f64
where
    I: ErrorInjector,
    H: FailureHandler,
{
    let (ok, value) = with_tuple(injector, bound);
    if ok {
        value
    } else {
        handler.on_failure();
        DEFAULT_VALUE
    }
}

/// An outcome-signaling convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Convention {
    ByRef,
    Fault,
    Optional,
    Tagged,
    Tuple,
}

impl Convention {
    pub const ALL: [Self; 5] = [
        Self::Fault,
        Self::Optional,
        Self::Tagged,
        Self::ByRef,
        Self::Tuple,
    ];

    /// Stable name, used as the benchmark group suffix.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ByRef => "by_ref",
            Self::Fault => "fault",
            Self::Optional => "optional",
            Self::Tagged => "result",
            Self::Tuple => "tuple",
        }
    }

    /// Invoke this convention's caller once.
    ///
    /// Dispatches on every call; the timed loops in [`driver`](crate::driver) match once and call
    /// the concrete function instead.
    pub fn call<I, H>(self, injector: &mut I, handler: &mut H, bound: u32) -> f64
    where
        I: ErrorInjector,
        H: FailureHandler,
    {
        match self {
            Self::ByRef => call_by_ref(injector, handler, bound),
            Self::Fault => call_with_fault(injector, handler, bound),
            Self::Optional => call_with_option(injector, handler, bound),
            Self::Tagged => call_with_result(injector, handler, bound),
            Self::Tuple => call_with_tuple(injector, handler, bound),
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Convention {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, ConfigurationError> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|convention| convention.name() == name)
            .ok_or_else(|| ConfigurationError::UnknownConvention(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CyclicInjector, Tally};

    #[test]
    fn by_ref_leaves_slot_on_failure() {
        let mut injector = CyclicInjector::new(1).unwrap();
        let mut value = 42.0;
        assert_eq!(by_ref(&mut value, &mut injector, 10), Status::Fail);
        assert_eq!(value, 42.0);
    }

    #[test]
    fn raw_wrappers_report_failure() {
        let mut injector = CyclicInjector::new(1).unwrap();
        assert_eq!(with_option(&mut injector, 10), None);
        assert_eq!(with_result(&mut injector, 10), Err(ReasonCode::FAIL));
        assert_eq!(with_tuple(&mut injector, 10), (false, DEFAULT_VALUE));
        assert_eq!(
            fault::catch(|| with_fault(&mut injector, 10)),
            Err(fault::Fault {
                code: ReasonCode::FAIL
            })
        );
    }

    #[test]
    fn dispatch_matches_direct_call() {
        for convention in Convention::ALL {
            let mut injector = CyclicInjector::new(2).unwrap();
            let mut handler = Tally::new(crate::Ignore);
            let first = convention.call(&mut injector, &mut handler, 20);
            let second = convention.call(&mut injector, &mut handler, 20);
            assert_eq!(first, compute_sample(20), "{convention}");
            assert_eq!(second, DEFAULT_VALUE, "{convention}");
            assert_eq!(handler.failures, 1, "{convention}");
        }
    }

    #[test]
    fn names_round_trip() {
        for convention in Convention::ALL {
            assert_eq!(convention.name().parse(), Ok(convention));
        }
        assert_eq!(" result ".parse(), Ok(Convention::Tagged));
        assert_eq!(
            "exception".parse::<Convention>(),
            Err(ConfigurationError::UnknownConvention("exception".to_string()))
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(Status::Ok as i32, 0);
        assert_eq!(Status::Fail as i32, -1);
    }
}
