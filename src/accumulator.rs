//! The extended scenario: a mean over collected samples.
//!
//! An iteration fills a fresh [`MeanAccumulator`] unless the injector fires, then asks for the mean
//! through one of the five conventions. An empty accumulator is the failure condition.

use crate::{fault, Convention, ErrorInjector, FailureHandler, ReasonCode, Status, DEFAULT_VALUE};
use std::hint::black_box;
use std::num::NonZeroUsize;

/// Samples added per iteration unless configured otherwise.
pub const DEFAULT_FILL: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(fill) => fill,
    None => panic!("default fill must be non-zero"),
};

#[derive(Clone, Debug, Default)]
pub struct MeanAccumulator {
    samples: Vec<f64>,
}

impl MeanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, sample: f64) {
        self.samples.push(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    // Callers have checked for emptiness.
    fn mean(&self) -> f64 {
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    #[inline(never)]
    pub fn by_ref(&self, result: &mut f64) -> Status {
        if self.samples.is_empty() {
            return Status::Fail;
        }
        *result = self.mean();
        Status::Ok
    }

    /// Unwinds with [`ReasonCode::FAIL`] when there is nothing to average.
    #[inline(never)]
    pub fn with_fault(&self) -> f64 {
        if self.samples.is_empty() {
            fault::raise(ReasonCode::FAIL);
        }
        self.mean()
    }

    #[inline(never)]
    pub fn with_option(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.mean())
    }

    #[inline(never)]
    pub fn with_result(&self) -> Result<f64, ReasonCode> {
        if self.samples.is_empty() {
            return Err(ReasonCode::FAIL);
        }
        Ok(self.mean())
    }

    #[inline(never)]
    pub fn with_tuple(&self) -> (bool, f64) {
        if self.samples.is_empty() {
            return (false, DEFAULT_VALUE);
        }
        (true, self.mean())
    }
}

/// Add `0, 1, .., count - 1` to `acc` unless the injector says this iteration fails.
///
/// Returns whether the samples were added. Each sample passes through [`black_box`] so the loop is
/// not collapsed.
pub fn fill<I: ErrorInjector>(
    acc: &mut MeanAccumulator,
    injector: &mut I,
    count: NonZeroUsize,
) -> bool {
    if !injector.ok() {
        return false;
    }
    for i in 0..count.get() {
        acc.add(black_box(i) as f64);
    }
    true
}

pub fn mean_by_ref<H: FailureHandler>(acc: &MeanAccumulator, handler: &mut H) -> f64 {
    let mut value = DEFAULT_VALUE;
    if acc.by_ref(&mut value) == Status::Ok {
        value
    } else {
        handler.on_failure();
        DEFAULT_VALUE
    }
}

pub fn mean_with_fault<H: FailureHandler>(acc: &MeanAccumulator, handler: &mut H) -> f64 {
    fault::catch(|| acc.with_fault()).unwrap_or_else(|_| {
        handler.on_failure();
        DEFAULT_VALUE
    })
}

pub fn mean_with_option<H: FailureHandler>(acc: &MeanAccumulator, handler: &mut H) -> f64 {
    acc.with_option().unwrap_or_else(|| {
        handler.on_failure();
        DEFAULT_VALUE
    })
}

pub fn mean_with_result<H: FailureHandler>(acc: &MeanAccumulator, handler: &mut H) -> f64 {
    acc.with_result().unwrap_or_else(|_| {
        handler.on_failure();
        DEFAULT_VALUE
    })
}

pub fn mean_with_tuple<H: FailureHandler>(acc: &MeanAccumulator, handler: &mut H) -> f64 {
    match acc.with_tuple() {
        (true, value) => value,
        (false, _) => {
            handler.on_failure();
            DEFAULT_VALUE
        }
    }
}

impl Convention {
    /// Take the mean of `acc` through this convention's caller.
    pub fn call_mean<H: FailureHandler>(self, acc: &MeanAccumulator, handler: &mut H) -> f64 {
        match self {
            Self::ByRef => mean_by_ref(acc, handler),
            Self::Fault => mean_with_fault(acc, handler),
            Self::Optional => mean_with_option(acc, handler),
            Self::Tagged => mean_with_result(acc, handler),
            Self::Tuple => mean_with_tuple(acc, handler),
        }
    }
}
