use crate::compute_sample;
use std::hint::black_box;

/// What a caller does after observing a failure, whatever convention reported it.
pub trait FailureHandler {
    fn on_failure(&mut self);
}

impl<H: FailureHandler + ?Sized> FailureHandler for &mut H {
    #[inline]
    fn on_failure(&mut self) {
        (**self).on_failure()
    }
}

/// Redo the workload and throw the result away.
///
/// This keeps the failure path equally expensive for all conventions, so the only difference left
/// to measure is how the failure was reported.
#[derive(Clone, Copy, Debug)]
pub struct Recompute {
    pub bound: u32,
}

impl FailureHandler for Recompute {
    #[cold]
    fn on_failure(&mut self) {
        black_box(compute_sample(self.bound));
    }
}

/// Count failures, then forward to the inner handler.
#[derive(Clone, Debug, Default)]
pub struct Tally<H> {
    pub inner: H,
    pub failures: u64,
}

impl<H> Tally<H> {
    pub fn new(inner: H) -> Self {
        Self { inner, failures: 0 }
    }
}

impl<H: FailureHandler> FailureHandler for Tally<H> {
    #[inline]
    fn on_failure(&mut self) {
        self.failures += 1;
        self.inner.on_failure();
    }
}

/// Does nothing. Useful when only the signaling path itself should be timed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ignore;

impl FailureHandler for Ignore {
    #[inline]
    fn on_failure(&mut self) {}
}
