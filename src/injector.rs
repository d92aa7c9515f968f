use crate::ConfigurationError;
use rand::rngs::ThreadRng;
use rand::RngCore;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use tracing::debug;

/// A validated failure ratio: one failure every `N` calls, `N >= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ratio(NonZeroU32);

impl Ratio {
    /// Validate a raw ratio.
    ///
    /// ```
    /// use errsig::{ConfigurationError, Ratio};
    ///
    /// assert_eq!(Ratio::new(4).unwrap().get(), 4);
    /// assert_eq!(Ratio::new(0), Err(ConfigurationError::ZeroRatio));
    /// ```
    pub fn new(raw: u32) -> Result<Self, ConfigurationError> {
        match NonZeroU32::new(raw) {
            Some(ratio) => Ok(Self(ratio)),
            None => Err(ConfigurationError::ZeroRatio),
        }
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<i64> for Ratio {
    type Error = ConfigurationError;

    fn try_from(raw: i64) -> Result<Self, ConfigurationError> {
        if raw < 0 {
            return Err(ConfigurationError::NegativeRatio(raw));
        }
        let raw = u32::try_from(raw).map_err(|_| ConfigurationError::RatioOutOfRange(raw))?;
        Self::new(raw)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Decides, per call, whether the call should report failure.
///
/// Implementations are mutated only by the thread running the benchmark loop.
pub trait ErrorInjector {
    /// Consult the injector once. Every call advances its state.
    fn should_fail(&mut self) -> bool;

    /// The configured failure ratio.
    fn ratio(&self) -> Ratio;

    /// Return to the state right after construction.
    fn reset(&mut self);

    #[inline]
    fn ok(&mut self) -> bool {
        !self.should_fail()
    }
}

impl<I: ErrorInjector + ?Sized> ErrorInjector for &mut I {
    #[inline]
    fn should_fail(&mut self) -> bool {
        (**self).should_fail()
    }

    fn ratio(&self) -> Ratio {
        (**self).ratio()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Fails exactly every `ratio`-th call.
///
/// ```
/// use errsig::{CyclicInjector, ErrorInjector};
///
/// let mut injector = CyclicInjector::new(4).unwrap();
/// let pattern: Vec<bool> = (0..8).map(|_| injector.should_fail()).collect();
/// assert_eq!(pattern, [false, false, false, true, false, false, false, true]);
/// ```
#[derive(Clone, Debug)]
pub struct CyclicInjector {
    ratio: Ratio,
    count: u32,
}

impl CyclicInjector {
    pub fn new(ratio: u32) -> Result<Self, ConfigurationError> {
        Ok(Self::with_ratio(Ratio::new(ratio)?))
    }

    pub fn with_ratio(ratio: Ratio) -> Self {
        debug!(%ratio, "cyclic injector created");
        Self { ratio, count: 0 }
    }
}

impl ErrorInjector for CyclicInjector {
    #[inline]
    fn should_fail(&mut self) -> bool {
        self.count += 1;
        if self.count == self.ratio.get() {
            self.count = 0;
            true
        } else {
            false
        }
    }

    fn ratio(&self) -> Ratio {
        self.ratio
    }

    fn reset(&mut self) {
        debug!(ratio = %self.ratio, discarded = self.count, "cyclic injector reset");
        self.count = 0;
    }
}

/// Fails with probability `1 / ratio`, drawing from `R`.
///
/// By default the thread-local generator is used and nothing is seeded, so two runs see different
/// failure sequences. Pass a seeded generator to [`with_rng`](Self::with_rng) when a test needs a
/// reproducible one.
#[derive(Clone, Debug)]
pub struct RandomInjector<R = ThreadRng> {
    ratio: Ratio,
    rng: R,
}

impl RandomInjector {
    pub fn new(ratio: u32) -> Result<Self, ConfigurationError> {
        Ok(Self::with_ratio(Ratio::new(ratio)?))
    }

    pub fn with_ratio(ratio: Ratio) -> Self {
        Self::from_parts(ratio, rand::rng())
    }
}

impl<R: RngCore> RandomInjector<R> {
    pub fn with_rng(ratio: u32, rng: R) -> Result<Self, ConfigurationError> {
        Ok(Self::from_parts(Ratio::new(ratio)?, rng))
    }

    pub fn from_parts(ratio: Ratio, rng: R) -> Self {
        debug!(%ratio, "random injector created");
        Self { ratio, rng }
    }
}

impl<R: RngCore> ErrorInjector for RandomInjector<R> {
    #[inline]
    fn should_fail(&mut self) -> bool {
        self.rng.next_u32() % self.ratio.get() == 0
    }

    fn ratio(&self) -> Ratio {
        self.ratio
    }

    // The generator carries no per-configuration state worth rewinding.
    fn reset(&mut self) {}
}

/// Which injector a benchmark configuration uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InjectionMode {
    Cyclic,
    Random,
}

impl InjectionMode {
    pub fn build(self, ratio: Ratio) -> AnyInjector {
        match self {
            Self::Cyclic => AnyInjector::Cyclic(CyclicInjector::with_ratio(ratio)),
            Self::Random => AnyInjector::Random(RandomInjector::with_ratio(ratio)),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Cyclic => "cyclic",
            Self::Random => "random",
        }
    }
}

impl FromStr for InjectionMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, ConfigurationError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cyclic" | "deterministic" => Ok(Self::Cyclic),
            "random" | "probabilistic" => Ok(Self::Random),
            _ => Err(ConfigurationError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for InjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An injector whose mode is picked at runtime.
#[derive(Clone, Debug)]
pub enum AnyInjector {
    Cyclic(CyclicInjector),
    Random(RandomInjector),
}

impl ErrorInjector for AnyInjector {
    #[inline]
    fn should_fail(&mut self) -> bool {
        match self {
            Self::Cyclic(injector) => injector.should_fail(),
            Self::Random(injector) => injector.should_fail(),
        }
    }

    fn ratio(&self) -> Ratio {
        match self {
            Self::Cyclic(injector) => injector.ratio(),
            Self::Random(injector) => injector.ratio(),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Cyclic(injector) => injector.reset(),
            Self::Random(injector) => injector.reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ratio_rejects_bad_values() {
        assert_eq!(Ratio::try_from(0i64), Err(ConfigurationError::ZeroRatio));
        assert_eq!(
            Ratio::try_from(-3i64),
            Err(ConfigurationError::NegativeRatio(-3))
        );
        assert_eq!(
            Ratio::try_from(1i64 << 40),
            Err(ConfigurationError::RatioOutOfRange(1 << 40))
        );
        assert_eq!(Ratio::try_from(2048i64).unwrap().get(), 2048);
    }

    #[test]
    fn zero_ratio_rejected_in_both_modes() {
        assert_eq!(
            CyclicInjector::new(0).unwrap_err(),
            ConfigurationError::ZeroRatio
        );
        assert_eq!(
            RandomInjector::new(0).unwrap_err(),
            ConfigurationError::ZeroRatio
        );
        assert!(RandomInjector::with_rng(0, StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn ok_is_the_inverse_of_should_fail() {
        let mut injector = CyclicInjector::new(2).unwrap();
        assert!(injector.ok());
        assert!(!injector.ok());
        assert!(injector.ok());
    }

    #[test]
    fn ratio_one_always_fails() {
        let mut cyclic = CyclicInjector::new(1).unwrap();
        let mut random = RandomInjector::new(1).unwrap();
        for _ in 0..100 {
            assert!(cyclic.should_fail());
            assert!(random.should_fail());
        }
    }

    #[test]
    fn reset_restarts_cycle() {
        let mut injector = CyclicInjector::new(3).unwrap();
        assert!(!injector.should_fail());
        assert!(!injector.should_fail());
        injector.reset();
        assert!(!injector.should_fail());
        assert!(!injector.should_fail());
        assert!(injector.should_fail());
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("cyclic".parse::<InjectionMode>(), Ok(InjectionMode::Cyclic));
        assert_eq!(" Random ".parse::<InjectionMode>(), Ok(InjectionMode::Random));
        assert_eq!(
            "sometimes".parse::<InjectionMode>(),
            Err(ConfigurationError::UnknownMode("sometimes".to_string()))
        );
    }

    #[test]
    fn any_injector_delegates() {
        let ratio = Ratio::new(2).unwrap();
        let mut injector = InjectionMode::Cyclic.build(ratio);
        assert_eq!(injector.ratio(), ratio);
        assert!(!injector.should_fail());
        assert!(injector.should_fail());
        assert!(matches!(
            InjectionMode::Random.build(ratio),
            AnyInjector::Random(_)
        ));
    }
}
