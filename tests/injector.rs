use errsig::{ConfigurationError, CyclicInjector, ErrorInjector, RandomInjector};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn failing_calls(injector: &mut impl ErrorInjector, calls: usize) -> Vec<usize> {
    (1..=calls).filter(|_| injector.should_fail()).collect()
}

#[test]
fn ratio_four_fails_on_fourth_and_eighth() {
    let mut injector = CyclicInjector::new(4).unwrap();
    assert_eq!(failing_calls(&mut injector, 8), [4, 8]);
}

#[test]
fn zero_ratio_is_a_configuration_error() {
    assert!(matches!(
        CyclicInjector::new(0),
        Err(ConfigurationError::ZeroRatio)
    ));
    assert!(matches!(
        RandomInjector::new(0),
        Err(ConfigurationError::ZeroRatio)
    ));
}

#[test]
fn seeded_random_injector_is_reproducible() {
    let mut a = RandomInjector::with_rng(5, StdRng::seed_from_u64(42)).unwrap();
    let mut b = RandomInjector::with_rng(5, StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(failing_calls(&mut a, 1000), failing_calls(&mut b, 1000));
}

#[test]
fn random_injector_rate_is_close_to_one_over_ratio() {
    let calls = 200_000;
    let mut injector = RandomInjector::with_rng(10, StdRng::seed_from_u64(7)).unwrap();
    let failures = failing_calls(&mut injector, calls).len();
    let rate = failures as f64 / calls as f64;
    assert!((rate - 0.1).abs() < 0.01, "rate {rate}");
}

proptest! {
    #[test]
    fn cyclic_fails_exactly_k_times_r_apart(ratio in 1u32..300, k in 0usize..20) {
        let mut injector = CyclicInjector::new(ratio).unwrap();
        let failures = failing_calls(&mut injector, ratio as usize * k);
        prop_assert_eq!(failures.len(), k);
        for (i, call) in failures.iter().enumerate() {
            prop_assert_eq!(*call, (i + 1) * ratio as usize);
        }
    }

    #[test]
    fn cyclic_pattern_repeats_after_reset(ratio in 1u32..64, calls in 0usize..500) {
        let mut injector = CyclicInjector::new(ratio).unwrap();
        let first = failing_calls(&mut injector, calls);
        injector.reset();
        prop_assert_eq!(failing_calls(&mut injector, calls), first);
    }
}
