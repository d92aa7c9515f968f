use std::hint::black_box;

/// Number of harmonic terms computed per call unless configured otherwise.
pub const DEFAULT_BOUND: u32 = 100;

/// Partial harmonic sum `1 + 1/2 + ... + 1/(bound - 1)`.
///
/// The bound is routed through [`black_box`] so the loop cannot be folded into a constant, even
/// when the caller passes a literal. A bound of 0 or 1 sums nothing and yields `0.0`.
#[inline(never)]
pub fn compute_sample(bound: u32) -> f64 {
    let bound = black_box(bound);
    let mut sum = 0.0;
    for i in 1..bound {
        sum += 1.0 / f64::from(i);
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_bounds() {
        assert_eq!(compute_sample(0), 0.0);
        assert_eq!(compute_sample(1), 0.0);
        assert_eq!(compute_sample(2), 1.0);
        assert_eq!(compute_sample(4), 1.0 + 0.5 + 1.0 / 3.0);
    }

    #[test]
    fn deterministic() {
        assert_eq!(
            compute_sample(DEFAULT_BOUND).to_bits(),
            compute_sample(DEFAULT_BOUND).to_bits()
        );
        assert!((compute_sample(DEFAULT_BOUND) - 5.177_377_517_639_621).abs() < 1e-12);
    }
}
