//! Adoption Curve
//!
//! Maps an agent's cumulative exposure count to the probability that this
//! exposure turns into a re-share. The curve rises with the first few
//! exposures (the linear factor) and then decays (the exponential factor),
//! so heavily saturated agents stop amplifying.

use serde::{Deserialize, Serialize};

/// Default scaling factor. Empirically somewhere between 0.1 and 0.5.
pub const DEFAULT_ALPHA: f64 = 0.3;
/// Default per-exposure decay.
pub const DEFAULT_GAMMA: f64 = 0.23;
/// Default exponent applied to the exposure count inside the decay term.
pub const DEFAULT_OMEGA: f64 = 1.0;
/// Default probability that a re-sharing agent fact-checks instead.
pub const DEFAULT_FACT_CHECK_PROBABILITY: f64 = 0.01;

/// Shape parameters of the exposure-to-adoption curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdoptionCurve {
    pub alpha: f64,
    pub gamma: f64,
    pub omega: f64,
}

impl Default for AdoptionCurve {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            gamma: DEFAULT_GAMMA,
            omega: DEFAULT_OMEGA,
        }
    }
}

impl AdoptionCurve {
    pub fn new(alpha: f64, gamma: f64, omega: f64) -> Self {
        Self { alpha, gamma, omega }
    }

    /// Probability of re-sharing after `exposures` total exposures.
    ///
    /// Computes `alpha * x * (1 - gamma)^(x^omega)`. The raw formula is not
    /// bounded for every parameter choice (e.g. `gamma = 0` makes it grow
    /// linearly in `x`), so the result is clamped to `[0, 1]` before being
    /// used as a probability.
    pub fn probability(&self, exposures: u32) -> f64 {
        let x = exposures as f64;
        let raw = self.alpha * x * (1.0 - self.gamma).powf(x.powf(self.omega));
        raw.clamp(0.0, 1.0)
    }
}

/// Everything the spreading step needs to know about agent psychology:
/// the adoption curve plus the chance that a re-share turns into a
/// fact-check instead of a repeat of what was seen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadParams {
    pub adoption: AdoptionCurve,
    pub fact_check_probability: f64,
}

impl Default for SpreadParams {
    fn default() -> Self {
        Self {
            adoption: AdoptionCurve::default(),
            fact_check_probability: DEFAULT_FACT_CHECK_PROBABILITY,
        }
    }
}

impl SpreadParams {
    /// Parameters that make every exposure an adoption and never a
    /// fact-check. Handy for deterministic cascade tests.
    pub fn always_adopt() -> Self {
        Self {
            adoption: AdoptionCurve::new(1.0, 0.0, 1.0),
            fact_check_probability: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_exposures_is_zero_probability() {
        assert_eq!(AdoptionCurve::default().probability(0), 0.0);
        assert_eq!(AdoptionCurve::new(5.0, 0.9, 2.0).probability(0), 0.0);
    }

    #[test]
    fn test_curve_rises_then_decays() {
        let curve = AdoptionCurve::default();
        let p1 = curve.probability(1);
        let p3 = curve.probability(3);
        let p30 = curve.probability(30);
        assert!(p1 > 0.0);
        assert!(p3 > p1, "early exposures should raise the probability");
        assert!(p30 < p1, "late exposures should have decayed well below the peak");
    }

    #[test]
    fn test_unbounded_parameters_are_clamped() {
        // gamma = 0 removes the decay term entirely, so the raw formula is
        // alpha * x and exceeds 1 quickly.
        let curve = AdoptionCurve::new(1.0, 0.0, 1.0);
        assert_eq!(curve.probability(1), 1.0);
        assert_eq!(curve.probability(10), 1.0);

        let aggressive = AdoptionCurve::new(2.0, 0.23, 1.0);
        for x in 0..50 {
            let p = aggressive.probability(x);
            assert!((0.0..=1.0).contains(&p), "p({}) = {} out of range", x, p);
        }
    }

    #[test]
    fn test_default_parameters_stay_in_range() {
        let curve = AdoptionCurve::default();
        for x in 0..200 {
            let p = curve.probability(x);
            assert!((0.0..=1.0).contains(&p), "p({}) = {} out of range", x, p);
        }
    }
}
