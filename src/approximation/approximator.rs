use serde::{Deserialize, Serialize};

use crate::errors::{ApproximationError, Result};

use super::{
    refinement::RefinementScheme,
    seed::{SeedFunction, SEED_DOMAIN},
};

/// How to treat inputs outside of `SEED_DOMAIN`, where the seed functions
/// carry no accuracy guarantee.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainPolicy {
    /// Evaluate the seed formula anyway and return whatever the refinement
    /// produces. Precision degrades silently.
    Extrapolate,
    /// Evaluate the seed at the nearest point of the domain, then refine
    /// against the true input.
    ClampSeed,
    /// Refuse inputs outside the domain.
    Reject,
}

impl Default for DomainPolicy {
    fn default() -> Self {
        DomainPolicy::Extrapolate
    }
}

/**
 * Seed function composed with a fixed number of refinement steps. This is the
 * whole approximation: `approximate(a, n)` is the seed refined `n` times.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SqrtApproximator {
    #[serde(default)]
    pub seed: SeedFunction,
    #[serde(default)]
    pub scheme: RefinementScheme,
    #[serde(default)]
    pub policy: DomainPolicy,
}

impl SqrtApproximator {
    pub fn new(seed: SeedFunction, scheme: RefinementScheme, policy: DomainPolicy) -> Self {
        SqrtApproximator {
            seed,
            scheme,
            policy,
        }
    }

    /// Initial estimate for `a`, after applying the domain policy.
    pub fn seed_estimate(&self, a: f64) -> Result<f64> {
        if !a.is_finite() || a <= 0.0 {
            return Err(ApproximationError::InvalidInput(a));
        }
        let [lower, upper] = SEED_DOMAIN;
        let in_domain = (lower..=upper).contains(&a);
        let query = match self.policy {
            DomainPolicy::Extrapolate => a,
            DomainPolicy::ClampSeed => a.clamp(lower, upper),
            DomainPolicy::Reject if !in_domain => {
                return Err(ApproximationError::OutOfDomain {
                    value: a,
                    lower,
                    upper,
                })
            }
            DomainPolicy::Reject => a,
        };
        Ok(self.seed.evaluate(query))
    }

    /// Applies `steps` refinements to the seed.
    pub fn approximate(&self, a: f64, steps: u32) -> Result<f64> {
        let mut x = self.seed_estimate(a)?;
        for _ in 0..steps {
            x = self.scheme.step(x, a);
        }
        Ok(x)
    }

    /// The seed followed by every refined estimate: `steps + 1` values.
    pub fn iterates(&self, a: f64, steps: u32) -> Result<Vec<f64>> {
        let mut x = self.seed_estimate(a)?;
        let mut history = Vec::with_capacity(steps as usize + 1);
        history.push(x);
        for _ in 0..steps {
            x = self.scheme.step(x, a);
            history.push(x);
        }
        Ok(history)
    }

    pub fn label(&self, steps: u32) -> String {
        format!("{}+{}x{}", self.seed.label(), steps, self.scheme.label())
    }
}

/// Piecewise-linear seed refined `steps` times by Newton's method, with the
/// permissive domain policy.
pub fn approx_n(a: f64, steps: u32) -> Result<f64> {
    SqrtApproximator::default().approximate(a, steps)
}

/// One Newton refinement of the piecewise-linear seed.
pub fn x1(a: f64) -> Result<f64> {
    approx_n(a, 1)
}

/// Two Newton refinements of the piecewise-linear seed.
pub fn x2(a: f64) -> Result<f64> {
    approx_n(a, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approximation::{refinement::newton_step, seed::piecewise_linear_seed};
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_steps_returns_seed() {
        assert_eq!(approx_n(1.0, 0).unwrap(), 1.2);
        assert_eq!(approx_n(16.0, 0).unwrap(), piecewise_linear_seed(16.0));
    }

    #[test]
    fn test_composition_matches_manual_steps() {
        let a = 42.0;
        let manual = newton_step(newton_step(piecewise_linear_seed(a), a), a);
        assert_eq!(x2(a).unwrap(), manual);
        assert_eq!(x1(a).unwrap(), newton_step(piecewise_linear_seed(a), a));
    }

    #[test]
    fn test_iterates_history() {
        let history = SqrtApproximator::default().iterates(16.0, 3).unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0], 4.2);
        assert_eq!(history[3], approx_n(16.0, 3).unwrap());
        // Newton iterates decrease monotonically toward the root from above.
        for pair in history.windows(2) {
            assert!(pair[1] <= pair[0]);
            assert!(pair[1] >= 4.0);
        }
    }

    #[test]
    fn test_invalid_inputs_are_rejected_by_every_policy() {
        for policy in [
            DomainPolicy::Extrapolate,
            DomainPolicy::ClampSeed,
            DomainPolicy::Reject,
        ] {
            let approximator =
                SqrtApproximator::new(SeedFunction::PiecewiseLinear, RefinementScheme::Newton, policy);
            for bad in [0.0, -4.0, f64::NAN, f64::INFINITY] {
                assert!(matches!(
                    approximator.approximate(bad, 2),
                    Err(ApproximationError::InvalidInput(_))
                ));
            }
        }
    }

    #[test]
    fn test_extrapolate_is_best_effort() {
        // Far outside the domain the estimate is poor but finite.
        let x = approx_n(1.0e4, 2).unwrap();
        assert!(x.is_finite() && x > 0.0);
        assert!((x - 100.0).abs() > 1.0);
    }

    #[test]
    fn test_clamp_seed_policy() {
        let approximator = SqrtApproximator::new(
            SeedFunction::PiecewiseLinear,
            RefinementScheme::Newton,
            DomainPolicy::ClampSeed,
        );
        assert_eq!(approximator.seed_estimate(0.25).unwrap(), 1.2);
        assert_eq!(approximator.seed_estimate(400.0).unwrap(), 145.0 / 14.0);
        // Refinement still targets the true input.
        assert_relative_eq!(approximator.approximate(400.0, 6).unwrap(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reject_policy() {
        let approximator = SqrtApproximator::new(
            SeedFunction::PiecewiseLinear,
            RefinementScheme::Newton,
            DomainPolicy::Reject,
        );
        assert!(approximator.approximate(1.0, 2).is_ok());
        assert!(approximator.approximate(100.0, 2).is_ok());
        assert!(matches!(
            approximator.approximate(100.5, 2),
            Err(ApproximationError::OutOfDomain { .. })
        ));
        assert!(matches!(
            approximator.approximate(0.5, 2),
            Err(ApproximationError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_approximator_round_trips_through_json() {
        let parsed: SqrtApproximator = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, SqrtApproximator::default());

        let parsed: SqrtApproximator =
            serde_json::from_str(r#"{"seed": "Quadratic", "scheme": "FourthOrder", "policy": "Reject"}"#)
                .unwrap();
        assert_eq!(parsed.seed, SeedFunction::Quadratic);
        assert_eq!(parsed.scheme, RefinementScheme::FourthOrder);
        assert_eq!(parsed.policy, DomainPolicy::Reject);
    }
}
