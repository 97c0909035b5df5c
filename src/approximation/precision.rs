//! Precision diagnostics: how many decimal digits of `x^2 == a` an estimate
//! gets right, evaluated over a sampled range of inputs.

use iter_num_tools::lin_space;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{ApproximationError, Result};

use super::approximator::SqrtApproximator;

/// |a - x^2|
#[inline]
pub fn residual(a: f64, x: f64) -> f64 {
    (a - x * x).abs()
}

/// Number of correct decimal digits, -log10(|a - x^2|). An exact estimate
/// yields `+inf`.
#[inline]
pub fn correct_digits(a: f64, x: f64) -> f64 {
    -residual(a, x).log10()
}

/// Sample count used by the convergence study when none is given: two
/// samples per unit of input.
pub fn default_sample_count(domain: [f64; 2]) -> usize {
    (2.0 * (domain[1] - domain[0]).abs()).round().max(2.0) as usize
}

/// Upper limit on the number of samples in one sweep or fit.
pub const MAX_SAMPLE_COUNT: usize = 50_000_000;

/// Checks that `domain` is finite and increasing and that `sample_count` is
/// in `[min_count, MAX_SAMPLE_COUNT]`.
pub fn validate_sampling(
    domain: [f64; 2],
    sample_count: usize,
    min_count: usize,
) -> std::result::Result<(), String> {
    if !domain[0].is_finite() || !domain[1].is_finite() {
        return Err(format!(
            "domain must be finite, got [{}, {}]",
            domain[0], domain[1]
        ));
    }
    if !(domain[0] < domain[1]) {
        return Err(format!(
            "domain must be increasing, got [{}, {}]",
            domain[0], domain[1]
        ));
    }
    if sample_count < min_count || sample_count > MAX_SAMPLE_COUNT {
        return Err(format!(
            "sample count must be in [{}, {}], got {}",
            min_count, MAX_SAMPLE_COUNT, sample_count
        ));
    }
    Ok(())
}

/// `sample_count` uniformly spaced inputs on `domain`. The endpoints are
/// exactly `domain[0]` and `domain[1]`.
pub fn sample_inputs(domain: [f64; 2], sample_count: usize) -> Vec<f64> {
    let mut inputs: Vec<f64> = lin_space(domain[0]..=domain[1], sample_count).collect();
    if let Some(first) = inputs.first_mut() {
        *first = domain[0];
    }
    if let Some(last) = inputs.last_mut() {
        *last = domain[1];
    }
    inputs
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PrecisionSample {
    pub a: f64,
    pub estimate: f64,
    pub residual: f64,
    pub correct_digits: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PrecisionSummary {
    pub min_digits: f64,
    pub min_digits_at: f64,
    pub max_digits: f64,
    pub mean_digits: f64,
    pub max_residual: f64,
}

/**
 * Precision of one approximator (with a fixed step count) at uniformly spaced
 * inputs. Samples are evaluated in parallel and stored in ascending `a`.
 */
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PrecisionSweep {
    pub label: String,
    pub steps: u32,
    pub domain: [f64; 2],
    pub samples: Vec<PrecisionSample>,
}

impl PrecisionSweep {
    pub fn run(
        approximator: &SqrtApproximator,
        domain: [f64; 2],
        sample_count: usize,
        steps: u32,
    ) -> Result<PrecisionSweep> {
        validate_sampling(domain, sample_count, 2).map_err(ApproximationError::InvalidSweep)?;

        let inputs = sample_inputs(domain, sample_count);
        let samples = inputs
            .par_iter()
            .map(|&a| -> Result<PrecisionSample> {
                let estimate = approximator.approximate(a, steps)?;
                Ok(PrecisionSample {
                    a,
                    estimate,
                    residual: residual(a, estimate),
                    correct_digits: correct_digits(a, estimate),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PrecisionSweep {
            label: approximator.label(steps),
            steps,
            domain,
            samples,
        })
    }

    pub fn summary(&self) -> PrecisionSummary {
        let worst = self
            .samples
            .iter()
            .min_by_key(|s| OrderedFloat(s.correct_digits));
        let max_digits = self
            .samples
            .iter()
            .map(|s| OrderedFloat(s.correct_digits))
            .max()
            .map_or(f64::NAN, |d| d.0);
        let max_residual = self
            .samples
            .iter()
            .map(|s| OrderedFloat(s.residual))
            .max()
            .map_or(f64::NAN, |r| r.0);

        let finite: Vec<f64> = self
            .samples
            .iter()
            .map(|s| s.correct_digits)
            .filter(|d| d.is_finite())
            .collect();
        let mean_digits = if finite.is_empty() {
            f64::INFINITY
        } else {
            finite.iter().sum::<f64>() / finite.len() as f64
        };

        PrecisionSummary {
            min_digits: worst.map_or(f64::NAN, |s| s.correct_digits),
            min_digits_at: worst.map_or(f64::NAN, |s| s.a),
            max_digits,
            mean_digits,
            max_residual,
        }
    }

    /// (a, digits) pairs, ready to be handed to the plotter.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.samples.iter().map(|s| [s.a, s.correct_digits]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_residual_and_digits() {
        assert_eq!(residual(4.0, 2.0), 0.0);
        assert_eq!(correct_digits(4.0, 2.0), f64::INFINITY);
        assert_relative_eq!(residual(2.0, 1.5), 0.25, epsilon = 1e-15);
        assert_relative_eq!(correct_digits(1.0, 1.1), -(0.21_f64).log10(), epsilon = 1e-12);
        assert_relative_eq!(correct_digits(100.0, (100.0_f64 - 1e-3).sqrt()), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_default_sample_count() {
        assert_eq!(default_sample_count([1.0, 100.0]), 198);
        assert_eq!(default_sample_count([100.0, 1.0]), 198);
        assert_eq!(default_sample_count([3.0, 3.0]), 2);
    }

    #[test]
    fn test_sweep_rejects_bad_configuration() {
        let approximator = SqrtApproximator::default();
        assert!(PrecisionSweep::run(&approximator, [1.0, 100.0], 1, 1).is_err());
        assert!(PrecisionSweep::run(&approximator, [100.0, 1.0], 10, 1).is_err());
        assert!(PrecisionSweep::run(&approximator, [5.0, 5.0], 10, 1).is_err());
        assert!(PrecisionSweep::run(&approximator, [1.0, f64::INFINITY], 10, 1).is_err());
        assert!(PrecisionSweep::run(&approximator, [f64::NEG_INFINITY, 1.0], 10, 1).is_err());
        assert!(PrecisionSweep::run(&approximator, [1.0, 100.0], MAX_SAMPLE_COUNT + 1, 1).is_err());
    }

    #[test]
    fn test_default_sample_count_of_huge_domain_is_rejected() {
        let domain = [1.0, 1.0e300];
        let count = default_sample_count(domain);
        assert!(PrecisionSweep::run(&SqrtApproximator::default(), domain, count, 1).is_err());
    }

    #[test]
    fn test_sample_inputs_hit_endpoints_exactly() {
        for n in 2..2000 {
            let inputs = sample_inputs([1.0, 100.0], n);
            assert_eq!(inputs.len(), n);
            assert_eq!(inputs[0], 1.0);
            assert_eq!(inputs[n - 1], 100.0);
        }
    }

    #[test]
    fn test_sweep_samples_are_ordered_and_span_domain() {
        let sweep = PrecisionSweep::run(&SqrtApproximator::default(), [1.0, 100.0], 198, 1).unwrap();
        assert_eq!(sweep.samples.len(), 198);
        assert_eq!(sweep.samples.first().unwrap().a, 1.0);
        assert_eq!(sweep.samples.last().unwrap().a, 100.0);
        for pair in sweep.samples.windows(2) {
            assert!(pair[0].a < pair[1].a);
        }
        assert_eq!(sweep.points().len(), 198);
    }

    #[test]
    fn test_summary_of_single_newton_step() {
        let sweep = PrecisionSweep::run(&SqrtApproximator::default(), [1.0, 100.0], 198, 1).unwrap();
        let summary = sweep.summary();
        // Worst case is at the upper end of the domain, with about 0.9 digits.
        assert_relative_eq!(summary.min_digits_at, 100.0, epsilon = 1e-9);
        assert!(summary.min_digits > 0.8 && summary.min_digits < 1.0);
        assert!(summary.max_residual < 0.2);
        assert!(summary.mean_digits > summary.min_digits);
        assert!(summary.max_digits >= summary.mean_digits);
    }

    #[test]
    fn test_sweep_propagates_domain_errors() {
        use crate::approximation::{
            approximator::DomainPolicy, refinement::RefinementScheme, seed::SeedFunction,
        };
        let approximator = SqrtApproximator::new(
            SeedFunction::PiecewiseLinear,
            RefinementScheme::Newton,
            DomainPolicy::Reject,
        );
        assert!(PrecisionSweep::run(&approximator, [1.0, 100.0], 50, 2).is_ok());
        assert!(PrecisionSweep::run(&approximator, [0.5, 100.0], 50, 2).is_err());
    }

    #[test]
    fn test_reject_policy_accepts_every_sweep_of_its_own_domain() {
        use crate::approximation::{
            approximator::DomainPolicy, refinement::RefinementScheme, seed::SeedFunction,
            seed::SEED_DOMAIN,
        };
        let approximator = SqrtApproximator::new(
            SeedFunction::PiecewiseLinear,
            RefinementScheme::Newton,
            DomainPolicy::Reject,
        );
        for n in 2..2000 {
            let sweep = PrecisionSweep::run(&approximator, SEED_DOMAIN, n, 1);
            assert!(sweep.is_ok(), "sample count {} failed: {:?}", n, sweep.err());
        }
    }
}
