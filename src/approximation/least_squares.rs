use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::errors::{ApproximationError, Result};

use super::{
    precision::{sample_inputs, validate_sampling, MAX_SAMPLE_COUNT},
    seed::PolynomialSeed,
};

/// Singular values below this are treated as zero by the SVD solve.
const SVD_EPSILON: f64 = 1e-14;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SeedFitParams {
    pub domain: [f64; 2],
    pub sample_count: usize,
    pub degree: usize,
}

/**
 * Least-squares polynomial fit of `target` over `sample_count` uniformly spaced
 * points on `domain`. The system `V c = y` is built from the Vandermonde
 * matrix `V[i][j] = a_i^j` and solved with an SVD, which stays robust
 * when the columns are badly scaled (a^2 spans four orders of magnitude on [1, 100]).
 */
pub fn fit_polynomial<F>(
    domain: [f64; 2],
    sample_count: usize,
    degree: usize,
    target: F,
) -> Result<PolynomialSeed>
where
    F: Fn(f64) -> f64,
{
    if sample_count <= degree {
        return Err(ApproximationError::FitFailed(format!(
            "{} samples cannot determine a degree {} polynomial",
            sample_count, degree
        )));
    }
    validate_sampling(domain, sample_count, 2).map_err(ApproximationError::FitFailed)?;
    let matrix_size = sample_count.checked_mul(degree + 1);
    if !matches!(matrix_size, Some(size) if size <= MAX_SAMPLE_COUNT) {
        return Err(ApproximationError::FitFailed(format!(
            "a {} x {} Vandermonde matrix is too large",
            sample_count,
            degree + 1
        )));
    }

    let inputs = sample_inputs(domain, sample_count);
    let vandermonde = DMatrix::from_fn(sample_count, degree + 1, |i, j| inputs[i].powi(j as i32));
    let values = DVector::from_iterator(sample_count, inputs.iter().map(|&a| target(a)));

    let coefficients = vandermonde
        .svd(true, true)
        .solve(&values, SVD_EPSILON)
        .map_err(|msg| ApproximationError::FitFailed(msg.to_owned()))?;

    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(ApproximationError::FitFailed(
            "solution contains non-finite coefficients".to_owned(),
        ));
    }

    Ok(PolynomialSeed::new(coefficients.iter().copied().collect()))
}

/// Fits a polynomial seed to `sqrt` with the given parameters.
pub fn fit_sqrt_seed(params: &SeedFitParams) -> Result<PolynomialSeed> {
    fit_polynomial(params.domain, params.sample_count, params.degree, f64::sqrt)
}

/// Largest |seed(a) - sqrt(a)| over the sampled domain.
pub fn max_abs_error(
    seed: &PolynomialSeed,
    domain: [f64; 2],
    sample_count: usize,
) -> Result<f64> {
    validate_sampling(domain, sample_count, 2).map_err(ApproximationError::FitFailed)?;
    Ok(sample_inputs(domain, sample_count)
        .into_iter()
        .map(|a| (seed.evaluate(a) - a.sqrt()).abs())
        .fold(0.0, f64::max))
}
