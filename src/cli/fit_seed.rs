use crate::approximation::{
    approximator::{DomainPolicy, SqrtApproximator},
    least_squares::{fit_sqrt_seed, max_abs_error, SeedFitParams},
    precision::PrecisionSweep,
    refinement::RefinementScheme,
    seed::SeedFunction,
};
use crate::core::file_io::{serialize_to_json, FilePrefix};
use crate::errors::Result;

/// Fits a polynomial seed to `sqrt`, reports how well it refines, and writes
/// the seed to `<base>_seed.json` in a form that parameter files can embed.
pub fn fit_seed(params: &SeedFitParams, file_prefix: &FilePrefix) -> Result<SeedFunction> {
    serialize_to_json(&file_prefix.with_suffix(".json"), params)?;

    let polynomial = fit_sqrt_seed(params)?;
    tracing::info!(
        "Fitted degree {} seed on [{}, {}]: coefficients {:?}",
        polynomial.degree(),
        params.domain[0],
        params.domain[1],
        polynomial.coefficients
    );
    tracing::info!(
        "Max |seed(a) - sqrt(a)|: {:.6}",
        max_abs_error(&polynomial, params.domain, params.sample_count)?
    );

    let seed = SeedFunction::Polynomial(polynomial);
    let approximator = SqrtApproximator::new(
        seed.clone(),
        RefinementScheme::Newton,
        DomainPolicy::Extrapolate,
    );
    for steps in 1..=2 {
        match PrecisionSweep::run(&approximator, params.domain, params.sample_count, steps) {
            Ok(sweep) => {
                let summary = sweep.summary();
                tracing::info!(
                    "{} Newton step(s): min digits {:.3} at a = {}",
                    steps,
                    summary.min_digits,
                    summary.min_digits_at
                );
            }
            // Fit domains that reach zero cannot be swept.
            Err(err) => tracing::warn!("Unable to evaluate fitted seed: {}", err),
        }
    }

    serialize_to_json(&file_prefix.with_suffix("_seed.json"), &seed)?;
    Ok(seed)
}
