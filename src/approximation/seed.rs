// Initial guesses for the square root iteration. All of them are cheap
// polynomial fits that are only accurate on `SEED_DOMAIN`.

use serde::{Deserialize, Serialize};

/// Range of inputs that the seed functions were tuned for.
pub const SEED_DOMAIN: [f64; 2] = [1.0, 100.0];

/// Upper end of the first linear piece of `piecewise_linear_seed`.
pub const PIECEWISE_BRANCH_POINT: f64 = 16.0;

/// Two-piece linear fit to `sqrt(a)` on [1, 100].
/// The coefficients were tuned by hand and must not be "simplified": the
/// measured precision of the refined estimates depends on them exactly.
#[inline]
pub fn piecewise_linear_seed(a: f64) -> f64 {
    if a <= PIECEWISE_BRANCH_POINT {
        (15.0 + 3.0 * a) / 15.0
    } else {
        (45.0 + a) / 14.0
    }
}

/// Hand-tuned quadratic fit to `sqrt(a)` on [1, 100].
#[inline]
pub fn quadratic_seed(a: f64) -> f64 {
    (12.5 + a) / 7.0 - a * a / 1800.0
}

/**
 * Polynomial seed `c[0] + c[1] a + c[2] a^2 + ...`, typically produced by the
 * least-squares fit in `least_squares::fit_polynomial`.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PolynomialSeed {
    pub coefficients: Vec<f64>,
}

impl PolynomialSeed {
    pub fn new(coefficients: Vec<f64>) -> PolynomialSeed {
        PolynomialSeed { coefficients }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn evaluate(&self, a: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * a + c)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum SeedFunction {
    PiecewiseLinear,
    Quadratic,
    Polynomial(PolynomialSeed),
}

impl Default for SeedFunction {
    fn default() -> Self {
        SeedFunction::PiecewiseLinear
    }
}

impl SeedFunction {
    pub fn evaluate(&self, a: f64) -> f64 {
        match self {
            SeedFunction::PiecewiseLinear => piecewise_linear_seed(a),
            SeedFunction::Quadratic => quadratic_seed(a),
            SeedFunction::Polynomial(polynomial) => polynomial.evaluate(a),
        }
    }

    pub fn label(&self) -> String {
        match self {
            SeedFunction::PiecewiseLinear => "piecewise-linear".to_owned(),
            SeedFunction::Quadratic => "quadratic".to_owned(),
            SeedFunction::Polynomial(p) => format!("polynomial-deg{}", p.degree()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use iter_num_tools::lin_space;

    #[test]
    fn test_piecewise_linear_seed_known_values() {
        let tol = 1e-12;
        assert_relative_eq!(piecewise_linear_seed(1.0), 1.2, epsilon = tol);
        assert_relative_eq!(piecewise_linear_seed(16.0), 4.2, epsilon = tol);
        assert_relative_eq!(piecewise_linear_seed(25.0), 5.0, epsilon = tol);
        assert_relative_eq!(piecewise_linear_seed(100.0), 145.0 / 14.0, epsilon = tol);
    }

    #[test]
    fn test_piecewise_linear_seed_branch_is_inclusive() {
        // Exactly at the branch point we must use the first piece.
        assert_eq!(piecewise_linear_seed(16.0), 63.0 / 15.0);
        let above = 16.0 + 1e-9;
        assert_eq!(piecewise_linear_seed(above), (45.0 + above) / 14.0);
    }

    #[test]
    fn test_seeds_are_positive_and_close_on_domain() {
        for a in lin_space(SEED_DOMAIN[0]..=SEED_DOMAIN[1], 397) {
            let x0 = piecewise_linear_seed(a);
            assert!(x0 > 0.0);
            // Relative seed error is at most 20% (worst at a = 1).
            assert!((x0 - a.sqrt()).abs() <= 0.2 * a.sqrt() + 1e-12);
            assert!(quadratic_seed(a) > 0.0);
        }
    }

    #[test]
    fn test_polynomial_seed_horner() {
        let p = PolynomialSeed::new(vec![1.0, -2.0, 0.5]);
        assert_eq!(p.degree(), 2);
        assert_relative_eq!(p.evaluate(3.0), 1.0 - 6.0 + 4.5, epsilon = 1e-12);
        assert_eq!(PolynomialSeed::new(vec![]).evaluate(7.0), 0.0);
    }

    #[test]
    fn test_seed_function_dispatch() {
        let quadratic_as_polynomial =
            SeedFunction::Polynomial(PolynomialSeed::new(vec![12.5 / 7.0, 1.0 / 7.0, -1.0 / 1800.0]));
        for a in [1.0, 9.5, 50.0, 100.0] {
            assert_eq!(SeedFunction::PiecewiseLinear.evaluate(a), piecewise_linear_seed(a));
            assert_relative_eq!(
                quadratic_as_polynomial.evaluate(a),
                SeedFunction::Quadratic.evaluate(a),
                epsilon = 1e-12
            );
        }
    }
}
