use num_traits::Float;
use serde::{Deserialize, Serialize};

/// One Newton-Raphson step for the root of f(t) = t^2 - a:
///
/// x' = x - f(x) / f'(x) = x - (x^2 - a) / (2 x) = (x + a / x) / 2
///
/// Convergence is quadratic once `x` is close to `sqrt(a)`. The caller must
/// guarantee `x != 0`.
#[inline]
pub fn newton_step<T: Float>(x: T, a: T) -> T {
    let two = T::one() + T::one();
    (x + a / x) / two
}

/// Fourth-order update for `sqrt(a)`:
///
/// x' = -(1/16) x^3 / a + (9/16) (x + a / x) - (1/16) a^2 / x^3
///
/// Roughly 3 correct digits after one step from the piecewise seed and 12
/// after two, at about twice the arithmetic cost of `newton_step`.
#[inline]
pub fn fourth_order_step<T: Float>(x: T, a: T) -> T {
    // Small integers are exact in every float type, so build them from one.
    let two = T::one() + T::one();
    let four = two * two;
    let nine = four + four + T::one();
    let sixteen = four * four;
    let x3 = x * x * x;
    (nine * (x + a / x) - x3 / a - a * a / x3) / sixteen
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinementScheme {
    Newton,
    FourthOrder,
}

impl Default for RefinementScheme {
    fn default() -> Self {
        RefinementScheme::Newton
    }
}

impl RefinementScheme {
    #[inline]
    pub fn step(&self, x: f64, a: f64) -> f64 {
        match self {
            RefinementScheme::Newton => newton_step(x, a),
            RefinementScheme::FourthOrder => fourth_order_step(x, a),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RefinementScheme::Newton => "newton",
            RefinementScheme::FourthOrder => "fourth-order",
        }
    }
}
