use std::io::Write;

use serde::Serialize;

use crate::approximation::{
    approximator::SqrtApproximator,
    precision::{correct_digits, residual},
};
use crate::errors::Result;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct IterateReport {
    pub step: u32,
    pub estimate: f64,
    pub residual: f64,
    pub correct_digits: f64,
}

/// Every iterate of `approximator` for `a`, starting with the seed at step 0.
pub fn evaluate_iterates(
    approximator: &SqrtApproximator,
    a: f64,
    steps: u32,
) -> Result<Vec<IterateReport>> {
    let history = approximator.iterates(a, steps)?;
    Ok(history
        .into_iter()
        .enumerate()
        .map(|(step, estimate)| IterateReport {
            step: step as u32,
            estimate,
            residual: residual(a, estimate),
            correct_digits: correct_digits(a, estimate),
        })
        .collect())
}

pub fn display_iterates<W: Write>(
    writer: &mut W,
    a: f64,
    reports: &[IterateReport],
) -> std::io::Result<()> {
    writeln!(writer, "sqrt({})  (reference: {:.17})", a, a.sqrt())?;
    writeln!(
        writer,
        "{:>4}  {:>24}  {:>12}  {:>8}",
        "step", "estimate", "|a - x^2|", "digits"
    )?;
    for report in reports {
        writeln!(
            writer,
            "{:>4}  {:>24.17}  {:>12.3e}  {:>8.3}",
            report.step, report.estimate, report.residual, report.correct_digits
        )?;
    }
    Ok(())
}
