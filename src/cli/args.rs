use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::approximation::{
    approximator::{DomainPolicy, SqrtApproximator},
    refinement::RefinementScheme,
    seed::SeedFunction,
};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct SqrtApproximationArgs {
    #[command(subcommand)]
    pub command: Option<CommandsEnum>,
}

#[derive(Debug, Subcommand)]
pub enum CommandsEnum {
    /// Sweep the input range and plot the number of correct digits.
    Render(ParameterFilePath),
    /// Print every iterate of the approximation for a single input.
    Evaluate(EvaluateArgs),
    /// Least-squares fit of a polynomial seed to sqrt.
    FitSeed(ParameterFilePath),
}

#[derive(Debug, Args)]
pub struct ParameterFilePath {
    pub params_path: String,

    #[clap(long, short)]
    pub date_time_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeedArg {
    PiecewiseLinear,
    Quadratic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    Newton,
    FourthOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Extrapolate,
    ClampSeed,
    Reject,
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Number to take the square root of.
    #[clap(allow_negative_numbers = true)]
    pub a: f64,

    #[clap(long, short, default_value_t = 2)]
    pub steps: u32,

    #[clap(long, value_enum, default_value_t = SeedArg::PiecewiseLinear)]
    pub seed: SeedArg,

    #[clap(long, value_enum, default_value_t = SchemeArg::Newton)]
    pub scheme: SchemeArg,

    #[clap(long, value_enum, default_value_t = PolicyArg::Extrapolate)]
    pub policy: PolicyArg,
}

impl EvaluateArgs {
    pub fn approximator(&self) -> SqrtApproximator {
        let seed = match self.seed {
            SeedArg::PiecewiseLinear => SeedFunction::PiecewiseLinear,
            SeedArg::Quadratic => SeedFunction::Quadratic,
        };
        let scheme = match self.scheme {
            SchemeArg::Newton => RefinementScheme::Newton,
            SchemeArg::FourthOrder => RefinementScheme::FourthOrder,
        };
        let policy = match self.policy {
            PolicyArg::Extrapolate => DomainPolicy::Extrapolate,
            PolicyArg::ClampSeed => DomainPolicy::ClampSeed,
            PolicyArg::Reject => DomainPolicy::Reject,
        };
        SqrtApproximator::new(seed, scheme, policy)
    }
}
