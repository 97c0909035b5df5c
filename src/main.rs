use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sqrt_approximation::approximation::least_squares::SeedFitParams;
use sqrt_approximation::cli::args::{CommandsEnum, ParameterFilePath, SqrtApproximationArgs};
use sqrt_approximation::cli::evaluate::{display_iterates, evaluate_iterates};
use sqrt_approximation::cli::fit_seed::fit_seed;
use sqrt_approximation::cli::render::{render_precision_plot, PrecisionPlotParams};
use sqrt_approximation::core::file_io::{
    build_output_path_with_date_time, deserialize_from_json, extract_base_name,
    maybe_date_time_string, FilePrefix,
};
use sqrt_approximation::errors::Result;

fn build_file_prefix(params: &ParameterFilePath, project: &str) -> Result<FilePrefix> {
    Ok(FilePrefix {
        directory_path: build_output_path_with_date_time(
            &params.params_path,
            project,
            &maybe_date_time_string(params.date_time_out),
        )?,
        file_base: extract_base_name(&params.params_path).to_owned(),
    })
}

fn run(args: &SqrtApproximationArgs) -> Result<()> {
    match &args.command {
        Some(CommandsEnum::Render(params)) => {
            let plot_params: PrecisionPlotParams = deserialize_from_json(&params.params_path)?;
            render_precision_plot(&plot_params, &build_file_prefix(params, "render")?)?;
        }

        Some(CommandsEnum::Evaluate(evaluate)) => {
            let reports =
                evaluate_iterates(&evaluate.approximator(), evaluate.a, evaluate.steps)?;
            display_iterates(&mut std::io::stdout().lock(), evaluate.a, &reports)?;
        }

        Some(CommandsEnum::FitSeed(params)) => {
            let fit_params: SeedFitParams = deserialize_from_json(&params.params_path)?;
            fit_seed(&fit_params, &build_file_prefix(params, "fit_seed")?)?;
        }

        None => {
            println!("Default command (nothing specified!)  Try `--help`.");
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = SqrtApproximationArgs::parse();
    if let Err(err) = run(&args) {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}
