use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::approximation::{
    approximator::SqrtApproximator,
    precision::{default_sample_count, validate_sampling, PrecisionSummary, PrecisionSweep},
};
use crate::core::{
    file_io::{serialize_to_json, FilePrefix},
    plot::{LinePlot, PlotSeries, PlotSpecification},
    stopwatch::Stopwatch,
};
use crate::errors::{ApproximationError, Result};

/// One curve in the precision plot: an approximator and how many times it
/// refines its seed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SeriesParams {
    #[serde(default)]
    pub approximator: SqrtApproximator,
    pub steps: u32,
    pub color_rgb: [u8; 3],
}

/// Complete set of parameters that are read from the JSON for a precision plot.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PrecisionPlotParams {
    pub domain: [f64; 2],
    /// Defaults to two samples per unit of input.
    #[serde(default)]
    pub sample_count: Option<usize>,
    pub series: Vec<SeriesParams>,
    #[serde(default)]
    pub plot: PlotSpecification,
}

impl PrecisionPlotParams {
    pub fn sample_count(&self) -> usize {
        self.sample_count
            .unwrap_or_else(|| default_sample_count(self.domain))
    }

    pub fn title(&self) -> String {
        let names: Vec<String> = self
            .series
            .iter()
            .map(|s| format!("x{}(a)", s.steps))
            .collect();
        format!(
            "Number of correct decimal digits of {} between {} and {}",
            names.join(", "),
            self.domain[0],
            self.domain[1]
        )
    }
}

#[derive(Serialize, Debug)]
struct SeriesSummary<'a> {
    label: &'a str,
    steps: u32,
    summary: PrecisionSummary,
}

#[derive(Serialize, Debug)]
struct RenderSummary<'a> {
    title: String,
    sample_count: usize,
    series: Vec<SeriesSummary<'a>>,
}

fn write_samples_csv<W: Write>(writer: &mut W, sweeps: &[PrecisionSweep]) -> std::io::Result<()> {
    writeln!(writer, "label,steps,a,estimate,residual,correct_digits")?;
    for sweep in sweeps {
        for sample in sweep.samples.iter() {
            writeln!(
                writer,
                "{},{},{},{},{},{}",
                sweep.label,
                sweep.steps,
                sample.a,
                sample.estimate,
                sample.residual,
                sample.correct_digits
            )?;
        }
    }
    writer.flush()
}

/**
 * Runs one precision sweep per series and writes the plot (`.png`), the raw
 * samples (`.csv`), a copy of the parameters (`.json`), and per-series summary
 * statistics (`_summary.json`) next to each other. Nothing is written
 * unless the parameters are valid and every sweep succeeds.
 */
pub fn render_precision_plot(
    params: &PrecisionPlotParams,
    file_prefix: &FilePrefix,
) -> Result<Vec<PrecisionSweep>> {
    if params.series.is_empty() {
        return Err(ApproximationError::InvalidSweep(
            "at least one series is required".to_owned(),
        ));
    }

    let sample_count = params.sample_count();
    validate_sampling(params.domain, sample_count, 2).map_err(ApproximationError::InvalidSweep)?;
    let plot = LinePlot::new(&params.plot, params.domain)?;

    let mut stopwatch = Stopwatch::new("Precision Plot");
    let title = params.title();
    tracing::info!("{}", title);

    let sweeps = params
        .series
        .iter()
        .map(|series| {
            PrecisionSweep::run(
                &series.approximator,
                params.domain,
                sample_count,
                series.steps,
            )
        })
        .collect::<Result<Vec<_>>>()?;
    stopwatch.record_split("sweep");

    serialize_to_json(&file_prefix.with_suffix(".json"), params)?;

    for sweep in sweeps.iter() {
        let summary = sweep.summary();
        tracing::info!(
            "{}: min digits {:.3} at a = {}, mean digits {:.3}",
            sweep.label,
            summary.min_digits,
            summary.min_digits_at,
            summary.mean_digits
        );
    }

    write_samples_csv(&mut file_prefix.create_file_with_suffix(".csv")?, &sweeps)?;
    stopwatch.record_split("write csv");

    let series: Vec<PlotSeries> = sweeps
        .iter()
        .zip(params.series.iter())
        .map(|(sweep, series)| PlotSeries {
            points: sweep.points(),
            color_rgb: series.color_rgb,
        })
        .collect();
    let image_path = file_prefix.with_suffix(".png");
    plot.render(&series).save(&image_path)?;
    tracing::info!("Wrote image file to: {}", image_path.display());
    stopwatch.record_split("render plot");

    let summary = RenderSummary {
        title,
        sample_count,
        series: sweeps
            .iter()
            .map(|sweep| SeriesSummary {
                label: &sweep.label,
                steps: sweep.steps,
                summary: sweep.summary(),
            })
            .collect(),
    };
    serialize_to_json(&file_prefix.with_suffix("_summary.json"), &summary)?;
    stopwatch.record_split("write summary");

    stopwatch.log_summary();
    Ok(sweeps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_series_params() -> PrecisionPlotParams {
        serde_json::from_str(
            r#"{
                "domain": [1.0, 100.0],
                "series": [{"steps": 1, "color_rgb": [0, 0, 255]}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_params_defaults() {
        let params = one_series_params();
        assert_eq!(params.sample_count(), 198);
        assert_eq!(params.plot, PlotSpecification::default());
        assert_eq!(params.series[0].approximator, SqrtApproximator::default());
    }

    #[test]
    fn test_title_matches_plot_caption() {
        assert_eq!(
            one_series_params().title(),
            "Number of correct decimal digits of x1(a) between 1 and 100"
        );
    }

    #[test]
    fn test_csv_layout() {
        let params = one_series_params();
        let sweep = PrecisionSweep::run(&params.series[0].approximator, params.domain, 3, 1).unwrap();
        let mut buffer = Vec::new();
        write_samples_csv(&mut buffer, &[sweep]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "label,steps,a,estimate,residual,correct_digits");
        assert!(lines[1].starts_with("piecewise-linear+1xnewton,1,1,"));
    }
}
