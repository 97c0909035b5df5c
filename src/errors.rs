use thiserror::Error;

/// Everything that can go wrong while approximating, sweeping, fitting, or
/// writing results to disk. The numeric core itself never fails for inputs
/// inside the seed domain.
#[derive(Debug, Error)]
pub enum ApproximationError {
    #[error("input must be finite and strictly positive, got {0}")]
    InvalidInput(f64),

    #[error("input {value} is outside the seed domain [{lower}, {upper}]")]
    OutOfDomain { value: f64, lower: f64, upper: f64 },

    #[error("invalid sweep: {0}")]
    InvalidSweep(String),

    #[error("invalid plot: {0}")]
    InvalidPlot(String),

    #[error("least-squares fit failed: {0}")]
    FitFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ApproximationError>;
