use thiserror::Error;

/// Errors raised before or around chart synthesis.
///
/// Every input check runs before any lane state is created, so a returned
/// error always means no chart was produced.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Tempo must be a positive, finite BPM value
    #[error("invalid tempo: {0} (must be a positive, finite BPM)")]
    InvalidTempo(f64),

    #[error("onset #{index} is negative: {time}s")]
    NegativeOnset { index: usize, time: f64 },

    /// Onset too late to be expressed in chart milliseconds
    #[error("onset #{index} is out of range: {time}s")]
    OnsetOutOfRange { index: usize, time: f64 },

    #[error("onset #{index} is not a finite number")]
    NonFiniteOnset { index: usize },

    #[error("onsets not sorted ascending: #{index} ({time}s) comes after {previous}s")]
    UnsortedOnsets { index: usize, previous: f64, time: f64 },

    /// The no-repeat rule cannot be satisfied with fewer than two lanes
    #[error("lane count must be at least 2, got {0}")]
    TooFewLanes(u8),

    #[error("chart I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("chart JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
