//! Error type shared by every stage of the ensemble pipeline.

use thiserror::Error;

/// Failures raised by the generator, solver, sampler, transform and config layers.
#[derive(Debug, Error)]
pub enum PolymerError {
    /// A caller supplied a value outside its domain (non-positive `n`, `T`, ...).
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A partition-grid cell left the representable positive range.
    #[error("partition grid cell ({row}, {col}) left the representable range ({value})")]
    NumericOverflow { row: usize, col: usize, value: f64 },

    /// A single realization inside an ensemble run failed.
    #[error("sample {index} failed: {source}")]
    SampleFailed {
        index: usize,
        #[source]
        source: Box<PolymerError>,
    },

    /// The observable transform was handed an unusable sample sequence.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PolymerError>;

impl PolymerError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        PolymerError::InvalidParameter { name, reason: reason.into() }
    }

    /// True when the failure (directly or inside a sample) is a numeric overflow,
    /// the signal to retry with log-domain evaluation.
    pub fn is_overflow(&self) -> bool {
        match self {
            PolymerError::NumericOverflow { .. } => true,
            PolymerError::SampleFailed { source, .. } => source.is_overflow(),
            _ => false,
        }
    }
}
