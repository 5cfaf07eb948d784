//! Observable module - height-fluctuation proxy derived from an ensemble.

mod moments;
mod transform;

pub use moments::Moments;
pub use transform::{height_fluctuations, log_normalize, log_transform, normalize};
