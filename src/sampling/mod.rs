//! Sampling module - Monte Carlo ensembles over disorder realizations.

mod ensemble;

pub use ensemble::{run, scaling_time, Ensemble, EnsembleParams, EnsembleSampler, Execution};
