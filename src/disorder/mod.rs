//! Disorder module - quenched random potential fields.

mod potential;

pub use potential::{generate, generate_with, Disorder, PotentialGrid};
