//! IO module - run configuration files.

mod config;

pub use config::{read_run_config, RunConfig};
