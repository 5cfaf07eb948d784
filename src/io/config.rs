//! YAML run configuration.
//!
//! ```yaml
//! n: 64
//! temperature: 6.72
//! sample_count: 10000
//! seed: 12345
//! evaluation: log_domain     # direct | log_domain
//! schedule: row_major        # row_major | wavefront
//! execution: parallel        # sequential | parallel
//! threads: 8
//! disorder:
//!   kind: gaussian
//!   mean: 0.0
//!   std_dev: 1.0
//! ```
//!
//! Every key is optional; missing keys take the values of `RunConfig::default()`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::disorder::Disorder;
use crate::error::{PolymerError, Result};
use crate::partition::{Evaluation, Schedule};
use crate::sampling::{Ensemble, EnsembleParams, EnsembleSampler, Execution};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub n: usize,
    pub temperature: f64,
    pub sample_count: usize,
    /// Seed of the caller-side generator; entropy when absent.
    pub seed: Option<u64>,
    pub evaluation: Evaluation,
    pub schedule: Schedule,
    pub execution: Execution,
    /// Size of a dedicated rayon pool; the global pool when absent.
    pub threads: Option<usize>,
    pub disorder: Disorder,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n: 64,
            temperature: 6.72,
            sample_count: 1000,
            seed: None,
            evaluation: Evaluation::default(),
            schedule: Schedule::default(),
            execution: Execution::default(),
            threads: None,
            disorder: Disorder::default(),
        }
    }
}

/// Read a run configuration from a YAML file.
pub fn read_run_config<P: AsRef<Path>>(filename: P) -> Result<RunConfig> {
    let file = File::open(filename)?;
    let reader = BufReader::new(file);
    let config: RunConfig = serde_yaml::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

impl RunConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: RunConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn params(&self) -> EnsembleParams {
        EnsembleParams {
            n: self.n,
            temperature: self.temperature,
            sample_count: self.sample_count,
            disorder: self.disorder,
            evaluation: self.evaluation,
            schedule: self.schedule,
            execution: self.execution,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            return Err(PolymerError::invalid("threads", "thread count must be positive"));
        }
        self.params().validate()
    }

    /// Seed the generator and run the configured ensemble.
    pub fn run(&self) -> Result<Ensemble> {
        self.validate()?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sampler = EnsembleSampler::new(self.params());

        match self.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| PolymerError::Config(e.to_string()))?;
                info!("rayon pool: {} threads", threads);
                pool.install(|| sampler.run(&mut rng))
            }
            None => sampler.run(&mut rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_mapping() {
        let config = RunConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_full_config() {
        let text = "
n: 32
temperature: 2.5
sample_count: 50
seed: 7
evaluation: log_domain
schedule: wavefront
execution: parallel
threads: 2
disorder:
  kind: uniform
  low: -1.0
  high: 1.0
";
        let config = RunConfig::from_yaml(text).unwrap();
        assert_eq!(config.n, 32);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.evaluation, Evaluation::LogDomain);
        assert_eq!(config.schedule, Schedule::Wavefront);
        assert_eq!(config.execution, Execution::Parallel);
        assert_eq!(config.disorder, Disorder::Uniform { low: -1.0, high: 1.0 });
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            RunConfig::from_yaml("temperature: -1.0"),
            Err(PolymerError::InvalidParameter { name: "temperature", .. })
        ));
        assert!(matches!(
            RunConfig::from_yaml("threads: 0"),
            Err(PolymerError::InvalidParameter { name: "threads", .. })
        ));
        assert!(matches!(RunConfig::from_yaml("n: [1, 2]"), Err(PolymerError::Yaml(_))));
        assert!(matches!(RunConfig::from_yaml("sampels: 10"), Err(PolymerError::Yaml(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(read_run_config("does/not/exist.yml"), Err(PolymerError::Io(_))));
    }

    #[test]
    fn test_seeded_run_reproducible() {
        let config = RunConfig::from_yaml("n: 8\ntemperature: 1.0\nsample_count: 12\nseed: 3\nthreads: 2\nexecution: parallel").unwrap();
        let a = config.run().unwrap();
        let b = config.run().unwrap();
        assert_eq!(a.samples, b.samples);
        assert_eq!(a.len(), 12);
    }
}
