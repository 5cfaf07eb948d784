//! Ensemble Sampler.
//!
//! Repeats generate → solve over independent disorder realizations and
//! collects the terminal partition values. A run is all-or-nothing: the first
//! failing realization aborts it and is reported with its sample index.

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::disorder::Disorder;
use crate::error::{PolymerError, Result};
use crate::observable;
use crate::partition::{Evaluation, PartitionSolver, Schedule};

/// How the realizations of one ensemble are scheduled.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    /// Every realization draws from the caller's generator, in index order.
    #[default]
    Sequential,
    /// Realizations run on the rayon pool. One base seed is drawn from the
    /// caller's generator and sample `i` gets its own stream seeded with
    /// `base + i`, so results do not depend on thread count.
    Parallel,
}

/// Parameters of an ensemble run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EnsembleParams {
    /// Polymer half-length; the grid side is `n + 1`.
    pub n: usize,
    pub temperature: f64,
    pub sample_count: usize,
    pub disorder: Disorder,
    pub evaluation: Evaluation,
    pub schedule: Schedule,
    pub execution: Execution,
}

impl EnsembleParams {
    /// Standard-normal disorder, direct row-major evaluation, sequential execution.
    pub fn new(n: usize, temperature: f64, sample_count: usize) -> Self {
        Self {
            n,
            temperature,
            sample_count,
            disorder: Disorder::default(),
            evaluation: Evaluation::default(),
            schedule: Schedule::default(),
            execution: Execution::default(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.n + 1
    }

    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(PolymerError::invalid("n", "polymer half-length must be positive"));
        }
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(PolymerError::invalid(
                "temperature",
                format!("must be finite and strictly positive, got {}", self.temperature),
            ));
        }
        if self.sample_count == 0 {
            return Err(PolymerError::invalid("sample_count", "at least one sample is required"));
        }
        self.disorder.validate()
    }
}

/// Scaling time `t = 2n / T^4` of the growth-process picture.
pub fn scaling_time(n: usize, temperature: f64) -> f64 {
    2.0 * n as f64 / temperature.powi(4)
}

/// Collected terminal values of one ensemble run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Ensemble {
    pub n: usize,
    pub temperature: f64,
    /// Scaling time, see [`scaling_time`].
    pub t: f64,
    /// `Direct` samples are `Z`, `LogDomain` samples are `ln Z`.
    pub evaluation: Evaluation,
    pub samples: Vec<f64>,
}

impl Ensemble {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `ln Z` for every sample, whatever the stored representation.
    pub fn log_partition_functions(&self) -> Vec<f64> {
        match self.evaluation {
            Evaluation::Direct => self.samples.iter().map(|z| z.ln()).collect(),
            Evaluation::LogDomain => self.samples.clone(),
        }
    }

    /// Height-fluctuation proxy `ln(Z_i / <Z>)`.
    pub fn height_fluctuations(&self) -> Result<Vec<f64>> {
        match self.evaluation {
            Evaluation::Direct => observable::height_fluctuations(&self.samples),
            Evaluation::LogDomain => observable::log_normalize(&self.samples),
        }
    }
}

/// Drives the disorder generator and the partition solver across realizations.
pub struct EnsembleSampler {
    params: EnsembleParams,
}

impl EnsembleSampler {
    pub fn new(params: EnsembleParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EnsembleParams {
        &self.params
    }

    /// Run the full ensemble.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Ensemble> {
        self.params.validate()?;
        let p = &self.params;
        info!(
            "ensemble: n = {}, T = {}, samples = {}, {:?}/{:?}/{:?}",
            p.n, p.temperature, p.sample_count, p.evaluation, p.schedule, p.execution
        );

        let samples = match p.execution {
            Execution::Sequential => self.run_sequential(rng)?,
            Execution::Parallel => self.run_parallel(rng.gen())?,
        };

        let t = scaling_time(p.n, p.temperature);
        info!("ensemble finished: {} samples, t = {:.6}", samples.len(), t);
        Ok(Ensemble {
            n: p.n,
            temperature: p.temperature,
            t,
            evaluation: p.evaluation,
            samples,
        })
    }

    fn run_sequential<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>> {
        let mut solver = PartitionSolver::new(self.params.evaluation, self.params.schedule);
        let mut samples = Vec::with_capacity(self.params.sample_count);
        let report_every = (self.params.sample_count / 10).max(1);

        for index in 0..self.params.sample_count {
            samples.push(self.sample(index, &mut solver, rng)?);
            if (index + 1) % report_every == 0 {
                debug!("  sample {:6} / {}", index + 1, self.params.sample_count);
            }
        }
        Ok(samples)
    }

    fn run_parallel(&self, base_seed: u64) -> Result<Vec<f64>> {
        debug!("parallel ensemble, base seed {}", base_seed);
        (0..self.params.sample_count)
            .into_par_iter()
            .map_init(
                || PartitionSolver::new(self.params.evaluation, self.params.schedule),
                |solver, index| {
                    let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(index as u64));
                    self.sample(index, solver, &mut rng)
                },
            )
            .collect()
    }

    fn sample<R: Rng + ?Sized>(&self, index: usize, solver: &mut PartitionSolver, rng: &mut R) -> Result<f64> {
        let potential = self.params.disorder.generate(self.params.dimension(), rng)?;
        solver
            .terminal(&potential, self.params.temperature)
            .map_err(|source| {
                if source.is_overflow() && self.params.evaluation == Evaluation::Direct {
                    warn!("sample {} overflowed in direct evaluation; use log-domain evaluation", index);
                }
                PolymerError::SampleFailed { index, source: Box::new(source) }
            })
    }
}

/// Sequential standard-normal ensemble with direct evaluation.
pub fn run<R: Rng + ?Sized>(n: usize, temperature: f64, sample_count: usize, rng: &mut R) -> Result<Ensemble> {
    EnsembleSampler::new(EnsembleParams::new(n, temperature, sample_count)).run(rng)
}
