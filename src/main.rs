use clap::Parser;
use log::error;

use directed_polymer::{read_run_config, Evaluation, Execution, Moments, Result, RunConfig, Schedule};

/// Directed polymer ensemble: height fluctuations of a KPZ growth process
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// YAML run configuration; command-line flags override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Polymer half-length (grid side n + 1)
    #[arg(short = 'n', long = "half-length")]
    n: Option<usize>,

    /// Temperature
    #[arg(short = 'T', long)]
    temperature: Option<f64>,

    /// Number of disorder realizations
    #[arg(short = 's', long)]
    samples: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Accumulate ln Z instead of Z
    #[arg(long)]
    log_domain: bool,

    /// Sweep anti-diagonals in parallel inside each sample
    #[arg(long)]
    wavefront: bool,

    /// Run samples on the rayon pool
    #[arg(long)]
    parallel: bool,

    #[arg(long)]
    threads: Option<usize>,
}

fn load_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => read_run_config(path)?,
        None => RunConfig::default(),
    };
    if let Some(n) = args.n {
        config.n = n;
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if let Some(samples) = args.samples {
        config.sample_count = samples;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.threads.is_some() {
        config.threads = args.threads;
    }
    if args.log_domain {
        config.evaluation = Evaluation::LogDomain;
    }
    if args.wavefront {
        config.schedule = Schedule::Wavefront;
    }
    if args.parallel {
        config.execution = Execution::Parallel;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let ensemble = config.run()?;
    let h = ensemble.height_fluctuations()?;
    let moments = Moments::from_samples(&h)?;

    println!("Directed Polymer Ensemble");
    println!("----------------------------------------");
    println!("Half-length n: {}", ensemble.n);
    println!("Temperature T: {}", ensemble.temperature);
    println!("Samples: {}", ensemble.len());
    println!("Scaling time t = 2n/T^4: {:.6}", ensemble.t);
    println!("ln(Z/<Z>) mean: {:.6} ± {:.6}", moments.mean, moments.std_error());
    println!("ln(Z/<Z>) variance: {:.6}", moments.variance);
    println!("ln(Z/<Z>) skewness: {:.6}", moments.skewness);
    println!("ln(Z/<Z>) excess kurtosis: {:.6}", moments.excess_kurtosis);
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
