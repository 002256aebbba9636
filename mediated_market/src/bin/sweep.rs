//! Success-rate sweep over the sampling probability
//!
//! For every probability on the grid, runs many independent markets and
//! reports Ep[SW]/Ep[SW*] and Ep[W+SW]/Ep[SW*], where SW* is the offline
//! optimum of the unsampled pairs.
//!
//! Usage:
//!   cargo run --release --bin sweep -- --config experiments/baseline.toml
//!   cargo run --release --bin sweep -- --pairs 50 --trials 20 --step 0.1

use clap::Parser;
use mediated_market::analysis::print_summary;
use mediated_market::config::ExperimentConfig;
use mediated_market::error::Result;
use mediated_market::experiment::run_sweep;
use mediated_market::output::SweepOutput;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Sweep the mediator's success rate over the sampling probability")]
struct Args {
    /// TOML experiment file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    name: Option<String>,

    /// Seller/buyer pairs per market
    #[arg(long)]
    pairs: Option<usize>,

    #[arg(long)]
    max_value: Option<f64>,

    /// Markets per probability
    #[arg(long)]
    trials: Option<usize>,

    /// Probability grid spacing
    #[arg(long)]
    step: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    threads: Option<usize>,

    /// Base output directory
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the table without writing files
    #[arg(long)]
    no_save: bool,
}

impl Args {
    fn load_config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::from_file(path)?,
            None => ExperimentConfig::default(),
        };

        let params = &mut config.experiment;
        if let Some(name) = &self.name {
            params.name = name.clone();
        }
        if let Some(pairs) = self.pairs {
            params.num_pairs = pairs;
        }
        if let Some(max_value) = self.max_value {
            params.max_value = max_value;
        }
        if let Some(trials) = self.trials {
            params.trials_per_step = trials;
        }
        if let Some(step) = self.step {
            params.probability_step = step;
        }
        if let Some(seed) = self.seed {
            params.base_seed = seed;
        }
        if self.threads.is_some() {
            params.num_threads = self.threads;
        }
        if let Some(output) = &self.output {
            config.output.directory = output.clone();
        }
        if self.no_save {
            config.output.save_csv = false;
            config.output.save_json = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.load_config()?;
    let params = &config.experiment;

    println!("=== Mediated Market Success Sweep ===\n");
    println!("Experiment: {}", params.name);
    println!(
        "Configuration: {} pairs, valuations in [0, {}], {} markets per probability, step {}",
        params.num_pairs, params.max_value, params.trials_per_step, params.probability_step
    );

    let start = Instant::now();
    let steps = run_sweep(params)?;
    let elapsed = start.elapsed().as_secs_f64();
    tracing::info!("sweep finished in {:.2}s", elapsed);

    print_summary(&params.name, &steps);

    if config.output.save_csv || config.output.save_json {
        let dir = config.run_directory();
        let output = SweepOutput::new(params.clone(), steps, elapsed);
        output.write_all(&dir, config.output.save_csv, config.output.save_json)?;
        println!("\nResults written to {}", dir.display());
    }

    Ok(())
}
