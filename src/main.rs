//! Egg-carton solver CLI.
//!
//! ## Usage
//!
//! - `egg-carton` - solve the 4x4, K = 1 carton
//! - `egg-carton -m 6 -n 6 -k 2` - solve a 6x6 carton with two eggs per line
//!
//! Set `RUST_LOG=debug` to trace the annealing progress.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};

use egg_carton::carton::{EggCarton, PuzzleSpec};
use egg_carton::sa::{CoolingSchedule, SaConfig};

/// Place eggs on a grid so that no line holds more than K of them.
#[derive(Parser)]
#[command(name = "egg-carton")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of columns (M)
    #[arg(short = 'm', long, default_value_t = 4)]
    width: usize,

    /// Number of rows (N)
    #[arg(short = 'n', long, default_value_t = 4)]
    height: usize,

    /// Most eggs allowed on any row, column or diagonal (K)
    #[arg(short = 'k', long, default_value_t = 1)]
    max_per_line: usize,

    /// Eggs to place [default: K * min(M, N)]
    #[arg(short, long)]
    eggs: Option<usize>,

    /// Starting temperature
    #[arg(long, default_value_t = 1.0)]
    initial_temperature: f64,

    /// Temperature decrement per iteration
    #[arg(long, default_value_t = 1e-5)]
    dt: f64,

    /// Temperature floor [default: dt]
    #[arg(long)]
    min_temperature: Option<f64>,

    /// Hard iteration budget, 0 for none
    #[arg(long, default_value_t = 0)]
    max_iterations: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let spec = PuzzleSpec::new(cli.width, cli.height, cli.max_per_line)?;
    let eggs = cli.eggs.unwrap_or_else(|| spec.max_valid_eggs());
    let carton = EggCarton::new(spec, eggs)?;

    let mut config = SaConfig::default()
        .with_initial_temperature(cli.initial_temperature)
        .with_cooling(CoolingSchedule::Step { dt: cli.dt })
        .with_max_iterations(cli.max_iterations);
    if let Some(t) = cli.min_temperature {
        config = config.with_min_temperature(t);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    println!(
        "Egg carton {}x{}, K = {}, {} eggs\n",
        spec.width(),
        spec.height(),
        spec.max_per_line(),
        eggs
    );

    let result = carton
        .solve(&config)
        .with_context(|| format!("annealing failed for {eggs} eggs"))?;

    println!(
        "{:?} in {} iterations (score {}, T = {:.6})\n",
        result.outcome, result.iterations, result.score, result.final_temperature
    );
    print!("{}", carton.view(&result.state));

    if !result.outcome.is_solved() && result.best_score < result.score {
        println!("\nBest seen (score {}):", result.best_score);
        print!("{}", carton.view(&result.best));
    }

    Ok(())
}
