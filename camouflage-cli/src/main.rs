mod dashboard;

use camouflage::logging::Stats;
use camouflage::{Color, ConfigError, EvolutionConfig, EvolutionEngine};
use dashboard::Dashboard;

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use ron::ser::PrettyConfig;

use std::error::Error;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evolve a population and watch it in the terminal
    Run(RunArgs),
    /// Run many seeded evolutions in parallel and report statistics
    Stress(StressArgs),
}

#[derive(Args, Debug)]
struct EvolutionArgs {
    /// Number of generations
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(10..=1000))]
    generations: u64,
    /// Number of individuals in the population
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u64).range(2..=1000))]
    population_size: u64,
    /// Number of top individuals selected for mating
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=1000))]
    keep: u64,
    /// Mutation rate (%)
    #[arg(long, default_value_t = 1.0, value_parser = parse_mutation_rate)]
    mutation_rate: f32,
    /// Mutation intensity (%)
    #[arg(long, default_value_t = 0.1, value_parser = parse_mutation_intensity)]
    mutation_intensity: f32,
    /// Target color, as #RRGGBB
    #[arg(long, default_value = "#E6D8D8")]
    target: Color,
    /// Evolve towards a random color instead of the target
    #[arg(long)]
    random_target: bool,
    /// Load the configuration from a RON file, ignoring the flags above
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    evolution: EvolutionArgs,
    /// Pause between generations (seconds)
    #[arg(long, default_value_t = 0.0, value_parser = parse_pause)]
    pause: f32,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Write the run's history to a RON file
    #[arg(long)]
    history: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct StressArgs {
    #[command(flatten)]
    evolution: EvolutionArgs,
    /// Number of independent runs
    #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    iterations: u64,
    /// Seed of the first run; run i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl EvolutionArgs {
    fn to_config(&self) -> Result<EvolutionConfig, Box<dyn Error>> {
        if let Some(path) = &self.config {
            let config: EvolutionConfig = ron::from_str(&fs::read_to_string(path)?)?;
            info!("Loaded configuration from {}", path.display());
            return Ok(config);
        }
        Ok(EvolutionConfig {
            generations: self.generations as usize,
            population_size: self.population_size as usize,
            keep_population_num: self.keep as usize,
            mutation_rate: self.mutation_rate / 100.0,
            mutation_intensity: self.mutation_intensity / 100.0,
            target_color: if self.random_target {
                None
            } else {
                Some(self.target)
            },
        })
    }
}

fn parse_bounded(s: &str, max: f32, unit: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{}", e))?;
    if (0.0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is not in 0{}..={}{}", value, unit, max, unit))
    }
}

fn parse_mutation_rate(s: &str) -> Result<f32, String> {
    parse_bounded(s, 100.0, "%")
}

fn parse_mutation_intensity(s: &str) -> Result<f32, String> {
    parse_bounded(s, 50.0, "%")
}

fn parse_pause(s: &str) -> Result<f32, String> {
    parse_bounded(s, 5.0, "s")
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    match Cli::parse().command {
        Command::Run(args) => run(&args),
        Command::Stress(args) => stress_test(&args),
    }
}

fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let config = args.evolution.to_config()?;
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("Using seed {}", seed);
    let mut engine = EvolutionEngine::new(config, ChaCha8Rng::seed_from_u64(seed))?;

    let pause = Duration::from_secs_f32(args.pause);
    let mut dashboard = Dashboard::new(io::stdout(), engine.target());
    let result = engine.run_evolution(|population, generation, best_fitness| {
        if let Err(e) = dashboard.update(population, generation, best_fitness) {
            error!("Error drawing generation {}: {}", generation, e);
        }
        thread::sleep(pause);
    });

    println!(
        "Evolution finished: {} after {} generations. Best individual {} (fitness {}), target {}",
        result.outcome,
        result.generations(),
        result.champion,
        result.best_fitness(),
        result.target
    );

    if let Some(path) = &args.history {
        fs::write(path, ron::ser::to_string_pretty(&result, PrettyConfig::new())?)?;
        info!("Run history written to {}", path.display());
    }
    Ok(())
}

fn stress_test(args: &StressArgs) -> Result<(), Box<dyn Error>> {
    let config = args.evolution.to_config()?;
    config.validate()?;

    let generations = (0..args.iterations)
        .into_par_iter()
        .map(|i| -> Result<Option<usize>, ConfigError> {
            let rng = ChaCha8Rng::seed_from_u64(args.seed.wrapping_add(i));
            let result = EvolutionEngine::new(config.clone(), rng)?.run_evolution(|_, _, _| {});
            Ok(result.converged().then(|| result.generations()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let failures = generations.iter().filter(|g| g.is_none()).count();
    match Stats::from(generations.iter().flatten().map(|g| *g as f32)) {
        Some(stats) => println!("Successful run generation count {:?}", stats),
        None => println!("No successful runs"),
    }
    println!(
        "{}% failure rate over {} iterations",
        failures as f32 * 100.0 / args.iterations as f32,
        args.iterations
    );
    Ok(())
}
