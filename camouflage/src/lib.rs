//! A generational genetic algorithm that evolves a
//! population of RGB colors towards a target color.
//!
//! Individuals are colors whose three channels are genes.
//! Each generation is sorted by fitness (the sum of absolute
//! channel differences to the target), its best individual is
//! carried over unchanged, and the rest of the next generation
//! is bred from the top survivors by single-point crossover
//! and Gaussian mutation.
//!
//! Randomness is always drawn from an explicitly passed
//! [`rand::Rng`], so runs with seeded sources are reproducible.
//!
//! # Example usage: evolving towards a dark grey
//! ```
//! use camouflage::{Color, EvolutionConfig, EvolutionEngine};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let config = EvolutionConfig {
//!     generations: 1000,
//!     population_size: 50,
//!     keep_population_num: 10,
//!     mutation_rate: 0.5,
//!     mutation_intensity: 0.2,
//!     target_color: Some(Color::new(10, 10, 10)),
//! };
//!
//! let mut engine = EvolutionEngine::new(config, ChaCha8Rng::seed_from_u64(42)).unwrap();
//! let result = engine.run_evolution(|population, generation, best_fitness| {
//!     println!("Generation {}: best fitness {} ({})", generation, best_fitness, population[0]);
//! });
//!
//! if result.converged() {
//!     println!("Solution found!: {}", result.champion);
//! }
//! ```

mod color;
mod evolution;
mod rng;

pub use color::*;
pub use evolution::*;
