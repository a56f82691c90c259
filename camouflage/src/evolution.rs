//! The evolution engine owns a population of colors
//! and evolves it towards a target color, one
//! generation at a time.
mod config;
mod errors;
pub mod logging;
mod offspring_factory;

use crate::Color;
pub use config::EvolutionConfig;
pub use errors::ConfigError;
use logging::GenerationRecord;
pub use logging::{RunOutcome, RunResult};
use offspring_factory::OffspringFactory;

use log::{debug, info};
use rand::Rng;
use std::iter;
use std::ops::ControlFlow;

/// A generational genetic algorithm over colors.
///
/// The engine draws all its randomness from the
/// source it is given, so seeded sources give
/// reproducible runs.
pub struct EvolutionEngine<R> {
    config: EvolutionConfig,
    target: Color,
    seed: Vec<Color>,
    population: Vec<Color>,
    rng: R,
}

impl<R: Rng> EvolutionEngine<R> {
    /// Creates a new engine using the passed configuration
    /// and random source. If the configuration has no target
    /// color, a random one is drawn from `rng`.
    ///
    /// # Errors
    /// Returns an error if the configuration is malformed,
    /// as established by [`EvolutionConfig::validate`].
    ///
    /// # Examples
    /// ```
    /// use camouflage::{Color, EvolutionConfig, EvolutionEngine};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = EvolutionConfig {
    ///     target_color: Some(Color::new(10, 10, 10)),
    ///     ..EvolutionConfig::default()
    /// };
    /// let engine = EvolutionEngine::new(config, ChaCha8Rng::seed_from_u64(0)).unwrap();
    /// assert_eq!(engine.target(), Color::new(10, 10, 10));
    /// ```
    pub fn new(config: EvolutionConfig, rng: R) -> Result<EvolutionEngine<R>, ConfigError> {
        Self::new_seeded(vec![], config, rng)
    }

    /// Creates a new engine whose initial populations start
    /// with the specified individuals. The remaining space
    /// is filled randomly at the start of each run.
    ///
    /// # Errors
    /// Returns an error if the configuration is malformed or
    /// there are more seed individuals than the population size.
    ///
    /// # Examples
    /// ```
    /// use camouflage::{Color, ConfigError, EvolutionConfig, EvolutionEngine};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = EvolutionConfig {
    ///     population_size: 2,
    ///     keep_population_num: 1,
    ///     ..EvolutionConfig::default()
    /// };
    /// let seed = vec![Color::new(0, 0, 0); 3];
    ///
    /// let engine = EvolutionEngine::new_seeded(seed, config, ChaCha8Rng::seed_from_u64(0));
    /// assert_eq!(
    ///     engine.err(),
    ///     Some(ConfigError::TooManySeeds { seeds: 3, population_size: 2 }),
    /// );
    /// ```
    pub fn new_seeded(
        seed: Vec<Color>,
        config: EvolutionConfig,
        mut rng: R,
    ) -> Result<EvolutionEngine<R>, ConfigError> {
        config.validate()?;
        if seed.len() > config.population_size {
            return Err(ConfigError::TooManySeeds {
                seeds: seed.len(),
                population_size: config.population_size,
            });
        }
        let target = config
            .target_color
            .unwrap_or_else(|| Color::random(&mut rng));
        Ok(EvolutionEngine {
            config,
            target,
            seed,
            population: vec![],
            rng,
        })
    }

    /// Runs a full evolution, calling `on_generation` with the
    /// sorted population, the generation number and the best
    /// fitness once per generation, before the next generation
    /// is bred.
    ///
    /// The run ends when the best individual matches the target
    /// or the configured number of generations has been evaluated.
    ///
    /// # Examples
    /// ```
    /// use camouflage::{Color, EvolutionConfig, EvolutionEngine};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = EvolutionConfig {
    ///     generations: 50,
    ///     target_color: Some(Color::new(10, 10, 10)),
    ///     ..EvolutionConfig::default()
    /// };
    /// let mut engine = EvolutionEngine::new(config, ChaCha8Rng::seed_from_u64(0)).unwrap();
    ///
    /// let mut history = vec![];
    /// let result = engine.run_evolution(|population, generation, best_fitness| {
    ///     assert_eq!(population.len(), 25);
    ///     history.push((generation, best_fitness));
    /// });
    ///
    /// assert_eq!(history.len(), result.generations());
    /// assert_eq!(history.last().unwrap().1, result.best_fitness());
    /// ```
    pub fn run_evolution<F>(&mut self, mut on_generation: F) -> RunResult
    where
        F: FnMut(&[Color], usize, u32),
    {
        self.run_evolution_with(|population, generation, best_fitness| {
            on_generation(population, generation, best_fitness);
            ControlFlow::Continue(())
        })
    }

    /// Like [`run_evolution`], but the run is cancelled after
    /// any generation for which `on_generation` breaks.
    ///
    /// [`run_evolution`]: EvolutionEngine::run_evolution
    ///
    /// # Examples
    /// ```
    /// use camouflage::{EvolutionConfig, EvolutionEngine, RunOutcome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use std::ops::ControlFlow;
    ///
    /// let config = EvolutionConfig {
    ///     mutation_rate: 0.0,
    ///     ..EvolutionConfig::default()
    /// };
    /// let mut engine = EvolutionEngine::new(config, ChaCha8Rng::seed_from_u64(0)).unwrap();
    ///
    /// let result = engine.run_evolution_with(|_, generation, _| {
    ///     if generation == 3 {
    ///         ControlFlow::Break(())
    ///     } else {
    ///         ControlFlow::Continue(())
    ///     }
    /// });
    /// # if !result.converged() {
    /// assert_eq!(result.outcome, RunOutcome::Cancelled);
    /// assert_eq!(result.generations(), 3);
    /// # }
    /// ```
    pub fn run_evolution_with<F>(&mut self, mut on_generation: F) -> RunResult
    where
        F: FnMut(&[Color], usize, u32) -> ControlFlow<()>,
    {
        info!("Starting evolution for {}", self.config);
        self.population = self.initial_population();

        let mut records = Vec::with_capacity(self.config.generations);
        let mut outcome = RunOutcome::Exhausted;
        for generation in 1..=self.config.generations {
            self.sort_population_by_fitness();
            let record = GenerationRecord::new(generation, &self.population, &self.target);
            let champion = record.best_individual;
            let best_fitness = record.best_fitness;
            records.push(record);

            let flow = on_generation(&self.population, generation, best_fitness);

            if champion == self.target {
                info!("Generation {}: solution found!", generation);
                outcome = RunOutcome::Converged;
                break;
            }
            if flow.is_break() {
                info!("Generation {}: evolution cancelled", generation);
                outcome = RunOutcome::Cancelled;
                break;
            }
            debug!(
                "Generation {}: best fitness {}, best individual {}, target color {}",
                generation, best_fitness, champion, self.target
            );

            let offspring =
                OffspringFactory::new(&self.population, &self.config, &mut self.rng)
                    .next_generation(champion);
            self.population = offspring;
        }

        let champion = records
            .last()
            .map_or(self.population[0], |r| r.best_individual);
        info!(
            "Evolution ended after {} generations ({}), best individual {}",
            records.len(),
            outcome,
            champion
        );
        RunResult {
            target: self.target,
            outcome,
            champion,
            records,
        }
    }

    /// Generates the run's starting population: the seed
    /// individuals followed by random colors.
    fn initial_population(&mut self) -> Vec<Color> {
        debug!("Generating random population...");
        let rng = &mut self.rng;
        self.seed
            .iter()
            .copied()
            .chain(iter::repeat_with(|| Color::random(rng)))
            .take(self.config.population_size)
            .collect()
    }

    /// Sorts the population by ascending fitness.
    /// The sort is stable, so ties keep their order.
    fn sort_population_by_fitness(&mut self) {
        let target = self.target;
        self.population.sort_by_key(|c| c.distance(&target));
    }

    /// Returns the fitness of a color relative
    /// to the engine's target. Lower is better.
    pub fn fitness(&self, color: &Color) -> u32 {
        color.distance(&self.target)
    }

    /// Returns the color being evolved towards.
    pub fn target(&self) -> Color {
        self.target
    }

    /// Returns the engine's configuration.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Returns the current population. Empty before
    /// the first run; after a run that did not stop early,
    /// this is the unevaluated offspring of the last generation.
    pub fn population(&self) -> &[Color] {
        &self.population
    }
}

/// Creates an engine and runs a full evolution.
/// See [`EvolutionEngine::run_evolution`].
///
/// # Errors
/// Returns an error if the configuration is malformed.
///
/// # Examples
/// ```
/// use camouflage::{run_evolution, EvolutionConfig};
///
/// let config = EvolutionConfig {
///     population_size: 30,
///     keep_population_num: 40,
///     ..EvolutionConfig::default()
/// };
/// assert!(run_evolution(config, rand::thread_rng(), |_, _, _| {}).is_err());
/// ```
pub fn run_evolution<R, F>(
    config: EvolutionConfig,
    rng: R,
    on_generation: F,
) -> Result<RunResult, ConfigError>
where
    R: Rng,
    F: FnMut(&[Color], usize, u32),
{
    Ok(EvolutionEngine::new(config, rng)?.run_evolution(on_generation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn engine(config: EvolutionConfig, seed: u64) -> EvolutionEngine<ChaCha8Rng> {
        EvolutionEngine::new(config, ChaCha8Rng::seed_from_u64(seed)).unwrap()
    }

    fn convergence_config() -> EvolutionConfig {
        EvolutionConfig {
            generations: 1000,
            population_size: 50,
            keep_population_num: 10,
            mutation_rate: 0.5,
            mutation_intensity: 0.2,
            target_color: Some(Color::new(10, 10, 10)),
        }
    }

    #[test]
    fn random_target_when_unspecified() {
        let config = EvolutionConfig {
            target_color: None,
            ..EvolutionConfig::default()
        };
        let targets: Vec<Color> = (0..5).map(|s| engine(config.clone(), s).target()).collect();
        assert!(targets.windows(2).any(|w| w[0] != w[1]));
        // The same seed draws the same target.
        assert_eq!(engine(config, 3).target(), targets[3]);
    }

    #[test]
    fn population_size_is_constant() {
        for population_size in [2, 3, 25, 50] {
            let config = EvolutionConfig {
                generations: 30,
                population_size,
                keep_population_num: 2,
                mutation_rate: 0.3,
                mutation_intensity: 0.1,
                target_color: Some(Color::new(123, 45, 67)),
            };
            let mut calls = 0;
            engine(config, 31).run_evolution(|population, _, _| {
                calls += 1;
                assert_eq!(population.len(), population_size);
            });
            assert!(calls > 0);
        }
    }

    #[test]
    fn callback_sees_sorted_population_in_order() {
        let mut engine = engine(convergence_config(), 32);
        let target = engine.target();
        let mut expected_generation = 1;
        let result = engine.run_evolution(|population, generation, best_fitness| {
            assert_eq!(generation, expected_generation);
            expected_generation += 1;
            assert_eq!(best_fitness, population[0].distance(&target));
            assert!(population
                .windows(2)
                .all(|w| w[0].distance(&target) <= w[1].distance(&target)));
        });
        assert_eq!(expected_generation - 1, result.generations());
        assert_eq!(result.records.len(), result.generations());
    }

    #[test]
    fn best_fitness_never_worsens() {
        for seed in 0..10 {
            let config = EvolutionConfig {
                generations: 200,
                target_color: None,
                mutation_rate: 0.8,
                mutation_intensity: 0.5,
                ..EvolutionConfig::default()
            };
            let result = engine(config, seed).run_evolution(|_, _, _| {});
            for w in result.records.windows(2) {
                assert!(
                    w[1].best_fitness <= w[0].best_fitness,
                    "generation {} regressed: {} -> {}",
                    w[1].generation,
                    w[0].best_fitness,
                    w[1].best_fitness
                );
            }
        }
    }

    #[test]
    fn converges_in_most_runs() {
        const RUNS: u64 = 20;
        let converged = (0..RUNS)
            .filter(|seed| {
                let result = engine(convergence_config(), *seed).run_evolution(|_, _, _| {});
                result.converged() && result.generations() < 1000
            })
            .count();
        assert!(
            converged as u64 >= RUNS * 4 / 5,
            "only {}/{} runs converged",
            converged,
            RUNS
        );
    }

    #[test]
    fn converged_run_ends_on_target() {
        let result = engine(convergence_config(), 33).run_evolution(|_, _, _| {});
        if result.converged() {
            assert_eq!(result.champion, result.target);
            assert_eq!(result.best_fitness(), 0);
            assert_eq!(result.records.last().unwrap().best_fitness, 0);
        } else {
            assert_eq!(result.outcome, RunOutcome::Exhausted);
            assert_eq!(result.generations(), 1000);
        }
    }

    #[test]
    fn seeded_target_stops_at_first_generation() {
        let config = convergence_config();
        let mut engine = EvolutionEngine::new_seeded(
            vec![Color::new(200, 0, 0), Color::new(10, 10, 10)],
            config,
            ChaCha8Rng::seed_from_u64(34),
        )
        .unwrap();
        let mut calls = vec![];
        let result = engine.run_evolution(|population, generation, best_fitness| {
            assert_eq!(population.len(), 50);
            assert_eq!(population[0], Color::new(10, 10, 10));
            calls.push((generation, best_fitness));
        });
        assert_eq!(calls, vec![(1, 0)]);
        assert_eq!(result.outcome, RunOutcome::Converged);
        assert_eq!(result.generations(), 1);
        // No reproduction happened, so the population is the sorted initial one.
        assert_eq!(engine.population()[0], Color::new(10, 10, 10));
        assert!(engine.population().contains(&Color::new(200, 0, 0)));
    }

    #[test]
    fn exhausts_generation_budget() {
        // No mutation and a single survivor: the population never changes.
        let config = EvolutionConfig {
            generations: 12,
            population_size: 4,
            keep_population_num: 1,
            mutation_rate: 0.0,
            mutation_intensity: 0.0,
            target_color: Some(Color::new(255, 255, 255)),
        };
        let mut engine =
            EvolutionEngine::new_seeded(vec![Color::new(0, 0, 0)], config, ChaCha8Rng::seed_from_u64(35))
                .unwrap();
        let result = engine.run_evolution(|_, _, _| {});
        assert_eq!(result.outcome, RunOutcome::Exhausted);
        assert_eq!(result.generations(), 12);
        assert!(result.records[1..]
            .iter()
            .all(|r| r.best_individual == result.records[0].best_individual));
        assert!(result.records[1..].iter().all(|r| r.fitness.maximum == r.fitness.minimum));
    }

    #[test]
    fn cancelled_runs_stop_after_callback() {
        let config = EvolutionConfig {
            mutation_rate: 0.0,
            target_color: Some(Color::new(255, 255, 255)),
            ..EvolutionConfig::default()
        };
        let mut engine =
            EvolutionEngine::new_seeded(vec![Color::new(0, 0, 0); 25], config, ChaCha8Rng::seed_from_u64(36))
                .unwrap();
        let mut calls = 0;
        let result = engine.run_evolution_with(|_, generation, _| {
            calls += 1;
            if generation == 5 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(calls, 5);
        assert_eq!(result.outcome, RunOutcome::Cancelled);
        assert_eq!(result.generations(), 5);
    }

    #[test]
    fn each_run_starts_fresh() {
        let mut engine = engine(convergence_config(), 37);
        let first = engine.run_evolution(|_, _, _| {});
        let mut first_generation = vec![];
        let second = engine.run_evolution(|population, generation, _| {
            if generation == 1 {
                first_generation = population.to_vec();
            }
        });
        assert_eq!(second.records[0].generation, 1);
        assert_eq!(second.target, first.target);
        assert_eq!(first_generation.len(), 50);
    }

    #[test]
    fn run_evolution_rejects_malformed_config() {
        let config = EvolutionConfig {
            population_size: 1,
            keep_population_num: 1,
            ..EvolutionConfig::default()
        };
        assert_eq!(
            run_evolution(config, ChaCha8Rng::seed_from_u64(38), |_, _, _| {}).err(),
            Some(ConfigError::PopulationTooSmall(1))
        );
    }
}
