use super::ConfigError;
use crate::Color;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration data for a single evolution run.
///
/// # Note
/// All quantities expressing probabilities or
/// intensities should be in the range [0.0, 1.0].
/// Configurations are checked by [`validate`] when
/// an [`EvolutionEngine`] is created.
///
/// [`validate`]: EvolutionConfig::validate
/// [`EvolutionEngine`]: crate::EvolutionEngine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Maximum number of generations to evolve.
    pub generations: usize,
    /// Number of individuals in every generation.
    pub population_size: usize,
    /// Top n of each generation which can participate
    /// in mating.
    pub keep_population_num: usize,
    /// Chance of each gene of a child being mutated.
    pub mutation_rate: f32,
    /// Fraction by which a mutated gene is scaled
    /// up or down.
    pub mutation_intensity: f32,
    /// Color to evolve towards. If `None`, a random
    /// target is chosen when the engine is created.
    pub target_color: Option<Color>,
}

impl EvolutionConfig {
    /// Checks that the configuration describes a
    /// well-defined run.
    ///
    /// # Errors
    /// Returns an error if there are no generations to run,
    /// the population has fewer than 2 individuals,
    /// `keep_population_num` is not in `1..=population_size`,
    /// or the mutation rate or intensity are outside [0, 1].
    ///
    /// # Examples
    /// ```
    /// use camouflage::{ConfigError, EvolutionConfig};
    ///
    /// let config = EvolutionConfig {
    ///     population_size: 10,
    ///     keep_population_num: 20,
    ///     ..EvolutionConfig::default()
    /// };
    ///
    /// assert!(EvolutionConfig::default().validate().is_ok());
    /// assert_eq!(
    ///     config.validate(),
    ///     Err(ConfigError::InvalidSurvivorCount { survivors: 20, population_size: 10 }),
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.keep_population_num == 0 || self.keep_population_num > self.population_size {
            return Err(ConfigError::InvalidSurvivorCount {
                survivors: self.keep_population_num,
                population_size: self.population_size,
            });
        }
        check_unit_interval("mutation_rate", self.mutation_rate)?;
        check_unit_interval("mutation_intensity", self.mutation_intensity)
    }
}

fn check_unit_interval(name: &'static str, value: f32) -> Result<(), ConfigError> {
    // NaN fails the range check as well.
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitInterval { name, value })
    }
}

impl Default for EvolutionConfig {
    fn default() -> EvolutionConfig {
        EvolutionConfig {
            generations: 100,
            population_size: 25,
            keep_population_num: 10,
            mutation_rate: 0.01,
            mutation_intensity: 0.001,
            target_color: Some(Color::new(0xE6, 0xD8, 0xD8)),
        }
    }
}

impl fmt::Display for EvolutionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EvolutionConfig(generations={}, population_size={}, keep_population_num={}, \
            mutation_rate={}, mutation_intensity={}, target_color=",
            self.generations,
            self.population_size,
            self.keep_population_num,
            self.mutation_rate,
            self.mutation_intensity,
        )?;
        match self.target_color {
            Some(color) => write!(f, "{})", color),
            None => write!(f, "random)"),
        }
    }
}
