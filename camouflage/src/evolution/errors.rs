use std::error::Error;
use std::fmt;

/// An error type indicating a configuration
/// that does not describe a well-defined run.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The generation budget was zero.
    NoGenerations,
    /// The population had fewer than two individuals.
    PopulationTooSmall(usize),
    /// The survivor pool was empty or larger than the population.
    InvalidSurvivorCount {
        survivors: usize,
        population_size: usize,
    },
    /// A probability or intensity was outside [0, 1].
    OutOfUnitInterval { name: &'static str, value: f32 },
    /// More seed individuals were given than fit in the population.
    TooManySeeds { seeds: usize, population_size: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoGenerations => write!(f, "evolution requires at least one generation"),
            Self::PopulationTooSmall(size) => write!(
                f,
                "population size must be at least 2, got {}",
                size
            ),
            Self::InvalidSurvivorCount {
                survivors,
                population_size,
            } => write!(
                f,
                "number of survivors must be between 1 and the population size ({}), got {}",
                population_size, survivors
            ),
            Self::OutOfUnitInterval { name, value } => {
                write!(f, "{} must be within [0, 1], got {}", name, value)
            }
            Self::TooManySeeds {
                seeds,
                population_size,
            } => write!(
                f,
                "{} seed individuals do not fit in a population of {}",
                seeds, population_size
            ),
        }
    }
}

impl Error for ConfigError {}
