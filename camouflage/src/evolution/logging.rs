//! Records of an evolution run, kept one per generation.
use crate::Color;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use camouflage::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert!(Stats::from(std::iter::empty()).is_none());
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Option<Stats> {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return None;
        }
        data.sort_unstable_by(|a, b| {
            a.partial_cmp(b)
                .unwrap_or_else(|| panic!("invalid statistic detected (NaN)"))
        });
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f32>() / data.len() as f32,
            median,
        })
    }
}

/// A snapshot of a single generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Generation number, starting from 1.
    pub generation: usize,
    /// Fitness of the generation's best individual.
    pub best_fitness: u32,
    /// The generation's best individual.
    pub best_individual: Color,
    /// Fitness statistics over the whole generation.
    pub fitness: Stats,
}

impl GenerationRecord {
    /// Records a generation sorted by ascending fitness.
    ///
    /// # Panics
    /// This function will panic if the population is empty.
    pub(crate) fn new(generation: usize, sorted_population: &[Color], target: &Color) -> GenerationRecord {
        let best_individual = sorted_population[0];
        GenerationRecord {
            generation,
            best_fitness: best_individual.distance(target),
            best_individual,
            fitness: Stats::from(sorted_population.iter().map(|c| c.distance(target) as f32))
                .unwrap_or_else(|| panic!("empty generation {} has no statistics", generation)),
        }
    }
}

impl fmt::Display for GenerationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generation {}: best fitness {}, best individual {}, mean fitness {:.1}",
            self.generation, self.best_fitness, self.best_individual, self.fitness.mean
        )
    }
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The best individual matched the target exactly.
    Converged,
    /// Every generation ran without an exact match.
    Exhausted,
    /// The per-generation callback asked to stop.
    Cancelled,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged => write!(f, "solution found"),
            Self::Exhausted => write!(f, "generation budget exhausted"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The result of an evolution run.
///
/// Suports Serde for saving a run's history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Color the population evolved towards.
    pub target: Color,
    pub outcome: RunOutcome,
    /// Best individual of the last evaluated generation.
    pub champion: Color,
    /// One record per evaluated generation, in order.
    pub records: Vec<GenerationRecord>,
}

impl RunResult {
    /// Returns whether the target was matched exactly.
    pub fn converged(&self) -> bool {
        self.outcome == RunOutcome::Converged
    }

    /// Returns the number of the last evaluated generation.
    pub fn generations(&self) -> usize {
        self.records.last().map_or(0, |r| r.generation)
    }

    /// Returns the champion's fitness.
    pub fn best_fitness(&self) -> u32 {
        self.champion.distance(&self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_even_length_median() {
        let stats = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied()).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.minimum, 1.0);
        assert_eq!(stats.maximum, 4.0);
    }

    #[test]
    fn generation_record_of_sorted_population() {
        let target = Color::new(10, 10, 10);
        let population = [
            Color::new(10, 10, 11),
            Color::new(10, 12, 10),
            Color::new(0, 10, 10),
        ];
        let record = GenerationRecord::new(4, &population, &target);
        assert_eq!(record.generation, 4);
        assert_eq!(record.best_fitness, 1);
        assert_eq!(record.best_individual, population[0]);
        assert_eq!(record.fitness.maximum, 10.0);
        assert_eq!(record.fitness.median, 2.0);
        assert_eq!(
            record.to_string(),
            "Generation 4: best fitness 1, best individual RGB(10, 10, 11), mean fitness 4.3"
        );
    }

    #[test]
    fn run_result_summary() {
        let target = Color::new(10, 10, 10);
        let population = [Color::new(10, 10, 10), Color::new(20, 20, 20)];
        let result = RunResult {
            target,
            outcome: RunOutcome::Converged,
            champion: population[0],
            records: vec![
                GenerationRecord::new(1, &population[1..], &target),
                GenerationRecord::new(2, &population, &target),
            ],
        };
        assert!(result.converged());
        assert_eq!(result.generations(), 2);
        assert_eq!(result.best_fitness(), 0);

        let json = serde_json::to_string(&result).unwrap();
        let restored: RunResult = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, result);
    }
}
