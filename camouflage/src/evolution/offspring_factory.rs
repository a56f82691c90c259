use super::EvolutionConfig;
use crate::Color;

use rand::prelude::{Rng, SliceRandom};

/// Auxiliary type for offspring generation.
/// Builds the next generation from a population
/// sorted by ascending fitness, according to the
/// specified config.
pub(super) struct OffspringFactory<'a, R: ?Sized> {
    survivors: &'a [Color],
    config: &'a EvolutionConfig,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> OffspringFactory<'a, R> {
    /// Only the top [`keep_population_num`] of `sorted_population`
    /// are eligible as parents.
    ///
    /// [`keep_population_num`]: EvolutionConfig::keep_population_num
    pub(super) fn new(
        sorted_population: &'a [Color],
        config: &'a EvolutionConfig,
        rng: &'a mut R,
    ) -> OffspringFactory<'a, R> {
        let survivors = config.keep_population_num.min(sorted_population.len());
        OffspringFactory {
            survivors: &sorted_population[..survivors],
            config,
            rng,
        }
    }

    /// Generate the next generation: the champion followed
    /// by mated offspring, exactly `population_size` in total.
    pub(super) fn next_generation(&mut self, champion: Color) -> Vec<Color> {
        let size = self.config.population_size;
        // Offspring come in pairs, so one may overshoot.
        let mut offspring = Vec::with_capacity(size + 1);
        offspring.push(champion);
        while offspring.len() < size {
            let (child1, child2) = self.mate();
            offspring.push(child1);
            offspring.push(child2);
        }
        offspring.truncate(size);
        offspring
    }

    /// Choose two parents from the survivors (with
    /// replacement), cross them over and mutate both children.
    fn mate(&mut self) -> (Color, Color) {
        let parent1 = self.choose_parent();
        let parent2 = self.choose_parent();
        let (child1, child2) = Color::crossover(parent1, parent2, &mut *self.rng);
        (self.mutate(child1), self.mutate(child2))
    }

    fn choose_parent(&mut self) -> &'a Color {
        let survivors: &'a [Color] = self.survivors;
        survivors
            .choose(&mut *self.rng)
            .unwrap_or_else(|| panic!("no eligible parents in empty survivor pool"))
    }

    fn mutate(&mut self, child: Color) -> Color {
        child.mutate(
            self.config.mutation_rate,
            self.config.mutation_intensity,
            &mut *self.rng,
        )
    }
}
