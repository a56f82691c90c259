//! Terminal rendering of a running evolution,
//! using 24-bit ANSI colors.
use camouflage::Color;

use std::io::{self, Write};

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARKLINE_WIDTH: usize = 60;
const RESET: &str = "\x1b[0m";

/// Redraws the population and fitness history
/// after every generation.
pub struct Dashboard<W> {
    out: W,
    target: Color,
    fitness_history: Vec<u32>,
}

impl<W: Write> Dashboard<W> {
    pub fn new(out: W, target: Color) -> Dashboard<W> {
        Dashboard {
            out,
            target,
            fitness_history: vec![],
        }
    }

    /// Records a generation's best fitness and redraws
    /// the dashboard. `population` must be sorted by fitness.
    pub fn update(
        &mut self,
        population: &[Color],
        generation: usize,
        best_fitness: u32,
    ) -> io::Result<()> {
        self.fitness_history.push(best_fitness);

        write!(self.out, "\x1b[2J\x1b[H")?;
        self.draw_population(population)?;
        writeln!(self.out)?;
        writeln!(self.out, "Current generation: {}", generation)?;
        writeln!(self.out, "Current fitness: {}", best_fitness)?;
        writeln!(
            self.out,
            "{} Target: {} {}",
            swatch(&self.target),
            self.target,
            self.target.to_hex()
        )?;
        if let Some(best) = population.first() {
            writeln!(self.out, "{} Best individual: {}", swatch(best), best)?;
        }
        writeln!(
            self.out,
            "Fitness (lower is better): {}",
            sparkline(&self.fitness_history, SPARKLINE_WIDTH)
        )?;
        self.out.flush()
    }

    /// Draws every individual as a dot on a
    /// background of the target color.
    fn draw_population(&mut self, population: &[Color]) -> io::Result<()> {
        let (columns, rows) = grid_shape(population.len());
        let background = format!(
            "\x1b[48;2;{};{};{}m",
            self.target.r, self.target.g, self.target.b
        );
        for row in 0..rows {
            write!(self.out, "{}", background)?;
            for column in 0..columns {
                match population.get(row * columns + column) {
                    Some(c) => write!(self.out, "\x1b[38;2;{};{};{}m● ", c.r, c.g, c.b)?,
                    None => write!(self.out, "  ")?,
                }
            }
            writeln!(self.out, "{}", RESET)?;
        }
        Ok(())
    }
}

fn swatch(color: &Color) -> String {
    format!("\x1b[48;2;{};{};{}m  {}", color.r, color.g, color.b, RESET)
}

/// Returns the `(columns, rows)` of the smallest
/// near-square grid holding `count` cells.
pub(crate) fn grid_shape(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let columns = (count as f64).sqrt().ceil() as usize;
    (columns, (count + columns - 1) / columns)
}

/// Plots the last `width` values as a line of block characters.
pub(crate) fn sparkline(values: &[u32], width: usize) -> String {
    let window = &values[values.len().saturating_sub(width)..];
    let (min, max) = match (window.iter().min(), window.iter().max()) {
        (Some(min), Some(max)) => (*min, *max),
        _ => return String::new(),
    };
    let span = (max - min).max(1) as usize;
    window
        .iter()
        .map(|v| SPARKS[(*v - min) as usize * (SPARKS.len() - 1) / span])
        .collect()
}
