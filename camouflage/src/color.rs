//! Colors are both the individuals being evolved
//! and the target they are evolved towards.
//! Each of the three channels is treated as a gene.
mod errors;

pub use errors::ColorParseError;

use crate::rng;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of genes in a color.
pub const CHANNELS: usize = 3;

/// An RGB color triple.
///
/// Channels are stored as `u8`, so every gene
/// is always within [0, 255].
///
/// Suports Serde for convenient configuration saving and loading.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Returns a color with each channel sampled
    /// uniformly from [0, 255].
    ///
    /// # Examples
    /// ```
    /// use camouflage::Color;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let mut rng = ChaCha8Rng::seed_from_u64(7);
    /// let a = Color::random(&mut rng);
    /// let b = Color::random(&mut rng);
    /// assert_ne!(a, b);
    /// ```
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Color {
        Color::new(rng.gen(), rng.gen(), rng.gen())
    }

    /// Returns the color's genes in `[r, g, b]` order.
    pub const fn channels(&self) -> [u8; CHANNELS] {
        [self.r, self.g, self.b]
    }

    /// Builds a color from genes in `[r, g, b]` order.
    pub const fn from_channels(channels: [u8; CHANNELS]) -> Color {
        Color::new(channels[0], channels[1], channels[2])
    }

    /// Returns the sum of absolute per-channel differences
    /// between two colors. This is the fitness of an individual
    /// relative to a target: lower is better, 0 is an exact match.
    ///
    /// # Examples
    /// ```
    /// use camouflage::Color;
    ///
    /// let target = Color::new(10, 10, 10);
    /// assert_eq!(Color::new(12, 7, 10).distance(&target), 5);
    /// assert_eq!(target.distance(&target), 0);
    /// ```
    pub fn distance(&self, other: &Color) -> u32 {
        self.channels()
            .iter()
            .zip(other.channels())
            .map(|(a, b)| a.abs_diff(b) as u32)
            .sum()
    }

    /// Single-point crossover at a fixed cut point: genes before
    /// `cut` come from `parent1`, genes from `cut` onward from `parent2`.
    ///
    /// # Panics
    /// This function will panic if `cut` is greater than [`CHANNELS`].
    ///
    /// # Examples
    /// ```
    /// use camouflage::Color;
    ///
    /// let p1 = Color::new(1, 2, 3);
    /// let p2 = Color::new(4, 5, 6);
    /// assert_eq!(Color::crossover_at(1, &p1, &p2), Color::new(1, 5, 6));
    /// assert_eq!(Color::crossover_at(2, &p2, &p1), Color::new(4, 5, 3));
    /// ```
    pub fn crossover_at(cut: usize, parent1: &Color, parent2: &Color) -> Color {
        assert!(cut <= CHANNELS, "crossover point {} out of bounds", cut);
        let mut genes = parent1.channels();
        genes[cut..].copy_from_slice(&parent2.channels()[cut..]);
        Color::from_channels(genes)
    }

    /// Combines two parents into two complementary children,
    /// cutting after the first or the second gene with equal
    /// probability. The second child is the mirror of the first.
    pub fn crossover<R: Rng + ?Sized>(parent1: &Color, parent2: &Color, rng: &mut R) -> (Color, Color) {
        let cut = rng.gen_range(1..CHANNELS);
        (
            Color::crossover_at(cut, parent1, parent2),
            Color::crossover_at(cut, parent2, parent1),
        )
    }

    /// Returns a mutated copy of the color.
    ///
    /// Each gene mutates independently with probability `rate`.
    /// A mutating gene is nudged by a rounded standard normal
    /// sample, scaled by `1 ± intensity` (truncating toward zero),
    /// and clamped to [0, 255].
    ///
    /// # Examples
    /// ```
    /// use camouflage::Color;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let color = Color::new(40, 80, 120);
    ///
    /// // Nothing mutates with a zero rate.
    /// assert_eq!(color.mutate(0.0, 0.5, &mut rng), color);
    /// ```
    pub fn mutate<R: Rng + ?Sized>(&self, rate: f32, intensity: f32, rng: &mut R) -> Color {
        let mut genes = self.channels();
        for gene in &mut genes {
            if rng::gen_chance(rng, rate) {
                *gene = mutate_gene(*gene, intensity, rng);
            }
        }
        Color::from_channels(genes)
    }

    /// Returns the color as an uppercase `#RRGGBB` string.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

fn mutate_gene<R: Rng + ?Sized>(gene: u8, intensity: f32, rng: &mut R) -> u8 {
    let nudged = gene as f32 + rng::standard_normal(rng).round();
    let sign = if rng.gen::<bool>() { 1.0 } else { -1.0 };
    let scaled = (nudged * (1.0 + sign * intensity)).trunc();
    scaled.clamp(0.0, 255.0) as u8
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Parses `#RRGGBB` (the leading `#` is optional).
    ///
    /// # Examples
    /// ```
    /// use camouflage::Color;
    ///
    /// assert_eq!("#E6D8D8".parse::<Color>().unwrap(), Color::new(230, 216, 216));
    /// assert_eq!("0a0a0a".parse::<Color>().unwrap(), Color::new(10, 10, 10));
    /// assert!("#E6D8".parse::<Color>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Color, ColorParseError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(c));
        }
        if digits.len() != 2 * CHANNELS {
            return Err(ColorParseError::InvalidLength(digits.len()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[2 * i..2 * i + 2], 16)
                .map_err(|_| ColorParseError::InvalidDigit(digits.as_bytes()[2 * i] as char))
        };
        Ok(Color::new(channel(0)?, channel(1)?, channel(2)?))
    }
}
