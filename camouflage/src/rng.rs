use rand::Rng;
use std::f32::consts::TAU;

/// Returns `true` with probability `chance`.
///
/// `chance` is expected in [0.0, 1.0]; 1.0 always succeeds.
pub(crate) fn gen_chance<R: Rng + ?Sized>(rng: &mut R, chance: f32) -> bool {
    rng.gen::<f32>() < chance
}

/// Samples the standard normal distribution
/// using the Box-Muller transform.
pub(crate) fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    // Shift [0, 1) to (0, 1] so the logarithm stays finite.
    let u1 = 1.0 - rng.gen::<f32>();
    let u2 = rng.gen::<f32>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}
