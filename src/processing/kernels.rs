use crate::state::interpolation::InterpolationKind;

/// Gaussian falloff. Never reaches zero.
pub fn gaussian(distance: usize, sigma: f64) -> f64 {
    let d = distance as f64;
    (-(d * d) / (2.0 * sigma * sigma)).exp()
}

/// Triangular falloff, zero at and beyond `radius`.
pub fn linear(distance: usize, radius: usize) -> f64 {
    let normalized = distance as f64 / radius as f64;
    (1.0 - normalized).max(0.0)
}

/// Hard step: full weight inside the radius (inclusive), nothing outside.
pub fn constant(distance: usize, radius: usize) -> f64 {
    if distance <= radius {
        1.0
    } else {
        0.0
    }
}

/// Influence weight in [0, 1] for a sample `distance` samples away from the edit.
pub fn weight(kind: InterpolationKind, distance: usize, radius: usize, sigma: f64) -> f64 {
    match kind {
        InterpolationKind::Gaussian => gaussian(distance, sigma),
        InterpolationKind::Linear => linear(distance, radius),
        InterpolationKind::Constant => constant(distance, radius),
    }
}
