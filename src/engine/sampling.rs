//! Random draws used by the model
//!
//! Thin wrappers over `rand_distr` that never fail at runtime: degenerate
//! parameters (zero spread, zero mean) collapse to their deterministic value
//! instead of returning a distribution error.

use crate::types::ServiceTimeParams;
use rand::Rng;
use rand_distr::{Distribution, Gamma, Normal, Poisson};

/// Normal draw; a non-positive or non-finite spread returns the mean exactly
pub fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, stddev: f64) -> f64 {
    if !stddev.is_finite() || stddev <= 0.0 {
        return mean;
    }
    match Normal::new(mean, stddev) {
        Ok(dist) => dist.sample(rng),
        Err(_) => mean,
    }
}

/// Normal draw floored at `min`
pub fn floored_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, stddev: f64, min: f64) -> f64 {
    normal(rng, mean, stddev).max(min)
}

/// Service time drawn from a parameter set
pub fn service_time<R: Rng + ?Sized>(rng: &mut R, params: &ServiceTimeParams) -> f64 {
    floored_normal(rng, params.mean, params.stddev, params.min)
}

/// Poisson count; a non-positive mean yields zero
pub fn poisson<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> u32 {
    if !mean.is_finite() || mean <= 0.0 {
        return 0;
    }
    match Poisson::new(mean) {
        Ok(dist) => {
            let draw: f64 = dist.sample(rng);
            draw as u32
        }
        Err(_) => 0,
    }
}

/// Bernoulli trial; the probability is clamped into [0, 1]
pub fn bernoulli<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    let p = if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) };
    rng.gen_bool(p)
}

/// Uniform draw on `[low, high)`; an empty range returns `low`
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// Gamma draw with the given shape and scale; degenerate parameters yield the mean
pub fn gamma<R: Rng + ?Sized>(rng: &mut R, shape: f64, scale: f64) -> f64 {
    match Gamma::new(shape, scale) {
        Ok(dist) => dist.sample(rng),
        Err(_) => (shape * scale).max(0.0),
    }
}

/// Sum of `count` independent floored normal draws
///
/// Each item is drawn and floored separately, which keeps the heavier tail of
/// the summed distribution.
pub fn summed_service_time<R: Rng + ?Sized>(
    rng: &mut R,
    params: &ServiceTimeParams,
    count: u32,
) -> f64 {
    (0..count).map(|_| service_time(&mut *rng, params)).sum()
}
