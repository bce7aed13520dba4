//! Mathematical utilities for the placement engine

/// Linear interpolation and clamping for distance falloff
pub mod interpolation;
/// Seedable random selection: weighted picks, shuffles and Bernoulli trials
pub mod probability;
