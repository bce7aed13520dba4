//! Linear interpolation helpers for probability falloff curves
//!
//! Both helpers are generic over `num_traits::Float` so rulesets can work in
//! either `f32` or `f64` without duplicating the clamping rules.

use num_traits::Float;

/// Interpolate between `from` and `to` by `t`, with `t` clamped to `[0, 1]`
pub fn lerp<T: Float>(from: T, to: T, t: T) -> T {
    let t = clamp_unit(t);
    from + (to - from) * t
}

/// Position of `value` between `from` and `to`, clamped to `[0, 1]`
///
/// Values past `to` saturate at 1 instead of extrapolating. A degenerate
/// interval (`from == to`) yields 0.
pub fn inverse_lerp<T: Float>(from: T, to: T, value: T) -> T {
    let span = to - from;
    if span == T::zero() {
        return T::zero();
    }

    clamp_unit((value - from) / span)
}

/// Clamp a value into the unit interval, mapping NaN to 0
pub fn clamp_unit<T: Float>(value: T) -> T {
    if value.is_nan() {
        return T::zero();
    }
    value.max(T::zero()).min(T::one())
}

/// Check two values are within `tolerance` of each other
pub fn approximately_equal<T: Float>(a: T, b: T, tolerance: T) -> bool {
    (a - b).abs() <= tolerance
}
