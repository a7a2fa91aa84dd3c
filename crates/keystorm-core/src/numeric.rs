//! Guarded arithmetic for ratios that may degenerate
//!
//! Zero-length clips and zero-duration effects would otherwise divide by zero.
//! Callers get `None` ("not applicable") instead of NaN or infinity.

/// Divide `numerator` by `denominator`, returning `None` when the result is not finite.
pub fn finite_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    let ratio = numerator / denominator;
    ratio.is_finite().then_some(ratio)
}

/// `f32` flavour of [`finite_ratio`].
pub fn finite_ratio_f32(numerator: f32, denominator: f32) -> Option<f32> {
    let ratio = numerator / denominator;
    ratio.is_finite().then_some(ratio)
}
