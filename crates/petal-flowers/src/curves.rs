//! Growth curve: normalized age to normalized scale

/// Age below which an instant-mode flower stays invisible
pub const INSTANT_THRESHOLD: f32 = 0.05;

/// Ease-out cubic, `1 - (1 - t)^3`
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t - 1.0;
    t * t * t + 1.0
}

/// Scale factor for a flower of normalized `age` in [0, 1).
///
/// Instant mode is a step at [`INSTANT_THRESHOLD`]. Otherwise an ease-out cubic
/// flattened by a 0.8 power, so flowers shoot up early and settle gently.
pub fn growth_scale(age: f32, instant: bool) -> f32 {
    if instant {
        return if age > INSTANT_THRESHOLD { 1.0 } else { 0.0 };
    }
    let t = age.clamp(0.0, 1.0);
    ease_out_cubic(t).max(0.0).powf(0.8)
}
