//! Curve mapper: turn a smoothed resource fraction into an overlay intensity.
//!
//! The input is a "fullness" (how much of the resource remains); the
//! output is how strongly the overlay should show, so it rises as the
//! resource drains. Inside the `[end, start]` window the fraction is
//! flipped onto `[0, 1]` before the curve is applied:
//!
//! ```text
//!  value:  1.0 ── start ────────── end ── 0.0
//!  input:   0  ──  0    ────────── 1   ── 1
//! ```

use crate::easing::Easing;

/// Map `value` through the `[end, start]` window and `curve`.
///
/// Above `start` yields `curve(0)`, below `end` yields `curve(1)`. A
/// zero-width window (`start == end`) acts as a hard threshold at
/// `start` instead of dividing by zero.
///
/// ```
/// use statfx::{control::map_intensity, Easing};
/// assert_eq!(map_intensity(1.0, 1.0, 0.0, Easing::Linear), 0.0);
/// assert!((map_intensity(0.25, 1.0, 0.0, Easing::Linear) - 0.75).abs() < 1e-6);
/// ```
#[must_use]
#[inline]
pub fn map_intensity(value: f32, start: f32, end: f32, curve: Easing) -> f32 {
    if value > start {
        return curve.apply(0.0);
    }
    if value < end {
        return curve.apply(1.0);
    }

    let range = start - end;
    if range <= 0.0 {
        // value == start == end
        return curve.apply(0.0);
    }
    curve.apply((end - value) / range + 1.0)
}
