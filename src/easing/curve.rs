//! Easing curves: the closed set of named transition shapes.
//!
//! Every curve maps `t ∈ [0, 1]` to a shaped progress value with
//! `f(0) = 0` and `f(1) = 1`. Back and Elastic curves overshoot in
//! between; everything else stays inside `[0, 1]`.
//!
//! ```text
//! family   │ In        Out        InOut
//! ─────────┼──────────────────────────────
//! Sine     │  0         1          2
//! Quad     │  3         4          5
//! ...      │ ...       ...        ...
//! Bounce   │ 27        28         29
//! Linear   │ 30
//! ```

use std::f32::consts::PI;

const BACK_C1: f32 = 1.701_58;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;
const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;
const BOUNCE_N1: f32 = 7.5625;
const BOUNCE_D1: f32 = 2.75;

/// A named easing curve.
///
/// The discriminant is the curve's stable integer code.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    /// `1 - cos(t·π/2)`
    EaseInSine = 0,
    /// `sin(t·π/2)`
    EaseOutSine = 1,
    /// `-(cos(π·t) - 1) / 2`
    EaseInOutSine = 2,
    /// `t²`
    EaseInQuad = 3,
    /// `1 - (1 - t)²`
    EaseOutQuad = 4,
    /// Quadratic in, then out.
    EaseInOutQuad = 5,
    /// `t³`
    EaseInCubic = 6,
    /// `1 - (1 - t)³`
    EaseOutCubic = 7,
    /// Cubic in, then out.
    EaseInOutCubic = 8,
    /// `t⁴`
    EaseInQuart = 9,
    /// `1 - (1 - t)⁴`
    EaseOutQuart = 10,
    /// Quartic in, then out.
    EaseInOutQuart = 11,
    /// `t⁵`
    EaseInQuint = 12,
    /// `1 - (1 - t)⁵`
    EaseOutQuint = 13,
    /// Quintic in, then out.
    EaseInOutQuint = 14,
    /// `2^(10t - 10)`
    EaseInExpo = 15,
    /// `1 - 2^(-10t)`
    EaseOutExpo = 16,
    /// Exponential in, then out.
    EaseInOutExpo = 17,
    /// `1 - √(1 - t²)`
    EaseInCirc = 18,
    /// `√(1 - (t - 1)²)`
    EaseOutCirc = 19,
    /// Circular in, then out.
    EaseInOutCirc = 20,
    /// Pulls back below zero before accelerating.
    EaseInBack = 21,
    /// Overshoots past one before settling.
    EaseOutBack = 22,
    /// Back in, then out.
    EaseInOutBack = 23,
    /// Decaying oscillation growing into the target.
    EaseInElastic = 24,
    /// Oscillation settling onto the target.
    EaseOutElastic = 25,
    /// Elastic in, then out.
    EaseInOutElastic = 26,
    /// Bounces that grow into the target.
    EaseInBounce = 27,
    /// Bounces settling onto the target.
    EaseOutBounce = 28,
    /// Bounce in, then out.
    EaseInOutBounce = 29,
    /// `t`
    #[default]
    Linear = 30,
}

impl Easing {
    /// Every curve, in code order.
    pub const ALL: [Self; 31] = [
        Self::EaseInSine,
        Self::EaseOutSine,
        Self::EaseInOutSine,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::EaseInQuart,
        Self::EaseOutQuart,
        Self::EaseInOutQuart,
        Self::EaseInQuint,
        Self::EaseOutQuint,
        Self::EaseInOutQuint,
        Self::EaseInExpo,
        Self::EaseOutExpo,
        Self::EaseInOutExpo,
        Self::EaseInCirc,
        Self::EaseOutCirc,
        Self::EaseInOutCirc,
        Self::EaseInBack,
        Self::EaseOutBack,
        Self::EaseInOutBack,
        Self::EaseInElastic,
        Self::EaseOutElastic,
        Self::EaseInOutElastic,
        Self::EaseInBounce,
        Self::EaseOutBounce,
        Self::EaseInOutBounce,
        Self::Linear,
    ];

    /// Stable integer code of this curve.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Curve for an integer code, if one exists.
    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        if (code as usize) < Self::ALL.len() {
            Some(Self::ALL[code as usize])
        } else {
            None
        }
    }

    /// Canonical name, e.g. `"easeInQuad"` or `"linear"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::EaseInSine => "easeInSine",
            Self::EaseOutSine => "easeOutSine",
            Self::EaseInOutSine => "easeInOutSine",
            Self::EaseInQuad => "easeInQuad",
            Self::EaseOutQuad => "easeOutQuad",
            Self::EaseInOutQuad => "easeInOutQuad",
            Self::EaseInCubic => "easeInCubic",
            Self::EaseOutCubic => "easeOutCubic",
            Self::EaseInOutCubic => "easeInOutCubic",
            Self::EaseInQuart => "easeInQuart",
            Self::EaseOutQuart => "easeOutQuart",
            Self::EaseInOutQuart => "easeInOutQuart",
            Self::EaseInQuint => "easeInQuint",
            Self::EaseOutQuint => "easeOutQuint",
            Self::EaseInOutQuint => "easeInOutQuint",
            Self::EaseInExpo => "easeInExpo",
            Self::EaseOutExpo => "easeOutExpo",
            Self::EaseInOutExpo => "easeInOutExpo",
            Self::EaseInCirc => "easeInCirc",
            Self::EaseOutCirc => "easeOutCirc",
            Self::EaseInOutCirc => "easeInOutCirc",
            Self::EaseInBack => "easeInBack",
            Self::EaseOutBack => "easeOutBack",
            Self::EaseInOutBack => "easeInOutBack",
            Self::EaseInElastic => "easeInElastic",
            Self::EaseOutElastic => "easeOutElastic",
            Self::EaseInOutElastic => "easeInOutElastic",
            Self::EaseInBounce => "easeInBounce",
            Self::EaseOutBounce => "easeOutBounce",
            Self::EaseInOutBounce => "easeInOutBounce",
            Self::Linear => "linear",
        }
    }

    /// Whether the curve intentionally leaves `[0, 1]` between its endpoints.
    #[inline]
    pub const fn overshoots(self) -> bool {
        matches!(
            self,
            Self::EaseInBack
                | Self::EaseOutBack
                | Self::EaseInOutBack
                | Self::EaseInElastic
                | Self::EaseOutElastic
                | Self::EaseInOutElastic
        )
    }

    /// Evaluate the curve. `t` is clamped to `[0, 1]` first.
    #[must_use]
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        match self {
            Self::Linear => t,

            Self::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Self::EaseOutSine => (t * PI / 2.0).sin(),
            Self::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,

            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }

            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }

            Self::EaseInQuart => t.powi(4),
            Self::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Self::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }

            Self::EaseInQuint => t.powi(5),
            Self::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Self::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }

            Self::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2.0_f32.powf(10.0 * t - 10.0)
                }
            }
            Self::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
            Self::EaseInOutExpo => {
                if t == 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    2.0_f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }

            Self::EaseInCirc => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Self::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).max(0.0).sqrt(),
            Self::EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).max(0.0).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).max(0.0).sqrt() + 1.0) / 2.0
                }
            }

            Self::EaseInBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            Self::EaseOutBack => {
                let u = t - 1.0;
                1.0 + BACK_C3 * u * u * u + BACK_C1 * u * u
            }
            Self::EaseInOutBack => {
                if t < 0.5 {
                    let u = 2.0 * t;
                    (u * u * ((BACK_C2 + 1.0) * u - BACK_C2)) / 2.0
                } else {
                    let u = 2.0 * t - 2.0;
                    (u * u * ((BACK_C2 + 1.0) * u + BACK_C2) + 2.0) / 2.0
                }
            }

            Self::EaseInElastic => {
                if t == 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    -(2.0_f32.powf(10.0 * t - 10.0)) * ((10.0 * t - 10.75) * ELASTIC_C4).sin()
                }
            }
            Self::EaseOutElastic => {
                if t == 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    2.0_f32.powf(-10.0 * t) * ((10.0 * t - 0.75) * ELASTIC_C4).sin() + 1.0
                }
            }
            Self::EaseInOutElastic => {
                if t == 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    -(2.0_f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin())
                        / 2.0
                } else {
                    (2.0_f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin())
                        / 2.0
                        + 1.0
                }
            }

            Self::EaseInBounce => 1.0 - bounce_out(1.0 - t),
            Self::EaseOutBounce => bounce_out(t),
            Self::EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }
}

impl std::fmt::Display for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Piecewise parabolic bounce settling onto 1.
#[inline]
fn bounce_out(t: f32) -> f32 {
    if t < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * t * t
    } else if t < 2.0 / BOUNCE_D1 {
        let t = t - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.75
    } else if t < 2.5 / BOUNCE_D1 {
        let t = t - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.984_375
    }
}
