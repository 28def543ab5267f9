//! Channel controller: per-resource smoothing state and the tick body.

use tracing::{debug, warn};

use super::approach::approach;
use super::id::ChannelId;
use super::mapper::map_intensity;
use crate::easing::Easing;
use crate::error::TickError;
use crate::host::{EffectHandle, GameStateProvider, OverlaySink};

/// Smallest width of the `[end, start]` window and the margin kept between
/// `min_delta` and `max_delta_neg`.
pub const EPSILON: f32 = 0.001;

/// Tuning for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConfig {
    /// Fraction at which the overlay starts to show.
    pub start_fraction: f32,
    /// Fraction at which the overlay reaches full strength.
    pub end_fraction: f32,
    /// Curve applied inside the window.
    pub easing: Easing,
    /// Deadband: smaller changes are ignored.
    pub min_delta: f32,
    /// Largest per-tick decrease of the smoothed value.
    pub max_delta_neg: f32,
    /// Largest per-tick increase of the smoothed value.
    pub max_delta_pos: f32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            start_fraction: 1.0,
            end_fraction: 0.0,
            easing: Easing::Linear,
            min_delta: 0.01,
            max_delta_neg: 0.015,
            max_delta_pos: 0.015,
        }
    }
}

impl ChannelConfig {
    /// Enforce the window and delta invariants.
    ///
    /// A reversed window is swapped, a zero-width window is widened by
    /// [`EPSILON`], and `min_delta` is pulled below `max_delta_neg`.
    /// Every correction is logged against `channel`.
    #[must_use]
    pub fn normalized(mut self, channel: ChannelId) -> Self {
        if self.start_fraction < self.end_fraction {
            warn!(
                %channel,
                start = self.start_fraction,
                end = self.end_fraction,
                "range start is lower than end, swapping"
            );
            std::mem::swap(&mut self.start_fraction, &mut self.end_fraction);
        }

        if self.start_fraction - self.end_fraction < EPSILON {
            if self.start_fraction >= EPSILON {
                self.end_fraction = self.start_fraction - EPSILON;
            } else {
                self.start_fraction = self.end_fraction + EPSILON;
            }
            warn!(
                %channel,
                start = self.start_fraction,
                end = self.end_fraction,
                "range has no width, widened"
            );
        }

        if self.min_delta > self.max_delta_neg {
            let clamped = (self.max_delta_neg - EPSILON).max(0.0);
            warn!(
                %channel,
                min_delta = self.min_delta,
                max_delta = self.max_delta_neg,
                clamped,
                "min delta is higher than max delta, clamping"
            );
            self.min_delta = clamped;
        }

        self
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The change was inside the deadband; nothing was sent to the sink.
    Deadband,
    /// The smoothed value moved and the overlay was re-issued.
    Updated {
        /// Intensity sent to the sink.
        intensity: f32,
        /// Whether the sink accepted the new effect.
        triggered: bool,
    },
}

/// One monitored resource stream.
#[derive(Debug, Clone)]
pub struct Channel {
    id: ChannelId,
    enabled: bool,
    effect_id: String,
    config: ChannelConfig,
    current: f32,
    actual: f32,
    active: Option<EffectHandle>,
}

impl Channel {
    /// Create a channel at rest (full resource, no overlay).
    pub fn new(id: ChannelId, effect_id: impl Into<String>, config: ChannelConfig) -> Self {
        Self {
            id,
            enabled: true,
            effect_id: effect_id.into(),
            config,
            current: 1.0,
            actual: 1.0,
            active: None,
        }
    }

    /// Set whether the channel is ticked.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Channel identifier.
    #[inline]
    pub const fn id(&self) -> ChannelId {
        self.id
    }

    /// Whether the channel is ticked.
    #[inline]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Host effect driven by this channel.
    #[inline]
    pub fn effect_id(&self) -> &str {
        &self.effect_id
    }

    /// Tuning.
    #[inline]
    pub const fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Smoothed value.
    #[inline]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Last sampled value.
    #[inline]
    pub const fn actual(&self) -> f32 {
        self.actual
    }

    /// Handle of the overlay effect this channel last started.
    #[inline]
    pub const fn active_effect(&self) -> Option<EffectHandle> {
        self.active
    }

    /// Overwrite the smoothed value (clamped).
    pub fn set_current(&mut self, value: f32) {
        self.current = clamp_unit(value);
    }

    /// Intensity for the current smoothed value.
    #[inline]
    pub fn intensity(&self) -> f32 {
        map_intensity(
            self.current,
            self.config.start_fraction,
            self.config.end_fraction,
            self.config.easing,
        )
    }

    /// Snap both the smoothed and the sampled value onto `value`.
    pub fn seed(&mut self, value: f32) {
        let value = clamp_unit(value);
        self.actual = value;
        self.current = value;
    }

    /// Sample the provider and [`seed`](Self::seed) from the reading.
    pub fn reseed(&mut self, provider: &dyn GameStateProvider) -> Result<f32, TickError> {
        let value = clamp_unit(provider.sample_percentage(self.id)?);
        self.seed(value);
        Ok(value)
    }

    /// Run one tick: sample, filter, map, and re-issue the overlay.
    ///
    /// A provider failure leaves the channel untouched. A sink failure is
    /// logged; the smoothed value keeps its new position regardless.
    pub fn tick(
        &mut self,
        provider: &dyn GameStateProvider,
        sink: &mut dyn OverlaySink,
    ) -> Result<TickOutcome, TickError> {
        self.actual = clamp_unit(provider.sample_percentage(self.id)?);

        if (self.current - self.actual).abs() < self.config.min_delta {
            return Ok(TickOutcome::Deadband);
        }

        self.current = clamp_unit(approach(
            self.current,
            self.actual,
            self.config.max_delta_neg,
            self.config.max_delta_pos,
        ));
        let intensity = self.intensity();

        if let Some(handle) = self.active.take() {
            sink.stop(handle);
        }
        let triggered = match sink.trigger(&self.effect_id, intensity) {
            Ok(handle) => {
                self.active = Some(handle);
                true
            }
            Err(e) => {
                warn!(channel = %self.id, error = %e, "overlay trigger failed");
                false
            }
        };

        debug!(
            channel = %self.id,
            current = self.current,
            actual = self.actual,
            intensity,
            "tick"
        );
        Ok(TickOutcome::Updated {
            intensity,
            triggered,
        })
    }

    /// Stop the active overlay, if any.
    pub fn retire(&mut self, sink: &mut dyn OverlaySink) {
        if let Some(handle) = self.active.take() {
            sink.stop(handle);
        }
    }
}

#[inline]
fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
