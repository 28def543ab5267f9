//! Traits the host implements to feed readings in and take overlays out.

use crate::config::EffectProfile;
use crate::control::ChannelId;
use crate::error::{ProviderError, SinkError};

/// Opaque identifier of a running overlay effect, issued by the sink.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectHandle(pub u64);

impl EffectHandle {
    /// Raw value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Source of live resource readings.
///
/// Shared between the scheduler thread and the caller of
/// [`Engine::start`](crate::Engine::start), which probes it before the
/// loop is allowed to run.
pub trait GameStateProvider: Send + Sync {
    /// Current fraction (0..1) of `channel`'s resource.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Unavailable`] when the subject of the reading
    /// cannot be resolved.
    fn sample_percentage(&self, channel: ChannelId) -> Result<f32, ProviderError>;
}

/// Consumer of overlay intensities.
///
/// Owned by the scheduler thread; never called concurrently.
pub trait OverlaySink: Send {
    /// Push the static look of an effect. Called for every enabled channel
    /// whenever settings are applied.
    ///
    /// # Errors
    ///
    /// Implementations may reject unknown effects; the failure is logged.
    fn configure(&mut self, effect_id: &str, profile: &EffectProfile) -> Result<(), SinkError> {
        let _ = (effect_id, profile);
        Ok(())
    }

    /// Start a new instance of `effect_id` at `intensity`.
    ///
    /// # Errors
    ///
    /// Any [`SinkError`]; the channel keeps ticking without an active handle.
    fn trigger(&mut self, effect_id: &str, intensity: f32) -> Result<EffectHandle, SinkError>;

    /// Stop a running instance. Stopping an already-stopped handle is a no-op.
    fn stop(&mut self, handle: EffectHandle);
}
