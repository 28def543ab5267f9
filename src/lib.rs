//! # StatFX
//!
//! Resource-driven overlay intensity controller for game host plugins.
//!
//! StatFX samples live resource fractions (health, stamina, magicka),
//! smooths them with an asymmetric rate limiter and a deadband, maps the
//! smoothed value through an easing curve, and drives one overlay effect
//! per resource from a fixed-period background loop.
//!
//! ## Core Concepts
//!
//! - **Channels**: one smoothed resource stream driving one overlay effect
//! - **Easing catalog**: thirty Penner curves plus linear, by code or name
//! - **Lifecycle**: Paused / Running / Terminated, driven by host events
//! - **Host seams**: a [`GameStateProvider`] in, an [`OverlaySink`] out
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use statfx::{
//!     ChannelId, EffectHandle, Engine, EngineConfig, GameStateProvider, LifecycleEvent,
//!     OverlaySink, ProviderError, SinkError,
//! };
//!
//! struct Player;
//! impl GameStateProvider for Player {
//!     fn sample_percentage(&self, _channel: ChannelId) -> Result<f32, ProviderError> {
//!         Ok(0.5)
//!     }
//! }
//!
//! struct Screen(u64);
//! impl OverlaySink for Screen {
//!     fn trigger(&mut self, _effect: &str, _intensity: f32) -> Result<EffectHandle, SinkError> {
//!         self.0 += 1;
//!         Ok(EffectHandle(self.0))
//!     }
//!     fn stop(&mut self, _handle: EffectHandle) {}
//! }
//!
//! let mut engine = Engine::new(
//!     Arc::new(Player),
//!     Screen(0),
//!     EngineConfig::default().with_settings_path("StatFX.toml"),
//! );
//! engine.handle_event(LifecycleEvent::DataLoaded)?;
//! # Ok::<(), statfx::EngineError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod config;
pub mod control;
pub mod easing;
pub mod error;
pub mod ffi;
pub mod host;
pub mod logging;

// Re-exports for convenience
pub use actor::{Engine, EngineConfig, LifecycleEvent, SystemState, TickReport};
pub use config::{EffectProfile, Settings};
pub use control::{ChannelId, ChannelMask};
pub use easing::Easing;
pub use error::{ConfigError, EngineError, ProviderError, SinkError, TickError};
pub use host::{EffectHandle, GameStateProvider, OverlaySink};
