//! Typed errors for the host seams, configuration and the engine.
//!
//! [`EngineError`] is the top-level error of the control surface. The
//! provider and sink errors are what host implementations return; they
//! never escape the scheduler loop once it is running.

use std::path::PathBuf;

use thiserror::Error;

use crate::control::ChannelId;

/// The game state provider could not produce a reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The subject of the reading (e.g. the player) cannot be resolved.
    #[error("state provider unavailable for {channel}")]
    Unavailable {
        /// Channel whose reading was requested.
        channel: ChannelId,
    },
}

/// The overlay sink rejected an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The effect could not be started.
    #[error("failed to trigger effect '{effect_id}': {reason}")]
    TriggerFailed {
        /// Effect the trigger was issued for.
        effect_id: String,
        /// Host-provided reason.
        reason: String,
    },
    /// The sink does not know the effect.
    #[error("unknown effect '{effect_id}'")]
    UnknownEffect {
        /// Effect the operation was issued for.
        effect_id: String,
    },
}

/// Settings file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read settings {path:?}: {source}")]
    Io {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or has mistyped fields.
    #[error("failed to parse settings {path:?}: {source}")]
    Parse {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// A single channel tick could not run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickError {
    /// The reading for this tick was unavailable; the channel was skipped.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Errors produced by the engine control surface.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Start-up could not sample the state provider. State is unchanged.
    #[error("start-up aborted: {0}")]
    Provider(#[from] ProviderError),
    /// Settings were unusable at start-up. The engine is terminated.
    #[error("start-up failed: {0}")]
    Config(#[from] ConfigError),
    /// The scheduler thread could not be spawned.
    #[error("failed to spawn scheduler thread: {0}")]
    Spawn(#[source] std::io::Error),
    /// The engine is terminated; no further transitions are possible.
    #[error("engine is terminated")]
    Terminated,
}

impl EngineError {
    /// Whether this error left the engine terminated.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Spawn(_) | Self::Terminated)
    }
}
