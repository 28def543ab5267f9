//! Message types for engine/scheduler communication.

use crate::config::Settings;
use crate::control::{ChannelId, TickOutcome};
use crate::error::TickError;

/// Host lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Game data finished loading.
    DataLoaded,
    /// A new game was started.
    NewGame,
    /// A save game finished loading.
    PostLoadGame,
    /// A save game is about to load.
    PreLoadGame,
}

impl LifecycleEvent {
    /// Whether the event starts the engine (as opposed to pausing it).
    pub const fn starts(self) -> bool {
        !matches!(self, Self::PreLoadGame)
    }
}

/// Commands from the control surface to the scheduler thread.
#[derive(Debug)]
pub(crate) enum SchedulerCommand {
    /// Replace channels, period and cooldown from fresh settings.
    Reconfigure(Box<Settings>),
    /// Snap each listed channel's smoothed and sampled values onto a reading.
    Reseed(Vec<(ChannelId, f32)>),
}

/// What one channel tick did, offered to observers after every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Loop iteration the tick ran in.
    pub frame: u64,
    /// Channel ticked.
    pub channel: ChannelId,
    /// Smoothed value after the tick.
    pub current: f32,
    /// Last sampled value.
    pub actual: f32,
    /// Outcome, or why the channel was skipped.
    pub result: Result<TickOutcome, TickError>,
}
