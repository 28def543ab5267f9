//! Lifecycle state shared between the control surface and the scheduler.
//!
//! ```text
//!             start                 terminate
//!   Paused ─────────▶ Running ───────────────▶ Terminated
//!      ▲                 │                          ▲
//!      └──── pause ──────┘                          │
//!      └────────────────────── terminate ───────────┘
//! ```
//!
//! `Terminated` is absorbing: once stored, no transition leaves it.

use std::sync::atomic::{AtomicU8, Ordering};

use tracing::info;

/// Engine state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SystemState {
    /// Loop alive, channels not ticked.
    #[default]
    Paused = 0,
    /// Channels ticked every period.
    Running = 1,
    /// Loop exits; terminal.
    Terminated = 2,
}

impl SystemState {
    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Paused,
            1 => Self::Running,
            _ => Self::Terminated,
        }
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Paused => "paused",
            Self::Running => "running",
            Self::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for SystemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Atomic holder of a [`SystemState`].
///
/// Stores use release ordering and loads acquire, so anything sent to the
/// scheduler before a store is visible once the scheduler sees the new
/// state.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    /// A lifecycle starting in [`SystemState::Paused`].
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(SystemState::Paused as u8),
        }
    }

    /// Current state.
    #[inline]
    pub fn current(&self) -> SystemState {
        SystemState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether the state is terminal.
    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.current() == SystemState::Terminated
    }

    /// Move to `Running`. Returns `false` if already terminated.
    pub fn run(&self, reason: &str) -> bool {
        self.transition(SystemState::Running, reason)
    }

    /// Move to `Paused`. Returns `false` if already terminated.
    pub fn pause(&self, reason: &str) -> bool {
        self.transition(SystemState::Paused, reason)
    }

    /// Move to `Terminated`.
    pub fn terminate(&self, reason: &str) {
        let prev = self
            .state
            .swap(SystemState::Terminated as u8, Ordering::AcqRel);
        if prev != SystemState::Terminated as u8 {
            info!(from = %SystemState::from_u8(prev), to = "terminated", reason, "lifecycle");
        }
    }

    fn transition(&self, next: SystemState, reason: &str) -> bool {
        let result = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current != SystemState::Terminated as u8).then_some(next as u8)
            });
        match result {
            Ok(prev) if prev == next as u8 => true,
            Ok(prev) => {
                info!(from = %SystemState::from_u8(prev), to = %next, reason, "lifecycle");
                true
            }
            Err(_) => false,
        }
    }
}
