//! Actor Model: the engine and its scheduler thread.
//!
//! The control surface and the loop share only an atomic state byte and a
//! command channel; the loop owns the channels and the sink outright.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   LifecycleEvent    ┌──────────────┐
//! │     Host     │ ─────────────────▶  │    Engine    │
//! └──────────────┘                     └──────────────┘
//!                                        │         │
//!                       SchedulerCommand │         │ Lifecycle (AtomicU8)
//!                                        ▼         ▼
//!                                      ┌──────────────┐
//!                                      │  Scheduler   │ ── trigger/stop ──▶ OverlaySink
//!                                      │    Thread    │ ◀── sample ─────── GameStateProvider
//!                                      └──────────────┘
//!                                            │
//!                                            │ TickReport
//!                                            ▼
//!                                        observers
//! ```

mod engine;
mod lifecycle;
mod messages;
mod scheduler;

pub use engine::{Engine, EngineConfig};
pub use lifecycle::{Lifecycle, SystemState};
pub use messages::{LifecycleEvent, TickReport};
