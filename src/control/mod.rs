//! Per-channel control: identifiers, rate limiting, curve mapping and the
//! channel tick.
//!
//! ```text
//!  provider ──► actual ──► deadband ──► approach ──► current
//!                                                      │
//!                                   map_intensity ◄────┘
//!                                         │
//!                           sink.stop(prev) + sink.trigger(effect, intensity)
//! ```

mod approach;
mod channel;
mod id;
mod mapper;

pub use approach::approach;
pub use channel::{Channel, ChannelConfig, TickOutcome, EPSILON};
pub use id::{ChannelId, ChannelMask};
pub use mapper::map_intensity;
