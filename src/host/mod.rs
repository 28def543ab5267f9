//! Host seams.
//!
//! The engine never talks to the game directly: readings come in through a
//! [`GameStateProvider`] and overlay effects go out through an
//! [`OverlaySink`]. Rust hosts implement the traits directly; C hosts go
//! through [`crate::ffi`], which adapts a callback table to both.

mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use traits::{EffectHandle, GameStateProvider, OverlaySink};
