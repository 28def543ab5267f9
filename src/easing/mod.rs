//! Easing catalog: thirty named curves plus linear.
//!
//! This module contains:
//! - [`Easing`]: the closed set of curves, evaluated with [`Easing::apply`]
//! - [`lookup`], [`lookup_by_name`], [`reverse_lookup`]: total resolution by
//!   integer code or by name through a fixed alias table
//!
//! Ten families (Sine, Quad, Cubic, Quart, Quint, Expo, Circ, Back,
//! Elastic, Bounce) come in In, Out and `InOut` variants.

mod catalog;
mod curve;

pub use catalog::{canonical_name, find_by_name, lookup, lookup_by_name, reverse_lookup};
pub use curve::Easing;
