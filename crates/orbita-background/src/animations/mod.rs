//! Stateful background animations.

pub mod orbits;
pub mod particles;
