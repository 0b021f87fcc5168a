//! Animated backdrop for orbita.
//!
//! A [`Scene`] owns a field of drifting stars and nebulae plus a handful of
//! bodies on tilted orbits. Every tick it updates them and issues draw calls
//! against a [`RenderTarget`]; the terminal frontend splits those calls
//! between a Braille canvas and a cell overlay (see [`BackgroundState`]).

pub mod animations;
mod chars;
pub mod color;
pub mod proximity;
mod scene;
mod state;
pub mod target;
pub mod terminal;

pub use animations::orbits::{BodyDescriptor, OrbitSystem, OrbitingBody, Projection, project};
pub use animations::particles::{FieldParams, Particle, ParticleField, ParticleKind};
pub use proximity::{BruteForce, GridBuckets, Pair, ProximityIndex};
pub use scene::{Scene, SceneParams, TickStats};
pub use state::BackgroundState;
pub use target::{DisplayList, DrawCommand, FanOut, Placement, RenderTarget, SpriteId, SpriteSpec};
