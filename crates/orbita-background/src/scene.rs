//! Frame driver tying the particle field and the orbit system together.

use orbita_core::Viewport;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::animations::orbits::{BodyDescriptor, OrbitSystem};
use crate::animations::particles::{FieldParams, ParticleField, ParticleKind};
use crate::proximity::{BruteForce, ProximityIndex};
use crate::target::RenderTarget;

/// Everything needed to build a [`Scene`].
#[derive(Debug, Clone)]
pub struct SceneParams {
    pub star_count: usize,
    pub nebula_count: usize,
    pub field: FieldParams,
    pub bodies: Vec<BodyDescriptor>,
    pub show_guides: bool,
    pub show_connections: bool,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            star_count: 200,
            nebula_count: 15,
            field: FieldParams::default(),
            bodies: Vec::new(),
            show_guides: true,
            show_connections: true,
        }
    }
}

/// Counters from one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub recycled: usize,
    pub connections: usize,
}

/// The whole animated background. All state lives here; nothing is global.
pub struct Scene<R = StdRng> {
    viewport: Viewport,
    params: SceneParams,
    field: ParticleField,
    orbits: OrbitSystem,
    proximity: Box<dyn ProximityIndex>,
    rng: R,
    frames: u64,
}

impl Scene<StdRng> {
    /// Scene seeded from `seed`, or from OS entropy when `None`.
    pub fn seeded<T: RenderTarget + ?Sized>(
        viewport: Viewport,
        params: SceneParams,
        seed: Option<u64>,
        overlay: &mut T,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(viewport, params, rng, overlay)
    }
}

impl<R: Rng> Scene<R> {
    /// Build the particle field and attach every orbiting body to `overlay`.
    pub fn new<T: RenderTarget + ?Sized>(
        viewport: Viewport,
        params: SceneParams,
        mut rng: R,
        overlay: &mut T,
    ) -> Self {
        let field = ParticleField::initialize(
            params.star_count,
            params.nebula_count,
            viewport,
            params.field,
            &mut rng,
        );
        let orbits = OrbitSystem::initialize(params.bodies.clone(), overlay, &mut rng);
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            bodies = orbits.bodies().len(),
            "scene created"
        );
        Self {
            viewport,
            params,
            field,
            orbits,
            proximity: Box::new(BruteForce),
            rng,
            frames: 0,
        }
    }

    /// Replace the pair search used for star connections.
    pub fn with_proximity(mut self, proximity: Box<dyn ProximityIndex>) -> Self {
        self.proximity = proximity;
        self
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    pub fn orbits(&self) -> &OrbitSystem {
        &self.orbits
    }

    /// Number of completed ticks.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Change the bounds used for recycling. Existing particles stay where
    /// they are and drift until they individually leave the new bounds.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        tracing::debug!(width, height, "scene resized");
    }

    /// Throw away every particle and sample a fresh field. Orbiting bodies
    /// are persistent and keep their angles.
    pub fn reinitialize(&mut self) {
        self.field = ParticleField::initialize(
            self.params.star_count,
            self.params.nebula_count,
            self.viewport,
            self.params.field,
            &mut self.rng,
        );
    }

    /// One full update-and-draw pass.
    ///
    /// Layering, back to front: nebulae, orbit guides, stars, connections.
    /// Orbiting bodies live on their own layer and stack by depth.
    pub fn tick<T: RenderTarget + ?Sized>(&mut self, target: &mut T) -> TickStats {
        let mut stats = TickStats::default();
        target.clear();

        stats.recycled += self
            .field
            .advance_kind(ParticleKind::Nebula, self.viewport, &mut self.rng);
        self.field.render_kind(ParticleKind::Nebula, target);

        if self.params.show_guides {
            self.orbits.draw_guides(target, self.viewport);
        }

        stats.recycled += self
            .field
            .advance_kind(ParticleKind::Star, self.viewport, &mut self.rng);
        self.field.render_kind(ParticleKind::Star, target);

        if self.params.show_connections {
            stats.connections = self.field.draw_connections(target, self.proximity.as_mut());
        }

        self.orbits.advance();
        self.orbits.render(target);

        self.frames += 1;
        stats
    }
}
