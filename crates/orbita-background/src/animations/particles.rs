//! Starfield and nebula particles.
//!
//! Particles drift at a constant per-frame velocity. One call to
//! [`ParticleField::advance`] is one frame, so apparent speed follows the
//! frame rate. A particle that leaves the viewport plus a margin is
//! resampled in place and keeps its kind.

use orbita_core::{Point, Rgba, Viewport, palette};
use rand::Rng;

use crate::proximity::{Pair, ProximityIndex};
use crate::target::RenderTarget;

/// What a particle looks like. Never changes after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Small, bright, fast-ish point.
    Star,
    /// Large, slow, nearly transparent glow.
    Nebula,
}

impl ParticleKind {
    /// Half-width of the per-axis speed range.
    fn max_speed(self) -> f64 {
        match self {
            Self::Star => 0.1,
            Self::Nebula => 0.05,
        }
    }

    /// Size range as `(min, extent)`.
    fn size_range(self) -> (f64, f64) {
        match self {
            Self::Star => (0.0, 2.0),
            Self::Nebula => (50.0, 100.0),
        }
    }

    fn max_opacity(self) -> f64 {
        match self {
            Self::Star => 0.8,
            Self::Nebula => 0.03,
        }
    }
}

/// Uniform sample in `[lo, lo + extent)`; a zero extent yields `lo`.
fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f64, extent: f64) -> f64 {
    lo + rng.gen_range(0.0..1.0) * extent
}

/// A single background point.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub speed_x: f64,
    pub speed_y: f64,
    /// Radius in virtual pixels.
    pub size: f64,
    pub opacity: f64,
    pub color: Rgba,
    kind: ParticleKind,
}

impl Particle {
    /// Create a particle of `kind` with random attributes inside `viewport`.
    pub fn new<R: Rng + ?Sized>(kind: ParticleKind, viewport: Viewport, rng: &mut R) -> Self {
        let mut particle = Self {
            position: Point::default(),
            speed_x: 0.0,
            speed_y: 0.0,
            size: 0.0,
            opacity: 0.0,
            color: palette::WHITE,
            kind,
        };
        particle.reset(viewport, rng);
        particle
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    /// Resample position, size, velocity, opacity and color.
    pub fn reset<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        self.position = Point::new(
            sample(rng, 0.0, viewport.width),
            sample(rng, 0.0, viewport.height),
        );

        let (size_min, size_extent) = self.kind.size_range();
        let max_speed = self.kind.max_speed();
        self.size = sample(rng, size_min, size_extent);
        self.speed_x = sample(rng, -max_speed, 2.0 * max_speed);
        self.speed_y = sample(rng, -max_speed, 2.0 * max_speed);
        self.opacity = sample(rng, 0.0, self.kind.max_opacity());

        let base = match self.kind {
            ParticleKind::Star => palette::WHITE,
            ParticleKind::Nebula => palette::NEBULA[rng.gen_range(0..palette::NEBULA.len())],
        };
        self.color = base.with_alpha(self.opacity);
    }

    /// Move one frame. Returns `true` if the particle left the expanded
    /// viewport and was resampled.
    pub fn update<R: Rng + ?Sized>(&mut self, viewport: Viewport, margin: f64, rng: &mut R) -> bool {
        self.position = self.position.offset(self.speed_x, self.speed_y);
        if viewport.contains_with_margin(self.position, margin) {
            return false;
        }
        self.reset(viewport, rng);
        true
    }

    pub fn draw<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        match self.kind {
            ParticleKind::Star => target.fill_circle(self.position, self.size, self.color),
            ParticleKind::Nebula => target.fill_glow(self.position, self.size, self.color),
        }
    }
}

/// Tunable constants of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    /// How far outside the viewport a particle may drift before it is recycled.
    pub recycle_margin: f64,
    /// Stars strictly closer than this get a connecting line.
    pub connection_threshold: f64,
    /// Line opacity at distance zero; falls off linearly to 0 at the threshold.
    pub connection_opacity: f64,
    pub connection_width: f64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            recycle_margin: 100.0,
            connection_threshold: 100.0,
            connection_opacity: 0.08,
            connection_width: 0.5,
        }
    }
}

impl FieldParams {
    /// Opacity of the line between two stars `distance` apart, or `None`
    /// when they are too far apart to be connected.
    pub fn connection_alpha(&self, distance: f64) -> Option<f64> {
        (distance < self.connection_threshold)
            .then(|| self.connection_opacity * (1.0 - distance / self.connection_threshold))
    }
}

/// Fixed-size set of stars and nebulae.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    params: FieldParams,
    star_points: Vec<Point>,
    pairs: Vec<Pair>,
}

impl ParticleField {
    /// Create `star_count` stars followed by `nebula_count` nebulae.
    pub fn initialize<R: Rng + ?Sized>(
        star_count: usize,
        nebula_count: usize,
        viewport: Viewport,
        params: FieldParams,
        rng: &mut R,
    ) -> Self {
        let mut particles = Vec::with_capacity(star_count + nebula_count);
        particles.extend((0..star_count).map(|_| Particle::new(ParticleKind::Star, viewport, rng)));
        particles
            .extend((0..nebula_count).map(|_| Particle::new(ParticleKind::Nebula, viewport, rng)));
        tracing::debug!(star_count, nebula_count, "particle field initialized");

        Self {
            particles,
            params,
            star_points: Vec::with_capacity(star_count),
            pairs: Vec::new(),
        }
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn stars(&self) -> impl Iterator<Item = &Particle> {
        self.of_kind(ParticleKind::Star)
    }

    pub fn nebulae(&self) -> impl Iterator<Item = &Particle> {
        self.of_kind(ParticleKind::Nebula)
    }

    fn of_kind(&self, kind: ParticleKind) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(move |p| p.kind == kind)
    }

    /// Move every particle one frame. Returns how many were recycled.
    pub fn advance<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) -> usize {
        self.advance_kind(ParticleKind::Nebula, viewport, rng)
            + self.advance_kind(ParticleKind::Star, viewport, rng)
    }

    /// Move the particles of one kind one frame. Returns how many were recycled.
    pub fn advance_kind<R: Rng + ?Sized>(
        &mut self,
        kind: ParticleKind,
        viewport: Viewport,
        rng: &mut R,
    ) -> usize {
        let margin = self.params.recycle_margin;
        self.particles
            .iter_mut()
            .filter(|p| p.kind == kind)
            .map(|p| p.update(viewport, margin, rng))
            .filter(|&recycled| recycled)
            .count()
    }

    /// Draw nebulae, then stars. Does not clear the target.
    pub fn render<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        self.render_kind(ParticleKind::Nebula, target);
        self.render_kind(ParticleKind::Star, target);
    }

    pub fn render_kind<T: RenderTarget + ?Sized>(&self, kind: ParticleKind, target: &mut T) {
        for particle in self.of_kind(kind) {
            particle.draw(target);
        }
    }

    /// Connect every pair of stars closer than the threshold. Returns the
    /// number of lines drawn.
    pub fn draw_connections<T, I>(&mut self, target: &mut T, index: &mut I) -> usize
    where
        T: RenderTarget + ?Sized,
        I: ProximityIndex + ?Sized,
    {
        self.star_points.clear();
        self.star_points.extend(
            self.particles
                .iter()
                .filter(|p| p.kind == ParticleKind::Star)
                .map(|p| p.position),
        );
        index.pairs_within(
            &self.star_points,
            self.params.connection_threshold,
            &mut self.pairs,
        );

        let mut drawn = 0;
        for pair in &self.pairs {
            let Some(alpha) = self.params.connection_alpha(pair.distance) else {
                continue;
            };
            target.stroke_line(
                self.star_points[pair.a],
                self.star_points[pair.b],
                palette::WHITE.with_alpha(alpha),
                self.params.connection_width,
            );
            drawn += 1;
        }
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proximity::{BruteForce, GridBuckets};
    use crate::target::{DisplayList, DrawCommand};
    use rand::{SeedableRng, rngs::StdRng};

    const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);

    fn field(stars: usize, nebulae: usize, seed: u64) -> (ParticleField, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let field =
            ParticleField::initialize(stars, nebulae, VIEWPORT, FieldParams::default(), &mut rng);
        (field, rng)
    }

    fn star_at(x: f64, y: f64) -> Particle {
        let mut rng = StdRng::seed_from_u64(0);
        let mut p = Particle::new(ParticleKind::Star, VIEWPORT, &mut rng);
        p.position = Point::new(x, y);
        p
    }

    #[test]
    fn test_initialize_counts_and_ranges() {
        let (field, _) = field(200, 15, 1);
        assert_eq!(field.len(), 215);
        assert_eq!(field.stars().count(), 200);
        assert_eq!(field.nebulae().count(), 15);

        for star in field.stars() {
            assert!((0.0..2.0).contains(&star.size));
            assert!((-0.1..0.1).contains(&star.speed_x));
            assert!((-0.1..0.1).contains(&star.speed_y));
            assert!((0.0..0.8).contains(&star.opacity));
            assert_eq!(star.color, palette::WHITE.with_alpha(star.opacity));
        }
        for nebula in field.nebulae() {
            assert!((50.0..150.0).contains(&nebula.size));
            assert!((-0.05..0.05).contains(&nebula.speed_x));
            assert!((0.0..0.03).contains(&nebula.opacity));
            assert!(
                palette::NEBULA
                    .iter()
                    .any(|c| c.with_alpha(nebula.opacity) == nebula.color)
            );
        }
        for p in field.particles() {
            assert!((0.0..800.0).contains(&p.position.x));
            assert!((0.0..600.0).contains(&p.position.y));
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let (a, _) = field(20, 3, 77);
        let (b, _) = field(20, 3, 77);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_empty_field_draws_nothing() {
        let (mut field, mut rng) = field(0, 0, 3);
        let mut list = DisplayList::new();
        assert_eq!(field.advance(VIEWPORT, &mut rng), 0);
        field.render(&mut list);
        field.draw_connections(&mut list, &mut BruteForce);
        assert!(field.is_empty());
        assert!(list.is_empty());
    }

    #[test]
    fn test_advance_moves_by_velocity() {
        let (mut field, mut rng) = field(5, 0, 4);
        let before: Vec<Particle> = field.particles().to_vec();
        field.advance(VIEWPORT, &mut rng);
        for (old, new) in before.iter().zip(field.particles()) {
            assert_eq!(new.position.x, old.position.x + old.speed_x);
            assert_eq!(new.position.y, old.position.y + old.speed_y);
        }
    }

    #[test]
    fn test_reset_only_strictly_outside_margin() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut on_edge = star_at(-99.5, 300.0);
        on_edge.speed_x = -0.5;
        on_edge.speed_y = 0.0;
        assert!(!on_edge.update(VIEWPORT, 100.0, &mut rng));
        assert_eq!(on_edge.position.x, -100.0);

        let mut outside = star_at(899.5, 300.0);
        outside.speed_x = 0.75;
        outside.speed_y = 0.0;
        assert!(outside.update(VIEWPORT, 100.0, &mut rng));
        assert!((0.0..800.0).contains(&outside.position.x));
        assert!((0.0..600.0).contains(&outside.position.y));
    }

    #[test]
    fn test_kind_survives_reset() {
        let (mut field, mut rng) = field(10, 10, 6);
        let kinds: Vec<ParticleKind> = field.particles().iter().map(Particle::kind).collect();
        for p in field.particles_mut() {
            p.position = Point::new(5000.0, 5000.0);
        }
        assert_eq!(field.advance(VIEWPORT, &mut rng), 20);
        let after: Vec<ParticleKind> = field.particles().iter().map(Particle::kind).collect();
        assert_eq!(kinds, after);
    }

    #[test]
    fn test_positions_stay_bounded_over_many_frames() {
        let (mut field, mut rng) = field(50, 5, 8);
        for _ in 0..5000 {
            field.advance(VIEWPORT, &mut rng);
            for p in field.particles() {
                assert!(VIEWPORT.contains_with_margin(p.position, 100.0));
            }
        }
    }

    #[test]
    fn test_shrunk_viewport_resets_everything_on_next_advance() {
        let (mut field, mut rng) = field(30, 4, 10);
        let tiny = Viewport::new(0.0, 0.0);
        // All particles start well inside 800x600, far beyond 0x0 + 100.
        for p in field.particles_mut() {
            p.position = Point::new(400.0, 300.0);
        }
        assert_eq!(field.advance(tiny, &mut rng), 34);
        for p in field.particles() {
            assert_eq!(p.position, Point::new(0.0, 0.0));
        }
    }

    #[test]
    fn test_render_draws_nebulae_before_stars() {
        let (field, _) = field(3, 2, 11);
        let mut list = DisplayList::new();
        field.render(&mut list);
        let names: Vec<&str> = list.commands().iter().map(DrawCommand::name).collect();
        assert_eq!(
            names,
            ["fill_glow", "fill_glow", "fill_circle", "fill_circle", "fill_circle"]
        );
    }

    #[test]
    fn test_connection_alpha_falloff() {
        let params = FieldParams::default();
        assert_eq!(params.connection_alpha(0.0), Some(0.08));
        let half = params.connection_alpha(50.0).unwrap();
        assert!((half - 0.04).abs() < 1e-12);
        assert_eq!(params.connection_alpha(100.0), None);
        assert_eq!(params.connection_alpha(150.0), None);
    }

    #[test]
    fn test_connections_at_exact_threshold() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut field = ParticleField::initialize(0, 0, VIEWPORT, FieldParams::default(), &mut rng);
        field.particles = vec![star_at(100.0, 100.0), star_at(200.0, 100.0)];
        let mut list = DisplayList::new();
        assert_eq!(field.draw_connections(&mut list, &mut BruteForce), 0);

        field.particles[1].position = Point::new(160.0, 100.0);
        assert_eq!(field.draw_connections(&mut list, &mut BruteForce), 1);
        let DrawCommand::StrokeLine { color, width, .. } = &list.commands()[0] else {
            panic!("expected a line");
        };
        assert!((color.a - 0.08 * 0.4).abs() < 1e-12);
        assert_eq!(*width, 0.5);
    }

    #[test]
    fn test_connections_ignore_nebulae_and_are_symmetric() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut field = ParticleField::initialize(0, 1, VIEWPORT, FieldParams::default(), &mut rng);
        field.particles[0].position = Point::new(110.0, 100.0);
        field.particles.push(star_at(100.0, 100.0));
        field.particles.push(star_at(120.0, 100.0));

        let mut forward = DisplayList::new();
        assert_eq!(field.draw_connections(&mut forward, &mut BruteForce), 1);

        field.particles.swap(1, 2);
        let mut reversed = DisplayList::new();
        field.draw_connections(&mut reversed, &mut BruteForce);

        let alpha = |list: &DisplayList| match &list.commands()[0] {
            DrawCommand::StrokeLine { color, .. } => color.a,
            _ => panic!("expected a line"),
        };
        assert_eq!(alpha(&forward), alpha(&reversed));
    }

    #[test]
    fn test_grid_index_draws_same_number_of_lines() {
        let (mut field, _) = field(200, 0, 14);
        let mut brute = DisplayList::new();
        let mut grid = DisplayList::new();
        let a = field.draw_connections(&mut brute, &mut BruteForce);
        let b = field.draw_connections(&mut grid, &mut GridBuckets::new());
        assert_eq!(a, b);
        assert_eq!(brute.len(), grid.len());
    }
}
