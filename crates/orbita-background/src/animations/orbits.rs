//! Orbiting bodies on a tilted ring.
//!
//! Each body moves on a circle seen from an oblique angle, which flattens it
//! into an ellipse half as tall as it is wide. The sine of the orbital angle
//! doubles as a depth value: bodies at the front of the ring are larger,
//! brighter and stacked above the ones behind.

use std::f64::consts::TAU;

use orbita_core::{Point, Rgba, Viewport, palette};
use rand::Rng;

use crate::target::{Placement, RenderTarget, SpriteId, SpriteSpec};

/// Vertical squash of every orbit. Shared by projection and guide ellipses.
pub const ORBIT_FLATTENING: f64 = 0.5;
/// Extra scale at the very front of the ring.
pub const DEPTH_SCALE: f64 = 0.3;
/// Extra brightness at the very front of the ring.
pub const DEPTH_BRIGHTNESS: f64 = 0.5;
/// Stacking steps per unit of depth.
pub const DEPTH_STACKING: f64 = 10.0;

const GUIDE_ALPHA: f64 = 0.05;
const GUIDE_WIDTH: f64 = 1.0;

/// Static description of a body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDescriptor {
    pub id: String,
    pub label: String,
    /// Orbit radius in virtual pixels.
    pub orbit: f64,
    /// Radians added per frame.
    pub speed: f64,
    /// Diameter in virtual pixels.
    pub size: f64,
    pub image: String,
    pub tint: Rgba,
}

impl BodyDescriptor {
    fn sprite_spec(&self) -> SpriteSpec {
        SpriteSpec {
            id: self.id.clone(),
            label: self.label.clone(),
            size: self.size,
            image: self.image.clone(),
            tint: self.tint,
        }
    }
}

/// Screen-space state derived from an orbital angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Offset from the orbit centre.
    pub x: f64,
    pub y: f64,
    /// Depth in `-1.0..=1.0`; `1.0` is closest to the viewer.
    pub z: f64,
    pub scale: f64,
    pub brightness: f64,
    pub stacking: i32,
}

impl Projection {
    pub fn placement(&self) -> Placement {
        Placement {
            offset: Point::new(self.x, self.y),
            scale: self.scale,
            brightness: self.brightness,
            stacking: self.stacking,
        }
    }
}

/// Project angle `theta` on an orbit of radius `orbit`.
pub fn project(theta: f64, orbit: f64) -> Projection {
    let (sin, cos) = theta.sin_cos();
    let z = sin;
    Projection {
        x: orbit * cos,
        y: orbit * ORBIT_FLATTENING * sin,
        z,
        scale: 1.0 + z * DEPTH_SCALE,
        brightness: 1.0 + z * DEPTH_BRIGHTNESS,
        stacking: ((z + 1.0) * DEPTH_STACKING).floor() as i32,
    }
}

/// A body and its current angle.
#[derive(Debug, Clone)]
pub struct OrbitingBody {
    pub descriptor: BodyDescriptor,
    /// Grows without bound; trigonometry takes care of wrapping.
    pub angle: f64,
    sprite: Option<SpriteId>,
}

impl OrbitingBody {
    pub fn advance(&mut self) {
        self.angle += self.descriptor.speed;
    }

    pub fn projection(&self) -> Projection {
        project(self.angle, self.descriptor.orbit)
    }

    /// Whether an element was attached for this body.
    pub fn is_attached(&self) -> bool {
        self.sprite.is_some()
    }

    /// Push the current projection to the body's element, if it has one.
    pub fn render<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        if let Some(id) = self.sprite {
            target.place_sprite(id, &self.projection().placement());
        }
    }
}

/// All orbiting bodies.
#[derive(Debug, Clone, Default)]
pub struct OrbitSystem {
    bodies: Vec<OrbitingBody>,
}

impl OrbitSystem {
    /// Create one body per descriptor with a random starting angle and
    /// attach its element to `target`. A target without a sprite container
    /// leaves the bodies detached; they still orbit but draw nothing.
    pub fn initialize<T, R>(descriptors: Vec<BodyDescriptor>, target: &mut T, rng: &mut R) -> Self
    where
        T: RenderTarget + ?Sized,
        R: Rng + ?Sized,
    {
        let bodies: Vec<OrbitingBody> = descriptors
            .into_iter()
            .map(|descriptor| {
                let angle = rng.gen_range(0.0..1.0) * TAU;
                let sprite = target.attach_sprite(&descriptor.sprite_spec());
                OrbitingBody {
                    descriptor,
                    angle,
                    sprite,
                }
            })
            .collect();

        let attached = bodies.iter().filter(|b| b.is_attached()).count();
        if attached < bodies.len() {
            tracing::debug!(
                bodies = bodies.len(),
                attached,
                "no sprite container, orbiting bodies stay hidden"
            );
        }
        Self { bodies }
    }

    pub fn bodies(&self) -> &[OrbitingBody] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [OrbitingBody] {
        &mut self.bodies
    }

    pub fn advance(&mut self) {
        for body in &mut self.bodies {
            body.advance();
        }
    }

    pub fn render<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        for body in &self.bodies {
            body.render(target);
        }
    }

    /// Stroke one faint ellipse per orbit, centred on the viewport.
    pub fn draw_guides<T: RenderTarget + ?Sized>(&self, target: &mut T, viewport: Viewport) {
        let center = viewport.center();
        let color = palette::WHITE.with_alpha(GUIDE_ALPHA);
        for body in &self.bodies {
            let r = body.descriptor.orbit;
            target.stroke_ellipse(center, r, r * ORBIT_FLATTENING, color, GUIDE_WIDTH);
        }
    }
}
