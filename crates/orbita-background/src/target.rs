//! Render targets.
//!
//! Particles are pixels on a drawing surface while orbiting bodies are
//! positioned elements on a separate layer. Both talk to the same
//! [`RenderTarget`] trait; a backend overrides only the calls for the layer
//! it owns and inherits no-op defaults for the rest.

use orbita_core::{Point, Rgba};

/// Handle for a sprite attached to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub usize);

/// Static description of a positioned element, given once at attach time.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSpec {
    pub id: String,
    pub label: String,
    /// Diameter in virtual pixels.
    pub size: f64,
    pub image: String,
    pub tint: Rgba,
}

/// Per-frame visual state of a sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Offset from the centre of the sprite container, in virtual pixels.
    pub offset: Point,
    pub scale: f64,
    pub brightness: f64,
    /// Higher values are drawn on top.
    pub stacking: i32,
}

/// Something the scene can draw into.
pub trait RenderTarget {
    /// Erase the drawing surface.
    fn clear(&mut self) {}

    /// Solid disc.
    fn fill_circle(&mut self, _center: Point, _radius: f64, _color: Rgba) {}

    /// Radial gradient from `color` at the centre to transparent at `radius`.
    fn fill_glow(&mut self, _center: Point, _radius: f64, _color: Rgba) {}

    /// Axis-aligned ellipse outline.
    fn stroke_ellipse(&mut self, _center: Point, _rx: f64, _ry: f64, _color: Rgba, _width: f64) {}

    fn stroke_line(&mut self, _from: Point, _to: Point, _color: Rgba, _width: f64) {}

    /// Attach a persistent element. Returns `None` when the target has no
    /// container for sprites; the caller keeps going without one.
    fn attach_sprite(&mut self, _spec: &SpriteSpec) -> Option<SpriteId> {
        None
    }

    /// Update the visual state of an attached element.
    fn place_sprite(&mut self, _id: SpriteId, _placement: &Placement) {}
}

/// One recorded call on a [`DisplayList`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillCircle {
        center: Point,
        radius: f64,
        color: Rgba,
    },
    FillGlow {
        center: Point,
        radius: f64,
        color: Rgba,
    },
    StrokeEllipse {
        center: Point,
        rx: f64,
        ry: f64,
        color: Rgba,
        width: f64,
    },
    StrokeLine {
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
    },
    AttachSprite(SpriteSpec),
    PlaceSprite {
        id: SpriteId,
        placement: Placement,
    },
}

impl DrawCommand {
    /// Short name of the command, handy for asserting draw order.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::FillCircle { .. } => "fill_circle",
            Self::FillGlow { .. } => "fill_glow",
            Self::StrokeEllipse { .. } => "stroke_ellipse",
            Self::StrokeLine { .. } => "stroke_line",
            Self::AttachSprite(_) => "attach_sprite",
            Self::PlaceSprite { .. } => "place_sprite",
        }
    }
}

/// Target that records every call.
#[derive(Debug, Clone)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    has_container: bool,
    sprites: usize,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayList {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            has_container: true,
            sprites: 0,
        }
    }

    /// A list whose sprite container is missing: attaching always fails.
    pub fn without_container() -> Self {
        Self {
            has_container: false,
            ..Self::new()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop recorded commands, keeping attached sprite ids valid.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded commands with the given [`DrawCommand::name`].
    pub fn count(&self, name: &str) -> usize {
        self.commands.iter().filter(|c| c.name() == name).count()
    }
}

impl RenderTarget for DisplayList {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn fill_glow(&mut self, center: Point, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::FillGlow {
            center,
            radius,
            color,
        });
    }

    fn stroke_ellipse(&mut self, center: Point, rx: f64, ry: f64, color: Rgba, width: f64) {
        self.commands.push(DrawCommand::StrokeEllipse {
            center,
            rx,
            ry,
            color,
            width,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            color,
            width,
        });
    }

    fn attach_sprite(&mut self, spec: &SpriteSpec) -> Option<SpriteId> {
        if !self.has_container {
            return None;
        }
        self.commands.push(DrawCommand::AttachSprite(spec.clone()));
        let id = SpriteId(self.sprites);
        self.sprites += 1;
        Some(id)
    }

    fn place_sprite(&mut self, id: SpriteId, placement: &Placement) {
        self.commands.push(DrawCommand::PlaceSprite {
            id,
            placement: *placement,
        });
    }
}

/// Forwards every call to two targets. Sprite calls go to both; the id
/// returned by the second target wins only if the first has no container.
pub struct FanOut<'a, A: ?Sized, B: ?Sized> {
    pub first: &'a mut A,
    pub second: &'a mut B,
}

impl<'a, A: RenderTarget + ?Sized, B: RenderTarget + ?Sized> FanOut<'a, A, B> {
    pub fn new(first: &'a mut A, second: &'a mut B) -> Self {
        Self { first, second }
    }
}

impl<A: RenderTarget + ?Sized, B: RenderTarget + ?Sized> RenderTarget for FanOut<'_, A, B> {
    fn clear(&mut self) {
        self.first.clear();
        self.second.clear();
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.first.fill_circle(center, radius, color);
        self.second.fill_circle(center, radius, color);
    }

    fn fill_glow(&mut self, center: Point, radius: f64, color: Rgba) {
        self.first.fill_glow(center, radius, color);
        self.second.fill_glow(center, radius, color);
    }

    fn stroke_ellipse(&mut self, center: Point, rx: f64, ry: f64, color: Rgba, width: f64) {
        self.first.stroke_ellipse(center, rx, ry, color, width);
        self.second.stroke_ellipse(center, rx, ry, color, width);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.first.stroke_line(from, to, color, width);
        self.second.stroke_line(from, to, color, width);
    }

    fn attach_sprite(&mut self, spec: &SpriteSpec) -> Option<SpriteId> {
        let first = self.first.attach_sprite(spec);
        let second = self.second.attach_sprite(spec);
        first.or(second)
    }

    fn place_sprite(&mut self, id: SpriteId, placement: &Placement) {
        self.first.place_sprite(id, placement);
        self.second.place_sprite(id, placement);
    }
}
