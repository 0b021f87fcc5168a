//! Terminal backends.
//!
//! [`CanvasLayer`] keeps the pixel draw calls of the current frame and
//! replays them into a Braille canvas. [`OverlayLayer`] owns the positioned
//! body elements and paints them into cells on top of the canvas.

use std::f64::consts::TAU;

use orbita_core::{Point, Rgba, Viewport, palette};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Circle, Context, Line, Points},
    },
};

use crate::chars::body_glyph;
use crate::color::{composite, shade};
use crate::target::{DrawCommand, Placement, RenderTarget, SpriteId, SpriteSpec};

/// Segments used to approximate an ellipse outline.
const ELLIPSE_SEGMENTS: usize = 96;
/// Rings used to approximate a radial gradient.
const GLOW_RINGS: usize = 4;

/// Braille canvas fed by pixel draw calls.
#[derive(Debug, Clone)]
pub struct CanvasLayer {
    commands: Vec<DrawCommand>,
    viewport: Viewport,
    background: Rgba,
    contrast: f64,
}

impl CanvasLayer {
    pub fn new(viewport: Viewport, contrast: f64) -> Self {
        Self {
            commands: Vec::new(),
            viewport,
            background: palette::BACKGROUND,
            contrast,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Canvas y grows upwards; the scene's y grows downwards.
    fn flip(&self, p: Point) -> (f64, f64) {
        (p.x, self.viewport.height - p.y)
    }

    fn color(&self, c: Rgba) -> Option<Color> {
        composite(c, self.background, self.contrast)
    }

    fn paint(&self, ctx: &mut Context<'_>, cmd: &DrawCommand) {
        match cmd {
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => {
                let Some(color) = self.color(*color) else {
                    return;
                };
                let (x, y) = self.flip(*center);
                ctx.draw(&Points {
                    coords: &[(x, y)],
                    color,
                });
                if *radius > 1.0 {
                    ctx.draw(&Circle {
                        x,
                        y,
                        radius: *radius,
                        color,
                    });
                }
            }
            DrawCommand::FillGlow {
                center,
                radius,
                color,
            } => {
                let (x, y) = self.flip(*center);
                // Outermost ring first so the brighter core wins shared cells.
                for ring in (0..GLOW_RINGS).rev() {
                    let t = ring as f64 / GLOW_RINGS as f64;
                    let Some(ring_color) = self.color(color.with_alpha(color.a * (1.0 - t)))
                    else {
                        continue;
                    };
                    if ring == 0 {
                        ctx.draw(&Points {
                            coords: &[(x, y)],
                            color: ring_color,
                        });
                    } else {
                        ctx.draw(&Circle {
                            x,
                            y,
                            radius: radius * t,
                            color: ring_color,
                        });
                    }
                }
            }
            DrawCommand::StrokeEllipse {
                center,
                rx,
                ry,
                color,
                ..
            } => {
                let Some(color) = self.color(*color) else {
                    return;
                };
                let vertex = |i: usize| {
                    let theta = TAU * i as f64 / ELLIPSE_SEGMENTS as f64;
                    self.flip(center.offset(rx * theta.cos(), ry * theta.sin()))
                };
                for i in 0..ELLIPSE_SEGMENTS {
                    let (x1, y1) = vertex(i);
                    let (x2, y2) = vertex(i + 1);
                    ctx.draw(&Line {
                        x1,
                        y1,
                        x2,
                        y2,
                        color,
                    });
                }
            }
            DrawCommand::StrokeLine {
                from, to, color, ..
            } => {
                let Some(color) = self.color(*color) else {
                    return;
                };
                let (x1, y1) = self.flip(*from);
                let (x2, y2) = self.flip(*to);
                ctx.draw(&Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                });
            }
            DrawCommand::Clear | DrawCommand::AttachSprite(_) | DrawCommand::PlaceSprite { .. } => {}
        }
    }
}

impl RenderTarget for CanvasLayer {
    fn clear(&mut self) {
        self.commands.clear();
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
}

impl Widget for &CanvasLayer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Canvas::default()
            .marker(Marker::Braille)
            .background_color(Color::from(self.background))
            .x_bounds([0.0, self.viewport.width.max(1.0)])
            .y_bounds([0.0, self.viewport.height.max(1.0)])
            .paint(|ctx| {
                for cmd in &self.commands {
                    self.paint(ctx, cmd);
                }
            })
            .render(area, buf);
    }
}

#[derive(Debug, Clone)]
struct OverlaySprite {
    spec: SpriteSpec,
    placement: Option<Placement>,
}

/// Cell layer holding one element per orbiting body.
#[derive(Debug, Clone)]
pub struct OverlayLayer {
    sprites: Vec<OverlaySprite>,
    cell_width: f64,
    cell_height: f64,
}

impl OverlayLayer {
    pub fn new(cell_width: f64, cell_height: f64) -> Self {
        Self {
            sprites: Vec::new(),
            cell_width,
            cell_height,
        }
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Cell of an offset from the centre of `area`, if it lies inside.
    fn cell(&self, area: Rect, offset: Point) -> Option<(u16, u16)> {
        let cx = area.x as f64 + area.width as f64 / 2.0;
        let cy = area.y as f64 + area.height as f64 / 2.0;
        let x = (cx + offset.x / self.cell_width).floor();
        let y = (cy + offset.y / self.cell_height).floor();
        let inside = x >= area.left() as f64
            && x < area.right() as f64
            && y >= area.top() as f64
            && y < area.bottom() as f64;
        inside.then_some((x as u16, y as u16))
    }
}

impl RenderTarget for OverlayLayer {
    fn attach_sprite(&mut self, spec: &SpriteSpec) -> Option<SpriteId> {
        self.sprites.push(OverlaySprite {
            spec: spec.clone(),
            placement: None,
        });
        Some(SpriteId(self.sprites.len() - 1))
    }

    fn place_sprite(&mut self, id: SpriteId, placement: &Placement) {
        if let Some(sprite) = self.sprites.get_mut(id.0) {
            sprite.placement = Some(*placement);
        }
    }
}

impl Widget for &OverlayLayer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut visible: Vec<(&SpriteSpec, &Placement)> = self
            .sprites
            .iter()
            .filter_map(|s| s.placement.as_ref().map(|p| (&s.spec, p)))
            .collect();
        // Back to front; equal stacking keeps attach order.
        visible.sort_by_key(|(_, p)| p.stacking);

        for (spec, placement) in visible {
            let Some((x, y)) = self.cell(area, placement.offset) else {
                continue;
            };
            let mut style = Style::new().fg(shade(spec.tint, placement.brightness));
            if placement.scale > 1.15 {
                style = style.add_modifier(Modifier::BOLD);
            } else if placement.scale < 0.85 {
                style = style.add_modifier(Modifier::DIM);
            }
            let text = format!("{}{}", body_glyph(spec.size * placement.scale), spec.label);
            let room = (area.right() - x) as usize;
            buf.set_stringn(x, y, text, room, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn spec(label: &str, size: f64) -> SpriteSpec {
        SpriteSpec {
            id: label.to_lowercase(),
            label: label.to_string(),
            size,
            image: String::new(),
            tint: Rgba::rgb(200, 100, 0),
        }
    }

    fn placement(x: f64, y: f64, stacking: i32) -> Placement {
        Placement {
            offset: Point::new(x, y),
            scale: 1.0,
            brightness: 1.0,
            stacking,
        }
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<Vec<_>>()
            .join("")
    }

    #[test]
    fn test_canvas_clear_drops_previous_frame() {
        let mut layer = CanvasLayer::new(Viewport::new(80.0, 64.0), 1.0);
        layer.fill_circle(Point::new(10.0, 10.0), 1.0, palette::WHITE);
        assert_eq!(layer.commands().len(), 1);
        layer.clear();
        assert!(layer.commands().is_empty());
        assert_eq!(layer.attach_sprite(&spec("BTC", 30.0)), None);
    }

    #[test]
    fn test_canvas_renders_star_dot() {
        let mut layer = CanvasLayer::new(Viewport::new(80.0, 64.0), 1.0);
        // Cell (2, 1) covers x 16..24, y 16..32.
        layer.fill_circle(Point::new(20.0, 20.0), 0.5, palette::WHITE);
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(&layer, frame.area()))
            .unwrap();
        let buf = terminal.backend().buffer();
        assert_ne!(buf[(2, 1)].symbol(), " ");
        assert_eq!(buf[(2, 1)].fg, Color::Rgb(255, 255, 255));
        assert_eq!(buf[(7, 3)].symbol(), " ");
    }

    #[test]
    fn test_canvas_skips_invisible_lines() {
        let mut layer = CanvasLayer::new(Viewport::new(80.0, 64.0), 1.0);
        layer.stroke_line(
            Point::new(0.0, 8.0),
            Point::new(80.0, 8.0),
            palette::WHITE.with_alpha(0.001),
            0.5,
        );
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(&layer, frame.area()))
            .unwrap();
        assert!(row(terminal.backend().buffer(), 0).trim().is_empty());
    }

    #[test]
    fn test_overlay_places_relative_to_center() {
        let mut overlay = OverlayLayer::new(8.0, 16.0);
        let id = overlay.attach_sprite(&spec("BTC", 20.0)).unwrap();
        overlay.place_sprite(id, &placement(-80.0, 32.0, 10));

        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 10));
        (&overlay).render(buf.area, &mut buf);
        // Centre (20, 5) shifted by (-10, +2) cells.
        assert!(row(&buf, 7).starts_with("          •BTC"));
        assert_eq!(buf[(10, 7)].fg, Color::Rgb(200, 100, 0));
    }

    #[test]
    fn test_overlay_front_body_wins() {
        let mut overlay = OverlayLayer::new(8.0, 16.0);
        let back = overlay.attach_sprite(&spec("AAA", 20.0)).unwrap();
        let front = overlay.attach_sprite(&spec("BBB", 20.0)).unwrap();
        overlay.place_sprite(front, &placement(0.0, 0.0, 20));
        overlay.place_sprite(back, &placement(0.0, 0.0, 0));

        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 5));
        (&overlay).render(buf.area, &mut buf);
        assert!(row(&buf, 2).contains("BBB"));
        assert!(!row(&buf, 2).contains("AAA"));
    }

    #[test]
    fn test_overlay_clips_offscreen_and_unplaced() {
        let mut overlay = OverlayLayer::new(8.0, 16.0);
        let far = overlay.attach_sprite(&spec("FAR", 20.0)).unwrap();
        overlay.attach_sprite(&spec("NEW", 20.0)).unwrap();
        overlay.place_sprite(far, &placement(950.0, 0.0, 10));
        assert_eq!(overlay.len(), 2);

        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 5));
        (&overlay).render(buf.area, &mut buf);
        assert_eq!(buf, Buffer::empty(Rect::new(0, 0, 20, 5)));
    }
}
