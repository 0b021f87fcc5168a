//! Background state for the terminal frontend.

use orbita_core::Viewport;
use ratatui::Frame;

use crate::proximity::ProximityIndex;
use crate::scene::{Scene, SceneParams, TickStats};
use crate::target::FanOut;
use crate::terminal::{CanvasLayer, OverlayLayer};

/// Scene plus the two terminal layers it draws into.
pub struct BackgroundState {
    scene: Scene,
    canvas: CanvasLayer,
    overlay: OverlayLayer,
    /// Width of one cell in virtual pixels.
    cell_width: f64,
    /// Height of one cell in virtual pixels.
    cell_height: f64,
    /// Last known terminal width.
    last_width: u16,
    /// Last known terminal height.
    last_height: u16,
    /// Counters from the most recent frame.
    last_stats: TickStats,
}

impl BackgroundState {
    /// Create the background for a terminal of `columns x rows` cells.
    pub fn new(
        columns: u16,
        rows: u16,
        cell_width: f64,
        cell_height: f64,
        contrast: f64,
        params: SceneParams,
        seed: Option<u64>,
    ) -> Self {
        let viewport = Viewport::from_cells(columns, rows, cell_width, cell_height);
        let mut overlay = OverlayLayer::new(cell_width, cell_height);
        let scene = Scene::seeded(viewport, params, seed, &mut overlay);
        Self {
            scene,
            canvas: CanvasLayer::new(viewport, contrast),
            overlay,
            cell_width,
            cell_height,
            last_width: columns,
            last_height: rows,
            last_stats: TickStats::default(),
        }
    }

    /// Use a different pair search for star connections.
    pub fn with_proximity(mut self, proximity: Box<dyn ProximityIndex>) -> Self {
        self.scene = self.scene.with_proximity(proximity);
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn last_stats(&self) -> TickStats {
        self.last_stats
    }

    /// Track a new terminal size. Particles are not recreated.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        if columns == self.last_width && rows == self.last_height {
            return;
        }
        let viewport = Viewport::from_cells(columns, rows, self.cell_width, self.cell_height);
        self.scene.resize(viewport.width, viewport.height);
        self.canvas.set_viewport(viewport);
        self.last_width = columns;
        self.last_height = rows;
    }

    /// Recreate every particle.
    pub fn reinitialize(&mut self) {
        self.scene.reinitialize();
    }

    /// Advance one frame and draw it across the whole frame area.
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.resize(area.width, area.height);

        let mut target = FanOut::new(&mut self.canvas, &mut self.overlay);
        self.last_stats = self.scene.tick(&mut target);

        frame.render_widget(&self.canvas, area);
        frame.render_widget(&self.overlay, area);
    }
}
