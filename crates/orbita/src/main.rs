mod cli;
mod logging;
mod nav;
mod page;
mod reveal;
mod ticker;

use std::io::stdout;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use orbita_background::{BackgroundState, BodyDescriptor, FieldParams, GridBuckets, SceneParams};
use orbita_config::{BodyConfig, Config, Proximity, default_config_path};
use orbita_core::{Rgba, palette};
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    text::Line,
};

use crate::cli::CliArgs;
use crate::nav::{NavMenu, NavView};
use crate::page::{Page, PageView};
use crate::reveal::{RevealParams, RevealTracker};
use crate::ticker::PriceTicker;

/// Rows a hidden block sits below its resting place.
const REVEAL_ROWS: f64 = 2.0;
/// Rows moved per mouse wheel notch.
const WHEEL_ROWS: isize = 3;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();

    let mut config = match args.config.clone().or_else(default_config_path) {
        Some(path) => Config::load_or_create(&path)?,
        None => Config::default(),
    };
    args.apply(&mut config);
    let config = config.sanitized();

    let log_path = args.log_file.clone().or_else(logging::default_log_path);
    logging::init_logging(log_path.as_deref(), &config.log_level)?;
    tracing::info!(
        seed = ?config.seed,
        stars = config.field.star_count,
        nebulae = config.field.nebula_count,
        fps = config.render.fps,
        proximity = %config.field.proximity,
        "starting orbita"
    );

    let terminal = ratatui::init();
    if let Err(err) = execute!(stdout(), EnableMouseCapture) {
        tracing::warn!(%err, "mouse capture unavailable");
    }
    let result = App::new(config).run(terminal);
    if let Err(err) = execute!(stdout(), DisableMouseCapture) {
        tracing::warn!(%err, "failed to release mouse capture");
    }
    ratatui::restore();
    result
}

/// Translate the configured body table into scene descriptors.
fn body_descriptors(bodies: &[BodyConfig]) -> Vec<BodyDescriptor> {
    bodies
        .iter()
        .map(|body| {
            let tint = Rgba::from_hex(&body.tint).unwrap_or_else(|| {
                tracing::warn!(id = %body.id, tint = %body.tint, "invalid tint, using white");
                palette::WHITE
            });
            BodyDescriptor {
                id: body.id.clone(),
                label: body.label.clone(),
                orbit: body.orbit,
                speed: body.speed,
                size: body.size,
                image: body.image.clone(),
                tint,
            }
        })
        .collect()
}

fn scene_params(config: &Config) -> SceneParams {
    SceneParams {
        star_count: config.field.star_count,
        nebula_count: config.field.nebula_count,
        field: FieldParams {
            recycle_margin: config.field.recycle_margin,
            connection_threshold: config.field.connection_threshold,
            connection_opacity: config.field.connection_opacity,
            ..FieldParams::default()
        },
        bodies: body_descriptors(&config.bodies),
        show_guides: config.render.show_guides,
        show_connections: config.render.show_connections,
    }
}

fn build_background(config: &Config, area: Rect) -> BackgroundState {
    let background = BackgroundState::new(
        area.width,
        area.height,
        config.render.cell_width,
        config.render.cell_height,
        config.render.contrast,
        scene_params(config),
        config.seed,
    );
    match config.field.proximity {
        Proximity::BruteForce => background,
        Proximity::Grid => background.with_proximity(Box::new(GridBuckets::new())),
    }
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    /// Created on the first frame, once the terminal size is known.
    background: Option<BackgroundState>,
    page: Page,
    tracker: RevealTracker,
    ticker: Option<PriceTicker>,
    ticker_rng: StdRng,
    nav: NavMenu,
    /// First page row shown.
    scroll: usize,
    /// Page rows visible in the last frame.
    rows: usize,
    start: Instant,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let page = Page::landing();
        let tracker = RevealTracker::new(RevealParams::default(), page.targets().to_vec());
        let ticker = config
            .ticker
            .enabled
            .then(|| PriceTicker::new(&config.ticker));
        let ticker_rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        Self {
            running: false,
            config,
            background: None,
            page,
            tracker,
            ticker,
            ticker_rng,
            nav: NavMenu::default(),
            scroll: 0,
            rows: 0,
            start: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let frame_budget = Duration::from_secs_f64(1.0 / f64::from(self.config.render.fps.max(1)));
        self.running = true;
        while self.running {
            let started = Instant::now();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(frame_budget.saturating_sub(started.elapsed()))?;
        }
        tracing::info!("shutting down");
        Ok(())
    }

    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let now_ms = self.now_ms();
        let area = frame.area();

        if let Some(ticker) = self.ticker.as_mut() {
            ticker.update(now_ms, &mut self.ticker_rng);
        }

        let config = &self.config;
        self.background
            .get_or_insert_with(|| build_background(config, area))
            .render(frame);

        let [header, body, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.rows = body.height as usize;
        self.scroll = self.scroll.min(self.page.max_scroll(self.rows));
        self.tracker
            .observe(self.scroll as f64, self.rows as f64, now_ms);

        frame.render_widget(
            PageView {
                page: &self.page,
                tracker: &self.tracker,
                ticker: self.ticker.as_ref(),
                fallback_price: self.config.ticker.base_price,
                scroll: self.scroll,
                now_ms,
                reveal_rows: REVEAL_ROWS,
            },
            body,
        );

        let brand = Line::from(vec![" ◉ ".bold().white(), "orbita".bold().white()]);
        frame.render_widget(brand, header);

        frame.render_widget(
            NavView {
                menu: &self.nav,
                anchors: self.page.anchors(),
            },
            area,
        );

        let keys = Line::from(vec![
            "q".bold().white(),
            " quit  ".dark_gray(),
            "m".bold().white(),
            " menu  ".dark_gray(),
            "↑↓".bold().white(),
            " scroll  ".dark_gray(),
            "1-3".bold().white(),
            " jump  ".dark_gray(),
            "r".bold().white(),
            " reset".dark_gray(),
        ])
        .centered();
        frame.render_widget(keys, help);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most `timeout` so the next frame starts on time.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(columns, rows) => {
                    if let Some(background) = self.background.as_mut() {
                        background.resize(columns, rows);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        let page_rows = self.rows.max(1) as isize;
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Esc) if self.nav.is_open() => self.nav.close(),
            (_, KeyCode::Esc | KeyCode::Char('q')) => self.quit(),
            (_, KeyCode::Char('m')) => self.nav.toggle(),
            (_, KeyCode::Up | KeyCode::Char('k')) if self.nav.is_open() => {
                self.nav.select_previous(self.page.anchors().len());
            }
            (_, KeyCode::Down | KeyCode::Char('j')) if self.nav.is_open() => {
                self.nav.select_next(self.page.anchors().len());
            }
            (_, KeyCode::Enter) if self.nav.is_open() => self.navigate(self.nav.selected()),
            (_, KeyCode::Char(c @ '1'..='9')) => self.navigate(c as usize - '1' as usize),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.scroll_by(-1),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.scroll_by(1),
            (_, KeyCode::PageUp) => self.scroll_by(-page_rows),
            (_, KeyCode::PageDown | KeyCode::Char(' ')) => self.scroll_by(page_rows),
            (_, KeyCode::Home) => self.scroll = 0,
            (_, KeyCode::End) => self.scroll = self.page.max_scroll(self.rows),
            (_, KeyCode::Char('r')) => self.reinitialize(),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_by(-WHEEL_ROWS),
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_ROWS),
            _ => {}
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.page.max_scroll(self.rows);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    /// Jump to the section behind link `index` and close the menu.
    fn navigate(&mut self, index: usize) {
        if let Some(row) = self.nav.follow(self.page.anchors(), index) {
            self.scroll = row.min(self.page.max_scroll(self.rows));
            tracing::debug!(index, row, "navigated");
        }
    }

    /// Recreate every star and nebula.
    fn reinitialize(&mut self) {
        if let Some(background) = self.background.as_mut() {
            background.reinitialize();
            tracing::info!("background reinitialized");
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
