//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use orbita_config::{Config, Proximity};

/// Animated starfield with orbiting tokens.
///
/// Flags override settings loaded from `config.toml`.
#[derive(Parser, Debug, Default)]
#[command(name = "orbita", version, about)]
pub struct CliArgs {
    /// Seed for the random generator (reproducible backdrop).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of stars.
    #[arg(long)]
    pub stars: Option<usize>,

    /// Number of nebula blobs.
    #[arg(long)]
    pub nebulae: Option<usize>,

    /// Target frames per second.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Pair search for star connections (brute-force, grid).
    #[arg(long)]
    pub proximity: Option<Proximity>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to the config file (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write logs here instead of the default data directory.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Hide the orbit guide ellipses.
    #[arg(long)]
    pub no_guides: bool,

    /// Hide lines between nearby stars.
    #[arg(long)]
    pub no_connections: bool,

    /// Show a static price instead of the ticker.
    #[arg(long)]
    pub no_ticker: bool,
}

impl CliArgs {
    /// Apply overrides to a loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(stars) = self.stars {
            config.field.star_count = stars;
        }
        if let Some(nebulae) = self.nebulae {
            config.field.nebula_count = nebulae;
        }
        if let Some(fps) = self.fps {
            config.render.fps = fps;
        }
        if let Some(proximity) = self.proximity {
            config.field.proximity = proximity;
        }
        if let Some(ref level) = self.log_level {
            config.log_level = level.clone();
        }
        if self.no_guides {
            config.render.show_guides = false;
        }
        if self.no_connections {
            config.render.show_connections = false;
        }
        if self.no_ticker {
            config.ticker.enabled = false;
        }
    }
}
