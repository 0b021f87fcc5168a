//! Configuration structs with defaults and TOML persistence.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.toml";

/// Default location of `config.toml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orbita").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seed for every random choice; `None` seeds from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Background particle settings.
    pub field: FieldConfig,
    /// Terminal rendering settings.
    pub render: RenderConfig,
    /// Price label settings.
    pub ticker: TickerConfig,
    /// Orbiting bodies, innermost first.
    pub bodies: Vec<BodyConfig>,
}

/// Particle field settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub star_count: usize,
    pub nebula_count: usize,
    /// Distance outside the viewport a particle may drift before it is recycled.
    pub recycle_margin: f64,
    /// Stars closer than this are connected by a line.
    pub connection_threshold: f64,
    /// Line opacity for two stars at distance zero.
    pub connection_opacity: f64,
    /// Pair search strategy for star connections.
    pub proximity: Proximity,
}

/// Pair search strategy used for star connections.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Proximity {
    /// Check every unordered pair.
    #[default]
    BruteForce,
    /// Bucket stars into a uniform grid first.
    Grid,
}

impl FromStr for Proximity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brute-force" | "bruteforce" | "brute" => Ok(Self::BruteForce),
            "grid" => Ok(Self::Grid),
            other => Err(format!(
                "unknown proximity strategy '{other}' (expected 'brute-force' or 'grid')"
            )),
        }
    }
}

impl fmt::Display for Proximity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BruteForce => write!(f, "brute-force"),
            Self::Grid => write!(f, "grid"),
        }
    }
}

/// Terminal rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Target frames per second.
    pub fps: u32,
    /// Width of one terminal cell in virtual pixels.
    pub cell_width: f64,
    /// Height of one terminal cell in virtual pixels.
    pub cell_height: f64,
    /// Multiplier applied to every opacity before compositing onto the
    /// terminal background. Faint layers are invisible in a terminal at 1.0.
    pub contrast: f64,
    pub show_guides: bool,
    pub show_connections: bool,
}

/// Price ticker settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TickerConfig {
    pub enabled: bool,
    pub base_price: f64,
    /// Total width of the random walk around `base_price`.
    pub spread: f64,
    pub interval_ms: u64,
    /// How long the up/down colour stays before resetting.
    pub flash_ms: u64,
}

/// One orbiting body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyConfig {
    pub id: String,
    pub label: String,
    /// Orbit radius in virtual pixels.
    pub orbit: f64,
    /// Angle added every frame, in radians.
    pub speed: f64,
    /// Visual diameter in virtual pixels.
    pub size: f64,
    /// Image reference shown by graphical frontends.
    pub image: String,
    /// `#rrggbb` colour used where the image cannot be shown.
    pub tint: String,
}

impl BodyConfig {
    fn new(
        id: &str,
        label: &str,
        orbit: f64,
        speed: f64,
        size: f64,
        image: &str,
        tint: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            orbit,
            speed,
            size,
            image: image.to_string(),
            tint: tint.to_string(),
        }
    }

    /// The built-in token table.
    pub fn defaults() -> Vec<Self> {
        const ASSETS: &str = "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains";
        vec![
            Self::new("btc", "BTC", 180.0, 0.012, 36.0, &format!("{ASSETS}/bitcoin/info/logo.png"), "#f7931a"),
            Self::new("eth", "ETH", 280.0, 0.010, 32.0, &format!("{ASSETS}/ethereum/info/logo.png"), "#8c8cf0"),
            Self::new("sol", "SOL", 380.0, 0.015, 30.0, &format!("{ASSETS}/solana/info/logo.png"), "#14f195"),
            Self::new("bnb", "BNB", 480.0, 0.008, 34.0, &format!("{ASSETS}/binance/info/logo.png"), "#f3ba2f"),
            Self::new("pepe", "PEPE", 600.0, 0.006, 28.0, "https://cryptologos.cc/logos/pepe-pepe-logo.png", "#4c9540"),
            Self::new("doge", "DOGE", 750.0, 0.005, 30.0, &format!("{ASSETS}/doge/info/logo.png"), "#c2a633"),
            Self::new("atom", "ATOM", 950.0, 0.003, 45.0, "bot_pfp.jpg", "#b7a6ff"),
        ]
    }
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            log_level: "info".to_string(),
            field: FieldConfig::default(),
            render: RenderConfig::default(),
            ticker: TickerConfig::default(),
            bodies: BodyConfig::defaults(),
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            star_count: 200,
            nebula_count: 15,
            recycle_margin: 100.0,
            connection_threshold: 100.0,
            connection_opacity: 0.08,
            proximity: Proximity::BruteForce,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            cell_width: 8.0,
            cell_height: 16.0,
            contrast: 3.0,
            show_guides: true,
            show_connections: true,
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_price: 142.50,
            spread: 0.5,
            interval_ms: 2000,
            flash_ms: 500,
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from `path`, writing the defaults there if it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config = Self::load(path)?;
            tracing::info!(path = %path.display(), "loaded config");
            Ok(config)
        } else {
            let config = Config::default();
            config.save(path)?;
            tracing::info!(path = %path.display(), "created default config");
            Ok(config)
        }
    }

    /// Load config from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.sanitized())
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, serialized).map_err(write_err)?;
        Ok(())
    }

    /// Replace values that would stall or break rendering with their defaults.
    pub fn sanitized(mut self) -> Self {
        let render = RenderConfig::default();
        if self.render.fps == 0 {
            tracing::warn!("render.fps must be positive, using {}", render.fps);
            self.render.fps = render.fps;
        }
        if self.render.cell_width <= 0.0 || self.render.cell_height <= 0.0 {
            tracing::warn!("cell size must be positive, using defaults");
            self.render.cell_width = render.cell_width;
            self.render.cell_height = render.cell_height;
        }
        if self.render.contrast < 0.0 {
            tracing::warn!("render.contrast must not be negative, using {}", render.contrast);
            self.render.contrast = render.contrast;
        }
        let field = FieldConfig::default();
        if self.field.connection_threshold <= 0.0 {
            tracing::warn!(
                "field.connection_threshold must be positive, using {}",
                field.connection_threshold
            );
            self.field.connection_threshold = field.connection_threshold;
        }
        if self.field.recycle_margin < 0.0 {
            tracing::warn!("field.recycle_margin must not be negative, using {}", field.recycle_margin);
            self.field.recycle_margin = field.recycle_margin;
        }
        if self.ticker.interval_ms == 0 {
            tracing::warn!("ticker.interval_ms must be positive, using defaults");
            self.ticker.interval_ms = TickerConfig::default().interval_ms;
        }
        self
    }
}
