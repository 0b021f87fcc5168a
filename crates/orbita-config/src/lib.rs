//! Configuration for orbita.
//!
//! Settings live in a TOML file under the platform config directory. A
//! missing file is replaced by the defaults; command-line overrides are
//! applied by the binary on top of whatever was loaded.

mod config;
mod error;

pub use config::{
    BodyConfig, Config, FieldConfig, Proximity, RenderConfig, TickerConfig, default_config_path,
};
pub use error::ConfigError;
