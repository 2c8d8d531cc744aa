//! Configuration for the fleetgate safety gating core.
//!
//! A single [`GatingConfig`] covers the six options the core recognizes:
//! strict resolution, control level, update-action gating, the
//! recent-access window, the metric downsampling target, and the
//! rate-limited-log spacing. Loading starts from embedded defaults and
//! overlays a single TOML file when present, at
//! [`default_config_path`] or a caller-supplied path.
//!
//! # Example
//!
//! ```rust,no_run
//! use fleetgate_config::{default_config_path, load};
//!
//! # fn main() -> Result<(), fleetgate_config::ConfigError> {
//! let config = load(&default_config_path())?;
//! println!("control level: {:?}", config.control_level);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod error;
mod loader;
mod types;
mod validate;

use std::path::PathBuf;

pub use error::{ConfigError, ConfigResult};
pub use loader::load;
pub use types::GatingConfig;

/// The default config file location: `~/.fleetgate/config.toml`, falling
/// back to a relative path if the home directory cannot be determined.
#[must_use]
pub fn default_config_path() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".fleetgate/config.toml"),
        |dirs| dirs.home_dir().join(".fleetgate").join("config.toml"),
    )
}
