//! Layered config loading: embedded defaults, optionally overlaid by a
//! single TOML file.
//!
//! The full teacher precedence chain (system/user/workspace/env) has no
//! counterpart here — there is exactly one configuration surface, so
//! loading is defaults-then-one-file rather than a five-layer merge.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{ConfigError, ConfigResult};
use crate::types::GatingConfig;
use crate::validate::validate;

/// Load [`GatingConfig`], starting from defaults and overlaying `path`
/// if it exists. A missing file is not an error; a malformed one is.
pub fn load(path: &Path) -> ConfigResult<GatingConfig> {
    let config = if path.exists() {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: GatingConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "loaded gating config");
        config
    } else {
        GatingConfig::default()
    };

    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load(Path::new("/nonexistent/gating-config.toml")).unwrap();
        assert_eq!(config, GatingConfig::default());
    }

    #[test]
    fn overlay_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "strict_resolution = true").unwrap();
        writeln!(file, "max_metric_points = 50").unwrap();
        let config = load(file.path()).unwrap();
        assert!(config.strict_resolution);
        assert_eq!(config.max_metric_points, 50);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();
        assert!(load(file.path()).is_err());
    }
}
