//! Viewer/export configuration.
//!
//! A small JSON file for the settings that outlive a single invocation;
//! command-line flags override whatever the file says.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tile::DEFAULT_TILE_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// World seed; a random one is drawn when absent.
    pub seed: Option<u64>,
    /// Tile edge length in world units (pixels at lod 0).
    pub tile_size: u32,
    /// Viewer window size in pixels.
    pub window_width: usize,
    pub window_height: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tile_size: DEFAULT_TILE_SIZE,
            window_width: 1024,
            window_height: 768,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl MapConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: MapConfig = serde_json::from_str(r#"{ "seed": 12 }"#).unwrap();
        assert_eq!(config.seed, Some(12));
        assert_eq!(config.tile_size, DEFAULT_TILE_SIZE);
        assert_eq!(config.window_width, 1024);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tile_size": 256, "window_width": 640 }}"#).unwrap();

        let config = MapConfig::load(file.path()).unwrap();
        assert_eq!(config.tile_size, 256);
        assert_eq!(config.window_width, 640);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_bad_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            MapConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
