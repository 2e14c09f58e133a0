// Configuration object consumed by the dataset builders

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Training-side configuration. Only the `data` section is consumed here;
/// a larger training setup may carry more.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
}

/// Dataset paths and knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory holding one media file per clip id.
    pub videos_path: PathBuf,
    /// JSON annotation manifest.
    pub annotations_path: PathBuf,
    /// Requested frame rate. Recorded on the dataset but not applied —
    /// decoding runs at the file's native rate.
    #[serde(default)]
    pub target_fps: Option<f64>,
    /// Keep only the first N manifest records. For fast smoke iteration;
    /// leave unset for real training runs.
    #[serde(default)]
    pub dev_limit: Option<usize>,
}

impl Config {
    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let cfg: Config = serde_json::from_str(
            r#"{"data": {"videos_path": "/data/Diving48", "annotations_path": "/data/Diving48/test.json"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.data.videos_path, PathBuf::from("/data/Diving48"));
        assert_eq!(cfg.data.target_fps, None);
        assert_eq!(cfg.data.dev_limit, None);
    }

    #[test]
    fn parses_optional_knobs() {
        let cfg: Config = serde_json::from_str(
            r#"{"data": {"videos_path": "v", "annotations_path": "a", "target_fps": 30.0, "dev_limit": 10}}"#,
        )
        .unwrap();
        assert_eq!(cfg.data.target_fps, Some(30.0));
        assert_eq!(cfg.data.dev_limit, Some(10));
    }
}
