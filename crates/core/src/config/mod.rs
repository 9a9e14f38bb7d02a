use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CollageError, LayoutRules, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub video: VideoConfig,
    pub layout: LayoutRules,
}

impl AppConfig {
    /// Vertical 1080x1920 shorts at 30 fps with the stock layout rules.
    pub fn shorts_defaults() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(?path, "loading config");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.video.validate()?;
        self.layout.validate()
    }
}

/// Output format of the rendered video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub duration_frames: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            width: 1080,
            height: 1920,
            duration_frames: 600,
        }
    }
}

impl VideoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(CollageError::invalid_config("fps must be greater than zero"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(CollageError::invalid_config(format!(
                "frame size {}x{} must be positive",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_frames as f64 / f64::from(self.fps.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::shorts_defaults();
        assert!(config.validate().is_ok());
        assert_eq!(config.video.fps, 30);
        assert_eq!(config.video.duration_seconds(), 20.0);
        assert_eq!(config.layout.grid_slots, 4);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config =
            AppConfig::from_json_str(r#"{ "video": { "fps": 24 }, "layout": { "forced_single": [1] } }"#)
                .unwrap();
        assert_eq!(config.video.fps, 24);
        assert_eq!(config.video.height, 1920);
        assert!(config.layout.is_forced_single(1));
        assert!(!config.layout.is_forced_single(0));
        assert_eq!(config.layout.coords_max, 3);
    }

    #[test]
    fn zero_fps_is_invalid_config() {
        let err = AppConfig::from_json_str(r#"{ "video": { "fps": 0 } }"#).unwrap_err();
        assert!(matches!(err, CollageError::InvalidConfig(_)));

        let negative = AppConfig::from_json_str(r#"{ "video": { "fps": -30 } }"#);
        assert!(matches!(negative, Err(CollageError::Json(_))));
    }

    #[test]
    fn zero_frame_size_is_rejected() {
        let video = VideoConfig {
            width: 0,
            ..VideoConfig::default()
        };
        assert!(video.validate().is_err());
    }
}
