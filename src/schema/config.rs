//! Configuration types for animation encoding jobs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::animation::{DISPLAY_HEIGHT, DISPLAY_WIDTH, RecorderConfig};

/// Describes an animation to build from a list of bitmap files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Canvas width in pixels.
    pub width: usize,
    /// Canvas height in pixels.
    pub height: usize,
    /// Bitmap JSON files, one per frame, in playback order.
    pub frames: Vec<PathBuf>,
    /// Destination of the encoded stream.
    pub output: PathBuf,
    /// Frame skip and limit settings.
    #[serde(default)]
    pub recorder: RecorderConfig,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
            frames: vec![PathBuf::from("frames/0001.json"), PathBuf::from("frames/0002.json")],
            output: PathBuf::from("animation.bga"),
            recorder: RecorderConfig::default(),
        }
    }
}

impl AnimationConfig {
    /// Make relative frame and output paths relative to `base` instead of the
    /// working directory.
    pub fn resolve_paths(&mut self, base: &Path) {
        for frame in &mut self.frames {
            if frame.is_relative() {
                *frame = base.join(&*frame);
            }
        }
        if self.output.is_relative() {
            self.output = base.join(&self.output);
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.width > DISPLAY_WIDTH || self.height > DISPLAY_HEIGHT {
            return Err(ConfigError::CanvasTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.frames.is_empty() {
            return Err(ConfigError::NoFrames);
        }
        if self.recorder.frame_skip == 0 {
            return Err(ConfigError::InvalidFrameSkip);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Canvas dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Canvas {width}x{height} exceeds the {}x{} display", DISPLAY_WIDTH, DISPLAY_HEIGHT)]
    CanvasTooLarge { width: usize, height: usize },
    #[error("At least one frame must be listed")]
    NoFrames,
    #[error("Frame skip must be at least 1")]
    InvalidFrameSkip,
}
