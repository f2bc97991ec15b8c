//! Application configuration.
//!
//! Every section has defaults matching the shipped experience, so a config
//! document only needs the fields it changes.

use serde::{Deserialize, Serialize};

use crate::gesture::DEFAULT_PINCH_THRESHOLD;
use crate::hit_test::CursorShape;
use crate::scene::{Advance, Storyline, TransitionRule};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("pinch threshold must be in (0, 1], got {0}")]
    PinchThreshold(f32),
    #[error("cursor radius must be positive, got {0}")]
    CursorRadius(f32),
    #[error("storyline is empty")]
    EmptyStoryline,
    #[error("storyline must end with a terminal step")]
    NoTerminalStep,
    #[error("step {0} requires zero clicks")]
    ZeroClicks(usize),
    #[error("camera resolution must be non-zero")]
    CameraResolution,
}

/// Gesture and hover tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Normalized index–thumb distance below which the hand pinches.
    pub pinch_threshold: f32,
    pub cursor: CursorShape,
    /// Size a circle cursor from the drawn cursor instead of `cursor.radius`.
    pub follow_rendered_cursor: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            cursor: CursorShape::default(),
            follow_rendered_cursor: true,
        }
    }
}

impl InteractionConfig {
    /// Hit-test shape given the drawn cursor's content width in pixels.
    ///
    /// A point cursor, a disabled follow, or an unmeasurable width all keep
    /// the configured shape.
    pub fn cursor_shape(&self, rendered_width: Option<f32>) -> CursorShape {
        match (self.cursor, rendered_width) {
            (CursorShape::Circle { .. }, Some(width))
                if self.follow_rendered_cursor && width > 0.0 && width.is_finite() =>
            {
                CursorShape::Circle {
                    radius: width / 2.0,
                }
            }
            (shape, _) => shape,
        }
    }
}

/// Durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Fade overlay in/out around a scene swap.
    pub fade_ms: u32,
    /// Pause between the completing click and the fade.
    pub click_advance_delay_ms: u32,
    /// Phone vibrates this long before the voicemail starts.
    pub intro_ring_ms: u32,
    /// Hard limit on waiting for the voicemail to end.
    pub voicemail_timeout_ms: u32,
    /// Wait after a failed voicemail playback.
    pub voicemail_error_fallback_ms: u32,
    /// Phone fade-out before scene-1 appears.
    pub intro_exit_ms: u32,
    pub ending_title_delay_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            fade_ms: 1500,
            click_advance_delay_ms: 800,
            intro_ring_ms: 5000,
            voicemail_timeout_ms: 10_000,
            voicemail_error_fallback_ms: 3000,
            intro_exit_ms: 1500,
            ending_title_delay_ms: 500,
        }
    }
}

/// Compute backend requested from the landmark detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Delegate {
    #[default]
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "CPU")]
    Cpu,
}

/// Options passed to the external hand-landmark detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectorConfig {
    /// Base URL of the detector's wasm fileset.
    pub wasm_root: String,
    pub model_asset_path: String,
    pub delegate: Delegate,
    pub running_mode: String,
    pub num_hands: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            wasm_root: "https://cdn.jsdelivr.net/npm/@mediapipe/tasks-vision@0.10.0/wasm".to_string(),
            model_asset_path: "https://storage.googleapis.com/mediapipe-models/hand_landmarker/hand_landmarker/float16/1/hand_landmarker.task".to_string(),
            delegate: Delegate::Gpu,
            running_mode: "VIDEO".to_string(),
            num_hands: 1,
        }
    }
}

/// Requested camera resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub interaction: InteractionConfig,
    pub timings: Timings,
    pub storyline: Storyline,
    pub detector: DetectorConfig,
    pub camera: CameraConfig,
}

impl AppConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.interaction.pinch_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::PinchThreshold(threshold));
        }
        if let CursorShape::Circle { radius } = self.interaction.cursor {
            if !(radius > 0.0 && radius.is_finite()) {
                return Err(ConfigError::CursorRadius(radius));
            }
        }

        let steps = self.storyline.steps();
        let Some(last) = steps.last() else {
            return Err(ConfigError::EmptyStoryline);
        };
        if last.advance != Advance::Terminal {
            return Err(ConfigError::NoTerminalStep);
        }
        for (index, step) in steps.iter().enumerate() {
            if step.advance == Advance::OnClick(TransitionRule::CountThreshold(0)) {
                return Err(ConfigError::ZeroClicks(index));
            }
        }

        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(ConfigError::CameraResolution);
        }
        Ok(())
    }
}
