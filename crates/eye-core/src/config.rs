use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::Eye;

// ============================================================
// Serializable config types
// ============================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatorConfig {
    pub version: u32,
    pub eye: EyeParams,
    pub background_color: [f32; 3],
    /// Eye widgets in render order, relative to the viewport.
    pub layout: Vec<EyeLayout>,
}

/// Per-widget animation constants. Every eye keeps its own copy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EyeParams {
    /// Resolution of the detector's source frame, in which gaze points arrive.
    pub reference_frame: [f32; 2],
    /// Frames the pupil takes to fade back to idle after detection is lost.
    pub max_cooldown: u32,
    /// Spring pull is `-displacement / spring_divisor` per frame.
    pub spring_divisor: f32,
    /// Where the pupil is parked, relative to rest, when cooldown expires.
    pub rest_offset: [f32; 2],
    /// Gaze travel box as a multiple of the smaller half-extent.
    pub gaze_scale: f32,
    pub sclera_color: [f32; 3],
    pub idle_color: [f32; 3],
    pub alert_color: [f32; 3],
}

/// One eye, expressed as fractions of the viewport size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EyeLayout {
    pub center: [f32; 2],
    pub half_extents: [f32; 2],
}

// ============================================================
// Defaults
// ============================================================

impl Default for EyeParams {
    fn default() -> Self {
        Self {
            reference_frame: [720.0, 560.0],
            max_cooldown: 50,
            spring_divisor: 20.0,
            rest_offset: [20.0, 0.0],
            gaze_scale: 1.5,
            sclera_color: [1.0, 1.0, 1.0],
            idle_color: rgb(205, 0, 255),
            alert_color: rgb(255, 0, 0),
        }
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            eye: EyeParams::default(),
            background_color: [0.0, 0.0, 0.0],
            layout: vec![
                EyeLayout::new([1.0 / 4.0, 1.0 / 2.0], [1.0 / 20.0, 1.0 / 4.0]),
                EyeLayout::new([3.0 / 4.0, 1.0 / 2.0], [1.0 / 20.0, 1.0 / 4.0]),
                EyeLayout::new([1.0 / 8.0, 1.0 / 3.0], [1.0 / 40.0, 1.0 / 8.0]),
                EyeLayout::new([7.0 / 8.0, 1.0 / 3.0], [1.0 / 40.0, 1.0 / 8.0]),
            ],
        }
    }
}

/// 8-bit sRGB triple to the `[0, 1]` floats used everywhere else.
pub fn rgb(r: u8, g: u8, b: u8) -> [f32; 3] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

impl EyeLayout {
    pub const fn new(center: [f32; 2], half_extents: [f32; 2]) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Resolve to absolute `(center, half_extents)` for a viewport of `[w, h]`.
    pub fn resolve(&self, viewport: [f32; 2]) -> ([f32; 2], [f32; 2]) {
        (
            [self.center[0] * viewport[0], self.center[1] * viewport[1]],
            [
                self.half_extents[0] * viewport[0],
                self.half_extents[1] * viewport[1],
            ],
        )
    }
}

// ============================================================
// AnimatorConfig: top-level config
// ============================================================

impl AnimatorConfig {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("saved config to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version > Self::CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: Self::CURRENT_VERSION,
            });
        }
        let params = &self.eye;
        if !(params.spring_divisor > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "spring_divisor must be positive, got {}",
                params.spring_divisor
            )));
        }
        if params.reference_frame.iter().any(|v| !(*v > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "reference_frame must be positive, got {:?}",
                params.reference_frame
            )));
        }
        if let Some((i, layout)) = self
            .layout
            .iter()
            .enumerate()
            .find(|(_, layout)| layout.half_extents.iter().any(|v| !(*v > 0.0)))
        {
            return Err(ConfigError::Invalid(format!(
                "layout[{i}].half_extents must be positive, got {:?}",
                layout.half_extents
            )));
        }
        Ok(())
    }

    /// Create the eye widgets for a viewport of `[width, height]` pixels.
    pub fn build_eyes(&self, viewport: [f32; 2]) -> Vec<Eye> {
        self.layout
            .iter()
            .map(|layout| {
                let (center, half_extents) = layout.resolve(viewport);
                Eye::new(center, half_extents, self.eye)
            })
            .collect()
    }
}
