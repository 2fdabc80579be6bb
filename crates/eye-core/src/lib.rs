pub mod animation;
pub mod canvas;
pub mod config;
pub mod detector;
pub mod frame;
pub mod gaze;
pub mod renderer;

#[cfg(feature = "gui")]
pub mod gui;

pub use animation::{Eye, EyeMode};
pub use canvas::{Canvas, DrawCommand, DrawList, Ellipse};
pub use config::{AnimatorConfig, ConfigError, EyeLayout, EyeParams};
pub use detector::{DetectError, FaceDetector, ScriptedDetector};
pub use frame::FrameDriver;
pub use gaze::{FaceLandmarks, GazeSample, Point};
pub use renderer::{CanvasUniforms, EyeRenderer, MAX_ELLIPSES};
