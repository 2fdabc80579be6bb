use crate::animation::Eye;
use crate::canvas::Canvas;
use crate::config::{AnimatorConfig, EyeParams};
use crate::detector::FaceDetector;
use crate::gaze::GazeSample;

/// Owns the eyes and the detector and runs one detect, update, draw pass at a
/// time.
pub struct FrameDriver<D> {
    detector: D,
    eyes: Vec<Eye>,
    background: [f32; 3],
    frames: u64,
}

impl<D: FaceDetector> FrameDriver<D> {
    pub fn new(detector: D, config: &AnimatorConfig, viewport: [f32; 2]) -> Self {
        Self::with_eyes(detector, config.build_eyes(viewport), config.background_color)
    }

    pub fn with_eyes(detector: D, eyes: Vec<Eye>, background: [f32; 3]) -> Self {
        Self {
            detector,
            eyes,
            background,
            frames: 0,
        }
    }

    pub fn eyes(&self) -> &[Eye] {
        &self.eyes
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn set_background(&mut self, color: [f32; 3]) {
        self.background = color;
    }

    /// Push new animation constants to every eye.
    pub fn apply_params(&mut self, params: EyeParams) {
        for eye in &mut self.eyes {
            eye.set_params(params);
        }
    }

    /// Replace all widgets, e.g. after loading a different layout.
    pub fn replace_eyes(&mut self, eyes: Vec<Eye>) {
        self.eyes = eyes;
    }

    /// Run one frame: wait for the detector, then update and draw every eye.
    ///
    /// A failing detector counts as "nothing seen"; the loop keeps going.
    pub async fn run_frame<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> GazeSample {
        let faces = match self.detector.detect().await {
            Ok(faces) => faces,
            Err(e) => {
                log::warn!("frame {}: face detection failed: {e}", self.frames);
                Vec::new()
            }
        };
        let sample = GazeSample::aggregate(&faces);
        self.advance(&sample, canvas);
        sample
    }

    /// Update and draw with an already aggregated sample.
    pub fn advance<C: Canvas + ?Sized>(&mut self, sample: &GazeSample, canvas: &mut C) {
        log::debug!(
            "frame {}: detected={} gaze=({:.1}, {:.1})",
            self.frames,
            sample.detected,
            sample.x,
            sample.y
        );
        canvas.fill_background(self.background);
        for eye in &mut self.eyes {
            eye.update(sample);
            eye.render(canvas);
        }
        self.frames += 1;
    }
}
