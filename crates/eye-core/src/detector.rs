use std::collections::VecDeque;

use crate::gaze::FaceLandmarks;

#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// The camera or model is not ready.
    #[error("detector unavailable: {0}")]
    Unavailable(String),
    #[error("detector backend failed: {0}")]
    Backend(String),
}

/// Source of face landmarks, polled once per frame.
///
/// Implementations own whatever camera and model they need. Landmarks are
/// reported in the detector's reference frame coordinates.
#[allow(async_fn_in_trait)]
pub trait FaceDetector {
    async fn detect(&mut self) -> Result<Vec<FaceLandmarks>, DetectError>;
}

/// Replays queued results, then reports no faces forever.
#[derive(Debug, Default)]
pub struct ScriptedDetector {
    frames: VecDeque<Result<Vec<FaceLandmarks>, DetectError>>,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_faces(&mut self, faces: Vec<FaceLandmarks>) -> &mut Self {
        self.frames.push_back(Ok(faces));
        self
    }

    pub fn push_empty(&mut self) -> &mut Self {
        self.push_faces(Vec::new())
    }

    pub fn push_error(&mut self, error: DetectError) -> &mut Self {
        self.frames.push_back(Err(error));
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FaceDetector for ScriptedDetector {
    async fn detect(&mut self) -> Result<Vec<FaceLandmarks>, DetectError> {
        self.frames.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}
