//! Reducing detector landmarks to a single gaze point per frame.

/// A landmark in detector source-frame coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Eye contour landmarks for one detected face.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceLandmarks {
    pub left_eye: Vec<Point>,
    pub right_eye: Vec<Point>,
}

/// Landmarks per eye that feed the average.
const POINTS_PER_EYE: usize = 2;

/// The gaze target shared by every eye for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GazeSample {
    pub detected: bool,
    pub x: f32,
    pub y: f32,
}

impl GazeSample {
    /// Nothing in view. The point is never read.
    pub const NONE: Self = Self {
        detected: false,
        x: 0.0,
        y: 0.0,
    };

    pub const fn detected(x: f32, y: f32) -> Self {
        Self {
            detected: true,
            x,
            y,
        }
    }

    /// Average the leading points of every eye of every face.
    pub fn aggregate(faces: &[FaceLandmarks]) -> Self {
        let mut xs = Vec::with_capacity(faces.len() * 2 * POINTS_PER_EYE);
        let mut ys = Vec::with_capacity(faces.len() * 2 * POINTS_PER_EYE);

        for face in faces {
            for eye in [&face.left_eye, &face.right_eye] {
                log::trace!("eye landmarks: {eye:?}");
                for point in eye.iter().take(POINTS_PER_EYE) {
                    xs.push(point.x);
                    ys.push(point.y);
                }
            }
        }

        if xs.is_empty() || ys.is_empty() {
            return Self::NONE;
        }
        Self::detected(mean(&xs), mean(&ys))
    }
}

fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}
