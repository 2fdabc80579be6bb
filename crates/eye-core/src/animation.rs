use crate::canvas::Canvas;
use crate::config::EyeParams;
use crate::gaze::GazeSample;

/// What an eye is doing this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EyeMode {
    /// Nothing seen recently; the pupil swings around its rest point.
    Idle,
    /// A face is in view; the pupil is pinned to the gaze point.
    Tracking,
    /// Detection was just lost; color and size fade back to idle.
    Cooldown,
}

/// A single cartoon eye: a white ellipse with a pupil that follows the gaze.
///
/// Geometry is fixed at construction. Pupil state is advanced once per frame
/// by [`Eye::update`] and drawn by [`Eye::render`].
#[derive(Clone, Debug)]
pub struct Eye {
    center: [f32; 2],
    half_extents: [f32; 2],
    pupil: [f32; 2],
    velocity: [f32; 2],
    pupil_radius: f32,
    cooldown: u32,
    pupil_color: [f32; 3],
    last_detected: bool,
    params: EyeParams,
}

impl Eye {
    pub fn new(center: [f32; 2], half_extents: [f32; 2], params: EyeParams) -> Self {
        let mut eye = Self {
            center,
            half_extents,
            pupil: center,
            velocity: [0.0, 0.0],
            pupil_radius: 0.0,
            cooldown: 0,
            pupil_color: params.idle_color,
            last_detected: false,
            params,
        };
        eye.park_pupil();
        eye.pupil_radius = eye.idle_radius();
        eye
    }

    pub fn center(&self) -> [f32; 2] {
        self.center
    }

    pub fn half_extents(&self) -> [f32; 2] {
        self.half_extents
    }

    pub fn pupil(&self) -> [f32; 2] {
        self.pupil
    }

    pub fn velocity(&self) -> [f32; 2] {
        self.velocity
    }

    pub fn pupil_radius(&self) -> f32 {
        self.pupil_radius
    }

    pub fn pupil_color(&self) -> [f32; 3] {
        self.pupil_color
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn last_detected(&self) -> bool {
        self.last_detected
    }

    pub fn params(&self) -> &EyeParams {
        &self.params
    }

    /// Swap animation constants. Takes effect on the next update.
    pub fn set_params(&mut self, params: EyeParams) {
        self.params = params;
        // A shorter cooldown must not leave the counter above its new maximum.
        self.cooldown = self.cooldown.min(params.max_cooldown);
    }

    pub fn mode(&self) -> EyeMode {
        if self.last_detected {
            EyeMode::Tracking
        } else if self.cooldown > 0 {
            EyeMode::Cooldown
        } else {
            EyeMode::Idle
        }
    }

    /// Pupil radius when nothing is tracked.
    pub fn idle_radius(&self) -> f32 {
        3.0 * self.min_extent() / 4.0
    }

    /// Pupil radius while tracking.
    pub fn alert_radius(&self) -> f32 {
        self.min_extent() / 2.0
    }

    /// Advance one frame.
    pub fn update(&mut self, sample: &GazeSample) {
        if sample.detected {
            self.track(sample.x, sample.y);
        } else if self.cooldown > 0 {
            self.cool_down();
        } else {
            self.settle();
        }
        self.last_detected = sample.detected;
    }

    /// Draw the white, then the pupil on top.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.fill_ellipse(self.center, self.half_extents, self.params.sclera_color);
        canvas.fill_ellipse(
            self.pupil,
            [self.pupil_radius, self.pupil_radius],
            self.pupil_color,
        );
    }

    fn track(&mut self, gaze_x: f32, gaze_y: f32) {
        let [frame_w, frame_h] = self.params.reference_frame;
        let gaze_box = self.min_extent() * self.params.gaze_scale;

        self.cooldown = self.params.max_cooldown;
        self.pupil_color = self.params.alert_color;
        self.pupil_radius = self.alert_radius();
        // The camera faces the viewer, so x is mirrored.
        self.pupil = [
            self.center[0] - (gaze_x - frame_w / 2.0) / frame_w * gaze_box,
            self.center[1] + (gaze_y - frame_h / 2.0) / frame_h * gaze_box,
        ];
    }

    fn cool_down(&mut self) {
        let t = (self.cooldown as f32 / self.params.max_cooldown.max(1) as f32).min(1.0);
        self.pupil_color = lerp_rgb(self.params.idle_color, self.params.alert_color, t);
        self.pupil_radius = lerp(self.idle_radius(), self.alert_radius(), t);

        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown == 0 {
            self.park_pupil();
            self.velocity = [0.0, 0.0];
            self.settle();
        }
    }

    /// Idle spring step: pull velocity toward rest, then move by it.
    fn settle(&mut self) {
        self.pupil_color = self.params.idle_color;
        self.pupil_radius = self.idle_radius();
        for axis in 0..2 {
            let displacement = self.pupil[axis] - self.center[axis];
            self.velocity[axis] += -displacement / self.params.spring_divisor;
            self.pupil[axis] += self.velocity[axis];
        }
    }

    fn park_pupil(&mut self) {
        self.pupil = [
            self.center[0] + self.params.rest_offset[0],
            self.center[1] + self.params.rest_offset[1],
        ];
    }

    fn min_extent(&self) -> f32 {
        self.half_extents[0].min(self.half_extents[1])
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

fn lerp_rgb(from: [f32; 3], to: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp(from[0], to[0], t),
        lerp(from[1], to[1], t),
        lerp(from[2], to[2], t),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};

    fn eye() -> Eye {
        Eye::new([100.0, 200.0], [40.0, 80.0], EyeParams::default())
    }

    fn seen(x: f32, y: f32) -> GazeSample {
        GazeSample::detected(x, y)
    }

    fn distance(eye: &Eye) -> f32 {
        let dx = eye.pupil()[0] - eye.center()[0];
        let dy = eye.pupil()[1] - eye.center()[1];
        (dx * dx + dy * dy).sqrt()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn starts_idle_with_pupil_offset_from_rest() {
        let eye = eye();
        assert_eq!(eye.mode(), EyeMode::Idle);
        assert_eq!(eye.pupil(), [120.0, 200.0]);
        assert_eq!(eye.velocity(), [0.0, 0.0]);
        assert_eq!(eye.pupil_radius(), 30.0);
        assert_eq!(eye.pupil_color(), EyeParams::default().idle_color);
    }

    #[test]
    fn idle_step_pulls_toward_rest() {
        let mut eye = eye();
        let before = distance(&eye);
        eye.update(&GazeSample::NONE);

        assert_eq!(eye.velocity(), [-1.0, 0.0]);
        assert_eq!(eye.pupil(), [119.0, 200.0]);
        assert!(distance(&eye) < before);
        assert_eq!(eye.pupil_radius(), eye.idle_radius());
        assert_eq!(eye.pupil_color(), EyeParams::default().idle_color);
    }

    #[test]
    fn idle_spring_keeps_swinging_about_rest() {
        let mut eye = eye();
        let mut crossed = false;
        for _ in 0..40 {
            eye.update(&GazeSample::NONE);
            crossed |= eye.pupil()[0] < eye.center()[0];
        }
        assert!(crossed);
        assert_eq!(eye.pupil()[1], 200.0);
    }

    #[test]
    fn idle_at_rest_is_a_fixed_point() {
        let mut eye = eye();
        eye.pupil = eye.center();
        for _ in 0..10 {
            eye.update(&GazeSample::NONE);
            assert_eq!(eye.pupil(), eye.center());
            assert_eq!(eye.velocity(), [0.0, 0.0]);
        }
    }

    #[test]
    fn detection_sets_alert_state() {
        let mut eye = eye();
        eye.update(&seen(360.0, 280.0));

        assert_eq!(eye.mode(), EyeMode::Tracking);
        assert_eq!(eye.cooldown(), 50);
        assert_eq!(eye.pupil_radius(), 20.0);
        assert_eq!(eye.pupil_color(), EyeParams::default().alert_color);
        // Gaze at the frame center lands on rest.
        assert_eq!(eye.pupil(), eye.center());
    }

    #[test]
    fn gaze_is_mirrored_horizontally_only() {
        let mut eye = eye();
        // Gaze box is 40 * 1.5 = 60.
        eye.update(&seen(720.0, 560.0));
        assert!(approx(eye.pupil()[0], 100.0 - 30.0));
        assert!(approx(eye.pupil()[1], 200.0 + 30.0));

        eye.update(&seen(0.0, 0.0));
        assert!(approx(eye.pupil()[0], 100.0 + 30.0));
        assert!(approx(eye.pupil()[1], 200.0 - 30.0));
    }

    #[test]
    fn cooldown_counts_down_by_one() {
        let mut eye = eye();
        eye.update(&seen(0.0, 0.0));
        for expected in (0..50).rev() {
            eye.update(&GazeSample::NONE);
            assert_eq!(eye.cooldown(), expected);
        }
        eye.update(&GazeSample::NONE);
        assert_eq!(eye.cooldown(), 0);
        assert_eq!(eye.mode(), EyeMode::Idle);
    }

    #[test]
    fn cooldown_blends_color_and_radius() {
        let mut eye = eye();
        eye.update(&seen(0.0, 0.0));
        eye.update(&GazeSample::NONE);

        // First faded frame uses the full counter, so still alert.
        assert_eq!(eye.mode(), EyeMode::Cooldown);
        let [r, g, b] = eye.pupil_color();
        assert!(approx(r, 1.0) && g == 0.0 && approx(b, 0.0));
        assert!(approx(eye.pupil_radius(), eye.alert_radius()));

        for _ in 0..24 {
            eye.update(&GazeSample::NONE);
        }
        // Counter was 26 when this frame blended.
        let c = 26.0;
        let [r, _, b] = eye.pupil_color();
        assert!(approx(r * 255.0, 205.0 + c));
        assert!(approx(b * 255.0, 255.0 - c * 255.0 / 50.0));
        assert!(approx(eye.pupil_radius(), (2.0 + (50.0 - c) / 50.0) * 40.0 / 4.0));
    }

    #[test]
    fn cooldown_expiry_parks_pupil_and_springs_once() {
        let mut eye = eye();
        eye.update(&seen(0.0, 0.0));
        for _ in 0..50 {
            eye.update(&GazeSample::NONE);
        }
        assert_eq!(eye.cooldown(), 0);
        assert_eq!(eye.velocity(), [-1.0, 0.0]);
        assert_eq!(eye.pupil(), [119.0, 200.0]);
        assert_eq!(eye.pupil_radius(), eye.idle_radius());
        assert_eq!(eye.pupil_color(), EyeParams::default().idle_color);
    }

    #[test]
    fn shrinking_cooldown_mid_fade_keeps_pupil_in_range() {
        let mut eye = eye();
        eye.update(&seen(0.0, 0.0));
        eye.set_params(EyeParams {
            max_cooldown: 1,
            ..EyeParams::default()
        });
        assert_eq!(eye.cooldown(), 1);

        eye.update(&GazeSample::NONE);
        assert!(eye.pupil_radius() > 0.0);
        assert!(eye.pupil_radius() >= eye.alert_radius());
        assert!(eye.pupil_radius() <= eye.idle_radius());
        assert!(eye.pupil_color().iter().all(|c| (0.0..=1.0).contains(c)));
        assert_eq!(eye.mode(), EyeMode::Idle);
    }

    #[test]
    fn shrinking_cooldown_blends_from_alert() {
        let mut eye = eye();
        eye.update(&seen(0.0, 0.0));
        eye.set_params(EyeParams {
            max_cooldown: 10,
            ..EyeParams::default()
        });
        eye.update(&GazeSample::NONE);

        assert_eq!(eye.cooldown(), 9);
        assert!(approx(eye.pupil_radius(), eye.alert_radius()));
        let [r, g, b] = eye.pupil_color();
        assert!(approx(r, 1.0) && g == 0.0 && approx(b, 0.0));
    }

    #[test]
    fn zero_max_cooldown_returns_straight_to_idle() {
        let params = EyeParams {
            max_cooldown: 0,
            ..EyeParams::default()
        };
        let mut eye = Eye::new([0.0, 0.0], [10.0, 10.0], params);
        eye.update(&seen(0.0, 0.0));
        eye.update(&GazeSample::NONE);
        assert_eq!(eye.mode(), EyeMode::Idle);
        assert_eq!(eye.pupil_radius(), eye.idle_radius());
    }

    #[test]
    fn renders_white_then_pupil() {
        let mut eye = eye();
        eye.update(&seen(360.0, 280.0));
        let mut list = DrawList::new();
        eye.render(&mut list);

        let ellipses: Vec<_> = list
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Ellipse(e) => Some(*e),
                DrawCommand::Clear { .. } => None,
            })
            .collect();
        assert_eq!(ellipses.len(), 2);
        assert_eq!(ellipses[0].center, [100.0, 200.0]);
        assert_eq!(ellipses[0].radii, [40.0, 80.0]);
        assert_eq!(ellipses[0].color, [1.0, 1.0, 1.0]);
        assert_eq!(ellipses[1].center, eye.pupil());
        assert_eq!(ellipses[1].radii, [20.0, 20.0]);
        assert_eq!(ellipses[1].color, EyeParams::default().alert_color);
    }
}
