use gaze_eyes::{
    AnimatorConfig, DrawList, EyeMode, EyeParams, FaceLandmarks, FrameDriver, Point,
    ScriptedDetector,
};

fn face_at(x: f32, y: f32) -> FaceLandmarks {
    let eye = vec![Point::new(x, y), Point::new(x, y), Point::new(0.0, 0.0)];
    FaceLandmarks {
        left_eye: eye.clone(),
        right_eye: eye,
    }
}

#[test]
fn fades_back_to_idle_fifty_frames_after_losing_the_face() {
    let mut detector = ScriptedDetector::new();
    detector.push_faces(vec![face_at(100.0, 400.0)]);
    let config = AnimatorConfig::default();
    let mut driver = FrameDriver::new(detector, &config, [1280.0, 720.0]);
    let mut list = DrawList::new();

    pollster::block_on(driver.run_frame(&mut list));
    assert_eq!(driver.detector().remaining(), 0);
    for eye in driver.eyes() {
        assert_eq!(eye.mode(), EyeMode::Tracking);
        assert_eq!(eye.cooldown(), config.eye.max_cooldown);
        // Face on the left of the camera image: pupil swings right and down.
        assert!(eye.pupil()[0] > eye.center()[0]);
        assert!(eye.pupil()[1] > eye.center()[1]);
    }

    for frame in 1..=50u32 {
        pollster::block_on(driver.run_frame(&mut list));
        for eye in driver.eyes() {
            assert_eq!(eye.cooldown(), 50 - frame);
            if frame < 50 {
                assert_eq!(eye.mode(), EyeMode::Cooldown);
                assert_ne!(eye.pupil_color(), config.eye.idle_color);
            }
        }
    }

    let params = EyeParams::default();
    for eye in driver.eyes() {
        assert_eq!(eye.mode(), EyeMode::Idle);
        assert_eq!(eye.pupil_color(), params.idle_color);
        assert_eq!(eye.pupil_radius(), eye.idle_radius());
        assert_eq!(eye.velocity()[1], 0.0);
        assert_eq!(eye.pupil()[1], eye.center()[1]);
    }
    assert_eq!(driver.frames(), 51);
}

#[test]
fn last_frame_draw_list_reflects_current_state() {
    let mut detector = ScriptedDetector::new();
    detector.push_faces(vec![face_at(360.0, 280.0)]);
    let mut driver = FrameDriver::new(detector, &AnimatorConfig::default(), [800.0, 600.0]);
    let mut list = DrawList::new();

    pollster::block_on(driver.run_frame(&mut list));

    let alert = EyeParams::default().alert_color;
    for eye in driver.eyes() {
        assert_eq!(list.sample(eye.pupil()), Some(alert));
    }
    assert_eq!(list.sample([400.0, 590.0]), Some([0.0, 0.0, 0.0]));
}
