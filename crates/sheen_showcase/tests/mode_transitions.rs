//! End-to-end mode behavior against the in-memory scene

use sheen_core::{
    ActionOutcome, CameraPose, ConfigurationError, IgnoredRequest, LoadError, OperationSkipped, Vec3,
};
use sheen_paint::Color;
use sheen_showcase::headless_runner::scene_for;
use sheen_showcase::{
    Cursor, DeviceClass, MemoryScene, Mode, ModeController, Overflow, RecordingPresentation,
    ShowcaseConfig, ShowcaseError, TransitionDirection,
};

const DT: f32 = 1.0 / 60.0;

struct Harness {
    scene: MemoryScene,
    ui: RecordingPresentation,
    showcase: ModeController,
}

impl Harness {
    fn new(config: ShowcaseConfig) -> Self {
        let mut scene = scene_for(&config);
        let mut ui = RecordingPresentation::new();
        let showcase = ModeController::load(&config, &mut scene, &mut ui).unwrap();
        Self { scene, ui, showcase }
    }

    fn scroll_driven() -> Self {
        let mut harness = Self::new(ShowcaseConfig::new());
        harness.run_seconds(6.0);
        assert_eq!(harness.showcase.mode(), Mode::ScrollDriven);
        harness
    }

    fn run_seconds(&mut self, seconds: f32) {
        let frames = (seconds / DT).ceil() as usize;
        for _ in 0..frames {
            self.showcase.frame(DT, &mut self.scene, &mut self.ui);
        }
    }

    fn camera(&self) -> CameraPose {
        self.scene.camera().unwrap()
    }
}

fn close(a: Vec3, b: Vec3) -> bool {
    a.max_abs_diff(b) < 1e-3
}

#[test]
fn intro_completes_into_scroll_driven() {
    let mut harness = Harness::new(ShowcaseConfig::new());
    assert_eq!(harness.showcase.mode(), Mode::Intro);
    assert!(!harness.showcase.scroll_engine().is_enabled());

    harness.run_seconds(3.0);
    assert_eq!(harness.showcase.mode(), Mode::Intro);
    assert!(!harness.ui.loader_dismissed);

    harness.run_seconds(3.0);
    assert_eq!(harness.showcase.mode(), Mode::ScrollDriven);
    assert!(harness.ui.loader_dismissed);
    assert!(harness.showcase.scroll_engine().is_enabled());
    assert!(close(harness.camera().position, Vec3::new(1.28, -1.7, 5.86)));
    assert_eq!(harness.ui.opacity(sheen_core::ContentLayer::HeroContent), 1.0);
    assert_eq!(harness.ui.opacity(sheen_core::ContentLayer::ForeverContent), 0.0);
}

#[test]
fn requests_during_intro_are_ignored() {
    let mut harness = Harness::new(ShowcaseConfig::new());
    assert_eq!(
        harness.showcase.request_explore(&mut harness.ui),
        ActionOutcome::Ignored(IgnoredRequest::WrongMode)
    );
    assert_eq!(
        harness.showcase.on_wheel(500.0),
        ActionOutcome::Ignored(IgnoredRequest::WrongMode)
    );
    harness.run_seconds(0.5);
    assert_eq!(harness.showcase.position(), 0.0);
}

#[test]
fn explore_and_exit_round_trip() {
    let mut harness = Harness::scroll_driven();

    assert_eq!(harness.showcase.jump_to_section(2, &mut harness.ui), ActionOutcome::Applied);
    for _ in 0..2000 {
        harness.showcase.frame(DT, &mut harness.scene, &mut harness.ui);
        if (harness.showcase.position() - 1800.0).abs() < 0.5 {
            break;
        }
    }
    harness.run_seconds(2.0);
    let section_pose = harness.camera();
    assert!(close(section_pose.position, Vec3::new(-0.06, -1.15, 4.42)));
    let scroll_before = harness.showcase.position();

    assert_eq!(harness.showcase.request_explore(&mut harness.ui), ActionOutcome::Started);
    assert_eq!(harness.showcase.mode(), Mode::Transitioning(TransitionDirection::ToExplore));
    assert!(harness.ui.canvas_interactive);
    assert!(harness.ui.header_pinned);
    assert_eq!(harness.ui.overflow, Overflow::Hidden);
    assert_eq!(harness.ui.cursor, Cursor::Grab);

    harness.run_seconds(1.0);
    assert_eq!(
        harness.showcase.request_exit(&mut harness.scene, &mut harness.ui),
        ActionOutcome::Ignored(IgnoredRequest::TransitionInProgress)
    );
    assert_eq!(
        harness.showcase.request_explore(&mut harness.ui),
        ActionOutcome::Ignored(IgnoredRequest::TransitionInProgress)
    );

    harness.run_seconds(1.6);
    assert_eq!(harness.showcase.mode(), Mode::FreeExplore);
    assert!(close(harness.camera().position, Vec3::new(-0.17, -0.25, 8.5)));
    assert_eq!(harness.scene.orbit(), (true, true));
    assert!(!harness.scene.depth_of_field());
    assert!(harness.ui.exit_control_visible);

    // scroll input has no effect while exploring
    harness.showcase.on_wheel(800.0);
    harness.run_seconds(0.5);
    assert_eq!(harness.showcase.position(), scroll_before);

    let dragged = CameraPose::new(Vec3::new(4.0, 1.0, 3.0), Vec3::ZERO);
    harness.scene.orbit_to(dragged);
    harness.showcase.frame(DT, &mut harness.scene, &mut harness.ui);
    assert_eq!(*harness.showcase.pose(), dragged);

    assert_eq!(
        harness.showcase.request_exit(&mut harness.scene, &mut harness.ui),
        ActionOutcome::Started
    );
    assert_eq!(harness.scene.orbit(), (false, false));
    assert!(harness.scene.depth_of_field());
    assert!(!harness.ui.exit_control_visible);
    assert_eq!(harness.ui.overflow, Overflow::Auto);

    harness.run_seconds(1.5);
    assert_eq!(harness.showcase.mode(), Mode::ScrollDriven);
    assert!(close(harness.camera().position, section_pose.position));
    assert!(close(harness.camera().target, section_pose.target));
    assert!(harness.showcase.scroll_engine().is_enabled());

    let ring = harness.scene.rotation_of("Scene_1_1").unwrap();
    assert!((ring.x.cos() - 1.0).abs() < 1e-3);
}

#[test]
fn settled_frames_do_not_sync() {
    let mut harness = Harness::scroll_driven();
    harness.run_seconds(1.0);
    let syncs = harness.scene.camera_syncs();
    let report = harness.showcase.frame(DT, &mut harness.scene, &mut harness.ui);
    assert!(!report.synced);
    assert_eq!(harness.scene.camera_syncs(), syncs);
}

#[test]
fn colors_are_blended_in_linear_space() {
    let mut config = ShowcaseConfig::new();
    config.device.class = DeviceClass::Touch;
    let mut harness = Harness::new(config);
    harness.run_seconds(6.0);

    assert_eq!(harness.showcase.on_native_scroll(900.0), ActionOutcome::Applied);
    harness.showcase.frame(DT, &mut harness.scene, &mut harness.ui);

    let silver = harness.scene.color_of("silver").unwrap();
    assert_eq!(silver, Color::from_hex(0xd28b8b).to_linear());
    assert!(close(harness.camera().position, Vec3::new(-1.83, -0.14, 6.15)));
}

#[test]
fn touch_devices_scroll_natively() {
    let mut config = ShowcaseConfig::new();
    config.device.class = DeviceClass::Touch;
    let mut harness = Harness::new(config);
    assert!(harness.ui.scroll_snap);

    harness.run_seconds(6.0);
    assert_eq!(harness.showcase.mode(), Mode::ScrollDriven);
    assert!(!harness.showcase.scroll_engine().is_enabled());
    assert_eq!(
        harness.showcase.on_wheel(300.0),
        ActionOutcome::Ignored(IgnoredRequest::WrongMode)
    );
}

#[test]
fn resize_rescales_scroll_and_segments() {
    let mut config = ShowcaseConfig::new();
    config.device.class = DeviceClass::Touch;
    let mut harness = Harness::new(config);
    harness.run_seconds(6.0);

    harness.showcase.on_native_scroll(900.0);
    harness.showcase.frame(DT, &mut harness.scene, &mut harness.ui);
    let section_2 = harness.camera();

    harness.showcase.resize(450.0, &mut harness.ui).unwrap();
    assert_eq!(harness.showcase.position(), 450.0);
    assert_eq!(harness.ui.native_scroll, 450.0);
    assert_eq!(harness.showcase.scroll_engine().snap_targets(), &[0.0, 450.0, 900.0]);

    harness.showcase.frame(DT, &mut harness.scene, &mut harness.ui);
    assert!(close(harness.camera().position, section_2.position));
    assert!(close(harness.camera().target, section_2.target));

    // section 3 now starts at 900
    harness.showcase.on_native_scroll(900.0);
    harness.showcase.frame(DT, &mut harness.scene, &mut harness.ui);
    assert!(close(harness.camera().position, Vec3::new(-0.06, -1.15, 4.42)));
}

#[test]
fn invalid_resize_changes_nothing() {
    let mut harness = Harness::scroll_driven();
    assert_eq!(
        harness.showcase.resize(0.0, &mut harness.ui),
        Err(ConfigurationError::InvalidViewport(0.0))
    );
    assert_eq!(harness.showcase.scroll_engine().viewport_height(), 900.0);
    assert_eq!(harness.showcase.scroll_engine().snap_targets(), &[0.0, 900.0, 1800.0]);
}

#[test]
fn unbound_controls_are_skipped() {
    let mut config = ShowcaseConfig::new();
    config.ui.explore_button = false;
    config.ui.background_toggle = false;
    let mut harness = Harness::new(config);
    harness.run_seconds(6.0);

    assert_eq!(
        harness.showcase.request_explore(&mut harness.ui),
        ActionOutcome::Skipped(OperationSkipped { action: "explore" })
    );
    assert_eq!(
        harness.showcase.toggle_background(&mut harness.scene),
        ActionOutcome::Skipped(OperationSkipped { action: "toggle_background" })
    );
    assert_eq!(harness.showcase.mode(), Mode::ScrollDriven);
}

#[test]
fn background_toggles_between_day_and_night() {
    let mut harness = Harness::new(ShowcaseConfig::new());
    assert_eq!(harness.scene.background(), Some(Color::from_hex(0xffffff).to_linear()));

    harness.showcase.toggle_background(&mut harness.scene);
    assert!(harness.showcase.is_night());
    assert_eq!(harness.scene.background(), Some(Color::from_hex(0x22052f).to_linear()));

    harness.showcase.toggle_background(&mut harness.scene);
    assert_eq!(harness.scene.background(), Some(Color::from_hex(0xffffff).to_linear()));
}

#[test]
fn unknown_section_is_ignored() {
    let mut harness = Harness::scroll_driven();
    assert_eq!(
        harness.showcase.jump_to_section(7, &mut harness.ui),
        ActionOutcome::Ignored(IgnoredRequest::UnknownSection)
    );
}

#[test]
fn missing_objects_fail_load() {
    let config = ShowcaseConfig::new();
    let mut scene = MemoryScene::new()
        .with_camera(CameraPose::default())
        .with_objects(["Scene_1_1", "silver"]);
    let mut ui = RecordingPresentation::new();

    match ModeController::load(&config, &mut scene, &mut ui) {
        Err(ShowcaseError::Load(LoadError::MissingObject(name))) => assert_eq!(name, "gold"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("load should fail"),
    }
}

#[test]
fn missing_camera_fails_load() {
    let config = ShowcaseConfig::new();
    let mut scene = MemoryScene::new().with_objects(["Scene_1_1"]);
    let mut ui = RecordingPresentation::new();
    assert!(matches!(
        ModeController::load(&config, &mut scene, &mut ui),
        Err(ShowcaseError::Load(LoadError::MissingCamera))
    ));
}
