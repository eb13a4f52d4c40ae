//! Interaction modes and the per-frame loop
//!
//! ```text
//! Intro ──IntroComplete──▶ ScrollDriven ──Explore──▶ Transitioning(ToExplore)
//!                              ▲                            │ TransitionComplete
//!       TransitionComplete     │                            ▼
//! Transitioning(ToScroll) ◀────┴─────────Exit────────── FreeExplore
//! ```
//!
//! Scroll-driving (engine input and scrub writes) only happens in
//! `ScrollDriven`. In `FreeExplore` the orbit controller owns the camera and
//! the pose is read back each frame.

use sheen_animation::{
    AnimatedState, CameraTimelineController, PlaybackId, Property, ScrollPhysicsEngine, Segment,
    Sequence, Value,
};
use sheen_core::{
    ActionOutcome, CameraPose, ConfigurationError, ContentLayer, IgnoredRequest, LoadError,
    OperationSkipped, StateMachine,
};
use sheen_paint::{Color, ColorBlendController};

use crate::config::{DeviceClass, ShowcaseConfig, UiConfig};
use crate::error::Result;
use crate::presentation::{Cursor, Overflow, Presentation};
use crate::scene::{SceneHandles, SceneHost};
use crate::showcase;

/// Which way a mode transition is heading
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionDirection {
    ToExplore,
    ToScroll,
}

/// Interaction mode; exactly one is active
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Intro,
    ScrollDriven,
    Transitioning(TransitionDirection),
    FreeExplore,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Intro => "intro",
            Mode::ScrollDriven => "scroll_driven",
            Mode::Transitioning(_) => "transitioning",
            Mode::FreeExplore => "free_explore",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeEvent {
    IntroComplete,
    Explore,
    Exit,
    TransitionComplete,
}

/// What happened during one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub mode: Mode,
    /// Virtual scroll offset after this frame
    pub position: f32,
    /// Whether state was pushed to the scene and page
    pub synced: bool,
    /// The new mode, if it changed this frame
    pub mode_changed: Option<Mode>,
}

/// Coordinates scroll physics, the timeline, color blending, and the scene
pub struct ModeController {
    machine: StateMachine<Mode, ModeEvent>,
    engine: ScrollPhysicsEngine,
    timeline: CameraTimelineController,
    blend: ColorBlendController,
    state: AnimatedState,
    handles: SceneHandles,
    segments: Vec<Segment>,
    /// State the segments were registered against, kept for re-registration
    scrub_origin: Option<AnimatedState>,
    explore: Sequence,
    /// Sequence whose completion ends the current mode
    pending: Option<PlaybackId>,
    device: DeviceClass,
    ui: UiConfig,
    /// Day and night, linear space
    backgrounds: (Color, Color),
    night: bool,
}

fn mode_machine() -> StateMachine<Mode, ModeEvent> {
    use TransitionDirection::*;
    StateMachine::builder(Mode::Intro)
        .on(Mode::Intro, ModeEvent::IntroComplete, Mode::ScrollDriven)
        .on(Mode::ScrollDriven, ModeEvent::Explore, Mode::Transitioning(ToExplore))
        .on(Mode::Transitioning(ToExplore), ModeEvent::TransitionComplete, Mode::FreeExplore)
        .on(Mode::FreeExplore, ModeEvent::Exit, Mode::Transitioning(ToScroll))
        .on(Mode::Transitioning(ToScroll), ModeEvent::TransitionComplete, Mode::ScrollDriven)
        .build()
}

impl ModeController {
    /// Validate the scene once loading has completed and start the intro.
    ///
    /// Fails with a configuration error before touching the scene, or with a
    /// load error if the camera or any named object is missing.
    pub fn load(
        config: &ShowcaseConfig,
        host: &mut dyn SceneHost,
        ui: &mut dyn Presentation,
    ) -> Result<Self> {
        config.validate()?;
        let blend = ColorBlendController::new(config.palettes()?)?;
        let engine = ScrollPhysicsEngine::new(
            config.scroll_config(),
            config.viewport.height,
            config.viewport.section_tops(),
        )?;
        let segments = showcase::scroll_segments(config.viewport.height)?;
        let explore = showcase::explore_sequence(&config.explore)?;
        let intro = showcase::intro_sequence()?;
        let (day, night) = config.backgrounds()?;

        let handles = SceneHandles::validate(&*host, &config.scene_names())?;
        let pose = host.camera_pose().ok_or(LoadError::MissingCamera)?;

        host.set_orbit_control(false, false);
        host.set_background(day.to_linear());
        ui.scroll_native_to(0.0);
        if config.device.class == DeviceClass::Touch {
            ui.set_scroll_snap(true);
        }

        let mut state = AnimatedState::new(pose, blend.stage_count());
        for layer in [ContentLayer::ForeverContent, ContentLayer::EmotionsContent] {
            state.set(Property::Opacity(layer), Value::Scalar(0.0));
        }
        let mut timeline = CameraTimelineController::new();
        let pending = Some(timeline.play(&intro, &mut state));

        tracing::info!(
            device = ?config.device.class,
            sections = config.viewport.sections,
            "showcase loaded, intro started"
        );

        Ok(Self {
            machine: mode_machine(),
            engine,
            timeline,
            blend,
            state,
            handles,
            segments,
            scrub_origin: None,
            explore,
            pending,
            device: config.device.class,
            ui: config.ui,
            backgrounds: (day.to_linear(), night.to_linear()),
            night: false,
        })
    }

    pub fn mode(&self) -> Mode {
        self.machine.current_state()
    }

    /// Virtual scroll offset
    pub fn position(&self) -> f32 {
        self.engine.position()
    }

    pub fn pose(&self) -> &CameraPose {
        self.state.pose()
    }

    pub fn animated_state(&self) -> &AnimatedState {
        &self.state
    }

    pub fn scroll_engine(&self) -> &ScrollPhysicsEngine {
        &self.engine
    }

    pub fn is_night(&self) -> bool {
        self.night
    }

    /// Most recent mode transitions, oldest first
    pub fn history(&self) -> &[(Mode, ModeEvent, Mode)] {
        self.machine.history()
    }

    /// Wheel input. Staged for the next frame while scroll-driven on a
    /// pointer device.
    pub fn on_wheel(&mut self, delta: f32) -> ActionOutcome {
        if !self.engine.is_enabled() {
            return ActionOutcome::Ignored(IgnoredRequest::WrongMode);
        }
        self.engine.on_input(delta);
        ActionOutcome::Applied
    }

    /// Native document scroll on touch devices
    pub fn on_native_scroll(&mut self, offset: f32) -> ActionOutcome {
        if self.device != DeviceClass::Touch || self.mode() != Mode::ScrollDriven {
            return ActionOutcome::Ignored(IgnoredRequest::WrongMode);
        }
        self.engine.set_position(offset);
        ActionOutcome::Applied
    }

    /// Leave scroll-driving and fly to the explore pose
    pub fn request_explore(&mut self, ui: &mut dyn Presentation) -> ActionOutcome {
        if !self.ui.explore_button {
            return skipped("explore");
        }
        if let Err(reason) = self.expect_mode(Mode::ScrollDriven) {
            return ignored("explore", reason);
        }

        self.machine.send(ModeEvent::Explore);
        self.engine.disable();
        ui.set_canvas_interactive(true);
        ui.set_header_pinned(true);
        ui.set_page_overflow(Overflow::Hidden);
        ui.set_cursor(Cursor::Grab);
        self.pending = Some(self.timeline.play(&self.explore, &mut self.state));

        tracing::info!(position = self.engine.position(), "explore transition started");
        ActionOutcome::Started
    }

    /// Leave free explore and fly back to the pose for the current scroll
    pub fn request_exit(&mut self, host: &mut dyn SceneHost, ui: &mut dyn Presentation) -> ActionOutcome {
        if !self.ui.exit_button {
            return skipped("exit");
        }
        if let Err(reason) = self.expect_mode(Mode::FreeExplore) {
            return ignored("exit", reason);
        }

        if let Some(pose) = host.camera_pose() {
            self.state.adopt_external_pose(pose);
        }
        self.machine.send(ModeEvent::Exit);
        host.set_orbit_control(false, false);
        host.set_depth_of_field(true);
        ui.set_exit_control_visible(false);
        ui.set_page_overflow(Overflow::Auto);
        ui.set_header_pinned(false);
        ui.set_canvas_interactive(false);
        ui.set_cursor(Cursor::Default);

        let sample = self.timeline.sample(self.engine.position());
        match showcase::exit_sequence(&sample, self.state.rotation()) {
            Ok(exit) => self.pending = Some(self.timeline.play(&exit, &mut self.state)),
            Err(err) => {
                tracing::warn!(%err, "no scroll state to return to, exiting immediately");
                self.finish_exit();
            }
        }

        tracing::info!(position = self.engine.position(), "exit transition started");
        ActionOutcome::Started
    }

    /// Scroll to the top of section `index`
    pub fn jump_to_section(&mut self, index: usize, ui: &mut dyn Presentation) -> ActionOutcome {
        if !self.ui.section_links {
            return skipped("jump_to_section");
        }
        if let Err(reason) = self.expect_mode(Mode::ScrollDriven) {
            return ignored("jump_to_section", reason);
        }
        let Some(&offset) = self.engine.snap_targets().get(index) else {
            return ignored("jump_to_section", IgnoredRequest::UnknownSection);
        };

        match self.device {
            DeviceClass::Pointer => self.engine.seek_to(offset),
            DeviceClass::Touch => {
                self.engine.set_position(offset);
                ui.scroll_native_to(offset);
            }
        }
        tracing::debug!(index, offset, "jump to section");
        ActionOutcome::Applied
    }

    /// Switch between the day and night backgrounds
    pub fn toggle_background(&mut self, host: &mut dyn SceneHost) -> ActionOutcome {
        if !self.ui.background_toggle {
            return skipped("toggle_background");
        }
        self.night = !self.night;
        let (day, night) = self.backgrounds;
        host.set_background(if self.night { night } else { day });
        ActionOutcome::Applied
    }

    /// Adopt a new viewport height.
    ///
    /// Scroll offset and snap targets scale with the viewport, and the scrubbed
    /// segments are rebuilt for the new section geometry. Fails without
    /// changing anything if the height is invalid.
    pub fn resize(
        &mut self,
        viewport_height: f32,
        ui: &mut dyn Presentation,
    ) -> std::result::Result<(), ConfigurationError> {
        if !(viewport_height.is_finite() && viewport_height > 0.0) {
            return Err(ConfigurationError::InvalidViewport(viewport_height));
        }
        let segments = showcase::scroll_segments(viewport_height)?;
        self.engine.resize(viewport_height)?;
        self.segments = segments;

        if let Some(origin) = &self.scrub_origin {
            self.timeline.clear_segments();
            for segment in self.segments.iter().cloned() {
                if let Err(err) = self.timeline.register(segment, origin) {
                    tracing::warn!(%err, "segment rejected");
                }
            }
        }
        ui.scroll_native_to(self.engine.position());
        tracing::debug!(viewport_height, position = self.engine.position(), "viewport resized");
        Ok(())
    }

    /// Per-frame hook.
    ///
    /// Order: orbit read-back, one-shot tweens, mode completion, scroll
    /// physics, scrub, then a single render sync if anything changed.
    pub fn frame(&mut self, dt: f32, host: &mut dyn SceneHost, ui: &mut dyn Presentation) -> FrameReport {
        let before = self.mode();

        if before == Mode::FreeExplore {
            if let Some(pose) = host.camera_pose() {
                self.state.adopt_external_pose(pose);
            }
        }

        let completed = self.timeline.tick_one_shots(dt, &mut self.state);
        if let Some(id) = self.pending {
            if completed.contains(&id) {
                self.pending = None;
                self.complete_transition(host, ui);
            }
        }

        if self.engine.tick() {
            ui.scroll_native_to(self.engine.position());
        }

        if self.mode() == Mode::ScrollDriven {
            self.timeline.apply(self.engine.position(), dt, &mut self.state);
        }

        let synced = self.sync(host, ui);
        let mode = self.mode();
        FrameReport {
            mode,
            position: self.engine.position(),
            synced,
            mode_changed: (mode != before).then_some(mode),
        }
    }

    fn expect_mode(&self, expected: Mode) -> std::result::Result<(), IgnoredRequest> {
        match self.mode() {
            mode if mode == expected => Ok(()),
            Mode::Transitioning(_) => Err(IgnoredRequest::TransitionInProgress),
            _ => Err(IgnoredRequest::WrongMode),
        }
    }

    fn complete_transition(&mut self, host: &mut dyn SceneHost, ui: &mut dyn Presentation) {
        match self.mode() {
            Mode::Intro => self.finish_intro(ui),
            Mode::Transitioning(TransitionDirection::ToExplore) => {
                self.machine.send(ModeEvent::TransitionComplete);
                ui.set_exit_control_visible(true);
                host.set_orbit_control(true, true);
                host.set_depth_of_field(false);
                tracing::info!("free explore");
            }
            Mode::Transitioning(TransitionDirection::ToScroll) => self.finish_exit(),
            mode => tracing::debug!(?mode, "sequence completed outside a transition"),
        }
    }

    fn finish_intro(&mut self, ui: &mut dyn Presentation) {
        self.machine.send(ModeEvent::IntroComplete);
        ui.dismiss_loader();
        ui.set_page_overflow(Overflow::Auto);

        self.scrub_origin = Some(self.state.clone());
        for segment in self.segments.iter().cloned() {
            if let Err(err) = self.timeline.register(segment, &self.state) {
                tracing::warn!(%err, "segment rejected");
            }
        }
        if self.device == DeviceClass::Pointer {
            self.engine.enable();
        }
        tracing::info!(segments = self.timeline.segment_count(), "intro complete, scroll driven");
    }

    fn finish_exit(&mut self) {
        self.machine.send(ModeEvent::TransitionComplete);
        if self.device == DeviceClass::Pointer {
            self.engine.enable();
        }
        self.timeline.force_resample();
        tracing::info!(position = self.engine.position(), "back to scroll driven");
    }

    /// Push state to the scene and page if anything changed since last sync
    fn sync(&mut self, host: &mut dyn SceneHost, ui: &mut dyn Presentation) -> bool {
        if !self.state.take_dirty() {
            return false;
        }
        host.sync_camera(self.state.pose());
        host.set_rotation(self.handles.ring, self.state.rotation());

        let colors = self.blend.resolve(self.state.stage_progress());
        for (objects, color) in self.handles.groups.iter().zip(colors) {
            for &object in objects {
                host.set_material_color(object, color);
            }
        }
        for (layer, opacity) in self.state.opacities() {
            ui.set_layer_opacity(layer, opacity);
        }
        true
    }
}

fn skipped(action: &'static str) -> ActionOutcome {
    tracing::warn!(action, "control not bound, operation skipped");
    ActionOutcome::Skipped(OperationSkipped { action })
}

fn ignored(action: &'static str, reason: IgnoredRequest) -> ActionOutcome {
    tracing::warn!(action, ?reason, "request ignored");
    ActionOutcome::Ignored(reason)
}
