//! In-memory scene and page used by tests and headless runs

use rustc_hash::FxHashMap;
use sheen_core::{CameraPose, ContentLayer, Vec3};
use sheen_paint::Color;

use crate::presentation::{Cursor, Overflow, Presentation};
use crate::scene::{ObjectHandle, SceneHost};

/// Scene that stores whatever is pushed to it
#[derive(Debug, Default)]
pub struct MemoryScene {
    camera: Option<CameraPose>,
    objects: FxHashMap<String, ObjectHandle>,
    rotations: FxHashMap<ObjectHandle, Vec3>,
    colors: FxHashMap<ObjectHandle, Color>,
    background: Option<Color>,
    orbit_enabled: bool,
    auto_rotate: bool,
    depth_of_field: bool,
    camera_syncs: usize,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self {
            depth_of_field: true,
            ..Self::default()
        }
    }

    pub fn with_camera(mut self, pose: CameraPose) -> Self {
        self.camera = Some(pose);
        self
    }

    pub fn with_objects<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for name in names {
            let next = ObjectHandle(self.objects.len() as u32);
            self.objects.entry(name.to_string()).or_insert(next);
        }
        self
    }

    /// Move the camera the way a user dragging the orbit controller would.
    ///
    /// Ignored while orbit control is off.
    pub fn orbit_to(&mut self, pose: CameraPose) {
        if self.orbit_enabled && self.camera.is_some() {
            self.camera = Some(pose);
        }
    }

    pub fn camera(&self) -> Option<CameraPose> {
        self.camera
    }

    pub fn rotation_of(&self, name: &str) -> Option<Vec3> {
        self.rotations.get(self.objects.get(name)?).copied()
    }

    pub fn color_of(&self, name: &str) -> Option<Color> {
        self.colors.get(self.objects.get(name)?).copied()
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn orbit(&self) -> (bool, bool) {
        (self.orbit_enabled, self.auto_rotate)
    }

    pub fn depth_of_field(&self) -> bool {
        self.depth_of_field
    }

    /// Number of camera syncs received
    pub fn camera_syncs(&self) -> usize {
        self.camera_syncs
    }
}

impl SceneHost for MemoryScene {
    fn camera_pose(&self) -> Option<CameraPose> {
        self.camera
    }

    fn sync_camera(&mut self, pose: &CameraPose) {
        if self.camera.is_some() {
            self.camera = Some(*pose);
            self.camera_syncs += 1;
        }
    }

    fn find_object(&self, name: &str) -> Option<ObjectHandle> {
        self.objects.get(name).copied()
    }

    fn set_rotation(&mut self, object: ObjectHandle, rotation: Vec3) {
        self.rotations.insert(object, rotation);
    }

    fn set_material_color(&mut self, object: ObjectHandle, color: Color) {
        self.colors.insert(object, color);
    }

    fn set_background(&mut self, color: Color) {
        self.background = Some(color);
    }

    fn set_orbit_control(&mut self, enabled: bool, auto_rotate: bool) {
        self.orbit_enabled = enabled;
        self.auto_rotate = auto_rotate;
    }

    fn set_depth_of_field(&mut self, enabled: bool) {
        self.depth_of_field = enabled;
    }
}

/// Page that records the latest value of every effect
#[derive(Debug, Default)]
pub struct RecordingPresentation {
    pub canvas_interactive: bool,
    pub header_pinned: bool,
    pub overflow: Overflow,
    pub cursor: Cursor,
    pub exit_control_visible: bool,
    pub opacity: FxHashMap<ContentLayer, f32>,
    pub native_scroll: f32,
    pub scroll_snap: bool,
    pub loader_dismissed: bool,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last opacity pushed for `layer`, 1.0 if none was
    pub fn opacity(&self, layer: ContentLayer) -> f32 {
        self.opacity.get(&layer).copied().unwrap_or(1.0)
    }
}

impl Presentation for RecordingPresentation {
    fn set_canvas_interactive(&mut self, interactive: bool) {
        self.canvas_interactive = interactive;
    }

    fn set_header_pinned(&mut self, pinned: bool) {
        self.header_pinned = pinned;
    }

    fn set_page_overflow(&mut self, overflow: Overflow) {
        self.overflow = overflow;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_exit_control_visible(&mut self, visible: bool) {
        self.exit_control_visible = visible;
    }

    fn set_layer_opacity(&mut self, layer: ContentLayer, opacity: f32) {
        self.opacity.insert(layer, opacity);
    }

    fn scroll_native_to(&mut self, offset: f32) {
        self.native_scroll = offset;
    }

    fn set_scroll_snap(&mut self, enabled: bool) {
        self.scroll_snap = enabled;
    }

    fn dismiss_loader(&mut self) {
        self.loader_dismissed = true;
    }
}
