//! Boundary to the page around the canvas

use serde::{Deserialize, Serialize};
use sheen_core::ContentLayer;

/// Page vertical overflow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    #[default]
    Auto,
    Hidden,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Default,
    Grab,
}

/// Page-level effects the mode controller drives
pub trait Presentation {
    /// Route pointer input to the canvas and raise it above the content
    fn set_canvas_interactive(&mut self, interactive: bool);

    /// Fix the header in place instead of scrolling with the page
    fn set_header_pinned(&mut self, pinned: bool);

    fn set_page_overflow(&mut self, overflow: Overflow);

    fn set_cursor(&mut self, cursor: Cursor);

    fn set_exit_control_visible(&mut self, visible: bool);

    fn set_layer_opacity(&mut self, layer: ContentLayer, opacity: f32);

    /// Publish the virtual scroll offset as the native document offset
    fn scroll_native_to(&mut self, offset: f32);

    /// Toggle mandatory CSS scroll snapping (touch devices)
    fn set_scroll_snap(&mut self, enabled: bool);

    /// Remove the loading overlay
    fn dismiss_loader(&mut self);
}
