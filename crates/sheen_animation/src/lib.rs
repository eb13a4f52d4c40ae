//! Sheen Animation Core
//!
//! Scroll physics, scroll-scrubbed segments, and one-shot sequences.
//!
//! # Features
//!
//! - **Scroll Physics**: staged wheel input, damped velocity, section snapping
//! - **Scrubbed Segments**: scroll progress mapped onto camera, rotation, color and opacity
//! - **One-shot Sequences**: time-based tweens with last-started-wins ownership
//! - **Coalesced Writes**: every change marks one dirty flag consumed per frame

pub mod easing;
pub mod scheduler;
pub mod scroll;
pub mod segment;
pub mod state;
pub mod timeline;

pub use easing::Easing;
pub use scheduler::{OneShotPlayer, PlaybackId};
pub use scroll::{ScrollConfig, ScrollPhysicsEngine, ScrollState};
pub use segment::{
    Scrub, Segment, Sequence, SequenceBuilder, Track, TriggerRange, Tween, ViewportAnchor,
    ViewportEdge,
};
pub use state::{AnimatedState, Property, Value};
pub use timeline::CameraTimelineController;
