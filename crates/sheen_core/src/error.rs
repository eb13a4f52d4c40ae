//! Error types and non-fatal outcomes

use thiserror::Error;

/// Invalid setup detected while building engines, segments, or palettes.
///
/// Always raised at construction time, never mid-animation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Snapping was requested but no snap targets were given
    #[error("snap targets are empty while snapping is enabled")]
    EmptySnapTargets,

    /// Trigger range with `end <= start`
    #[error("trigger range end ({end}) must be greater than start ({start})")]
    InvalidTriggerRange { start: f32, end: f32 },

    /// Viewport height must be positive and finite
    #[error("viewport height must be positive, got {0}")]
    InvalidViewport(f32),

    /// A damping/factor constant is outside its valid range
    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    /// One-shot step with a non-positive or non-finite duration
    #[error("tween duration must be positive, got {0}")]
    InvalidDuration(f32),

    /// Color palettes do not line up with the blend stages
    #[error("palette error: {0}")]
    Palette(String),

    /// A segment or tween has nothing to animate
    #[error("segment has no tracks")]
    EmptySegment,

    /// A track value does not fit the property it animates
    #[error("value kind does not match property {0}")]
    ValueKind(String),
}

/// Required scene content missing once asset loading completed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The scene has no active camera
    #[error("precondition violated: scene has no active camera")]
    MissingCamera,

    /// A named object targeted by the timeline is absent
    #[error("precondition violated: scene object '{0}' not found")]
    MissingObject(String),
}

/// A UI action whose element is absent; the handler was never registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSkipped {
    pub action: &'static str,
}

/// Why a request was ignored without being queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredRequest {
    /// A mode transition is still playing
    TransitionInProgress,
    /// The request does not apply in the current mode
    WrongMode,
    /// No section exists at the requested index
    UnknownSection,
}

/// Result of a UI-triggered action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Took effect immediately
    Applied,
    /// A transition animation was started
    Started,
    /// Rejected without error
    Ignored(IgnoredRequest),
    /// The action is not bound
    Skipped(OperationSkipped),
}

impl ActionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ActionOutcome::Applied | ActionOutcome::Started)
    }
}
