//! Declarative animation descriptors
//!
//! [`Segment`]s are scroll-scrubbed: their progress is a function of the
//! virtual scroll offset. [`Sequence`]s are one-shot: ordered [`Tween`]s
//! placed on a wall-clock axis, built the way chained tween calls are
//! authored (`then`, overlap by `n` seconds, or at an absolute offset).

use sheen_core::ConfigurationError;
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::state::{Property, Value};

/// Viewport line an anchor element's top is measured against
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEdge {
    Top,
    Center,
    Bottom,
    /// Fraction of the viewport height from its top (0.2 = 20%)
    Fraction(f32),
}

impl ViewportEdge {
    fn offset(&self, viewport_height: f32) -> f32 {
        match *self {
            ViewportEdge::Top => 0.0,
            ViewportEdge::Center => viewport_height * 0.5,
            ViewportEdge::Bottom => viewport_height,
            ViewportEdge::Fraction(f) => viewport_height * f,
        }
    }
}

/// Page element whose position defines a trigger range
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportAnchor {
    /// Document offset of the element's top edge
    pub element_top: f32,
}

impl ViewportAnchor {
    pub fn new(element_top: f32) -> Self {
        Self { element_top }
    }

    /// Scroll offsets at which the element top crosses `start`, then `end`.
    ///
    /// `range(Bottom, Top)` starts when the element enters from below and
    /// ends when it reaches the top of the viewport.
    pub fn range(
        &self,
        start: ViewportEdge,
        end: ViewportEdge,
        viewport_height: f32,
    ) -> Result<TriggerRange, ConfigurationError> {
        TriggerRange::new(
            self.element_top - start.offset(viewport_height),
            self.element_top - end.offset(viewport_height),
        )
    }
}

/// Start/end scroll offsets of a scrubbed segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerRange {
    start: f32,
    end: f32,
}

impl TriggerRange {
    pub fn new(start: f32, end: f32) -> Result<Self, ConfigurationError> {
        if !(start.is_finite() && end.is_finite()) || end <= start {
            return Err(ConfigurationError::InvalidTriggerRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    /// Local progress `clamp((position - start) / (end - start), 0, 1)`
    pub fn progress(&self, position: f32) -> f32 {
        ((position - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }
}

/// How scroll progress reaches a segment
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Scrub {
    /// Progress follows the scroll offset exactly
    #[default]
    Direct,
    /// Progress catches up with the scroll offset over roughly this many seconds
    Smoothed(f32),
}

/// One interpolated property
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Track {
    pub property: Property,
    /// Start value; `None` takes whatever the property holds when the
    /// animation is resolved
    pub from: Option<Value>,
    pub to: Value,
}

impl Track {
    pub fn to(property: Property, to: impl Into<Value>) -> Self {
        Self {
            property,
            from: None,
            to: to.into(),
        }
    }

    pub fn from_to(property: Property, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self {
            property,
            from: Some(from.into()),
            to: to.into(),
        }
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        let from_ok = self.from.map_or(true, |v| v.matches(self.property));
        if from_ok && self.to.matches(self.property) {
            Ok(())
        } else {
            Err(ConfigurationError::ValueKind(format!("{:?}", self.property)))
        }
    }
}

/// A scroll-scrubbed animation step
#[derive(Clone, Debug)]
pub struct Segment {
    range: TriggerRange,
    scrub: Scrub,
    easing: Easing,
    tracks: SmallVec<[Track; 4]>,
}

impl Segment {
    pub fn new(range: TriggerRange, tracks: impl IntoIterator<Item = Track>) -> Result<Self, ConfigurationError> {
        let tracks: SmallVec<[Track; 4]> = tracks.into_iter().collect();
        if tracks.is_empty() {
            return Err(ConfigurationError::EmptySegment);
        }
        for track in &tracks {
            track.validate()?;
        }
        Ok(Self {
            range,
            scrub: Scrub::Direct,
            easing: Easing::Linear,
            tracks,
        })
    }

    pub fn with_scrub(mut self, scrub: Scrub) -> Self {
        self.scrub = scrub;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn range(&self) -> &TriggerRange {
        &self.range
    }

    pub fn scrub(&self) -> Scrub {
        self.scrub
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

/// A one-shot animation step inside a [`Sequence`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub track: Track,
    /// Seconds from sequence start
    pub offset: f32,
    /// Seconds
    pub duration: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(track: Track, duration: f32) -> Self {
        Self {
            track,
            offset: 0.0,
            duration,
            easing: Easing::EaseOutQuad,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn end(&self) -> f32 {
        self.offset + self.duration
    }
}

/// An ordered set of one-shot tweens played against elapsed time
#[derive(Clone, Debug, Default)]
pub struct Sequence {
    name: &'static str,
    tweens: Vec<Tween>,
    duration: f32,
}

impl Sequence {
    pub fn builder(name: &'static str) -> SequenceBuilder {
        SequenceBuilder {
            name,
            tweens: Vec::new(),
            end: 0.0,
            error: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    /// Seconds until the last tween ends
    pub fn duration(&self) -> f32 {
        self.duration
    }
}

/// Places tweens on a sequence's time axis
pub struct SequenceBuilder {
    name: &'static str,
    tweens: Vec<Tween>,
    end: f32,
    error: Option<ConfigurationError>,
}

impl SequenceBuilder {
    /// Append after everything placed so far
    pub fn then(self, tween: Tween) -> Self {
        let at = self.end;
        self.at(at, tween)
    }

    /// Start `seconds` before the current end of the sequence
    pub fn overlap(self, seconds: f32, tween: Tween) -> Self {
        let at = (self.end - seconds).max(0.0);
        self.at(at, tween)
    }

    /// Start at an absolute offset
    pub fn at(mut self, offset: f32, mut tween: Tween) -> Self {
        if self.error.is_some() {
            return self;
        }
        if !(tween.duration.is_finite() && tween.duration > 0.0) {
            self.error = Some(ConfigurationError::InvalidDuration(tween.duration));
            return self;
        }
        if let Err(err) = tween.track.validate() {
            self.error = Some(err);
            return self;
        }
        tween.offset = offset.max(0.0);
        self.end = self.end.max(tween.end());
        self.tweens.push(tween);
        self
    }

    /// Extend the sequence with idle time
    pub fn gap(mut self, seconds: f32) -> Self {
        self.end += seconds.max(0.0);
        self
    }

    pub fn build(self) -> Result<Sequence, ConfigurationError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.tweens.is_empty() {
            return Err(ConfigurationError::EmptySegment);
        }
        Ok(Sequence {
            name: self.name,
            tweens: self.tweens,
            duration: self.end,
        })
    }
}
