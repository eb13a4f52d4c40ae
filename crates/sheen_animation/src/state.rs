//! Animated state shared by the scrub executor and the one-shot player
//!
//! Every write goes through [`AnimatedState::set`], which marks the
//! [`DirtyFlag`] only when a value actually changes. The render-sync step
//! consumes the flag once per frame.

use rustc_hash::FxHashMap;
use sheen_core::{CameraPose, ContentLayer, DirtyFlag, Vec3};

/// An animatable field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    CameraPosition,
    CameraTarget,
    /// XYZ Euler rotation (radians) of the showcased object
    Rotation,
    /// Progress of a color blend stage
    ColorStage(usize),
    /// Opacity of a content overlay
    Opacity(ContentLayer),
}

impl Property {
    /// Whether values of this property are vectors
    pub fn is_vector(&self) -> bool {
        matches!(
            self,
            Property::CameraPosition | Property::CameraTarget | Property::Rotation
        )
    }
}

/// A property value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Vec3(Vec3),
    Scalar(f32),
}

impl Value {
    /// Interpolate between two values of the same kind.
    ///
    /// Mismatched kinds snap to `to` once `t` reaches 1 and keep `self`
    /// before that.
    pub fn lerp(self, to: Value, t: f32) -> Value {
        match (self, to) {
            (Value::Vec3(a), Value::Vec3(b)) => Value::Vec3(a.lerp(b, t)),
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(sheen_core::math::lerp(a, b, t)),
            (from, to) => {
                if t >= 1.0 {
                    to
                } else {
                    from
                }
            }
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Value::Vec3(v) => Some(*v),
            Value::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Value::Scalar(v) => Some(*v),
            Value::Vec3(_) => None,
        }
    }

    /// Whether this value fits `property`
    pub fn matches(&self, property: Property) -> bool {
        property.is_vector() == matches!(self, Value::Vec3(_))
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::Vec3(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Scalar(v)
    }
}

/// Camera pose, object rotation, blend progress, and layer opacity for one
/// frame
#[derive(Clone, Debug)]
pub struct AnimatedState {
    pose: CameraPose,
    rotation: Vec3,
    stage_progress: Vec<f32>,
    opacity: FxHashMap<ContentLayer, f32>,
    dirty: DirtyFlag,
}

impl AnimatedState {
    /// Create state with every layer fully opaque and every blend stage at 0
    pub fn new(pose: CameraPose, stage_count: usize) -> Self {
        Self {
            pose,
            rotation: Vec3::ZERO,
            stage_progress: vec![0.0; stage_count],
            opacity: ContentLayer::ALL.iter().map(|&layer| (layer, 1.0)).collect(),
            dirty: DirtyFlag::default(),
        }
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn stage_progress(&self) -> &[f32] {
        &self.stage_progress
    }

    pub fn opacity(&self, layer: ContentLayer) -> f32 {
        self.opacity.get(&layer).copied().unwrap_or(1.0)
    }

    pub fn opacities(&self) -> impl Iterator<Item = (ContentLayer, f32)> + '_ {
        ContentLayer::ALL
            .iter()
            .map(move |&layer| (layer, self.opacity(layer)))
    }

    /// Read a property
    pub fn get(&self, property: Property) -> Value {
        match property {
            Property::CameraPosition => Value::Vec3(self.pose.position),
            Property::CameraTarget => Value::Vec3(self.pose.target),
            Property::Rotation => Value::Vec3(self.rotation),
            Property::ColorStage(stage) => {
                Value::Scalar(self.stage_progress.get(stage).copied().unwrap_or(0.0))
            }
            Property::Opacity(layer) => Value::Scalar(self.opacity(layer)),
        }
    }

    /// Write a property. Returns whether the stored value changed; a change
    /// marks the state dirty. Values of the wrong kind are ignored.
    pub fn set(&mut self, property: Property, value: Value) -> bool {
        let changed = match (property, value) {
            (Property::CameraPosition, Value::Vec3(v)) => replace(&mut self.pose.position, v),
            (Property::CameraTarget, Value::Vec3(v)) => replace(&mut self.pose.target, v),
            (Property::Rotation, Value::Vec3(v)) => replace(&mut self.rotation, v),
            (Property::ColorStage(stage), Value::Scalar(t)) => {
                match self.stage_progress.get_mut(stage) {
                    Some(slot) => replace(slot, t.clamp(0.0, 1.0)),
                    None => false,
                }
            }
            (Property::Opacity(layer), Value::Scalar(alpha)) => {
                let slot = self.opacity.entry(layer).or_insert(1.0);
                replace(slot, alpha.clamp(0.0, 1.0))
            }
            (property, value) => {
                tracing::warn!(?property, ?value, "value kind does not match property");
                false
            }
        };
        if changed {
            self.dirty.mark();
        }
        changed
    }

    /// Adopt a pose mutated outside the animation core (orbit control).
    ///
    /// Does not mark the state dirty: the external camera already shows it.
    pub fn adopt_external_pose(&mut self, pose: CameraPose) {
        self.pose = pose;
    }

    /// Force a sync on the next render step
    pub fn mark_dirty(&mut self) {
        self.dirty.mark();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_set()
    }

    /// Consume the dirty flag (render-sync step)
    pub fn take_dirty(&mut self) -> bool {
        self.dirty.take()
    }
}

fn replace<T: PartialEq + Copy>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AnimatedState {
        AnimatedState::new(CameraPose::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO), 2)
    }

    #[test]
    fn test_writes_mark_dirty_once() {
        let mut state = state();
        assert!(!state.is_dirty());

        assert!(state.set(Property::CameraPosition, Vec3::new(1.0, 0.0, 5.0).into()));
        assert!(state.set(Property::Rotation, Vec3::new(0.0, 0.0, -0.9).into()));
        assert!(state.set(Property::ColorStage(1), Value::Scalar(0.5)));

        assert!(state.take_dirty());
        assert!(!state.take_dirty());
    }

    #[test]
    fn test_unchanged_write_stays_clean() {
        let mut state = state();
        assert!(!state.set(Property::CameraTarget, Vec3::ZERO.into()));
        assert!(!state.set(Property::Opacity(ContentLayer::Header), Value::Scalar(1.0)));
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_kind_mismatch_ignored() {
        let mut state = state();
        assert!(!state.set(Property::CameraPosition, Value::Scalar(3.0)));
        assert!(!state.set(Property::ColorStage(9), Value::Scalar(0.5)));
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_scalars_are_clamped() {
        let mut state = state();
        state.set(Property::ColorStage(0), Value::Scalar(7.0));
        state.set(Property::Opacity(ContentLayer::HeroContent), Value::Scalar(-1.0));
        assert_eq!(state.stage_progress()[0], 1.0);
        assert_eq!(state.opacity(ContentLayer::HeroContent), 0.0);
    }

    #[test]
    fn test_external_pose_does_not_dirty() {
        let mut state = state();
        state.adopt_external_pose(CameraPose::new(Vec3::ONE, Vec3::ZERO));
        assert_eq!(state.pose().position, Vec3::ONE);
        assert!(!state.is_dirty());
    }
}
