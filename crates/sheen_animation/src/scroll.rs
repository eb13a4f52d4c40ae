//! Virtual scroll physics with inertia and section snapping
//!
//! Wheel input is staged, never applied directly: [`ScrollPhysicsEngine::on_input`]
//! only records the clamped delta and its direction, and
//! [`ScrollPhysicsEngine::tick`] integrates it once per rendered frame. This
//! keeps the integration independent of how many input events arrive between
//! frames.
//!
//! # Per-frame integration
//!
//! 1. With no fresh input (`|pending| < 1`), pull towards the nearest section
//!    boundary when within `snap_proximity`. A pull that would oppose the most
//!    recent scroll direction is reversed so momentum never visibly flips.
//! 2. Feed a `wheel_damping` share of the pending delta into velocity.
//! 3. Move by a `velocity_damping` share of velocity, clamped at 0, then decay
//!    velocity by the same share.

use sheen_core::ConfigurationError;

/// Tuning constants for the scroll integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    /// Multiplier applied to raw wheel deltas
    pub speed: f32,
    /// Share of the pending delta moved into velocity each frame
    pub wheel_damping: f32,
    /// Share of velocity applied to position (and removed from velocity) each frame
    pub velocity_damping: f32,
    /// Pull strength towards a nearby snap target
    pub snap_factor: f32,
    /// Pull strength when no snap target is within reach (0 = no pull)
    pub idle_factor: f32,
    /// Distance (as a fraction of viewport height) within which snapping pulls
    pub snap_proximity_ratio: f32,
    /// Largest accepted per-event delta (as a fraction of viewport height)
    pub max_delta_ratio: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            wheel_damping: 0.25,
            velocity_damping: 0.1,
            snap_factor: 0.3,
            idle_factor: 0.0,
            snap_proximity_ratio: 1.0 / 5.0,
            max_delta_ratio: 1.0 / 3.0,
        }
    }
}

impl ScrollConfig {
    /// Config with snapping disabled (plain inertial scrolling)
    pub fn no_snap() -> Self {
        Self {
            snap_factor: 0.0,
            idle_factor: 0.0,
            ..Default::default()
        }
    }

    pub fn snapping(&self) -> bool {
        self.snap_factor != 0.0 || self.idle_factor != 0.0
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        check_range("speed", self.speed, 0.0, f32::MAX)?;
        check_range("wheel_damping", self.wheel_damping, f32::EPSILON, 1.0)?;
        check_range("velocity_damping", self.velocity_damping, f32::EPSILON, 1.0)?;
        check_range("snap_factor", self.snap_factor, 0.0, 1.0)?;
        check_range("idle_factor", self.idle_factor, 0.0, 1.0)?;
        check_range("snap_proximity_ratio", self.snap_proximity_ratio, 0.0, f32::MAX)?;
        check_range("max_delta_ratio", self.max_delta_ratio, f32::EPSILON, f32::MAX)?;
        Ok(())
    }
}

fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigurationError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigurationError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

/// Integrator state, mutated only by the engine
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    /// Virtual scroll offset, never negative
    pub position: f32,
    pub velocity: f32,
    /// Input staged for the next tick
    pub pending_delta: f32,
    /// Sign of the most recent input: -1, 0 or 1
    pub last_direction: i8,
}

/// Converts wheel input into an inertial, snapping virtual scroll offset
#[derive(Debug, Clone)]
pub struct ScrollPhysicsEngine {
    state: ScrollState,
    config: ScrollConfig,
    snap_targets: Vec<f32>,
    viewport_height: f32,
    enabled: bool,
    seek_target: Option<f32>,
}

/// Residual pending delta below which input counts as idle
const IDLE_INPUT: f32 = 1.0;
/// Values below this are flushed to zero
const REST_EPSILON: f32 = 0.01;
/// A seek is finished once this close to its target
const SEEK_ARRIVAL: f32 = 0.5;

impl ScrollPhysicsEngine {
    /// Create a disabled engine at offset 0.
    ///
    /// Snap targets are sorted; they may only be empty if the config does not
    /// snap.
    pub fn new(
        config: ScrollConfig,
        viewport_height: f32,
        snap_targets: Vec<f32>,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        if !(viewport_height.is_finite() && viewport_height > 0.0) {
            return Err(ConfigurationError::InvalidViewport(viewport_height));
        }
        if config.snapping() && snap_targets.is_empty() {
            return Err(ConfigurationError::EmptySnapTargets);
        }
        if let Some(bad) = snap_targets.iter().find(|v| !v.is_finite()) {
            return Err(ConfigurationError::OutOfRange {
                name: "snap_target",
                value: *bad,
                min: f32::MIN,
                max: f32::MAX,
            });
        }

        let mut snap_targets = snap_targets;
        snap_targets.sort_by(f32::total_cmp);

        Ok(Self {
            state: ScrollState::default(),
            config,
            snap_targets,
            viewport_height,
            enabled: false,
            seek_target: None,
        })
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn position(&self) -> f32 {
        self.state.position
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn snap_targets(&self) -> &[f32] {
        &self.snap_targets
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        if !self.enabled {
            tracing::debug!(position = self.state.position, "scroll physics enabled");
        }
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        if self.enabled {
            tracing::debug!(position = self.state.position, "scroll physics disabled");
        }
        self.enabled = false;
    }

    /// Largest magnitude a staged delta may have
    pub fn max_delta(&self) -> f32 {
        self.viewport_height * self.config.max_delta_ratio
    }

    /// Distance within which snap targets pull
    pub fn snap_proximity(&self) -> f32 {
        self.viewport_height * self.config.snap_proximity_ratio
    }

    /// Stage raw wheel input for the next tick. No-op while disabled.
    pub fn on_input(&mut self, raw_delta: f32) {
        if !self.enabled || !raw_delta.is_finite() {
            return;
        }
        let limit = self.max_delta();
        let delta = (raw_delta * self.config.speed).clamp(-limit, limit);
        self.state.pending_delta = delta;
        self.state.last_direction = sign(delta);
        self.seek_target = None;
    }

    /// Glide to `offset` using the snap pull, until new input arrives.
    ///
    /// Ignored while disabled.
    pub fn seek_to(&mut self, offset: f32) {
        if !self.enabled || !offset.is_finite() {
            return;
        }
        let offset = offset.max(0.0);
        self.seek_target = Some(offset);
        self.state.last_direction = sign(offset - self.state.position);
    }

    pub fn is_seeking(&self) -> bool {
        self.seek_target.is_some()
    }

    /// Integrate one frame. Returns whether the position changed.
    pub fn tick(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        if self.state.pending_delta.abs() < IDLE_INPUT {
            self.state.velocity = match self.seek_target {
                Some(target) => {
                    let d = target - self.state.position;
                    if d.abs() < SEEK_ARRIVAL {
                        self.seek_target = None;
                    }
                    d * self.config.snap_factor.max(f32::EPSILON)
                }
                None => self.snap_velocity(),
            };
        }

        let state = &mut self.state;
        state.velocity += state.pending_delta * self.config.wheel_damping;
        state.pending_delta *= 1.0 - self.config.wheel_damping;
        if state.pending_delta.abs() < REST_EPSILON {
            state.pending_delta = 0.0;
        }

        if state.velocity.abs() > REST_EPSILON {
            let before = state.position;
            state.position = (state.position + state.velocity * self.config.velocity_damping).max(0.0);
            state.velocity *= 1.0 - self.config.velocity_damping;
            state.position != before
        } else {
            state.velocity = 0.0;
            false
        }
    }

    /// Velocity produced by the snap rule at the current position
    fn snap_velocity(&self) -> f32 {
        let Some(nearest) = self.nearest_snap_target() else {
            return 0.0;
        };
        let position = self.state.position;
        let mut d = nearest - position;

        // Never pull against the last scroll direction; before any input the
        // direction is unknown and the pull is left as is.
        let direction = self.state.last_direction;
        if direction != 0 && sign(d) != direction {
            d = -d;
        }

        if d.abs() < self.snap_proximity() {
            d * self.config.snap_factor
        } else {
            d * self.config.idle_factor
        }
    }

    /// Snap target minimizing `|target - position|`, first one on ties
    pub fn nearest_snap_target(&self) -> Option<f32> {
        let position = self.state.position;
        self.snap_targets.iter().copied().reduce(|best, candidate| {
            if (candidate - position).abs() < (best - position).abs() {
                candidate
            } else {
                best
            }
        })
    }

    /// Place the scroll offset directly, dropping motion and staged input
    pub fn set_position(&mut self, position: f32) {
        if !position.is_finite() {
            return;
        }
        self.state = ScrollState {
            position: position.max(0.0),
            ..ScrollState::default()
        };
        self.seek_target = None;
    }

    /// Adopt a new viewport height, scaling offsets and snap targets with it
    pub fn resize(&mut self, viewport_height: f32) -> Result<(), ConfigurationError> {
        if !(viewport_height.is_finite() && viewport_height > 0.0) {
            return Err(ConfigurationError::InvalidViewport(viewport_height));
        }
        let scale = viewport_height / self.viewport_height;
        for target in &mut self.snap_targets {
            *target *= scale;
        }
        self.state.position *= scale;
        self.state.pending_delta = (self.state.pending_delta * scale)
            .clamp(-viewport_height * self.config.max_delta_ratio, viewport_height * self.config.max_delta_ratio);
        if let Some(seek) = &mut self.seek_target {
            *seek *= scale;
        }
        self.viewport_height = viewport_height;
        Ok(())
    }
}

#[inline]
fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(snaps: Vec<f32>) -> ScrollPhysicsEngine {
        let mut engine = ScrollPhysicsEngine::new(ScrollConfig::default(), 900.0, snaps).unwrap();
        engine.enable();
        engine
    }

    #[test]
    fn test_input_is_staged_not_applied() {
        let mut engine = engine(vec![0.0, 900.0, 1800.0]);
        engine.on_input(800.0);

        assert!((engine.state().pending_delta - 300.0).abs() < 1e-3);
        assert_eq!(engine.state().last_direction, 1);
        assert_eq!(engine.position(), 0.0);
    }

    #[test]
    fn test_pending_delta_decay_scenario() {
        let mut engine = engine(vec![0.0, 900.0, 1800.0]);
        engine.on_input(800.0);

        let mut expected = 300.0f32;
        for frame in 1..=36 {
            engine.tick();
            expected *= 0.75;
            let pending = engine.state().pending_delta;
            if frame < 36 {
                assert!((pending - expected).abs() < 1e-3, "frame {frame}: {pending}");
            }
            if frame == 19 {
                assert!(pending >= 1.0);
            }
            if frame == 20 {
                // Snapping engages on the next tick
                assert!(pending < 1.0);
            }
        }
        assert_eq!(engine.state().pending_delta, 0.0);
        assert!(engine.position() > 0.0);
    }

    #[test]
    fn test_negative_input_clamped() {
        let mut engine = engine(vec![0.0]);
        engine.on_input(-10_000.0);
        assert!((engine.state().pending_delta + 300.0).abs() < 1e-3);
        assert_eq!(engine.state().last_direction, -1);
    }

    #[test]
    fn test_position_never_negative() {
        let mut engine = engine(vec![0.0, 900.0]);
        for _ in 0..10 {
            engine.on_input(-500.0);
            for _ in 0..5 {
                engine.tick();
                assert!(engine.position() >= 0.0);
            }
        }
        assert_eq!(engine.position(), 0.0);
    }

    #[test]
    fn test_disabled_engine_is_inert() {
        let mut engine = engine(vec![0.0, 500.0, 1000.0]);
        engine.on_input(200.0);
        engine.tick();
        let before = *engine.state();

        engine.disable();
        engine.on_input(800.0);
        for _ in 0..100 {
            assert!(!engine.tick());
        }
        assert_eq!(*engine.state(), before);
    }

    #[test]
    fn test_converges_to_snap_target() {
        let mut engine = engine(vec![0.0, 500.0, 1000.0]);
        engine.set_position(450.0);

        let mut frames = 0;
        while (engine.position() - 500.0).abs() >= 1.0 {
            engine.tick();
            frames += 1;
            assert!(frames < 400, "did not converge: {}", engine.position());
        }
    }

    #[test]
    fn test_converges_after_downward_nudge() {
        let mut engine = engine(vec![0.0, 500.0, 1000.0]);
        engine.set_position(450.0);
        // A nudge too small to count as fresh input still sets the direction
        engine.on_input(0.5);
        assert_eq!(engine.state().last_direction, 1);
        for _ in 0..600 {
            engine.tick();
        }
        assert!((engine.position() - 500.0).abs() < 1.0);
    }

    #[test]
    fn test_snap_pull_never_opposes_last_direction() {
        let mut engine = engine(vec![0.0, 500.0, 1000.0]);
        engine.set_position(520.0);
        // Scrolling down past a section: the pull back up is reversed
        engine.state.last_direction = 1;
        engine.tick();
        assert!(engine.position() > 520.0);
    }

    #[test]
    fn test_no_pull_far_from_sections() {
        let mut engine = engine(vec![0.0, 900.0]);
        engine.set_position(450.0);
        for _ in 0..50 {
            assert!(!engine.tick());
        }
        assert_eq!(engine.position(), 450.0);
    }

    #[test]
    fn test_seek_reaches_target() {
        let mut engine = engine(vec![0.0, 900.0, 1800.0]);
        engine.seek_to(900.0);
        for _ in 0..600 {
            engine.tick();
        }
        assert!((engine.position() - 900.0).abs() < 1.0);
        assert!(!engine.is_seeking());
    }

    #[test]
    fn test_input_cancels_seek() {
        let mut engine = engine(vec![0.0, 900.0, 1800.0]);
        engine.seek_to(1800.0);
        engine.tick();
        engine.on_input(-50.0);
        assert!(!engine.is_seeking());
    }

    #[test]
    fn test_empty_snap_targets_rejected() {
        let err = ScrollPhysicsEngine::new(ScrollConfig::default(), 900.0, Vec::new()).unwrap_err();
        assert_eq!(err, ConfigurationError::EmptySnapTargets);

        assert!(ScrollPhysicsEngine::new(ScrollConfig::no_snap(), 900.0, Vec::new()).is_ok());
    }

    #[test]
    fn test_invalid_constants_rejected() {
        let config = ScrollConfig {
            wheel_damping: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            ScrollPhysicsEngine::new(config, 900.0, vec![0.0]),
            Err(ConfigurationError::OutOfRange { name: "wheel_damping", .. })
        ));
        assert!(matches!(
            ScrollPhysicsEngine::new(ScrollConfig::default(), 0.0, vec![0.0]),
            Err(ConfigurationError::InvalidViewport(_))
        ));
    }

    #[test]
    fn test_resize_scales_targets() {
        let mut engine = engine(vec![0.0, 900.0, 1800.0]);
        engine.set_position(900.0);
        engine.resize(450.0).unwrap();
        assert_eq!(engine.snap_targets(), &[0.0, 450.0, 900.0]);
        assert_eq!(engine.position(), 450.0);
        assert!((engine.max_delta() - 150.0).abs() < 1e-3);
    }
}
