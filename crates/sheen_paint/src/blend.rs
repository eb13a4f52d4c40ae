//! Material color blending
//!
//! Each tracked material group carries a palette of display-space color
//! stops. Stage `k` blends stop `k` into stop `k + 1` as its progress goes
//! from 0 to 1. Stops are converted to linear light once, at construction;
//! interpolation never happens in display space.

use sheen_core::ConfigurationError;
use smallvec::SmallVec;

use crate::color::Color;

/// Index of a material group within a [`ColorBlendController`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(pub usize);

/// Display-space palette for one material group
#[derive(Clone, Debug)]
pub struct GroupPalette {
    pub name: String,
    pub stops: Vec<Color>,
}

impl GroupPalette {
    pub fn new(name: impl Into<String>, stops: Vec<Color>) -> Self {
        Self {
            name: name.into(),
            stops,
        }
    }

    /// Build from 0xRRGGBB hex stops
    pub fn from_hex(name: impl Into<String>, stops: &[u32]) -> Self {
        Self::new(name, stops.iter().map(|&hex| Color::from_hex(hex)).collect())
    }
}

/// One blend stage of one group, endpoints in linear space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStage {
    start: Color,
    end: Color,
    t: f32,
}

impl ColorStage {
    /// Build a stage from display-space endpoints
    pub fn new(start: Color, end: Color) -> Self {
        Self {
            start: start.to_linear(),
            end: end.to_linear(),
            t: 0.0,
        }
    }

    pub fn start(&self) -> Color {
        self.start
    }

    pub fn end(&self) -> Color {
        self.end
    }

    pub fn progress(&self) -> f32 {
        self.t
    }

    /// Set progress (clamped to `[0, 1]`) and return the blended color
    pub fn update(&mut self, t: f32) -> Color {
        self.t = clamp_progress(t);
        self.color()
    }

    pub fn color(&self) -> Color {
        self.start.lerp(self.end, self.t)
    }

    fn color_at(&self, t: f32) -> Color {
        self.start.lerp(self.end, clamp_progress(t))
    }
}

struct Group {
    name: String,
    stages: SmallVec<[ColorStage; 2]>,
}

/// Drives material colors of several groups from stage progress values
pub struct ColorBlendController {
    groups: Vec<Group>,
    stage_count: usize,
}

impl ColorBlendController {
    /// Create a controller from display-space palettes.
    ///
    /// Every palette needs at least two stops, and all palettes must have the
    /// same number of stops so each stage spans every group.
    pub fn new(palettes: Vec<GroupPalette>) -> Result<Self, ConfigurationError> {
        let Some(first) = palettes.first() else {
            return Err(ConfigurationError::Palette(
                "at least one material group is required".to_string(),
            ));
        };
        let stop_count = first.stops.len();
        if stop_count < 2 {
            return Err(ConfigurationError::Palette(format!(
                "group '{}' needs at least two color stops",
                first.name
            )));
        }

        let mut groups = Vec::with_capacity(palettes.len());
        for palette in palettes {
            if palette.stops.len() != stop_count {
                return Err(ConfigurationError::Palette(format!(
                    "group '{}' has {} stops, expected {}",
                    palette.name,
                    palette.stops.len(),
                    stop_count
                )));
            }
            let stages = palette
                .stops
                .windows(2)
                .map(|pair| ColorStage::new(pair[0], pair[1]))
                .collect();
            groups.push(Group {
                name: palette.name,
                stages,
            });
        }

        tracing::debug!(
            groups = groups.len(),
            stages = stop_count - 1,
            "color blend controller ready"
        );

        Ok(Self {
            groups,
            stage_count: stop_count - 1,
        })
    }

    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn group_name(&self, group: GroupId) -> Option<&str> {
        self.groups.get(group.0).map(|g| g.name.as_str())
    }

    pub fn stage(&self, group: GroupId, stage: usize) -> Option<&ColorStage> {
        self.groups.get(group.0)?.stages.get(stage)
    }

    /// Advance one stage for every group, returning the blended colors in
    /// group order. Unknown stages yield no colors.
    pub fn update(&mut self, stage: usize, t: f32) -> SmallVec<[Color; 4]> {
        self.groups
            .iter_mut()
            .filter_map(|group| group.stages.get_mut(stage).map(|s| s.update(t)))
            .collect()
    }

    /// Colors for a frame given the progress of every stage.
    ///
    /// The highest stage that has started (`t > 0`) decides the colors; with
    /// no stage started, stage 0 at its start color is used. Missing progress
    /// entries count as 0.
    pub fn resolve(&self, progress: &[f32]) -> SmallVec<[Color; 4]> {
        let active = (0..self.stage_count)
            .rev()
            .find(|&i| progress.get(i).copied().unwrap_or(0.0) > 0.0)
            .unwrap_or(0);
        let t = progress.get(active).copied().unwrap_or(0.0);

        self.groups
            .iter()
            .map(|group| group.stages[active].color_at(t))
            .collect()
    }
}

#[inline]
fn clamp_progress(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_palettes() -> Vec<GroupPalette> {
        vec![
            GroupPalette::from_hex("silver", &[0xfefefe, 0xd28b8b, 0xf7c478]),
            GroupPalette::from_hex("gold", &[0xe2bf7f, 0xd28b8b, 0xf7c478]),
            GroupPalette::from_hex("diamonds", &[0xe7e7e7, 0x39cffe, 0xf70db1]),
        ]
    }

    fn channel_distance(a: Color, b: Color) -> [f32; 3] {
        [(a.r - b.r).abs(), (a.g - b.g).abs(), (a.b - b.b).abs()]
    }

    #[test]
    fn test_update_endpoints_are_exact_linear_colors() {
        let mut blend = ColorBlendController::new(ring_palettes()).unwrap();
        assert_eq!(blend.stage_count(), 2);

        let start = blend.update(0, 0.0);
        assert_eq!(start[0], Color::from_hex(0xfefefe).to_linear());
        assert_eq!(start[2], Color::from_hex(0xe7e7e7).to_linear());

        let end = blend.update(0, 1.0);
        assert_eq!(end[0], Color::from_hex(0xd28b8b).to_linear());
        assert_eq!(end[2], Color::from_hex(0x39cffe).to_linear());
    }

    #[test]
    fn test_update_is_monotonic() {
        let mut blend = ColorBlendController::new(ring_palettes()).unwrap();
        let target = Color::from_hex(0x39cffe).to_linear();

        let mut previous = channel_distance(blend.update(0, 0.0)[2], target);
        for i in 1..=20 {
            let t = i as f32 / 20.0;
            let current = channel_distance(blend.update(0, t)[2], target);
            for channel in 0..3 {
                assert!(current[channel] <= previous[channel]);
            }
            previous = current;
        }
    }

    #[test]
    fn test_blend_happens_in_linear_space() {
        let mut blend = ColorBlendController::new(vec![GroupPalette::new(
            "bw",
            vec![Color::BLACK, Color::WHITE],
        )])
        .unwrap();

        // Linear midpoint of black and white is 0.5 linear, not 0.5 display
        let mid = blend.update(0, 0.5)[0];
        assert!((mid.r - 0.5).abs() < 1e-5);
        assert!((mid.to_srgb().r - 0.735).abs() < 1e-3);
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut blend = ColorBlendController::new(ring_palettes()).unwrap();
        blend.update(1, 4.0);
        assert_eq!(blend.stage(GroupId(0), 1).unwrap().progress(), 1.0);
        blend.update(1, -2.0);
        assert_eq!(blend.stage(GroupId(0), 1).unwrap().progress(), 0.0);
        blend.update(1, f32::NAN);
        assert_eq!(blend.stage(GroupId(0), 1).unwrap().progress(), 0.0);
    }

    #[test]
    fn test_resolve_picks_latest_started_stage() {
        let blend = ColorBlendController::new(ring_palettes()).unwrap();

        let none = blend.resolve(&[0.0, 0.0]);
        assert_eq!(none[1], Color::from_hex(0xe2bf7f).to_linear());

        let first_done = blend.resolve(&[1.0, 0.0]);
        assert_eq!(first_done[1], Color::from_hex(0xd28b8b).to_linear());

        let second_done = blend.resolve(&[1.0, 1.0]);
        assert_eq!(second_done[2], Color::from_hex(0xf70db1).to_linear());
    }

    #[test]
    fn test_mismatched_palettes_rejected() {
        let err = ColorBlendController::new(vec![
            GroupPalette::from_hex("a", &[0xffffff, 0x000000]),
            GroupPalette::from_hex("b", &[0xffffff]),
        ]);
        assert!(matches!(err, Err(ConfigurationError::Palette(_))));

        assert!(ColorBlendController::new(Vec::new()).is_err());
    }
}
