//! Showcase configuration file handling (sheen.toml)
//!
//! Every section is optional; a missing section or field takes the value the
//! ring showcase ships with.

use serde::{Deserialize, Serialize};
use sheen_animation::ScrollConfig;
use sheen_core::{ConfigurationError, Vec3};
use sheen_paint::{Color, GroupPalette};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::scene::SceneNames;

/// Top-level showcase configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ShowcaseConfig {
    #[serde(default)]
    pub scroll: ScrollSection,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default = "default_palettes")]
    pub palette: Vec<PaletteConfig>,
    #[serde(default)]
    pub background: BackgroundConfig,
    #[serde(default)]
    pub explore: ExploreConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Scroll integrator constants
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrollSection {
    pub speed: f32,
    pub wheel_damping: f32,
    pub velocity_damping: f32,
    pub snap_factor: f32,
    pub idle_factor: f32,
    /// Snap reach as a fraction of the viewport height
    pub snap_proximity_ratio: f32,
    /// Largest per-event delta as a fraction of the viewport height
    pub max_delta_ratio: f32,
}

impl Default for ScrollSection {
    fn default() -> Self {
        let defaults = ScrollConfig::default();
        Self {
            speed: defaults.speed,
            wheel_damping: defaults.wheel_damping,
            velocity_damping: defaults.velocity_damping,
            snap_factor: defaults.snap_factor,
            idle_factor: defaults.idle_factor,
            snap_proximity_ratio: defaults.snap_proximity_ratio,
            max_delta_ratio: defaults.max_delta_ratio,
        }
    }
}

impl From<ScrollSection> for ScrollConfig {
    fn from(section: ScrollSection) -> Self {
        Self {
            speed: section.speed,
            wheel_damping: section.wheel_damping,
            velocity_damping: section.velocity_damping,
            snap_factor: section.snap_factor,
            idle_factor: section.idle_factor,
            snap_proximity_ratio: section.snap_proximity_ratio,
            max_delta_ratio: section.max_delta_ratio,
        }
    }
}

/// Page geometry: full-viewport sections stacked from offset 0
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_viewport_height")]
    pub height: f32,
    #[serde(default = "default_sections")]
    pub sections: usize,
}

fn default_viewport_height() -> f32 {
    900.0
}

fn default_sections() -> usize {
    3
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            height: default_viewport_height(),
            sections: default_sections(),
        }
    }
}

impl ViewportConfig {
    /// Top offset of every section, used as snap targets
    pub fn section_tops(&self) -> Vec<f32> {
        (0..self.sections).map(|i| i as f32 * self.height).collect()
    }
}

/// Input class of the device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Wheel input through the scroll physics engine
    #[default]
    Pointer,
    /// Native scrolling with CSS scroll-snap
    Touch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceConfig {
    #[serde(default)]
    pub class: DeviceClass,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SceneConfig {
    /// Object whose rotation the timeline drives
    #[serde(default = "default_ring")]
    pub ring: String,
}

fn default_ring() -> String {
    "Scene_1_1".to_string()
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self { ring: default_ring() }
    }
}

/// One material group and its display-space color stops
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaletteConfig {
    pub name: String,
    pub objects: Vec<String>,
    /// `#rrggbb` stops, one more than the number of color stages
    pub stops: Vec<String>,
}

fn palette(name: &str, objects: &[&str], stops: &[&str]) -> PaletteConfig {
    PaletteConfig {
        name: name.to_string(),
        objects: objects.iter().map(|s| s.to_string()).collect(),
        stops: stops.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_palettes() -> Vec<PaletteConfig> {
    vec![
        palette("silver", &["silver"], &["#fefefe", "#d28b8b", "#f7c478"]),
        palette("gold", &["gold"], &["#e2bf7f", "#d28b8b", "#f7c478"]),
        palette(
            "diamonds",
            &[
                "diamonds003",
                "diamonds002",
                "diamonds001",
                "diamonds005002",
                "diamonds005",
                "diamonds005001",
            ],
            &["#e7e7e7", "#39cffe", "#f70db1"],
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BackgroundConfig {
    #[serde(default = "default_day")]
    pub day: String,
    #[serde(default = "default_night")]
    pub night: String,
}

fn default_day() -> String {
    "#ffffff".to_string()
}

fn default_night() -> String {
    "#22052f".to_string()
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            day: default_day(),
            night: default_night(),
        }
    }
}

/// Camera pose reached when entering free explore
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ExploreConfig {
    #[serde(default = "default_explore_position")]
    pub position: Vec3,
    #[serde(default = "default_explore_target")]
    pub target: Vec3,
    /// Seconds
    #[serde(default = "default_explore_duration")]
    pub duration: f32,
}

fn default_explore_position() -> Vec3 {
    Vec3::new(-0.17, -0.25, 8.5)
}

fn default_explore_target() -> Vec3 {
    Vec3::new(0.05, -0.07, 0.07)
}

fn default_explore_duration() -> f32 {
    2.5
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            position: default_explore_position(),
            target: default_explore_target(),
            duration: default_explore_duration(),
        }
    }
}

/// Which optional page controls exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub explore_button: bool,
    #[serde(default = "default_true")]
    pub exit_button: bool,
    #[serde(default = "default_true")]
    pub section_links: bool,
    #[serde(default = "default_true")]
    pub background_toggle: bool,
}

fn default_true() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            explore_button: true,
            exit_button: true,
            section_links: true,
            background_toggle: true,
        }
    }
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            scroll: ScrollSection::default(),
            viewport: ViewportConfig::default(),
            device: DeviceConfig::default(),
            scene: SceneConfig::default(),
            palette: default_palettes(),
            background: BackgroundConfig::default(),
            explore: ExploreConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl ShowcaseConfig {
    /// The ring showcase as shipped
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a file, or from `sheen.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join("sheen.toml")
        } else {
            path.to_path_buf()
        };
        let content = fs::read_to_string(&config_path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn scroll_config(&self) -> ScrollConfig {
        self.scroll.into()
    }

    /// Display-space palettes in group order
    pub fn palettes(&self) -> std::result::Result<Vec<GroupPalette>, ConfigurationError> {
        self.palette
            .iter()
            .map(|group| {
                let stops = group
                    .stops
                    .iter()
                    .map(|stop| parse_hex(stop))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(GroupPalette::new(group.name.clone(), stops))
            })
            .collect()
    }

    pub fn scene_names(&self) -> SceneNames {
        SceneNames {
            ring: self.scene.ring.clone(),
            groups: self.palette.iter().map(|p| p.objects.clone()).collect(),
        }
    }

    /// Day and night background colors, display space
    pub fn backgrounds(&self) -> std::result::Result<(Color, Color), ConfigurationError> {
        Ok((parse_hex(&self.background.day)?, parse_hex(&self.background.night)?))
    }

    /// Check everything that can be checked without a scene
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        if !(self.viewport.height.is_finite() && self.viewport.height > 0.0) {
            return Err(ConfigurationError::InvalidViewport(self.viewport.height));
        }
        if self.viewport.sections < 3 {
            return Err(ConfigurationError::OutOfRange {
                name: "viewport.sections",
                value: self.viewport.sections as f32,
                min: 3.0,
                max: f32::MAX,
            });
        }
        if !(self.explore.duration.is_finite() && self.explore.duration > 0.0) {
            return Err(ConfigurationError::InvalidDuration(self.explore.duration));
        }
        self.palettes()?;
        self.backgrounds()?;
        Ok(())
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into a display-space color
pub fn parse_hex(value: &str) -> std::result::Result<Color, ConfigurationError> {
    let digits = value.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return Err(ConfigurationError::Palette(format!("invalid color '{value}'")));
    }
    u32::from_str_radix(digits, 16)
        .map(Color::from_hex)
        .map_err(|_| ConfigurationError::Palette(format!("invalid color '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default_showcase() {
        let config = ShowcaseConfig::from_toml_str("").unwrap();
        assert_eq!(config, ShowcaseConfig::new());
        assert_eq!(config.palette.len(), 3);
        assert_eq!(config.viewport.section_tops(), vec![0.0, 900.0, 1800.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let config = ShowcaseConfig::from_toml_str(
            r#"
            [scroll]
            speed = 2.0

            [device]
            class = "touch"
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.speed, 2.0);
        assert_eq!(config.scroll.wheel_damping, 0.25);
        assert_eq!(config.device.class, DeviceClass::Touch);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#22052f").unwrap(), Color::from_hex(0x22052f));
        assert_eq!(parse_hex("fefefe").unwrap(), Color::from_hex(0xfefefe));
        assert!(parse_hex("#fff").is_err());
        assert!(parse_hex("#gggggg").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_palette() {
        let mut config = ShowcaseConfig::new();
        config.palette[0].stops[1] = "nope".to_string();
        assert!(matches!(config.validate(), Err(ConfigurationError::Palette(_))));
    }

    #[test]
    fn test_scene_names_follow_palettes() {
        let names = ShowcaseConfig::new().scene_names();
        assert_eq!(names.ring, "Scene_1_1");
        assert_eq!(names.groups[2].len(), 6);
    }
}
