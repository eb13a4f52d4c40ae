//! Scenario definition for headless showcase runs.

use anyhow::{Context, Result};
use serde::Deserialize;
use sheen_core::Vec3;
use std::path::Path;

/// Sequence of input and assertion steps played against an in-memory scene.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    /// Logical milliseconds between frames.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    pub steps: Vec<ScenarioStep>,
}

fn default_tick_ms() -> u64 {
    16
}

fn default_tolerance() -> f32 {
    1e-3
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Failed to parse scenario JSON")
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// One wheel event
    Wheel { delta: f32 },
    Tick { frames: u32 },
    Wait { ms: u64 },
    /// Native document scroll (touch devices)
    NativeScroll { offset: f32 },
    Explore,
    Exit,
    Jump { section: usize },
    ToggleBackground,
    /// User drags the orbit controller to this pose
    Orbit { position: Vec3, target: Vec3 },
    AssertMode { mode: String },
    AssertScroll { min: f32, max: f32 },
    /// Camera position, and look-at target when given, within `tolerance`
    AssertCamera {
        position: Vec3,
        #[serde(default)]
        target: Option<Vec3>,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
}
