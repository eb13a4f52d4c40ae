//! Report output model for headless showcase runs.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};

/// Report status for a headless run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Outcome of one UI action step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub step_index: usize,
    pub action: String,
    pub outcome: String,
}

/// Machine-readable result of a headless run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub message: Option<String>,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    pub final_mode: String,
    pub final_position: f32,
    /// Mode transitions in order, as `from -> to`
    pub transitions: Vec<String>,
    pub actions: Vec<ActionRecord>,
}

impl HeadlessReport {
    pub fn passed(elapsed_frames: u64, elapsed_ms: u64) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            message: None,
            elapsed_frames,
            elapsed_ms,
            final_mode: String::new(),
            final_position: 0.0,
            transitions: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn failed(
        assertion: &str,
        failed_step_index: usize,
        message: String,
        elapsed_frames: u64,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(failed_step_index),
            assertion: Some(assertion.to_string()),
            message: Some(message),
            ..Self::passed(elapsed_frames, elapsed_ms)
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    /// Write pretty JSON to a relative path, creating parent directories.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        check_report_path(path)?;
        let payload = serde_json::to_string_pretty(self)?;
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)?,
            _ => {}
        }
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Reports stay under the working directory
fn check_report_path(path: &Path) -> Result<()> {
    if path.has_root() {
        bail!("report path '{}' must be relative", path.display());
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => bail!("report path '{}' must not leave the working directory", path.display()),
        }
    }
    Ok(())
}
