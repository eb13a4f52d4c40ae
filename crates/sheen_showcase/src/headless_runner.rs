//! Scenario runner that plays headless showcase scenarios.
//!
//! Runs the real [`ModeController`] against a [`MemoryScene`] and a
//! [`RecordingPresentation`], one fixed-size frame at a time.

use anyhow::{Context, Result};
use sheen_core::{ActionOutcome, CameraPose};

use crate::config::ShowcaseConfig;
use crate::headless_report::{ActionRecord, HeadlessReport};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};
use crate::memory::{MemoryScene, RecordingPresentation};
use crate::mode::ModeController;
use crate::showcase::INTRO_START;

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Scene whose objects are exactly the ones `config` names
pub fn scene_for(config: &ShowcaseConfig) -> MemoryScene {
    let names = config.scene_names();
    let objects = std::iter::once(names.ring.as_str())
        .chain(names.groups.iter().flatten().map(String::as_str));
    MemoryScene::new()
        .with_camera(INTRO_START)
        .with_objects(objects)
}

/// Execute scenario JSON against the given configuration.
pub fn run_scenario(input: &str, config: &ShowcaseConfig) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(&scenario, config)
}

/// Execute a pre-loaded scenario.
pub fn run_loaded_scenario(scenario: &HeadlessScenario, config: &ShowcaseConfig) -> Result<RunOutcome> {
    let mut scene = scene_for(config);
    let mut ui = RecordingPresentation::new();
    let controller =
        ModeController::load(config, &mut scene, &mut ui).context("Failed to load showcase")?;

    let mut run = Run {
        controller,
        scene,
        ui,
        tick_ms: scenario.tick_ms.max(1),
        elapsed_frames: 0,
        elapsed_ms: 0,
        actions: Vec::new(),
    };

    for (step_index, step) in scenario.steps.iter().enumerate() {
        if let Err((assertion, message)) = run.step(step_index, step) {
            let report = HeadlessReport::failed(
                assertion,
                step_index,
                message,
                run.elapsed_frames,
                run.elapsed_ms,
            );
            return Ok(RunOutcome::Failed {
                report: run.finish(report),
            });
        }
    }

    let report = HeadlessReport::passed(run.elapsed_frames, run.elapsed_ms);
    Ok(RunOutcome::Passed {
        report: run.finish(report),
    })
}

struct Run {
    controller: ModeController,
    scene: MemoryScene,
    ui: RecordingPresentation,
    tick_ms: u64,
    elapsed_frames: u64,
    elapsed_ms: u64,
    actions: Vec<ActionRecord>,
}

type StepFailure = (&'static str, String);

impl Run {
    fn step(&mut self, step_index: usize, step: &ScenarioStep) -> Result<(), StepFailure> {
        match step {
            ScenarioStep::Wheel { delta } => {
                let outcome = self.controller.on_wheel(*delta);
                self.record(step_index, "wheel", outcome);
            }
            ScenarioStep::Tick { frames } => self.frames(*frames, self.tick_ms),
            ScenarioStep::Wait { ms } => {
                let mut remaining = *ms;
                while remaining > 0 {
                    let step_ms = remaining.min(self.tick_ms);
                    remaining -= step_ms;
                    self.frames(1, step_ms);
                }
            }
            ScenarioStep::NativeScroll { offset } => {
                let outcome = self.controller.on_native_scroll(*offset);
                self.record(step_index, "native_scroll", outcome);
            }
            ScenarioStep::Explore => {
                let outcome = self.controller.request_explore(&mut self.ui);
                self.record(step_index, "explore", outcome);
            }
            ScenarioStep::Exit => {
                let outcome = self.controller.request_exit(&mut self.scene, &mut self.ui);
                self.record(step_index, "exit", outcome);
            }
            ScenarioStep::Jump { section } => {
                let outcome = self.controller.jump_to_section(*section, &mut self.ui);
                self.record(step_index, "jump", outcome);
            }
            ScenarioStep::ToggleBackground => {
                let outcome = self.controller.toggle_background(&mut self.scene);
                self.record(step_index, "toggle_background", outcome);
            }
            ScenarioStep::Orbit { position, target } => {
                self.scene.orbit_to(CameraPose::new(*position, *target));
            }
            ScenarioStep::AssertMode { mode } => {
                let actual = self.controller.mode().name();
                if actual != mode {
                    return Err(("assert_mode", format!("expected mode '{mode}', got '{actual}'")));
                }
            }
            ScenarioStep::AssertScroll { min, max } => {
                let position = self.controller.position();
                if !(position >= *min && position <= *max) {
                    return Err((
                        "assert_scroll",
                        format!("scroll offset {position} outside {min}..={max}"),
                    ));
                }
            }
            ScenarioStep::AssertCamera {
                position,
                target,
                tolerance,
            } => {
                let Some(camera) = self.scene.camera() else {
                    return Err(("assert_camera", "scene has no camera".to_string()));
                };
                let diff = camera.position.max_abs_diff(*position);
                if diff > *tolerance {
                    return Err((
                        "assert_camera",
                        format!("camera at {:?}, expected {:?} (off by {diff})", camera.position, position),
                    ));
                }
                if let Some(target) = target {
                    let diff = camera.target.max_abs_diff(*target);
                    if diff > *tolerance {
                        return Err((
                            "assert_camera",
                            format!("camera looks at {:?}, expected {:?} (off by {diff})", camera.target, target),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn frames(&mut self, count: u32, ms: u64) {
        let dt = ms as f32 / 1000.0;
        for _ in 0..count {
            let report = self.controller.frame(dt, &mut self.scene, &mut self.ui);
            self.elapsed_frames = self.elapsed_frames.saturating_add(1);
            self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
            if let Some(mode) = report.mode_changed {
                tracing::debug!(frame = self.elapsed_frames, mode = mode.name(), "mode changed");
            }
        }
    }

    fn record(&mut self, step_index: usize, action: &str, outcome: ActionOutcome) {
        self.actions.push(ActionRecord {
            step_index,
            action: action.to_string(),
            outcome: format!("{outcome:?}"),
        });
    }

    fn finish(self, mut report: HeadlessReport) -> HeadlessReport {
        report.final_mode = self.controller.mode().name().to_string();
        report.final_position = self.controller.position();
        report.transitions = self
            .controller
            .history()
            .iter()
            .map(|(from, _, to)| format!("{} -> {}", from.name(), to.name()))
            .collect();
        report.actions = self.actions;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intro_then_scroll() {
        let outcome = run_scenario(
            r#"{"steps": [
                {"type": "assert_mode", "mode": "intro"},
                {"type": "wait", "ms": 6000},
                {"type": "assert_mode", "mode": "scroll_driven"},
                {"type": "assert_camera", "position": {"x": 1.28, "y": -1.7, "z": 5.86}},
                {"type": "wheel", "delta": 600},
                {"type": "tick", "frames": 120},
                {"type": "assert_scroll", "min": 100, "max": 2000}
            ]}"#,
            &ShowcaseConfig::new(),
        )
        .unwrap();
        assert!(!outcome.is_failed(), "{:?}", outcome.report());
        assert_eq!(outcome.report().transitions, vec!["intro -> scroll_driven"]);
    }

    #[test]
    fn test_failed_assertion_reports_step() {
        let outcome = run_scenario(
            r#"{"steps": [
                {"type": "tick", "frames": 2},
                {"type": "assert_mode", "mode": "free_explore"}
            ]}"#,
            &ShowcaseConfig::new(),
        )
        .unwrap();
        assert!(outcome.is_failed());
        let report = outcome.report();
        assert_eq!(report.failed_step_index, Some(1));
        assert_eq!(report.assertion.as_deref(), Some("assert_mode"));
        assert_eq!(report.elapsed_frames, 2);
    }

    #[test]
    fn test_camera_target_is_checked() {
        let passing = run_scenario(
            r#"{"steps": [
                {"type": "wait", "ms": 6000},
                {"type": "assert_camera",
                 "position": {"x": 1.28, "y": -1.7, "z": 5.86},
                 "target": {"x": 0.91, "y": 0.03, "z": -0.25}}
            ]}"#,
            &ShowcaseConfig::new(),
        )
        .unwrap();
        assert!(!passing.is_failed(), "{:?}", passing.report());

        let failing = run_scenario(
            r#"{"steps": [
                {"type": "wait", "ms": 6000},
                {"type": "assert_camera",
                 "position": {"x": 1.28, "y": -1.7, "z": 5.86},
                 "target": {"x": 0.0, "y": 0.0, "z": 0.0}}
            ]}"#,
            &ShowcaseConfig::new(),
        )
        .unwrap();
        assert!(failing.is_failed());
        assert_eq!(failing.report().assertion.as_deref(), Some("assert_camera"));
        assert!(failing.report().message.as_deref().unwrap().contains("looks at"));
    }

    #[test]
    fn test_rejected_actions_are_recorded() {
        let outcome = run_scenario(
            r#"{"steps": [{"type": "explore"}, {"type": "wheel", "delta": 10}]}"#,
            &ShowcaseConfig::new(),
        )
        .unwrap();
        let actions = &outcome.report().actions;
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].outcome, "Ignored(WrongMode)");
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(run_scenario("{\"steps\": [{\"type\": \"fly\"}]}", &ShowcaseConfig::new()).is_err());
    }
}
