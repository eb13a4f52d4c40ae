//! Sheen Showcase
//!
//! The scroll-synchronized ring showcase: interaction modes, the boundary to
//! the 3D viewer and the page, configuration, and headless scenario runs.
//!
//! # Example
//!
//! ```rust
//! use sheen_showcase::headless_runner::scene_for;
//! use sheen_showcase::{Mode, ModeController, RecordingPresentation, ShowcaseConfig};
//!
//! let config = ShowcaseConfig::new();
//! let mut scene = scene_for(&config);
//! let mut ui = RecordingPresentation::new();
//! let mut showcase = ModeController::load(&config, &mut scene, &mut ui).unwrap();
//!
//! for _ in 0..400 {
//!     showcase.frame(1.0 / 60.0, &mut scene, &mut ui);
//! }
//! assert_eq!(showcase.mode(), Mode::ScrollDriven);
//! ```

pub mod config;
pub mod error;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_scenario;
pub mod memory;
pub mod mode;
pub mod presentation;
pub mod scene;
pub mod showcase;

pub use config::{DeviceClass, ShowcaseConfig};
pub use error::{Result, ShowcaseError};
pub use headless_report::{HeadlessReport, ReportStatus};
pub use headless_runner::{run_loaded_scenario, run_scenario, RunOutcome};
pub use headless_scenario::{HeadlessScenario, ScenarioStep};
pub use memory::{MemoryScene, RecordingPresentation};
pub use mode::{FrameReport, Mode, ModeController, ModeEvent, TransitionDirection};
pub use presentation::{Cursor, Overflow, Presentation};
pub use scene::{ObjectHandle, SceneHandles, SceneHost, SceneNames};
