//! Sheen Core Runtime
//!
//! Foundational primitives shared by the Sheen showcase crates:
//!
//! - **Math**: `Vec3` and the `CameraPose` the animation core mutates
//! - **Dirty tracking**: a per-frame flag that coalesces state writes
//! - **State Machines**: flat transition tables for interaction modes
//! - **Errors**: configuration/load errors and non-fatal action outcomes
//!
//! # Example
//!
//! ```rust
//! use sheen_core::{CameraPose, DirtyFlag, Vec3};
//!
//! let mut pose = CameraPose::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
//! let mut dirty = DirtyFlag::default();
//!
//! pose.position.z = 4.0;
//! dirty.mark();
//!
//! assert!(dirty.take());
//! assert!(!dirty.take());
//! ```

pub mod dirty;
pub mod error;
pub mod fsm;
pub mod layer;
pub mod math;

pub use dirty::DirtyFlag;
pub use error::{ActionOutcome, ConfigurationError, IgnoredRequest, LoadError, OperationSkipped};
pub use fsm::{StateMachine, Transition};
pub use layer::ContentLayer;
pub use math::{nearest_equivalent_angle, CameraPose, Vec3};
