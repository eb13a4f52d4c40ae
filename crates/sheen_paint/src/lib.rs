//! Sheen Paint
//!
//! Color handling for material blends.
//!
//! # Features
//!
//! - Display (sRGB) and linear color conversion
//! - Stage-based material color blending performed in linear space

pub mod blend;
pub mod color;

pub use blend::{ColorBlendController, ColorStage, GroupId, GroupPalette};
pub use color::Color;
