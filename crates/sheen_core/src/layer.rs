//! Content overlay identifiers

use serde::{Deserialize, Serialize};

/// Page content layered over the 3D canvas whose opacity the timeline drives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentLayer {
    /// Site header
    Header,
    /// "Scroll down" hint in the hero section
    HeroScroller,
    /// Hero copy
    HeroContent,
    /// Large faded text behind the second section
    ForeverBackdrop,
    /// Copy of the second section
    ForeverContent,
    /// Large faded text behind the third section
    EmotionsBackdrop,
    /// Copy of the third section
    EmotionsContent,
}

impl ContentLayer {
    pub const ALL: [ContentLayer; 7] = [
        ContentLayer::Header,
        ContentLayer::HeroScroller,
        ContentLayer::HeroContent,
        ContentLayer::ForeverBackdrop,
        ContentLayer::ForeverContent,
        ContentLayer::EmotionsBackdrop,
        ContentLayer::EmotionsContent,
    ];

    /// Layers that belong to the scrolling page rather than the chrome
    pub fn is_scroll_content(&self) -> bool {
        !matches!(self, ContentLayer::Header)
    }
}
