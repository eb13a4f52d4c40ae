//! The ring showcase: entrance, scroll sections, and explore choreography
//!
//! Sections are full-viewport blocks stacked from offset 0. Section 2's top
//! sits at one viewport height, section 3's at two; every scrubbed range is
//! derived from those anchors and the viewport height.

use std::f32::consts::{PI, TAU};

use sheen_animation::{
    Easing, Property, Scrub, Segment, Sequence, Track, Tween, Value, ViewportAnchor, ViewportEdge,
};
use sheen_core::{nearest_equivalent_angle, CameraPose, ConfigurationError, ContentLayer, Vec3};

use crate::config::ExploreConfig;

/// Camera pose before the entrance plays
pub const INTRO_START: CameraPose = CameraPose {
    position: Vec3 { x: 3.0, y: -0.8, z: 1.2 },
    target: Vec3 { x: 2.5, y: -0.07, z: -0.1 },
};

/// Camera pose once the entrance completes
pub const INTRO_END: CameraPose = CameraPose {
    position: Vec3 { x: 1.28, y: -1.7, z: 5.86 },
    target: Vec3 { x: 0.91, y: 0.03, z: -0.25 },
};

const SECTION_2: CameraPose = CameraPose {
    position: Vec3 { x: -1.83, y: -0.14, z: 6.15 },
    target: Vec3 { x: -0.78, y: -0.03, z: -0.12 },
};

const SECTION_3: CameraPose = CameraPose {
    position: Vec3 { x: -0.06, y: -1.15, z: 4.42 },
    target: Vec3 { x: -0.01, y: 0.9, z: 0.07 },
};

/// Loader slide-out: one second of delay plus its own 0.8s
const LOADER_OUT: f32 = 1.8;
const CAMERA_FLIGHT: f32 = 4.0;
const CONTENT_FADE: f32 = 1.5;
const EXIT_FLIGHT: f32 = 1.2;
/// Duration of tweens that do not name one
const SHORT: f32 = 0.5;
/// `scrub: 1` on the content overlays
const OVERLAY_SCRUB: Scrub = Scrub::Smoothed(1.0);

fn opacity(layer: ContentLayer) -> Property {
    Property::Opacity(layer)
}

/// Entrance: camera flight from [`INTRO_START`] to [`INTRO_END`], then the
/// header and hero overlays fade in.
pub fn intro_sequence() -> Result<Sequence, ConfigurationError> {
    let camera = |property, from: Vec3, to: Vec3| {
        Tween::new(Track::from_to(property, from, to), CAMERA_FLIGHT)
    };
    Sequence::builder("intro")
        .gap(LOADER_OUT)
        .overlap(
            0.8,
            camera(Property::CameraPosition, INTRO_START.position, INTRO_END.position),
        )
        .overlap(
            CAMERA_FLIGHT,
            camera(Property::CameraTarget, INTRO_START.target, INTRO_END.target),
        )
        .overlap(
            1.0,
            Tween::new(Track::from_to(opacity(ContentLayer::Header), 0.0, 1.0), 0.8)
                .with_easing(Easing::EaseInOutQuad),
        )
        .overlap(
            1.0,
            Tween::new(Track::from_to(opacity(ContentLayer::HeroScroller), 0.0, 1.0), 1.0)
                .with_easing(Easing::EaseInOutQuint),
        )
        .overlap(
            1.0,
            Tween::new(Track::from_to(opacity(ContentLayer::HeroContent), 0.0, 1.0), 1.8)
                .with_easing(Easing::EaseInOutQuint),
        )
        .build()
}

/// Scrubbed segments for sections 2 and 3, in registration order
pub fn scroll_segments(viewport_height: f32) -> Result<Vec<Segment>, ConfigurationError> {
    let vh = viewport_height;
    let section_2 = ViewportAnchor::new(vh);
    let section_3 = ViewportAnchor::new(2.0 * vh);
    let enter_2 = section_2.range(ViewportEdge::Bottom, ViewportEdge::Top, vh)?;
    let enter_3 = section_3.range(ViewportEdge::Bottom, ViewportEdge::Top, vh)?;

    let camera = |range, pose: CameraPose, rotation: Vec3, stage: usize| {
        Segment::new(
            range,
            [
                Track::to(Property::CameraPosition, pose.position),
                Track::to(Property::CameraTarget, pose.target),
                Track::to(Property::Rotation, rotation),
                Track::from_to(Property::ColorStage(stage), 0.0, 1.0),
            ],
        )
        .map(|segment| segment.with_easing(Easing::EaseOutQuad))
    };
    let overlay = |range, track: Track, easing| {
        Segment::new(range, [track]).map(|segment| {
            segment.with_scrub(OVERLAY_SCRUB).with_easing(easing)
        })
    };

    Ok(vec![
        camera(enter_2, SECTION_2, Vec3::new(0.0, 0.0, -0.9), 0)?,
        overlay(
            section_2.range(ViewportEdge::Bottom, ViewportEdge::Center, vh)?,
            Track::to(opacity(ContentLayer::HeroScroller), 0.0),
            Easing::EaseOutQuad,
        )?,
        overlay(
            enter_2,
            Track::to(opacity(ContentLayer::HeroContent), 0.0),
            Easing::EaseOutQuint,
        )?,
        overlay(
            enter_2,
            Track::to(opacity(ContentLayer::ForeverBackdrop), 0.1),
            Easing::EaseInOutQuint,
        )?,
        overlay(
            enter_2,
            Track::from_to(opacity(ContentLayer::ForeverContent), 0.0, 1.0),
            Easing::EaseInOutQuint,
        )?,
        camera(enter_3, SECTION_3, Vec3::new(TAU, 0.0, 0.0), 1)?,
        overlay(
            enter_3,
            Track::to(opacity(ContentLayer::EmotionsBackdrop), 0.1),
            Easing::EaseInOutQuint,
        )?,
        overlay(
            section_3.range(ViewportEdge::Fraction(0.2), ViewportEdge::Top, vh)?,
            Track::from_to(opacity(ContentLayer::EmotionsContent), 0.0, 1.0),
            Easing::EaseOutQuint,
        )?,
    ])
}

/// Flight to the explore pose with the ring laid flat; scroll overlays fade
/// out and the header fades in.
pub fn explore_sequence(explore: &ExploreConfig) -> Result<Sequence, ConfigurationError> {
    let fade = CONTENT_FADE.min(explore.duration);
    let mut builder = Sequence::builder("explore")
        .at(0.0, Tween::new(Track::to(Property::CameraPosition, explore.position), explore.duration))
        .at(0.0, Tween::new(Track::to(Property::CameraTarget, explore.target), explore.duration))
        .at(
            0.0,
            Tween::new(Track::to(Property::Rotation, Vec3::new(-PI / 2.0, 0.0, 0.0)), explore.duration),
        )
        .at(
            0.0,
            Tween::new(Track::from_to(opacity(ContentLayer::Header), 0.0, 1.0), fade)
                .with_easing(Easing::EaseOutQuint),
        );
    for layer in ContentLayer::ALL.into_iter().filter(ContentLayer::is_scroll_content) {
        builder = builder.at(
            0.0,
            Tween::new(Track::to(opacity(layer), 0.0), fade).with_easing(Easing::EaseOutQuint),
        );
    }
    builder.build()
}

/// Return flight to a sampled scroll state.
///
/// Rotation targets are replaced by their equivalent angle nearest to
/// `rotation`, so the ring never spins a full turn on the way back.
pub fn exit_sequence(
    sample: &[(Property, Value)],
    rotation: Vec3,
) -> Result<Sequence, ConfigurationError> {
    let mut builder = Sequence::builder("exit");
    for &(property, value) in sample {
        let tween = match (property, value) {
            (Property::CameraPosition | Property::CameraTarget, _) => {
                Tween::new(Track::to(property, value), EXIT_FLIGHT).with_easing(Easing::EaseOutQuint)
            }
            (Property::Rotation, Value::Vec3(target)) => {
                let wrapped = Vec3::new(
                    nearest_equivalent_angle(target.x, rotation.x),
                    nearest_equivalent_angle(target.y, rotation.y),
                    nearest_equivalent_angle(target.z, rotation.z),
                );
                Tween::new(Track::to(property, wrapped), SHORT)
            }
            (Property::Opacity(_), _) => {
                Tween::new(Track::to(property, value), SHORT).with_easing(Easing::EaseOutQuint)
            }
            _ => Tween::new(Track::to(property, value), SHORT),
        };
        builder = builder.at(0.0, tween);
    }
    builder.build()
}
