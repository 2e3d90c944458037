//! Sections of the product page
//!
//! Each function returns a `SectionSpec` ready to mount. Trigger ids are
//! chosen by the host, which maps them to document regions through its
//! `LayoutProvider`.

use std::f32::consts::TAU;

use vista_core::{Axis, Easing, MediaUri, Property, TargetId, TriggerId, VistaResult};
use vista_time::{Anchor, Scrub, ScrollBinding};
use vista_timeline::{
    Action, Offset, RevealPolicy, TimelineBuilder, TimelineSpec, Track, TrackTarget,
};
use vista_visual::RevealTarget;

use crate::SectionSpec;

/// Scene node the features section spins
pub const MODEL_NODE: &str = "macbook";

/// Screen videos of the features section, in scroll order
pub const FEATURE_VIDEOS: [&str; 5] = [
    "/videos/feature-1.mp4",
    "/videos/feature-2.mp4",
    "/videos/feature-3.mp4",
    "/videos/feature-4.mp4",
    "/videos/feature-5.mp4",
];

/// Feature text blocks, one per video
pub const FEATURE_BOXES: [&str; 5] = ["box1", "box2", "box3", "box4", "box5"];

/// Vertical offset hidden blocks rest at (CSS pixels)
pub const REVEAL_OFFSET_Y: f32 = 40.0;

/// Smoothing of the scrubbed features and performance timelines
const SCRUB_SECS: f64 = 1.0;

/// Final layout of one performance image, as `(property, from, to)` in percent
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImagePlacement {
    pub id: &'static str,
    pub moves: &'static [(Property, f32, f32)],
}

/// The performance image cluster; `p5` is the anchor image and stays put
pub const PERFORMANCE_IMAGES: [ImagePlacement; 7] = [
    ImagePlacement {
        id: "p1",
        moves: &[(Property::Left, 20.0, 5.0), (Property::Bottom, 45.0, 65.0)],
    },
    ImagePlacement {
        id: "p2",
        moves: &[(Property::Right, 25.0, 10.0), (Property::Bottom, 40.0, 60.0)],
    },
    ImagePlacement {
        id: "p3",
        moves: &[(Property::Right, 10.0, -5.0), (Property::Bottom, 35.0, 45.0)],
    },
    ImagePlacement {
        id: "p4",
        moves: &[(Property::Right, 5.0, -10.0), (Property::Bottom, 15.0, 0.0)],
    },
    ImagePlacement {
        id: "p5",
        moves: &[(Property::Left, 20.0, 20.0), (Property::Bottom, 50.0, 50.0)],
    },
    ImagePlacement {
        id: "p6",
        moves: &[(Property::Left, 15.0, 2.0), (Property::Bottom, 25.0, 30.0)],
    },
    ImagePlacement {
        id: "p7",
        moves: &[(Property::Left, 10.0, -5.0), (Property::Bottom, 10.0, 0.0)],
    },
];

const ANCHOR_IMAGE: &str = "p5";

/// One full turn of the model over the pinned canvas
pub fn model_rotation_timeline() -> VistaResult<TimelineSpec> {
    TimelineBuilder::new("features-rotation")
        .track(
            Track::new(
                TrackTarget::Node(TargetId::new(MODEL_NODE)),
                Property::Rotation(Axis::Y),
                0.0,
                TAU,
            )
            .eased(Easing::Power1InOut),
        )
        .build()
}

/// Steps of the features content timeline: the first block enters two
/// steps after the first video, then each video and block share a step
const CONTENT_STEPS: f64 = 7.0;

/// Steps the first block waits before entering
const FIRST_BLOCK_STEP: usize = 2;

/// Texture swaps interleaved with the feature block reveals
pub fn feature_content_timeline(policy: RevealPolicy) -> VistaResult<TimelineSpec> {
    let step = 1.0 / CONTENT_STEPS;
    let mut builder = TimelineBuilder::new("features-content")
        .reveal_policy(policy)
        .baseline(Action::texture(FEATURE_VIDEOS[0]));
    for (i, (video, block)) in FEATURE_VIDEOS.iter().zip(FEATURE_BOXES).enumerate() {
        let reveal_at = (i + FIRST_BLOCK_STEP) as f64 * step;
        let texture_at = if i == 0 { 0.0 } else { reveal_at };
        builder = builder
            .at(texture_at, Action::texture(video))
            .segment(Offset::At(reveal_at), step, Action::reveal(block));
    }
    builder.build()
}

/// Features section: pinned spinning model plus the content timeline
pub fn features_section(canvas: TriggerId, policy: RevealPolicy) -> VistaResult<SectionSpec> {
    let scrub = Scrub::from_secs_f64(SCRUB_SECS);
    let rotation = ScrollBinding::new(canvas, Anchor::TOP_TOP, Anchor::BOTTOM_TOP)
        .pinned()
        .with_scrub(scrub);
    let content = ScrollBinding::new(canvas, Anchor::TOP_CENTER, Anchor::BOTTOM_TOP).with_scrub(scrub);

    let mut section = SectionSpec::new("features")
        .scene(rotation, model_rotation_timeline()?)
        .scene(content, feature_content_timeline(policy)?);
    for block in FEATURE_BOXES {
        section = section.reveal_target(RevealTarget::new(block, REVEAL_OFFSET_Y));
    }
    for video in FEATURE_VIDEOS {
        section = section.prefetch(MediaUri::new(video));
    }
    Ok(section)
}

/// Mask zooms out, then the copy fades up
pub fn showcase_timeline() -> VistaResult<TimelineSpec> {
    let content = TrackTarget::Overlay(TargetId::new(".content"));
    TimelineBuilder::new("showcase")
        .track(
            Track::new(
                TrackTarget::Overlay(TargetId::new(".mask img")),
                Property::Scale,
                80.0,
                1.1,
            )
            .window(0.0, 0.5)
            .eased(Easing::Power1Out),
        )
        .track(
            Track::new(content.clone(), Property::Opacity, 0.0, 1.0)
                .window(0.5, 1.0)
                .eased(Easing::Power1In),
        )
        .track(
            Track::new(content, Property::OffsetY, REVEAL_OFFSET_Y, 0.0)
                .window(0.5, 1.0)
                .eased(Easing::Power1In),
        )
        .build()
}

/// Showcase section, desktop only and pinned
pub fn showcase_section(showcase: TriggerId) -> VistaResult<SectionSpec> {
    let binding = ScrollBinding::new(showcase, Anchor::TOP_TOP, Anchor::BOTTOM_TOP).pinned();
    Ok(SectionSpec::new("showcase").desktop_scene(binding, showcase_timeline()?))
}

/// Scrubbed fade-up of the performance paragraphs
pub fn performance_text_timeline() -> VistaResult<TimelineSpec> {
    let paragraphs = TrackTarget::Overlay(TargetId::new(".content p"));
    TimelineBuilder::new("performance-text")
        .track(Track::new(paragraphs.clone(), Property::Opacity, 0.0, 1.0).eased(Easing::Power1Out))
        .track(Track::new(paragraphs, Property::OffsetY, 10.0, 0.0).eased(Easing::Power1Out))
        .build()
}

/// Performance images spreading out to their final layout
pub fn performance_layout_timeline() -> VistaResult<TimelineSpec> {
    let mut builder = TimelineBuilder::new("performance-layout");
    for image in PERFORMANCE_IMAGES.iter().filter(|i| i.id != ANCHOR_IMAGE) {
        let target = TrackTarget::Overlay(TargetId::new(&format!(".{}", image.id)));
        for &(property, from, to) in image.moves {
            builder = builder
                .track(Track::new(target.clone(), property, from, to).eased(Easing::Power1InOut));
        }
    }
    builder.build()
}

/// Performance section: text on every viewport, image layout on desktop
pub fn performance_section(section: TriggerId, paragraphs: TriggerId) -> VistaResult<SectionSpec> {
    let text = ScrollBinding::new(paragraphs, Anchor::TOP_BOTTOM, Anchor::TOP_CENTER);
    let layout = ScrollBinding::new(section, Anchor::TOP_BOTTOM, Anchor::BOTTOM_TOP)
        .with_scrub(Scrub::from_secs_f64(SCRUB_SECS));

    Ok(SectionSpec::new("performance")
        .scene(text, performance_text_timeline()?)
        .desktop_scene(layout, performance_layout_timeline()?))
}
