//! Timeline declaration
//!
//! Timelines are declared once, validated, and are immutable afterwards.
//! Re-declaring means building a new spec and rebinding it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use vista_core::{Directive, VistaError, VistaResult};

use crate::{Action, Channel, Offset, Segment, Track};

/// Tolerance when checking that sequential segments end inside the timeline
const OFFSET_EPSILON: f64 = 1e-9;

/// What happens to revealed overlay blocks when scrolling back past them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPolicy {
    /// Once revealed, blocks stay visible
    #[default]
    Monotonic,
    /// Blocks hide again when their offset is crossed backward
    Reversible,
}

/// A child timeline mounted on a window of its parent
#[derive(Clone, Debug)]
pub struct ChildTimeline {
    pub start: f64,
    pub end: f64,
    pub spec: TimelineSpec,
}

impl ChildTimeline {
    /// Parent progress remapped into the child's [0, 1]
    pub fn local_progress(&self, p: f64) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if p >= self.start { 1.0 } else { 0.0 };
        }
        ((p - self.start) / span).clamp(0.0, 1.0)
    }
}

/// A segment that is active at some progress, with its local progress
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveSegment {
    pub index: usize,
    pub local_progress: f64,
}

/// Validated, immutable timeline declaration
#[derive(Clone, Debug)]
pub struct TimelineSpec {
    label: String,
    segments: Vec<Segment>,
    tracks: Vec<Track>,
    children: Vec<ChildTimeline>,
    baselines: HashMap<Channel, Directive>,
    reveal_policy: RevealPolicy,
}

impl TimelineSpec {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn children(&self) -> &[ChildTimeline] {
        &self.children
    }

    pub fn reveal_policy(&self) -> RevealPolicy {
        self.reveal_policy
    }

    /// Resolved offsets, in firing order
    pub fn offsets(&self) -> Vec<f64> {
        self.segments.iter().map(|s| s.offset).collect()
    }

    /// Segments whose span contains `p`, in ascending order
    pub fn active_segments(&self, p: f64) -> Vec<ActiveSegment> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(index, seg)| {
                seg.local_progress(p).map(|local_progress| ActiveSegment {
                    index,
                    local_progress,
                })
            })
            .collect()
    }

    /// Directive restoring `channel` when nothing earlier on the timeline covers it
    pub fn baseline(&self, channel: &Channel) -> Option<Directive> {
        if let Some(d) = self.baselines.get(channel) {
            return Some(d.clone());
        }
        channel.implicit_baseline(self.reveal_policy == RevealPolicy::Reversible)
    }
}

/// Builder for [`TimelineSpec`]
#[derive(Debug)]
pub struct TimelineBuilder {
    label: String,
    entries: Vec<(Offset, f64, Action)>,
    tracks: Vec<Track>,
    children: Vec<ChildTimeline>,
    baselines: Vec<Action>,
    reveal_policy: RevealPolicy,
}

impl TimelineBuilder {
    pub fn new(label: &str) -> Self {
        TimelineBuilder {
            label: label.to_string(),
            entries: Vec::new(),
            tracks: Vec::new(),
            children: Vec::new(),
            baselines: Vec::new(),
            reveal_policy: RevealPolicy::default(),
        }
    }

    /// Add a segment with an explicit offset and span
    pub fn segment(mut self, offset: Offset, span: f64, action: Action) -> Self {
        self.entries.push((offset, span, action));
        self
    }

    /// Instant segment at an absolute offset
    pub fn at(self, offset: f64, action: Action) -> Self {
        self.segment(Offset::At(offset), 0.0, action)
    }

    /// Instant segment right after the previous one
    pub fn then(self, action: Action) -> Self {
        self.segment(Offset::Sequential, 0.0, action)
    }

    /// Segment right after the previous one, occupying `span`
    pub fn then_for(self, span: f64, action: Action) -> Self {
        self.segment(Offset::Sequential, span, action)
    }

    pub fn track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    /// Mount a child timeline on the window `[start, end]`
    pub fn child(mut self, start: f64, end: f64, spec: TimelineSpec) -> Self {
        self.children.push(ChildTimeline { start, end, spec });
        self
    }

    /// State a channel returns to when scrolled back before its first segment
    pub fn baseline(mut self, action: Action) -> Self {
        self.baselines.push(action);
        self
    }

    pub fn reveal_policy(mut self, policy: RevealPolicy) -> Self {
        self.reveal_policy = policy;
        self
    }

    /// Resolve offsets and validate
    pub fn build(self) -> VistaResult<TimelineSpec> {
        let label = self.label;
        let invalid = |msg: String| VistaError::InvalidTimeline(format!("{label}: {msg}"));

        let mut segments = Vec::with_capacity(self.entries.len());
        let mut cursor = 0.0_f64;
        let mut previous = 0.0_f64;

        for (i, (offset, span, action)) in self.entries.into_iter().enumerate() {
            if !span.is_finite() || span < 0.0 {
                return Err(invalid(format!("segment {i} has invalid span {span}")));
            }

            let resolved = match offset {
                Offset::At(at) => at,
                Offset::Sequential => cursor,
            };

            if !resolved.is_finite() || !(0.0..=1.0).contains(&resolved) {
                return Err(invalid(format!(
                    "segment {i} offset {resolved} outside [0, 1]"
                )));
            }
            if resolved < previous {
                return Err(invalid(format!(
                    "segment {i} offset {resolved} precedes previous offset {previous}"
                )));
            }
            if resolved + span > 1.0 + OFFSET_EPSILON {
                return Err(invalid(format!(
                    "segment {i} ends at {} past the end of the timeline",
                    resolved + span
                )));
            }

            previous = resolved;
            cursor = snap_offset(resolved + span);
            segments.push(Segment {
                offset: resolved,
                span,
                action,
            });
        }

        for (i, track) in self.tracks.iter().enumerate() {
            if !valid_window(track.start, track.end) {
                return Err(invalid(format!(
                    "track {i} window [{}, {}] is not inside [0, 1]",
                    track.start, track.end
                )));
            }
        }

        for (i, child) in self.children.iter().enumerate() {
            if !valid_window(child.start, child.end) {
                return Err(invalid(format!(
                    "child {i} window [{}, {}] is not inside [0, 1]",
                    child.start, child.end
                )));
            }
        }

        let baselines = self
            .baselines
            .into_iter()
            .map(|action| (action.channel(), action.directive()))
            .collect();

        Ok(TimelineSpec {
            label,
            segments,
            tracks: self.tracks,
            children: self.children,
            baselines,
            reveal_policy: self.reveal_policy,
        })
    }
}

/// Sequential cursors accumulate float error; keep them on a 1e-9 grid so
/// `0.2 + 0.2 + 0.2` lands exactly on `0.6`
fn snap_offset(x: f64) -> f64 {
    ((x * 1e9).round() / 1e9).min(1.0)
}

fn valid_window(start: f64, end: f64) -> bool {
    start.is_finite() && end.is_finite() && 0.0 <= start && start <= end && end <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrackTarget;
    use vista_core::{Property, TargetId};

    fn feature_content() -> TimelineSpec {
        let mut builder = TimelineBuilder::new("features-content");
        for i in 1..=5 {
            builder = builder
                .then(Action::texture(&format!("/videos/feature-{i}.mp4")))
                .then_for(0.2, Action::reveal(&format!("box{i}")));
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_sequential_offsets_resolve() {
        let spec = feature_content();
        let offsets = spec.offsets();
        let expected = [0.0, 0.0, 0.2, 0.2, 0.4, 0.4, 0.6, 0.6, 0.8, 0.8];
        assert_eq!(offsets.len(), expected.len());
        for (got, want) in offsets.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    #[test]
    fn test_decreasing_offsets_rejected() {
        let err = TimelineBuilder::new("bad")
            .at(0.5, Action::texture("/a.mp4"))
            .at(0.3, Action::texture("/b.mp4"))
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_timeline");
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_out_of_range_offsets_rejected() {
        assert!(TimelineBuilder::new("t")
            .at(1.5, Action::texture("/a.mp4"))
            .build()
            .is_err());
        assert!(TimelineBuilder::new("t")
            .at(f64::NAN, Action::texture("/a.mp4"))
            .build()
            .is_err());
        // Sequential spans overflowing the timeline
        assert!(TimelineBuilder::new("t")
            .then_for(0.6, Action::reveal("a"))
            .then_for(0.6, Action::reveal("b"))
            .build()
            .is_err());
    }

    #[test]
    fn test_track_window_validated() {
        let track = Track::new(
            TrackTarget::Overlay(TargetId::new(".content")),
            Property::Opacity,
            0.0,
            1.0,
        )
        .window(0.8, 0.2);
        assert!(TimelineBuilder::new("t").track(track).build().is_err());
    }

    #[test]
    fn test_active_segments() {
        let spec = feature_content();
        let active = spec.active_segments(0.5);
        // Only the box3 reveal spans 0.4..0.6
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].index, 5);
        assert!((active[0].local_progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_baselines() {
        let spec = TimelineBuilder::new("t")
            .baseline(Action::texture("/videos/feature-1.mp4"))
            .at(0.5, Action::texture("/videos/feature-2.mp4"))
            .build()
            .unwrap();
        assert_eq!(
            spec.baseline(&Channel::Texture),
            Some(Directive::SetTexture("/videos/feature-1.mp4".into()))
        );
        // Monotonic by default: no implicit hide
        assert!(spec
            .baseline(&Channel::Reveal(TargetId::new("box1")))
            .is_none());
    }

    #[test]
    fn test_child_local_progress() {
        let child = ChildTimeline {
            start: 0.5,
            end: 1.0,
            spec: TimelineBuilder::new("c").build().unwrap(),
        };
        assert_eq!(child.local_progress(0.25), 0.0);
        assert_eq!(child.local_progress(0.75), 0.5);
        assert_eq!(child.local_progress(1.0), 1.0);
    }
}
