//! Timeline Sequencer - resolves progress into directives
//!
//! Firing state is a prefix of the segment list: after `advance(p)` exactly
//! the segments with `offset <= p` are fired. Moving forward fires the
//! missing ones in ascending order; moving backward reverses the extra ones
//! in descending order. Calling `advance` again with the same progress finds
//! nothing to do, which is what makes the sequencer idempotent.

use tracing::{debug, trace};
use vista_core::{Arena, Directive, Handle, Progress, VistaError, VistaResult};

use crate::{Channel, TimelineSpec};

/// Handle to a running timeline
pub type TimelineHandle = Handle<TimelineRun>;

/// Result of one `advance` call
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Advance {
    /// Directives to dispatch, in causal order
    pub directives: Vec<Directive>,
    /// Top-level segment indices fired by this call
    pub fired: Vec<usize>,
    /// Top-level segment indices reversed by this call
    pub reversed: Vec<usize>,
}

impl Advance {
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty() && self.fired.is_empty() && self.reversed.is_empty()
    }
}

/// Runtime state of one timeline (and, recursively, its children)
#[derive(Debug)]
pub struct TimelineRun {
    spec: TimelineSpec,
    fired: Vec<bool>,
    track_values: Vec<Option<f32>>,
    children: Vec<TimelineRun>,
    progress: Option<Progress>,
}

impl TimelineRun {
    pub fn new(spec: TimelineSpec) -> Self {
        let children = spec
            .children()
            .iter()
            .map(|c| TimelineRun::new(c.spec.clone()))
            .collect();
        TimelineRun {
            fired: vec![false; spec.segments().len()],
            track_values: vec![None; spec.tracks().len()],
            children,
            progress: None,
            spec,
        }
    }

    pub fn spec(&self) -> &TimelineSpec {
        &self.spec
    }

    /// Last progress this timeline was advanced to
    pub fn progress(&self) -> Option<Progress> {
        self.progress
    }

    pub fn is_fired(&self, index: usize) -> bool {
        self.fired.get(index).copied().unwrap_or(false)
    }

    /// Offsets of the currently fired segments
    pub fn fired_offsets(&self) -> Vec<f64> {
        self.spec
            .segments()
            .iter()
            .zip(&self.fired)
            .filter(|(_, fired)| **fired)
            .map(|(seg, _)| seg.offset)
            .collect()
    }

    /// Reduce the run to progress `p`
    pub fn advance(&mut self, progress: Progress, out: &mut Advance) {
        self.advance_inner(progress, out, true);
    }

    fn advance_inner(&mut self, progress: Progress, out: &mut Advance, top_level: bool) {
        let p = progress.value();
        let segments = self.spec.segments();

        // Backward: reverse fired segments past p, latest first
        for i in (0..segments.len()).rev() {
            if !self.fired[i] || segments[i].offset <= p {
                continue;
            }
            self.fired[i] = false;
            if top_level {
                out.reversed.push(i);
            }

            let channel = segments[i].action.channel();
            if let Some(d) = self.restore_directive(i, &channel, p) {
                out.directives.push(d);
            }
        }

        // Forward: fire unfired segments up to p, earliest first
        for i in 0..segments.len() {
            if self.fired[i] || segments[i].offset > p {
                continue;
            }
            self.fired[i] = true;
            if top_level {
                out.fired.push(i);
            }
            out.directives.push(segments[i].action.directive());
        }

        // Continuous tracks, only when the value moved
        for (i, track) in self.spec.tracks().iter().enumerate() {
            let value = track.value_at(p);
            if self.track_values[i] != Some(value) {
                self.track_values[i] = Some(value);
                out.directives.push(track.directive_at(p));
            }
        }

        for (child, window) in self.children.iter_mut().zip(self.spec.children()) {
            let local = Progress::new(window.local_progress(p));
            child.advance_inner(local, out, false);
        }

        self.progress = Some(progress);
    }

    /// Directive that puts `channel` back to how it was before segment `i`
    ///
    /// That is the latest earlier segment on the same channel, provided it
    /// stays fired; if it is about to be reversed too it emits its own
    /// restore. Without one, the channel baseline applies.
    fn restore_directive(&self, i: usize, channel: &Channel, p: f64) -> Option<Directive> {
        let segments = self.spec.segments();
        let earlier = (0..i)
            .rev()
            .find(|&j| self.fired[j] && segments[j].action.channel() == *channel);

        match earlier {
            Some(j) if segments[j].offset > p => None,
            Some(j) => Some(segments[j].action.directive()),
            None => {
                let baseline = self.spec.baseline(channel);
                if baseline.is_none() {
                    trace!(timeline = self.spec.label(), ?channel, "no baseline to restore");
                }
                baseline
            }
        }
    }
}

/// Owns every running timeline; timelines are independent of each other
#[derive(Default)]
pub struct Sequencer {
    timelines: Arena<TimelineRun>,
}

impl Sequencer {
    pub fn new() -> Self {
        Sequencer {
            timelines: Arena::new(),
        }
    }

    /// Start running a declared timeline
    pub fn create_timeline(&mut self, spec: TimelineSpec) -> TimelineHandle {
        debug!(timeline = spec.label(), segments = spec.segments().len(), "timeline created");
        self.timelines.insert(TimelineRun::new(spec))
    }

    /// Advance a timeline; a destroyed handle is a silent no-op
    pub fn advance(&mut self, handle: TimelineHandle, progress: Progress) -> Advance {
        self.try_advance(handle, progress).unwrap_or_else(|error| {
            debug!(?handle, %error, "advance on destroyed timeline ignored");
            Advance::default()
        })
    }

    /// Advance a timeline, reporting a destroyed handle as `StaleHandle`
    pub fn try_advance(&mut self, handle: TimelineHandle, progress: Progress) -> VistaResult<Advance> {
        let run = self
            .timelines
            .get_mut(handle)
            .ok_or(VistaError::StaleHandle("timeline"))?;
        let mut out = Advance::default();
        run.advance(progress, &mut out);
        Ok(out)
    }

    /// Stop a timeline; later advances on the handle do nothing
    pub fn destroy(&mut self, handle: TimelineHandle) -> bool {
        match self.timelines.remove(handle) {
            Some(run) => {
                debug!(timeline = run.spec.label(), "timeline destroyed");
                true
            }
            None => false,
        }
    }

    pub fn get(&self, handle: TimelineHandle) -> Option<&TimelineRun> {
        self.timelines.get(handle)
    }

    pub fn contains(&self, handle: TimelineHandle) -> bool {
        self.timelines.contains(handle)
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, RevealPolicy, TimelineBuilder, Track, TrackTarget};
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::f32::consts::PI;
    use vista_core::{Axis, MediaUri, Property, TargetId};

    fn five_offsets() -> TimelineSpec {
        TimelineBuilder::new("content")
            .at(0.0, Action::texture("/videos/feature-1.mp4"))
            .at(0.2, Action::texture("/videos/feature-2.mp4"))
            .at(0.4, Action::texture("/videos/feature-3.mp4"))
            .at(0.6, Action::texture("/videos/feature-4.mp4"))
            .at(0.8, Action::texture("/videos/feature-5.mp4"))
            .build()
            .unwrap()
    }

    /// Fold directives into the last value per addressed property
    #[derive(Default, Debug, PartialEq)]
    struct Applied {
        texture: Option<MediaUri>,
        reveals: HashMap<TargetId, (u32, Option<u32>)>,
        props: HashMap<(TargetId, String), u32>,
    }

    impl Applied {
        fn apply(&mut self, directives: &[Directive]) {
            for d in directives {
                match d {
                    Directive::SetTexture(uri) => self.texture = Some(uri.clone()),
                    Directive::Reveal {
                        target,
                        opacity,
                        offset_y,
                    } => {
                        self.reveals.insert(
                            target.clone(),
                            (opacity.to_bits(), offset_y.map(f32::to_bits)),
                        );
                    }
                    Directive::NodeProperty {
                        node: target,
                        property,
                        value,
                    }
                    | Directive::OverlayProperty {
                        target,
                        property,
                        value,
                    } => {
                        self.props
                            .insert((target.clone(), format!("{property:?}")), value.to_bits());
                    }
                }
            }
        }
    }

    #[test]
    fn test_advance_fires_up_to_progress() {
        let mut seq = Sequencer::new();
        let tl = seq.create_timeline(five_offsets());

        let out = seq.advance(tl, Progress::new(0.5));
        assert_eq!(out.fired, vec![0, 1, 2]);
        assert!(out.reversed.is_empty());
        assert_eq!(
            out.directives.last(),
            Some(&Directive::SetTexture("/videos/feature-3.mp4".into()))
        );
        assert_eq!(seq.get(tl).unwrap().fired_offsets(), vec![0.0, 0.2, 0.4]);
    }

    #[test]
    fn test_advance_is_idempotent() {
        let mut seq = Sequencer::new();
        let tl = seq.create_timeline(five_offsets());
        seq.advance(tl, Progress::new(0.65));

        let again = seq.advance(tl, Progress::new(0.65));
        assert!(again.is_empty());
    }

    #[test]
    fn test_backward_restores_prior_texture() {
        let mut seq = Sequencer::new();
        let tl = seq.create_timeline(five_offsets());
        seq.advance(tl, Progress::new(0.9));

        let back = seq.advance(tl, Progress::new(0.3));
        assert_eq!(back.reversed, vec![4, 3, 2]);
        // Only the surviving segment's texture is re-issued
        assert_eq!(
            back.directives,
            vec![Directive::SetTexture("/videos/feature-2.mp4".into())]
        );
    }

    #[test]
    fn test_offset_boundary_is_inclusive() {
        let mut seq = Sequencer::new();
        let tl = seq.create_timeline(five_offsets());
        let out = seq.advance(tl, Progress::new(0.4));
        assert_eq!(out.fired, vec![0, 1, 2]);
    }

    #[test]
    fn test_texture_baseline_on_full_rewind() {
        let spec = TimelineBuilder::new("t")
            .baseline(Action::texture("/videos/feature-1.mp4"))
            .at(0.5, Action::texture("/videos/feature-2.mp4"))
            .build()
            .unwrap();
        let mut seq = Sequencer::new();
        let tl = seq.create_timeline(spec);
        seq.advance(tl, Progress::END);
        let back = seq.advance(tl, Progress::START);
        assert_eq!(
            back.directives,
            vec![Directive::SetTexture("/videos/feature-1.mp4".into())]
        );
    }

    #[test]
    fn test_monotonic_reveal_is_not_hidden() {
        let spec = TimelineBuilder::new("t")
            .at(0.5, Action::reveal("box1"))
            .build()
            .unwrap();
        let mut seq = Sequencer::new();
        let tl = seq.create_timeline(spec);
        seq.advance(tl, Progress::END);

        let back = seq.advance(tl, Progress::START);
        assert_eq!(back.reversed, vec![0]);
        assert!(back.directives.is_empty());

        // Crossing forward again fires it again
        let fwd = seq.advance(tl, Progress::END);
        assert_eq!(fwd.fired, vec![0]);
    }

    #[test]
    fn test_reversible_reveal_hides() {
        let spec = TimelineBuilder::new("t")
            .reveal_policy(RevealPolicy::Reversible)
            .at(0.5, Action::reveal("box1"))
            .build()
            .unwrap();
        let mut seq = Sequencer::new();
        let tl = seq.create_timeline(spec);
        seq.advance(tl, Progress::END);
        let back = seq.advance(tl, Progress::START);
        assert_eq!(
            back.directives,
            vec![Directive::Reveal {
                target: TargetId::new("box1"),
                opacity: 0.0,
                offset_y: None,
            }]
        );
    }

    #[test]
    fn test_discrete_rotation_reverses_to_zero() {
        let node = TargetId::new("macbook");
        let spec = TimelineBuilder::new("t")
            .at(
                0.5,
                Action::SetRotation {
                    node: node.clone(),
                    axis: Axis::Y,
                    angle: PI,
                },
            )
            .build()
            .unwrap();
        let mut seq = Sequencer::new();
        let tl = seq.create_timeline(spec);
        seq.advance(tl, Progress::END);
        let back = seq.advance(tl, Progress::new(0.1));
        assert_eq!(
            back.directives,
            vec![Directive::NodeProperty {
                node,
                property: Property::Rotation(Axis::Y),
                value: 0.0,
            }]
        );
    }

    #[test]
    fn test_tracks_emit_only_on_change() {
        let spec = TimelineBuilder::new("spin")
            .track(Track::new(
                TrackTarget::Node(TargetId::new("macbook")),
                Property::Rotation(Axis::Y),
                0.0,
                2.0 * PI,
            ))
            .build()
            .unwrap();
        let mut seq = Sequencer::new();
        let tl = seq.create_timeline(spec);

        assert_eq!(seq.advance(tl, Progress::new(0.25)).directives.len(), 1);
        assert!(seq.advance(tl, Progress::new(0.25)).directives.is_empty());
        assert_eq!(seq.advance(tl, Progress::new(0.5)).directives.len(), 1);
    }

    #[test]
    fn test_nested_child_receives_local_progress() {
        let child = TimelineBuilder::new("child")
            .at(0.5, Action::texture("/videos/game.mp4"))
            .build()
            .unwrap();
        let parent = TimelineBuilder::new("parent")
            .child(0.5, 1.0, child)
            .build()
            .unwrap();
        let mut seq = Sequencer::new();
        let tl = seq.create_timeline(parent);

        // Parent 0.7 is child 0.4: not yet
        assert!(seq.advance(tl, Progress::new(0.7)).directives.is_empty());
        // Parent 0.8 is child 0.6: fires
        let out = seq.advance(tl, Progress::new(0.8));
        assert_eq!(
            out.directives,
            vec![Directive::SetTexture("/videos/game.mp4".into())]
        );
        // Nested indices are not reported at top level
        assert!(out.fired.is_empty());
    }

    #[test]
    fn test_destroyed_timeline_is_noop() {
        let mut seq = Sequencer::new();
        let tl = seq.create_timeline(five_offsets());
        assert!(seq.destroy(tl));
        assert!(seq.advance(tl, Progress::END).is_empty());
        assert!(!seq.destroy(tl));
        assert!(seq.is_empty());
    }

    #[test]
    fn test_try_advance_reports_stale_handle() {
        let mut seq = Sequencer::new();
        let tl = seq.create_timeline(five_offsets());
        assert_eq!(seq.try_advance(tl, Progress::new(0.3)).unwrap().fired, vec![0, 1]);

        seq.destroy(tl);
        let err = seq.try_advance(tl, Progress::END).unwrap_err();
        assert_eq!(err, VistaError::StaleHandle("timeline"));
        assert_eq!(err.kind(), "stale_handle");
    }

    #[test]
    fn test_independent_timelines() {
        let mut seq = Sequencer::new();
        let a = seq.create_timeline(five_offsets());
        let b = seq.create_timeline(five_offsets());
        seq.advance(a, Progress::END);
        let out_b = seq.advance(b, Progress::new(0.1));
        assert_eq!(out_b.fired, vec![0]);
        assert_eq!(seq.get(a).unwrap().fired_offsets().len(), 5);
    }

    fn mixed_spec() -> TimelineSpec {
        let mut builder = TimelineBuilder::new("mixed")
            .reveal_policy(RevealPolicy::Reversible)
            .baseline(Action::texture("/videos/feature-1.mp4"));
        for i in 1..=5 {
            builder = builder
                .then(Action::texture(&format!("/videos/feature-{i}.mp4")))
                .then_for(0.2, Action::reveal(&format!("box{i}")));
        }
        builder
            .track(Track::new(
                TrackTarget::Overlay(TargetId::new(".mask img")),
                Property::Scale,
                80.0,
                1.1,
            ))
            .build()
            .unwrap()
    }

    proptest! {
        #[test]
        fn converging_sequences_reach_the_same_state(
            path in proptest::collection::vec(0.0f64..=1.0, 0..20),
            target in 0.0f64..=1.0,
        ) {
            // Direct
            let mut seq = Sequencer::new();
            let tl = seq.create_timeline(mixed_spec());
            let mut direct = Applied::default();
            direct.apply(&seq.advance(tl, Progress::START).directives);
            direct.apply(&seq.advance(tl, Progress::new(target)).directives);

            // Wandering
            let mut seq2 = Sequencer::new();
            let tl2 = seq2.create_timeline(mixed_spec());
            let mut wandering = Applied::default();
            wandering.apply(&seq2.advance(tl2, Progress::START).directives);
            for p in path {
                wandering.apply(&seq2.advance(tl2, Progress::new(p)).directives);
            }
            wandering.apply(&seq2.advance(tl2, Progress::new(target)).directives);

            prop_assert_eq!(&direct.texture, &wandering.texture);
            prop_assert_eq!(
                seq.get(tl).unwrap().fired_offsets(),
                seq2.get(tl2).unwrap().fired_offsets()
            );
            prop_assert_eq!(&direct.props, &wandering.props);
            // Reveals that are visible must agree
            let visible = |a: &Applied| {
                let mut v: Vec<_> = a
                    .reveals
                    .iter()
                    .filter(|(_, (o, _))| f32::from_bits(*o) > 0.0)
                    .map(|(t, _)| t.clone())
                    .collect();
                v.sort();
                v
            };
            prop_assert_eq!(visible(&direct), visible(&wandering));

            // Settled: repeating the target does nothing
            prop_assert!(seq2.advance(tl2, Progress::new(target)).is_empty());
        }
    }
}
