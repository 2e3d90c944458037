//! Content Reveal Synchronizer
//!
//! Overlay text blocks start hidden and slightly lowered. A reveal
//! directive tweens a block to its final opacity and its resting offset;
//! scrubbed overlay properties are written straight through.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;
use vista_core::{Directive, Easing, FrameTime, Property, TargetId};

use crate::{OverlaySurface, Tween, TweenSet};

/// An overlay block registered for reveals
#[derive(Clone, Debug, PartialEq)]
pub struct RevealTarget {
    pub id: TargetId,
    /// Offset the block rests at while hidden
    pub initial_offset_y: f32,
    /// Opacity the block reaches when revealed
    pub final_opacity: f32,
}

impl RevealTarget {
    pub fn new(id: &str, initial_offset_y: f32) -> Self {
        RevealTarget {
            id: TargetId::new(id),
            initial_offset_y,
            final_opacity: 1.0,
        }
    }
}

/// Last values written for a mounted block
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealState {
    pub opacity: f32,
    pub offset_y: f32,
}

#[derive(Debug)]
struct Mounted {
    target: RevealTarget,
    state: RevealState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Channel {
    Opacity,
    OffsetY,
}

/// Reveal timing
#[derive(Clone, Debug, PartialEq)]
pub struct RevealConfig {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(500),
            easing: Easing::Power1Out,
        }
    }
}

/// Staged overlay reveals
#[derive(Debug, Default)]
pub struct RevealSynchronizer {
    config: RevealConfig,
    targets: HashMap<TargetId, Mounted>,
    tweens: TweenSet<(TargetId, Channel)>,
}

impl RevealSynchronizer {
    pub fn new() -> Self {
        Self::with_config(RevealConfig::default())
    }

    pub fn with_config(config: RevealConfig) -> Self {
        RevealSynchronizer {
            config,
            targets: HashMap::new(),
            tweens: TweenSet::new(),
        }
    }

    /// Register a block in its hidden state
    pub fn mount(&mut self, target: RevealTarget) {
        let state = RevealState {
            opacity: 0.0,
            offset_y: target.initial_offset_y,
        };
        debug!(target = target.id.as_str(), "reveal target mounted");
        self.targets
            .insert(target.id.clone(), Mounted { target, state });
    }

    /// Forget a block and cancel its tweens
    pub fn unmount(&mut self, id: &TargetId) -> bool {
        self.tweens.cancel_where(|(t, _)| t == id);
        self.targets.remove(id).is_some()
    }

    pub fn is_mounted(&self, id: &TargetId) -> bool {
        self.targets.contains_key(id)
    }

    pub fn state(&self, id: &TargetId) -> Option<RevealState> {
        self.targets.get(id).map(|m| m.state)
    }

    /// Act on an overlay directive; returns false when it was ignored
    pub fn apply(
        &mut self,
        directive: &Directive,
        now: FrameTime,
        overlay: &mut dyn OverlaySurface,
    ) -> bool {
        match directive {
            Directive::Reveal {
                target,
                opacity,
                offset_y,
            } => self.start_reveal(target, *opacity, *offset_y, now),
            Directive::OverlayProperty {
                target,
                property,
                value,
            } => self.write_property(target, *property, *value, overlay),
            _ => false,
        }
    }

    fn start_reveal(
        &mut self,
        id: &TargetId,
        opacity: f32,
        offset_y: Option<f32>,
        now: FrameTime,
    ) -> bool {
        let Some(mounted) = self.targets.get(id) else {
            debug!(target = id.as_str(), "reveal for unmounted target ignored");
            return false;
        };

        let to_opacity = opacity * mounted.target.final_opacity;
        let to_offset = offset_y.unwrap_or(mounted.target.initial_offset_y);
        let from = mounted.state;
        let (duration, easing) = (self.config.duration, self.config.easing);

        self.tweens.start(
            (id.clone(), Channel::Opacity),
            Tween::new(from.opacity, to_opacity, now, duration).eased(easing),
        );
        self.tweens.start(
            (id.clone(), Channel::OffsetY),
            Tween::new(from.offset_y, to_offset, now, duration).eased(easing),
        );
        true
    }

    fn write_property(
        &mut self,
        id: &TargetId,
        property: Property,
        value: f32,
        overlay: &mut dyn OverlaySurface,
    ) -> bool {
        if !overlay.is_mounted(id) {
            debug!(target = id.as_str(), "overlay property for unmounted element ignored");
            return false;
        }

        match property {
            Property::Opacity => {
                self.tweens.cancel(&(id.clone(), Channel::Opacity));
                overlay.set_opacity(id, value);
                if let Some(m) = self.targets.get_mut(id) {
                    m.state.opacity = value;
                }
            }
            Property::OffsetY => {
                self.tweens.cancel(&(id.clone(), Channel::OffsetY));
                overlay.set_offset_y(id, value);
                if let Some(m) = self.targets.get_mut(id) {
                    m.state.offset_y = value;
                }
            }
            other => overlay.set_property(id, other, value),
        }
        true
    }

    /// Write in-flight reveal values; returns the number of writes
    pub fn tick(&mut self, now: FrameTime, overlay: &mut dyn OverlaySurface) -> usize {
        let mut written = 0;
        for ((id, channel), value) in self.tweens.tick(now) {
            let Some(mounted) = self.targets.get_mut(&id) else {
                continue;
            };
            if !overlay.is_mounted(&id) {
                continue;
            }
            match channel {
                Channel::Opacity => {
                    overlay.set_opacity(&id, value);
                    mounted.state.opacity = value;
                }
                Channel::OffsetY => {
                    overlay.set_offset_y(&id, value);
                    mounted.state.offset_y = value;
                }
            }
            written += 1;
        }
        written
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct MockOverlay {
        mounted: HashSet<TargetId>,
        opacity: HashMap<TargetId, f32>,
        offset: HashMap<TargetId, f32>,
        other: HashMap<(TargetId, Property), f32>,
    }

    impl MockOverlay {
        fn with(ids: &[&str]) -> Self {
            MockOverlay {
                mounted: ids.iter().map(|id| TargetId::new(id)).collect(),
                ..Default::default()
            }
        }
    }

    impl OverlaySurface for MockOverlay {
        fn is_mounted(&self, target: &TargetId) -> bool {
            self.mounted.contains(target)
        }
        fn set_opacity(&mut self, target: &TargetId, opacity: f32) {
            self.opacity.insert(target.clone(), opacity);
        }
        fn set_offset_y(&mut self, target: &TargetId, offset_y: f32) {
            self.offset.insert(target.clone(), offset_y);
        }
        fn set_property(&mut self, target: &TargetId, property: Property, value: f32) {
            self.other.insert((target.clone(), property), value);
        }
    }

    fn ms(v: u64) -> FrameTime {
        FrameTime::from_millis(v)
    }

    fn reveal(id: &str) -> Directive {
        Directive::Reveal {
            target: TargetId::new(id),
            opacity: 1.0,
            offset_y: Some(0.0),
        }
    }

    #[test]
    fn test_reveal_tweens_to_final() {
        let mut overlay = MockOverlay::with(&["box1"]);
        let mut sync = RevealSynchronizer::new();
        sync.mount(RevealTarget::new("box1", 40.0));

        assert!(sync.apply(&reveal("box1"), ms(0), &mut overlay));
        sync.tick(ms(250), &mut overlay);
        let mid = sync.state(&TargetId::new("box1")).unwrap();
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!(mid.offset_y > 0.0 && mid.offset_y < 40.0);

        sync.tick(ms(500), &mut overlay);
        let id = TargetId::new("box1");
        assert_eq!(overlay.opacity[&id], 1.0);
        assert_eq!(overlay.offset[&id], 0.0);
        assert!(!sync.is_animating());
    }

    #[test]
    fn test_hide_returns_to_initial_offset() {
        let mut overlay = MockOverlay::with(&["box2"]);
        let mut sync = RevealSynchronizer::new();
        sync.mount(RevealTarget::new("box2", 40.0));
        sync.apply(&reveal("box2"), ms(0), &mut overlay);
        sync.tick(ms(500), &mut overlay);

        let hide = Directive::Reveal {
            target: TargetId::new("box2"),
            opacity: 0.0,
            offset_y: None,
        };
        sync.apply(&hide, ms(600), &mut overlay);
        sync.tick(ms(1100), &mut overlay);
        assert_eq!(
            sync.state(&TargetId::new("box2")),
            Some(RevealState {
                opacity: 0.0,
                offset_y: 40.0
            })
        );
    }

    #[test]
    fn test_unmounted_target_ignored() {
        let mut overlay = MockOverlay::with(&[]);
        let mut sync = RevealSynchronizer::new();
        assert!(!sync.apply(&reveal("box9"), ms(0), &mut overlay));
        assert_eq!(sync.tick(ms(100), &mut overlay), 0);
        assert!(overlay.opacity.is_empty());
    }

    #[test]
    fn test_unmount_cancels_tweens() {
        let mut overlay = MockOverlay::with(&["box1"]);
        let mut sync = RevealSynchronizer::new();
        sync.mount(RevealTarget::new("box1", 40.0));
        sync.apply(&reveal("box1"), ms(0), &mut overlay);

        assert!(sync.unmount(&TargetId::new("box1")));
        assert!(!sync.is_animating());
        assert_eq!(sync.tick(ms(500), &mut overlay), 0);
        assert!(sync.is_empty());
    }

    #[test]
    fn test_scrubbed_properties_written_directly() {
        let mut overlay = MockOverlay::with(&[".mask img", ".content"]);
        let mut sync = RevealSynchronizer::new();

        let scale = Directive::OverlayProperty {
            target: TargetId::new(".mask img"),
            property: Property::Scale,
            value: 1.1,
        };
        assert!(sync.apply(&scale, ms(0), &mut overlay));
        assert_eq!(overlay.other[&(TargetId::new(".mask img"), Property::Scale)], 1.1);

        let fade = Directive::OverlayProperty {
            target: TargetId::new(".content"),
            property: Property::Opacity,
            value: 0.5,
        };
        assert!(sync.apply(&fade, ms(0), &mut overlay));
        assert_eq!(overlay.opacity[&TargetId::new(".content")], 0.5);
    }

    #[test]
    fn test_non_overlay_directive_ignored() {
        let mut overlay = MockOverlay::with(&[]);
        let mut sync = RevealSynchronizer::new();
        let d = Directive::SetTexture("/videos/feature-2.mp4".into());
        assert!(!sync.apply(&d, ms(0), &mut overlay));
    }
}
