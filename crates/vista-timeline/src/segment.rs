//! Timeline segments

use vista_core::{Axis, Directive, MediaUri, Property, TargetId};

/// Where a segment sits on its timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Offset {
    /// Absolute normalized offset in [0, 1]
    At(f64),
    /// Right where the previous segment ends (its offset plus its span)
    Sequential,
}

/// Discrete action a segment performs when its offset is crossed
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Swap the video on the screen texture
    SetTexture(MediaUri),
    /// Move an overlay block towards an opacity and vertical offset
    SetOpacityTarget {
        target: TargetId,
        opacity: f32,
        offset_y: f32,
    },
    /// Snap a scene node to a rotation angle (radians)
    SetRotation {
        node: TargetId,
        axis: Axis,
        angle: f32,
    },
}

/// Independent property an action writes; reversal restores per channel
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Texture,
    Reveal(TargetId),
    Rotation(TargetId, Axis),
}

impl Action {
    /// Convenience constructor for a full enter reveal (opacity 1, offset 0)
    pub fn reveal(target: &str) -> Self {
        Action::SetOpacityTarget {
            target: TargetId::new(target),
            opacity: 1.0,
            offset_y: 0.0,
        }
    }

    pub fn texture(uri: &str) -> Self {
        Action::SetTexture(MediaUri::new(uri))
    }

    pub fn channel(&self) -> Channel {
        match self {
            Action::SetTexture(_) => Channel::Texture,
            Action::SetOpacityTarget { target, .. } => Channel::Reveal(target.clone()),
            Action::SetRotation { node, axis, .. } => Channel::Rotation(node.clone(), *axis),
        }
    }

    /// Directive issued when this action fires
    pub fn directive(&self) -> Directive {
        match self {
            Action::SetTexture(uri) => Directive::SetTexture(uri.clone()),
            Action::SetOpacityTarget {
                target,
                opacity,
                offset_y,
            } => Directive::Reveal {
                target: target.clone(),
                opacity: *opacity,
                offset_y: Some(*offset_y),
            },
            Action::SetRotation { node, axis, angle } => Directive::NodeProperty {
                node: node.clone(),
                property: Property::Rotation(*axis),
                value: *angle,
            },
        }
    }
}

impl Channel {
    /// Directive restoring the channel when no earlier segment covers it
    /// and the timeline declared no baseline. `reveal_hides` selects whether
    /// reveals are hidden again.
    pub fn implicit_baseline(&self, reveal_hides: bool) -> Option<Directive> {
        match self {
            Channel::Texture => None,
            Channel::Reveal(target) => reveal_hides.then(|| Directive::Reveal {
                target: target.clone(),
                opacity: 0.0,
                offset_y: None,
            }),
            Channel::Rotation(node, axis) => Some(Directive::NodeProperty {
                node: node.clone(),
                property: Property::Rotation(*axis),
                value: 0.0,
            }),
        }
    }
}

/// A segment with its offset resolved
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub offset: f64,
    /// Length of the stretch the segment is considered active for
    pub span: f64,
    pub action: Action,
}

impl Segment {
    pub fn end(&self) -> f64 {
        self.offset + self.span
    }

    /// Local progress inside the segment's span, `None` outside of it
    pub fn local_progress(&self, p: f64) -> Option<f64> {
        if p < self.offset {
            return None;
        }
        if self.span <= 0.0 {
            return (p == self.offset).then_some(1.0);
        }
        if p >= self.end() {
            return None;
        }
        Some((p - self.offset) / self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_channels() {
        assert_eq!(Action::texture("/videos/a.mp4").channel(), Channel::Texture);
        assert_eq!(
            Action::reveal("box2").channel(),
            Channel::Reveal(TargetId::new("box2"))
        );
        let spin = Action::SetRotation {
            node: TargetId::new("macbook"),
            axis: Axis::Y,
            angle: 1.0,
        };
        assert_eq!(spin.channel(), Channel::Rotation(TargetId::new("macbook"), Axis::Y));
    }

    #[test]
    fn test_reveal_directive() {
        let d = Action::reveal("box1").directive();
        assert_eq!(
            d,
            Directive::Reveal {
                target: TargetId::new("box1"),
                opacity: 1.0,
                offset_y: Some(0.0),
            }
        );
    }

    #[test]
    fn test_implicit_baselines() {
        assert!(Channel::Texture.implicit_baseline(true).is_none());
        assert!(Channel::Reveal(TargetId::new("box1"))
            .implicit_baseline(false)
            .is_none());
        assert!(Channel::Reveal(TargetId::new("box1"))
            .implicit_baseline(true)
            .is_some());
        assert!(Channel::Rotation(TargetId::new("n"), Axis::X)
            .implicit_baseline(false)
            .is_some());
    }

    #[test]
    fn test_local_progress() {
        let seg = Segment {
            offset: 0.2,
            span: 0.2,
            action: Action::reveal("box2"),
        };
        assert_eq!(seg.local_progress(0.1), None);
        assert_eq!(seg.local_progress(0.2), Some(0.0));
        assert!((seg.local_progress(0.3).unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(seg.local_progress(0.4), None);

        let instant = Segment {
            offset: 0.5,
            span: 0.0,
            action: Action::texture("/videos/b.mp4"),
        };
        assert_eq!(instant.local_progress(0.5), Some(1.0));
        assert_eq!(instant.local_progress(0.6), None);
    }
}
