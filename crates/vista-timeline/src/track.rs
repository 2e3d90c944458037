//! Continuous tracks
//!
//! A track maps progress straight to a property value. Nothing is staged,
//! so scrubbing backward is the same computation as scrubbing forward.

use vista_core::{Directive, Easing, Property, TargetId};

/// What a track writes to
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TrackTarget {
    /// A named scene node (rotation of the product model)
    Node(TargetId),
    /// A host overlay element (mask image, paragraph, layout image)
    Overlay(TargetId),
}

/// Progress-proportional property animation over a window of the timeline
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub target: TrackTarget,
    pub property: Property,
    pub from: f32,
    pub to: f32,
    /// Window of the timeline the track runs over
    pub start: f64,
    pub end: f64,
    pub easing: Easing,
}

impl Track {
    /// Track over the full timeline
    pub fn new(target: TrackTarget, property: Property, from: f32, to: f32) -> Self {
        Track {
            target,
            property,
            from,
            to,
            start: 0.0,
            end: 1.0,
            easing: Easing::Linear,
        }
    }

    pub fn window(mut self, start: f64, end: f64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn eased(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Local progress within the window, clamped
    pub fn local_progress(&self, p: f64) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if p >= self.start { 1.0 } else { 0.0 };
        }
        ((p - self.start) / span).clamp(0.0, 1.0)
    }

    /// Property value at timeline progress `p`
    pub fn value_at(&self, p: f64) -> f32 {
        self.easing
            .interpolate(self.from, self.to, self.local_progress(p))
    }

    /// Directive writing the value at `p`
    pub fn directive_at(&self, p: f64) -> Directive {
        let value = self.value_at(p);
        match &self.target {
            TrackTarget::Node(node) => Directive::NodeProperty {
                node: node.clone(),
                property: self.property,
                value,
            },
            TrackTarget::Overlay(target) => Directive::OverlayProperty {
                target: target.clone(),
                property: self.property,
                value,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use vista_core::Axis;

    fn spin() -> Track {
        Track::new(
            TrackTarget::Node(TargetId::new("macbook")),
            Property::Rotation(Axis::Y),
            0.0,
            2.0 * PI,
        )
    }

    #[test]
    fn test_linear_track_is_proportional() {
        let track = spin();
        assert_eq!(track.value_at(0.0), 0.0);
        assert!((track.value_at(0.5) - PI).abs() < 1e-5);
        assert!((track.value_at(1.0) - 2.0 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_window_clamps_outside() {
        let track = Track::new(
            TrackTarget::Overlay(TargetId::new(".content")),
            Property::Opacity,
            0.0,
            1.0,
        )
        .window(0.5, 1.0);
        assert_eq!(track.value_at(0.25), 0.0);
        assert!((track.value_at(0.75) - 0.5).abs() < 1e-6);
        assert_eq!(track.value_at(1.0), 1.0);
    }

    #[test]
    fn test_end_of_window_writes_declared_value() {
        let mask = Track::new(
            TrackTarget::Overlay(TargetId::new(".mask img")),
            Property::Scale,
            80.0,
            1.1,
        )
        .window(0.0, 0.5)
        .eased(Easing::Power1Out);
        assert_eq!(mask.value_at(0.5), 1.1);
        assert_eq!(mask.value_at(1.0), 1.1);
        assert_eq!(mask.value_at(0.0), 80.0);
    }

    #[test]
    fn test_zero_width_window_is_a_step() {
        let track = spin().window(0.3, 0.3);
        assert_eq!(track.value_at(0.29), 0.0);
        assert!((track.value_at(0.3) - 2.0 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_directive_routing() {
        assert!(matches!(
            spin().directive_at(0.1),
            Directive::NodeProperty { .. }
        ));
        let mask = Track::new(
            TrackTarget::Overlay(TargetId::new(".mask img")),
            Property::Scale,
            80.0,
            1.1,
        );
        assert!(matches!(
            mask.directive_at(0.1),
            Directive::OverlayProperty { .. }
        ));
    }
}
