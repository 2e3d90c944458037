//! Page sections
//!
//! A section is declared once as data: the scroll scenes it drives, the
//! overlay blocks it reveals and the media it wants buffered early.

use vista_core::{MediaUri, ViewportClass};
use vista_time::ScrollBinding;
use vista_timeline::TimelineSpec;
use vista_visual::RevealTarget;

/// Viewport classes a scene runs in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LayoutGate {
    #[default]
    Any,
    /// Desktop-only choreography; torn down while the viewport is compact
    RegularOnly,
}

impl LayoutGate {
    pub fn allows(self, class: ViewportClass) -> bool {
        match self {
            LayoutGate::Any => true,
            LayoutGate::RegularOnly => class == ViewportClass::Regular,
        }
    }
}

/// A timeline driven by a scroll binding
#[derive(Clone, Debug)]
pub struct ScrollScene {
    pub binding: ScrollBinding,
    pub timeline: TimelineSpec,
    pub gate: LayoutGate,
}

/// Declaration of a mountable page section
#[derive(Clone, Debug)]
pub struct SectionSpec {
    pub name: String,
    pub scenes: Vec<ScrollScene>,
    pub reveal_targets: Vec<RevealTarget>,
    pub prefetch: Vec<MediaUri>,
}

impl SectionSpec {
    pub fn new(name: &str) -> Self {
        SectionSpec {
            name: name.to_string(),
            scenes: Vec::new(),
            reveal_targets: Vec::new(),
            prefetch: Vec::new(),
        }
    }

    pub fn scene(self, binding: ScrollBinding, timeline: TimelineSpec) -> Self {
        self.gated_scene(binding, timeline, LayoutGate::Any)
    }

    /// Scene that only runs on regular (desktop) viewports
    pub fn desktop_scene(self, binding: ScrollBinding, timeline: TimelineSpec) -> Self {
        self.gated_scene(binding, timeline, LayoutGate::RegularOnly)
    }

    pub fn gated_scene(mut self, binding: ScrollBinding, timeline: TimelineSpec, gate: LayoutGate) -> Self {
        self.scenes.push(ScrollScene {
            binding,
            timeline,
            gate,
        });
        self
    }

    pub fn reveal_target(mut self, target: RevealTarget) -> Self {
        self.reveal_targets.push(target);
        self
    }

    pub fn prefetch(mut self, uri: MediaUri) -> Self {
        self.prefetch.push(uri);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_gate() {
        assert!(LayoutGate::Any.allows(ViewportClass::Compact));
        assert!(LayoutGate::RegularOnly.allows(ViewportClass::Regular));
        assert!(!LayoutGate::RegularOnly.allows(ViewportClass::Compact));
    }
}
