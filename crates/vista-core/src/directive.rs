//! Directives
//!
//! A directive is a decision about what should change, produced by the
//! sequencer and consumed by the store, the scene controller or the reveal
//! synchronizer. Producing a directive never touches the rendering surface.

use crate::{MediaUri, Property, TargetId};

/// A single visual change decided by a timeline
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// Assign a video to the screen texture slot
    SetTexture(MediaUri),
    /// Reveal (or hide) an overlay block
    /// `offset_y: None` means the target's own initial offset
    Reveal {
        target: TargetId,
        opacity: f32,
        offset_y: Option<f32>,
    },
    /// Set a property of a named scene node
    NodeProperty {
        node: TargetId,
        property: Property,
        value: f32,
    },
    /// Set a property of an overlay element directly (scrubbed)
    OverlayProperty {
        target: TargetId,
        property: Property,
        value: f32,
    },
}
