//! Host surfaces
//!
//! The renderer, the overlay document and the media pipeline belong to the
//! host. Vista only ever talks to them through these traits.

use thiserror::Error;
use vista_core::{Axis, MaterialRef, MediaUri, NodeHandle, Property, TargetId};

/// Rendering surface that owns the 3D scene graph
pub trait SceneSurface {
    /// Whether the node still exists; destroyed nodes must never be written
    fn is_alive(&self, node: NodeHandle) -> bool;

    fn position_x(&self, node: NodeHandle) -> Option<f32>;
    fn set_position_x(&mut self, node: NodeHandle, x: f32);

    /// Materials of every mesh under `node`
    fn mesh_materials(&self, node: NodeHandle) -> Vec<MaterialRef>;

    fn opacity(&self, material: MaterialRef) -> Option<f32>;
    fn set_opacity(&mut self, material: MaterialRef, opacity: f32);

    /// Enable alpha blending on a material
    fn mark_transparent(&mut self, material: MaterialRef);

    fn set_rotation(&mut self, node: NodeHandle, axis: Axis, angle: f32);

    /// Look up a node by its stable name
    fn resolve(&self, name: &TargetId) -> Option<NodeHandle>;
}

/// Host document elements laid over the scene
pub trait OverlaySurface {
    fn is_mounted(&self, target: &TargetId) -> bool;
    fn set_opacity(&mut self, target: &TargetId, opacity: f32);
    fn set_offset_y(&mut self, target: &TargetId, offset_y: f32);
    /// Any other scrubbed property (scale, layout percentages)
    fn set_property(&mut self, target: &TargetId, property: Property, value: f32);
}

/// Media load failure reported by the host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct MediaLoadError {
    pub reason: String,
}

impl MediaLoadError {
    pub fn new(reason: impl Into<String>) -> Self {
        MediaLoadError {
            reason: reason.into(),
        }
    }
}

/// How eagerly the host should buffer a prefetched video
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Preload {
    None,
    Metadata,
    #[default]
    Auto,
}

/// CORS mode for prefetched media
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CrossOrigin {
    #[default]
    Anonymous,
    UseCredentials,
}

/// A hint to start buffering a video before it is assigned
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefetchRequest {
    pub uri: MediaUri,
    pub muted: bool,
    pub plays_inline: bool,
    pub preload: Preload,
    pub cross_origin: CrossOrigin,
}

impl PrefetchRequest {
    /// Muted, inline, fully preloaded, anonymous CORS
    pub fn autoplay(uri: MediaUri) -> Self {
        PrefetchRequest {
            uri,
            muted: true,
            plays_inline: true,
            preload: Preload::Auto,
            cross_origin: CrossOrigin::Anonymous,
        }
    }
}

/// Video texture slot on the screen material
pub trait MediaSurface {
    fn assign_texture(&mut self, uri: &MediaUri) -> Result<(), MediaLoadError>;
    fn prefetch(&mut self, request: &PrefetchRequest);
}
