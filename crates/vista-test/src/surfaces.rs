//! In-memory host surfaces
//!
//! Plain data standing in for the renderer, the overlay document and the
//! media pipeline. Every write is counted so tests can assert that nothing
//! reached a target it should not have.

use std::collections::{HashMap, HashSet};

use vista_core::{Arena, Axis, MaterialRef, MediaUri, NodeHandle, Property, TargetId};
use vista_visual::{MediaLoadError, MediaSurface, OverlaySurface, PrefetchRequest, SceneSurface};

/// A node group in the simulated scene
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeState {
    pub name: Option<TargetId>,
    pub position_x: f32,
    /// Rotation per axis, radians
    pub rotation: [f32; 3],
    pub materials: Vec<MaterialRef>,
}

/// A mesh material in the simulated scene
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MaterialState {
    pub opacity: f32,
    pub transparent: bool,
    /// How many times the material was switched to alpha blending
    pub transparent_marks: u32,
}

/// Simulated rendering surface
#[derive(Default)]
pub struct InMemoryScene {
    nodes: Arena<NodeState>,
    materials: Arena<MaterialState>,
    names: HashMap<TargetId, NodeHandle>,
    writes: u64,
}

impl InMemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with `meshes` materials at the given opacity
    pub fn add_node(&mut self, name: Option<&str>, position_x: f32, opacity: f32, meshes: usize) -> NodeHandle {
        let materials: Vec<MaterialRef> = (0..meshes)
            .map(|_| {
                self.materials
                    .insert(MaterialState {
                        opacity,
                        ..Default::default()
                    })
                    .cast()
            })
            .collect();
        let name = name.map(TargetId::new);
        let handle: NodeHandle = self
            .nodes
            .insert(NodeState {
                name: name.clone(),
                position_x,
                rotation: [0.0; 3],
                materials,
            })
            .cast();
        if let Some(name) = name {
            self.names.insert(name, handle);
        }
        handle
    }

    /// Destroy a node and its materials; its handles go stale
    pub fn destroy(&mut self, node: NodeHandle) -> bool {
        let Some(state) = self.nodes.remove(node.cast()) else {
            return false;
        };
        for material in state.materials {
            self.materials.remove(material.cast());
        }
        if let Some(name) = state.name {
            self.names.remove(&name);
        }
        true
    }

    pub fn node(&self, node: NodeHandle) -> Option<&NodeState> {
        self.nodes.get(node.cast())
    }

    pub fn material(&self, material: MaterialRef) -> Option<&MaterialState> {
        self.materials.get(material.cast())
    }

    /// Opacity of every material of a node
    pub fn opacities(&self, node: NodeHandle) -> Vec<f32> {
        self.node(node)
            .map(|n| {
                n.materials
                    .iter()
                    .filter_map(|m| self.material(*m).map(|s| s.opacity))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn rotation(&self, name: &str, axis: Axis) -> Option<f32> {
        let handle = self.names.get(&TargetId::new(name))?;
        self.node(*handle).map(|n| n.rotation[axis_index(axis)])
    }

    /// Total property writes received
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
        Axis::Z => 2,
    }
}

impl SceneSurface for InMemoryScene {
    fn is_alive(&self, node: NodeHandle) -> bool {
        self.nodes.contains(node.cast())
    }

    fn position_x(&self, node: NodeHandle) -> Option<f32> {
        self.node(node).map(|n| n.position_x)
    }

    fn set_position_x(&mut self, node: NodeHandle, x: f32) {
        if let Some(n) = self.nodes.get_mut(node.cast()) {
            n.position_x = x;
            self.writes += 1;
        }
    }

    fn mesh_materials(&self, node: NodeHandle) -> Vec<MaterialRef> {
        self.node(node).map(|n| n.materials.clone()).unwrap_or_default()
    }

    fn opacity(&self, material: MaterialRef) -> Option<f32> {
        self.material(material).map(|m| m.opacity)
    }

    fn set_opacity(&mut self, material: MaterialRef, opacity: f32) {
        if let Some(m) = self.materials.get_mut(material.cast()) {
            m.opacity = opacity;
            self.writes += 1;
        }
    }

    fn mark_transparent(&mut self, material: MaterialRef) {
        if let Some(m) = self.materials.get_mut(material.cast()) {
            m.transparent = true;
            m.transparent_marks += 1;
        }
    }

    fn set_rotation(&mut self, node: NodeHandle, axis: Axis, angle: f32) {
        if let Some(n) = self.nodes.get_mut(node.cast()) {
            n.rotation[axis_index(axis)] = angle;
            self.writes += 1;
        }
    }

    fn resolve(&self, name: &TargetId) -> Option<NodeHandle> {
        self.names.get(name).copied()
    }
}

/// A host element in the simulated overlay
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementState {
    pub opacity: f32,
    pub offset_y: f32,
    pub properties: HashMap<Property, f32>,
    pub writes: u64,
}

/// Simulated overlay document
#[derive(Default)]
pub struct InMemoryOverlay {
    elements: HashMap<TargetId, ElementState>,
}

impl InMemoryOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, id: &str, opacity: f32, offset_y: f32) {
        self.elements.insert(
            TargetId::new(id),
            ElementState {
                opacity,
                offset_y,
                ..Default::default()
            },
        );
    }

    pub fn unmount(&mut self, id: &str) -> bool {
        self.elements.remove(&TargetId::new(id)).is_some()
    }

    pub fn element(&self, id: &str) -> Option<&ElementState> {
        self.elements.get(&TargetId::new(id))
    }

    pub fn property(&self, id: &str, property: Property) -> Option<f32> {
        let element = self.element(id)?;
        match property {
            Property::Opacity => Some(element.opacity),
            Property::OffsetY => Some(element.offset_y),
            other => element.properties.get(&other).copied(),
        }
    }

    pub fn writes_to(&self, id: &str) -> u64 {
        self.element(id).map_or(0, |e| e.writes)
    }

    /// Ids of elements that are currently visible, sorted
    pub fn visible(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .elements
            .iter()
            .filter(|(_, e)| e.opacity > 0.0)
            .map(|(id, _)| id.to_string())
            .collect();
        ids.sort();
        ids
    }
}

impl OverlaySurface for InMemoryOverlay {
    fn is_mounted(&self, target: &TargetId) -> bool {
        self.elements.contains_key(target)
    }

    fn set_opacity(&mut self, target: &TargetId, opacity: f32) {
        if let Some(e) = self.elements.get_mut(target) {
            e.opacity = opacity;
            e.writes += 1;
        }
    }

    fn set_offset_y(&mut self, target: &TargetId, offset_y: f32) {
        if let Some(e) = self.elements.get_mut(target) {
            e.offset_y = offset_y;
            e.writes += 1;
        }
    }

    fn set_property(&mut self, target: &TargetId, property: Property, value: f32) {
        if let Some(e) = self.elements.get_mut(target) {
            e.properties.insert(property, value);
            e.writes += 1;
        }
    }
}

/// Simulated media pipeline
#[derive(Default)]
pub struct InMemoryMedia {
    current: Option<MediaUri>,
    assigned: Vec<MediaUri>,
    prefetched: Vec<PrefetchRequest>,
    failing: HashSet<MediaUri>,
}

impl InMemoryMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later assignment of `uri` fail to decode
    pub fn fail_on(&mut self, uri: &str) {
        self.failing.insert(MediaUri::new(uri));
    }

    /// Texture currently on screen
    pub fn current(&self) -> Option<&MediaUri> {
        self.current.as_ref()
    }

    /// Every successful assignment, in order
    pub fn assigned(&self) -> &[MediaUri] {
        &self.assigned
    }

    pub fn prefetched(&self) -> &[PrefetchRequest] {
        &self.prefetched
    }
}

impl MediaSurface for InMemoryMedia {
    fn assign_texture(&mut self, uri: &MediaUri) -> Result<(), MediaLoadError> {
        if self.failing.contains(uri) {
            return Err(MediaLoadError::new("decode error"));
        }
        self.current = Some(uri.clone());
        self.assigned.push(uri.clone());
        Ok(())
    }

    fn prefetch(&mut self, request: &PrefetchRequest) {
        self.prefetched.push(request.clone());
    }
}
