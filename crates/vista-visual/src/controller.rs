//! Scene Transition Controller
//!
//! Two model variants share the stage and exactly one of them is active.
//! Selecting a variant slides the active one to the center at full opacity
//! and pushes the other one off to its exit side at zero opacity; both
//! halves run in parallel over the same duration.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;
use vista_core::{Easing, FrameTime, MaterialRef, NodeHandle, ScaleVariant};

use crate::{SceneSurface, Tween, TweenSet};

/// Controller configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerConfig {
    /// Length of one transition
    pub duration: Duration,
    /// Horizontal distance an inactive variant is parked at
    pub offset: f32,
    pub easing: Easing,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(1),
            offset: 5.0,
            easing: Easing::Power1Out,
        }
    }
}

/// Where a variant is headed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VariantTarget {
    pub position_x: f32,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum SceneKey {
    PositionX(NodeHandle),
    Opacity(NodeHandle, MaterialRef),
}

impl SceneKey {
    fn node(&self) -> NodeHandle {
        match self {
            SceneKey::PositionX(node) | SceneKey::Opacity(node, _) => *node,
        }
    }
}

fn slot(variant: ScaleVariant) -> usize {
    match variant {
        ScaleVariant::Large => 0,
        ScaleVariant::Small => 1,
    }
}

/// Two-state machine over the active model variant
#[derive(Debug)]
pub struct SceneTransitionController {
    config: ControllerConfig,
    active: ScaleVariant,
    nodes: [Option<NodeHandle>; 2],
    /// Materials already switched to alpha blending, with their owner
    transparent: HashMap<MaterialRef, NodeHandle>,
    tweens: TweenSet<SceneKey>,
}

impl SceneTransitionController {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        SceneTransitionController {
            config,
            active: ScaleVariant::default(),
            nodes: [None, None],
            transparent: HashMap::new(),
            tweens: TweenSet::new(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Register the node group rendering `variant`; returns the one it replaces
    pub fn attach(&mut self, variant: ScaleVariant, node: NodeHandle) -> Option<NodeHandle> {
        let previous = self.detach(variant);
        self.nodes[slot(variant)] = Some(node);
        debug!(?variant, ?node, "model variant attached");
        previous
    }

    /// Forget the node for `variant` and cancel its tweens
    pub fn detach(&mut self, variant: ScaleVariant) -> Option<NodeHandle> {
        let node = self.nodes[slot(variant)].take()?;
        self.forget(node);
        Some(node)
    }

    pub fn handle(&self, variant: ScaleVariant) -> Option<NodeHandle> {
        self.nodes[slot(variant)]
    }

    pub fn active(&self) -> ScaleVariant {
        self.active
    }

    /// Resting pose of `variant` given the current active variant
    pub fn target_for(&self, variant: ScaleVariant) -> VariantTarget {
        if variant == self.active {
            VariantTarget {
                position_x: 0.0,
                opacity: 1.0,
            }
        } else {
            VariantTarget {
                position_x: variant.exit_side() * self.config.offset,
                opacity: 0.0,
            }
        }
    }

    pub fn targets(&self) -> [(ScaleVariant, VariantTarget); 2] {
        ScaleVariant::ALL.map(|v| (v, self.target_for(v)))
    }

    /// Make `variant` the active one and start both halves of the transition
    ///
    /// Tweens start from the values the surface currently reports, so a
    /// transition that interrupts another continues from where it was.
    /// Returns the number of tweens started.
    pub fn transition_to(
        &mut self,
        variant: ScaleVariant,
        now: FrameTime,
        surface: &mut dyn SceneSurface,
    ) -> usize {
        self.active = variant;
        let mut started = 0;

        for v in ScaleVariant::ALL {
            let Some(node) = self.nodes[slot(v)] else {
                debug!(variant = ?v, "no model attached, transition skipped");
                continue;
            };
            if !surface.is_alive(node) {
                debug!(variant = ?v, ?node, "model destroyed, transition skipped");
                self.nodes[slot(v)] = None;
                self.forget(node);
                continue;
            }

            let target = self.target_for(v);
            let from_x = surface.position_x(node).unwrap_or(target.position_x);
            let tween = self.tween(from_x, target.position_x, now);
            self.tweens.start(SceneKey::PositionX(node), tween);
            started += 1;

            for material in surface.mesh_materials(node) {
                if self.transparent.insert(material, node).is_none() {
                    surface.mark_transparent(material);
                }
                let from = surface.opacity(material).unwrap_or(target.opacity);
                let tween = self.tween(from, target.opacity, now);
                self.tweens.start(SceneKey::Opacity(node, material), tween);
                started += 1;
            }
        }

        debug!(?variant, tweens = started, "variant transition started");
        started
    }

    /// Write the current tween values; returns the number of writes
    pub fn tick(&mut self, now: FrameTime, surface: &mut dyn SceneSurface) -> usize {
        let mut written = 0;
        let mut dead: Vec<NodeHandle> = Vec::new();

        for (key, value) in self.tweens.tick(now) {
            let node = key.node();
            if dead.contains(&node) {
                continue;
            }
            if !surface.is_alive(node) {
                dead.push(node);
                continue;
            }
            match key {
                SceneKey::PositionX(node) => surface.set_position_x(node, value),
                SceneKey::Opacity(_, material) => surface.set_opacity(material, value),
            }
            written += 1;
        }

        for node in dead {
            debug!(?node, "model destroyed mid-transition, tweens cancelled");
            for entry in self.nodes.iter_mut() {
                if *entry == Some(node) {
                    *entry = None;
                }
            }
            self.forget(node);
        }
        written
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    /// Drop every in-flight tween, leaving nodes where they are
    pub fn cancel_all(&mut self) {
        self.tweens.clear();
    }

    fn tween(&self, from: f32, to: f32, now: FrameTime) -> Tween {
        Tween::new(from, to, now, self.config.duration).eased(self.config.easing)
    }

    fn forget(&mut self, node: NodeHandle) {
        self.tweens.cancel_where(|k| k.node() == node);
        self.transparent.retain(|_, owner| *owner != node);
    }
}

impl Default for SceneTransitionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_core::{Axis, TargetId};

    #[derive(Default)]
    struct MockScene {
        nodes: HashMap<NodeHandle, (f32, Vec<MaterialRef>)>,
        materials: HashMap<MaterialRef, (f32, u32)>,
        next: u32,
    }

    impl MockScene {
        fn add_node(&mut self, x: f32, opacity: f32, meshes: usize) -> NodeHandle {
            let node = NodeHandle::from_raw(self.next, 0);
            self.next += 1;
            let mut mats = Vec::new();
            for _ in 0..meshes {
                let m = MaterialRef::from_raw(self.next, 0);
                self.next += 1;
                self.materials.insert(m, (opacity, 0));
                mats.push(m);
            }
            self.nodes.insert(node, (x, mats));
            node
        }

        fn x(&self, node: NodeHandle) -> f32 {
            self.nodes[&node].0
        }

        fn opacities(&self, node: NodeHandle) -> Vec<f32> {
            self.nodes[&node]
                .1
                .iter()
                .map(|m| self.materials[m].0)
                .collect()
        }
    }

    impl SceneSurface for MockScene {
        fn is_alive(&self, node: NodeHandle) -> bool {
            self.nodes.contains_key(&node)
        }
        fn position_x(&self, node: NodeHandle) -> Option<f32> {
            self.nodes.get(&node).map(|n| n.0)
        }
        fn set_position_x(&mut self, node: NodeHandle, x: f32) {
            if let Some(n) = self.nodes.get_mut(&node) {
                n.0 = x;
            }
        }
        fn mesh_materials(&self, node: NodeHandle) -> Vec<MaterialRef> {
            self.nodes.get(&node).map(|n| n.1.clone()).unwrap_or_default()
        }
        fn opacity(&self, material: MaterialRef) -> Option<f32> {
            self.materials.get(&material).map(|m| m.0)
        }
        fn set_opacity(&mut self, material: MaterialRef, opacity: f32) {
            if let Some(m) = self.materials.get_mut(&material) {
                m.0 = opacity;
            }
        }
        fn mark_transparent(&mut self, material: MaterialRef) {
            if let Some(m) = self.materials.get_mut(&material) {
                m.1 += 1;
            }
        }
        fn set_rotation(&mut self, _node: NodeHandle, _axis: Axis, _angle: f32) {}
        fn resolve(&self, _name: &TargetId) -> Option<NodeHandle> {
            None
        }
    }

    fn ms(v: u64) -> FrameTime {
        FrameTime::from_millis(v)
    }

    fn stage() -> (MockScene, SceneTransitionController, NodeHandle, NodeHandle) {
        let mut scene = MockScene::default();
        let large = scene.add_node(0.0, 1.0, 3);
        let small = scene.add_node(-5.0, 0.0, 2);
        let mut ctl = SceneTransitionController::new();
        ctl.attach(ScaleVariant::Large, large);
        ctl.attach(ScaleVariant::Small, small);
        (scene, ctl, large, small)
    }

    #[test]
    fn test_transition_completes_after_duration() {
        let (mut scene, mut ctl, large, small) = stage();

        ctl.transition_to(ScaleVariant::Small, ms(0), &mut scene);
        ctl.tick(ms(400), &mut scene);
        ctl.tick(ms(1000), &mut scene);

        assert_eq!(scene.x(large), 5.0);
        assert!(scene.opacities(large).iter().all(|o| *o == 0.0));
        assert_eq!(scene.x(small), 0.0);
        assert!(scene.opacities(small).iter().all(|o| *o == 1.0));
        assert!(!ctl.is_animating());
    }

    #[test]
    fn test_targets_are_mutually_exclusive() {
        let (mut scene, mut ctl, _, _) = stage();
        for (i, v) in [ScaleVariant::Small, ScaleVariant::Large, ScaleVariant::Small]
            .into_iter()
            .enumerate()
        {
            ctl.transition_to(v, ms(i as u64 * 100), &mut scene);
            let targets = ctl.targets();
            let shown = targets.iter().filter(|(_, t)| t.opacity == 1.0).count();
            assert_eq!(shown, 1);
            let (_, active) = targets.iter().find(|(tv, _)| *tv == v).unwrap();
            assert_eq!(active.position_x, 0.0);
            let (other, parked) = targets.iter().find(|(tv, _)| *tv != v).unwrap();
            assert_eq!(parked.position_x, other.exit_side() * 5.0);
            assert_eq!(parked.opacity, 0.0);
        }
    }

    #[test]
    fn test_retrigger_keeps_one_tween_per_property() {
        let (mut scene, mut ctl, large, small) = stage();
        let per_transition = ctl.transition_to(ScaleVariant::Small, ms(0), &mut scene);
        assert_eq!(per_transition, 2 + 3 + 2);

        ctl.tick(ms(500), &mut scene);
        let x_mid = scene.x(large);
        assert!(x_mid > 0.0 && x_mid < 5.0);

        ctl.transition_to(ScaleVariant::Large, ms(500), &mut scene);
        assert_eq!(ctl.tween_count(), per_transition);

        // The reversal starts from the interrupted position
        ctl.tick(ms(500), &mut scene);
        assert_eq!(scene.x(large), x_mid);

        ctl.tick(ms(1500), &mut scene);
        assert_eq!(scene.x(large), 0.0);
        assert_eq!(scene.x(small), -5.0);
        assert!(scene.opacities(large).iter().all(|o| *o == 1.0));
    }

    #[test]
    fn test_materials_marked_transparent_once() {
        let (mut scene, mut ctl, _, _) = stage();
        ctl.transition_to(ScaleVariant::Small, ms(0), &mut scene);
        ctl.transition_to(ScaleVariant::Large, ms(10), &mut scene);
        ctl.transition_to(ScaleVariant::Small, ms(20), &mut scene);
        assert!(scene.materials.values().all(|(_, marks)| *marks == 1));
    }

    #[test]
    fn test_missing_handle_is_noop() {
        let mut scene = MockScene::default();
        let large = scene.add_node(0.0, 1.0, 1);
        let mut ctl = SceneTransitionController::new();
        ctl.attach(ScaleVariant::Large, large);

        let started = ctl.transition_to(ScaleVariant::Small, ms(0), &mut scene);
        assert_eq!(started, 2);
        ctl.tick(ms(1000), &mut scene);
        assert_eq!(scene.x(large), 5.0);
        assert_eq!(ctl.active(), ScaleVariant::Small);
    }

    #[test]
    fn test_destroyed_handle_gets_no_late_writes() {
        let (mut scene, mut ctl, large, small) = stage();
        ctl.transition_to(ScaleVariant::Small, ms(0), &mut scene);
        ctl.tick(ms(300), &mut scene);

        let (_, mats) = scene.nodes.remove(&small).unwrap();
        let frozen: Vec<f32> = mats.iter().map(|m| scene.materials[m].0).collect();

        ctl.tick(ms(600), &mut scene);
        ctl.tick(ms(1000), &mut scene);

        let after: Vec<f32> = mats.iter().map(|m| scene.materials[m].0).collect();
        assert_eq!(frozen, after);
        assert_eq!(ctl.handle(ScaleVariant::Small), None);
        assert_eq!(scene.x(large), 5.0);
        assert!(!ctl.is_animating());
    }

    #[test]
    fn test_detach_cancels_tweens() {
        let (mut scene, mut ctl, _, small) = stage();
        ctl.transition_to(ScaleVariant::Small, ms(0), &mut scene);
        assert_eq!(ctl.detach(ScaleVariant::Small), Some(small));
        assert_eq!(ctl.tween_count(), 1 + 3);
    }
}
