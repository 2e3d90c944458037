//! Stage - per-frame orchestration
//!
//! Within a frame the order is fixed: the tracker turns scroll into
//! progress, the sequencer turns progress into directives, and the
//! directives are routed to the store, the scene controller or the reveal
//! synchronizer. Tweens are then written through the host surfaces.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info, warn};
use vista_core::{
    ColorToken, Directive, FrameTime, MediaUri, NodeHandle, Progress, Property, ScaleVariant,
    SectionId, Subscription, TargetId, ViewportClass, VistaError, VistaResult,
};
use vista_state::{Listener, ListenerId, StoreAction, VisualState, VisualStore};
use vista_time::{LayoutProvider, PinChange, ProgressUpdate, ScrollTracker, Viewport};
use vista_timeline::{Sequencer, TimelineHandle};
use vista_visual::{
    MediaSurface, OverlaySurface, PrefetchRequest, RevealSynchronizer, SceneSurface,
    SceneTransitionController,
};

use crate::{Diagnostic, DiagnosticSink, Diagnostics, ScrollScene, SectionSpec, StageConfig};

/// The host surfaces a frame writes through
pub struct Surfaces<'a> {
    pub scene: &'a mut dyn SceneSurface,
    pub overlay: &'a mut dyn OverlaySurface,
    pub media: &'a mut dyn MediaSurface,
}

/// Host input for one animation frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub now: FrameTime,
    /// Present when the document scrolled since the last frame
    pub scroll_y: Option<f64>,
}

impl FrameInput {
    pub fn scroll(now: FrameTime, scroll_y: f64) -> Self {
        FrameInput {
            now,
            scroll_y: Some(scroll_y),
        }
    }

    pub fn tick(now: FrameTime) -> Self {
        FrameInput {
            now,
            scroll_y: None,
        }
    }
}

/// What a frame did
#[derive(Clone, Debug, Default)]
pub struct FrameReport {
    pub updates: Vec<ProgressUpdate>,
    pub directives: usize,
    pub scene_writes: usize,
    pub overlay_writes: usize,
}

impl FrameReport {
    pub fn pin_changes(&self) -> impl Iterator<Item = (Subscription, PinChange)> + '_ {
        self.updates
            .iter()
            .filter_map(|u| u.pin_change.map(|c| (u.subscription, c)))
    }
}

/// Result of unmounting a section
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnmountReport {
    /// Scroll bindings removed
    pub unbound: usize,
    /// Pinned regions that were released
    pub released_pins: usize,
}

/// Runtime counters
#[derive(Clone, Debug, Default)]
pub struct RuntimeStats {
    pub frames: u64,
    pub scroll_events: u64,
    pub directives: u64,
    pub store_mutations: u64,
    /// Directives dropped because their target was missing
    pub noops: u64,
    pub media_failures: u64,
    pub invalid_bindings: u64,
    pub timelines_created: u64,
    pub timelines_destroyed: u64,
    /// Gated scenes bound again after the viewport class allowed them
    pub rebinds: u64,
}

struct LiveScene {
    subscription: Subscription,
    timeline: TimelineHandle,
}

struct SceneSlot {
    scene: ScrollScene,
    live: Option<LiveScene>,
}

struct MountedSection {
    name: String,
    scenes: Vec<SceneSlot>,
    reveal_targets: Vec<TargetId>,
}

/// Scroll-synchronized stage
pub struct Stage {
    config: StageConfig,
    tracker: ScrollTracker,
    sequencer: Sequencer,
    store: VisualStore,
    controller: SceneTransitionController,
    reveals: RevealSynchronizer,
    sections: BTreeMap<SectionId, MountedSection>,
    routes: HashMap<Subscription, TimelineHandle>,
    next_section: u64,
    stats: RuntimeStats,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl Stage {
    pub fn new(config: StageConfig, viewport: Viewport) -> Self {
        Stage {
            tracker: ScrollTracker::with_config(viewport, config.tracker_config()),
            sequencer: Sequencer::new(),
            store: VisualStore::new(),
            controller: SceneTransitionController::with_config(config.controller_config()),
            reveals: RevealSynchronizer::with_config(config.reveal_config()),
            sections: BTreeMap::new(),
            routes: HashMap::new(),
            next_section: 1,
            stats: RuntimeStats::default(),
            sink: None,
            config,
        }
    }

    /// Forward degradations to `sink` as well as to the log
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Record degradations into a log bounded by `max_diagnostics`; the
    /// returned log shares its buffer with the stage
    pub fn with_config_diagnostics(self) -> (Self, Diagnostics) {
        let diagnostics = self.config.diagnostics();
        let stage = self.with_diagnostics(Arc::new(diagnostics.clone()));
        (stage, diagnostics)
    }

    // ---- models ----

    /// Register the node group rendering a model variant
    pub fn attach_model(&mut self, variant: ScaleVariant, node: NodeHandle) -> Option<NodeHandle> {
        self.controller.attach(variant, node)
    }

    pub fn detach_model(&mut self, variant: ScaleVariant) -> Option<NodeHandle> {
        self.controller.detach(variant)
    }

    // ---- sections ----

    /// Mount a section: register its reveal targets, start buffering its
    /// media and bind every scene the current viewport class allows
    pub fn mount_section(
        &mut self,
        spec: SectionSpec,
        layout: &dyn LayoutProvider,
        now: FrameTime,
        surfaces: &mut Surfaces<'_>,
    ) -> SectionId {
        let id = SectionId::new(self.next_section);
        self.next_section += 1;

        let SectionSpec {
            name,
            scenes,
            reveal_targets,
            prefetch,
        } = spec;

        let mut targets = Vec::with_capacity(reveal_targets.len());
        for target in reveal_targets {
            targets.push(target.id.clone());
            self.reveals.mount(target);
        }

        self.prefetch(&prefetch, surfaces.media);

        let class = self.tracker.viewport_class();
        let mut slots = Vec::with_capacity(scenes.len());
        for scene in scenes {
            let live = if scene.gate.allows(class) {
                Some(self.bind_scene(&scene, layout, now, surfaces))
            } else {
                debug!(section = %name, ?class, "scene gated off for viewport class");
                None
            };
            slots.push(SceneSlot { scene, live });
        }

        info!(section = %name, ?id, scenes = slots.len(), "section mounted");
        self.sections.insert(
            id,
            MountedSection {
                name,
                scenes: slots,
                reveal_targets: targets,
            },
        );
        id
    }

    /// Unmount a section: unbind synchronously, destroy its timelines and
    /// cancel its reveals. Nothing it declared is written to afterwards.
    pub fn unmount_section(
        &mut self,
        id: SectionId,
        now: FrameTime,
        surfaces: &mut Surfaces<'_>,
    ) -> Option<UnmountReport> {
        let section = self.sections.remove(&id)?;
        let mut report = UnmountReport::default();

        for slot in section.scenes {
            if let Some(live) = slot.live {
                report.unbound += 1;
                if self.teardown_scene(live) {
                    report.released_pins += 1;
                }
            }
        }
        for target in &section.reveal_targets {
            self.reveals.unmount(target);
        }
        if self.config.reset_on_unmount {
            self.dispatch(StoreAction::Reset, now, surfaces);
        }

        info!(section = %section.name, ?id, unbound = report.unbound, "section unmounted");
        Some(report)
    }

    // ---- frame loop ----

    /// Run one animation frame
    pub fn frame(&mut self, input: FrameInput, surfaces: &mut Surfaces<'_>) -> FrameReport {
        self.stats.frames += 1;
        let now = input.now;

        let updates = match input.scroll_y {
            Some(scroll_y) => {
                self.stats.scroll_events += 1;
                self.tracker.on_scroll(scroll_y, now)
            }
            None => self.tracker.tick(now),
        };

        let directives = self.route_updates(&updates, now, surfaces);
        FrameReport {
            directives,
            scene_writes: self.controller.tick(now, surfaces.scene),
            overlay_writes: self.reveals.tick(now, surfaces.overlay),
            updates,
        }
    }

    /// Viewport resize: re-resolve anchors, and when the viewport class
    /// changes tear down or rebind the scenes gated on it
    pub fn resize(
        &mut self,
        viewport: Viewport,
        layout: &dyn LayoutProvider,
        now: FrameTime,
        surfaces: &mut Surfaces<'_>,
    ) -> FrameReport {
        let resize = self.tracker.on_resize(viewport, layout, now);
        for (_, error) in resize.unresolved {
            self.binding_failed(now, error);
        }
        if let Some(class) = resize.class_change {
            info!(?class, width = viewport.width, "viewport class changed");
            self.apply_layout_gates(class, layout, now, surfaces);
        }

        let updates: Vec<ProgressUpdate> = resize
            .updates
            .into_iter()
            .filter(|u| self.routes.contains_key(&u.subscription))
            .collect();
        let directives = self.route_updates(&updates, now, surfaces);
        FrameReport {
            updates,
            directives,
            ..Default::default()
        }
    }

    // ---- store ----

    /// Apply a store action and propagate what changed to the scene and media
    pub fn dispatch(&mut self, action: StoreAction, now: FrameTime, surfaces: &mut Surfaces<'_>) -> bool {
        let before = self.store.snapshot().clone();
        if !self.store.dispatch(action) {
            return false;
        }
        self.stats.store_mutations += 1;

        let after = self.store.snapshot().clone();
        if after.scale_variant != before.scale_variant {
            self.controller
                .transition_to(after.scale_variant, now, surfaces.scene);
        }
        if after.texture != before.texture {
            self.assign_texture(&after.texture, now, surfaces.media);
        }
        true
    }

    /// Size picker
    pub fn select_variant(
        &mut self,
        variant: ScaleVariant,
        now: FrameTime,
        surfaces: &mut Surfaces<'_>,
    ) -> bool {
        self.dispatch(StoreAction::SetScaleVariant(variant), now, surfaces)
    }

    /// Color picker
    pub fn select_color(&mut self, color: ColorToken) -> bool {
        let changed = self.store.dispatch(StoreAction::SetColor(color));
        if changed {
            self.stats.store_mutations += 1;
        }
        changed
    }

    pub fn reset(&mut self, now: FrameTime, surfaces: &mut Surfaces<'_>) -> bool {
        self.dispatch(StoreAction::Reset, now, surfaces)
    }

    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Ask the host to start buffering videos before they are assigned
    pub fn prefetch(&mut self, uris: &[MediaUri], media: &mut dyn MediaSurface) -> usize {
        for uri in uris {
            media.prefetch(&PrefetchRequest::autoplay(uri.clone()));
        }
        if !uris.is_empty() {
            debug!(count = uris.len(), "media prefetch requested");
        }
        uris.len()
    }

    // ---- inspection ----

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &VisualState {
        self.store.snapshot()
    }

    pub fn store(&self) -> &VisualStore {
        &self.store
    }

    pub fn tracker(&self) -> &ScrollTracker {
        &self.tracker
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn controller(&self) -> &SceneTransitionController {
        &self.controller
    }

    pub fn reveals(&self) -> &RevealSynchronizer {
        &self.reveals
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    pub fn viewport_class(&self) -> ViewportClass {
        self.tracker.viewport_class()
    }

    pub fn is_mounted(&self, id: SectionId) -> bool {
        self.sections.contains_key(&id)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Live subscriptions of a section, in scene order
    pub fn section_subscriptions(&self, id: SectionId) -> Vec<Subscription> {
        self.sections
            .get(&id)
            .map(|s| {
                s.scenes
                    .iter()
                    .filter_map(|slot| slot.live.as_ref().map(|l| l.subscription))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Timeline driven by a subscription
    pub fn timeline_for(&self, subscription: Subscription) -> Option<TimelineHandle> {
        self.routes.get(&subscription).copied()
    }

    // ---- internals ----

    fn bind_scene(
        &mut self,
        scene: &ScrollScene,
        layout: &dyn LayoutProvider,
        now: FrameTime,
        surfaces: &mut Surfaces<'_>,
    ) -> LiveScene {
        let bound = self.tracker.bind(scene.binding.clone(), layout);
        let subscription = bound.subscription;
        if let Some(error) = bound.unresolved {
            self.binding_failed(now, error);
        }

        let timeline = self.sequencer.create_timeline(scene.timeline.clone());
        self.stats.timelines_created += 1;
        self.routes.insert(subscription, timeline);

        // Catch up with wherever the page already is
        if let Some(update) = self.tracker.sample(subscription) {
            self.advance_timeline(timeline, update.progress, now, surfaces);
        }

        LiveScene {
            subscription,
            timeline,
        }
    }

    /// Returns whether a pin was released
    fn teardown_scene(&mut self, live: LiveScene) -> bool {
        self.routes.remove(&live.subscription);
        let released = self
            .tracker
            .unbind(live.subscription)
            .is_some_and(|u| u.released_pin);
        if self.sequencer.destroy(live.timeline) {
            self.stats.timelines_destroyed += 1;
        }
        released
    }

    fn apply_layout_gates(
        &mut self,
        class: ViewportClass,
        layout: &dyn LayoutProvider,
        now: FrameTime,
        surfaces: &mut Surfaces<'_>,
    ) {
        let mut teardown = Vec::new();
        let mut rebind = Vec::new();

        for (id, section) in self.sections.iter_mut() {
            for (index, slot) in section.scenes.iter_mut().enumerate() {
                let allowed = slot.scene.gate.allows(class);
                if !allowed {
                    if let Some(live) = slot.live.take() {
                        teardown.push(live);
                    }
                } else if slot.live.is_none() {
                    rebind.push((*id, index, slot.scene.clone()));
                }
            }
        }

        for live in teardown {
            debug!(subscription = ?live.subscription, "gated scene torn down");
            self.teardown_scene(live);
        }
        for (id, index, scene) in rebind {
            let live = self.bind_scene(&scene, layout, now, surfaces);
            self.stats.rebinds += 1;
            match self.sections.get_mut(&id).and_then(|s| s.scenes.get_mut(index)) {
                Some(slot) => slot.live = Some(live),
                None => {
                    self.teardown_scene(live);
                }
            }
        }
    }

    fn route_updates(
        &mut self,
        updates: &[ProgressUpdate],
        now: FrameTime,
        surfaces: &mut Surfaces<'_>,
    ) -> usize {
        let mut directives = 0;
        for update in updates {
            if let Some(change) = update.pin_change {
                debug!(subscription = ?update.subscription, ?change, "pin changed");
            }
            let Some(&timeline) = self.routes.get(&update.subscription) else {
                continue;
            };
            directives += self.advance_timeline(timeline, update.progress, now, surfaces);
        }
        directives
    }

    fn advance_timeline(
        &mut self,
        timeline: TimelineHandle,
        progress: Progress,
        now: FrameTime,
        surfaces: &mut Surfaces<'_>,
    ) -> usize {
        let advance = match self.sequencer.try_advance(timeline, progress) {
            Ok(advance) => advance,
            Err(error) => {
                self.recover(error);
                return 0;
            }
        };
        let count = advance.directives.len();
        for directive in advance.directives {
            self.apply_directive(directive, now, surfaces);
        }
        self.stats.directives += count as u64;
        count
    }

    fn apply_directive(&mut self, directive: Directive, now: FrameTime, surfaces: &mut Surfaces<'_>) {
        match directive {
            Directive::SetTexture(uri) => {
                self.dispatch(StoreAction::SetTexture(uri), now, surfaces);
            }
            Directive::NodeProperty {
                node,
                property,
                value,
            } => {
                if let Err(error) = self.apply_node_property(&node, property, value, surfaces.scene) {
                    self.recover(error);
                }
            }
            overlay => {
                if !self.reveals.apply(&overlay, now, surfaces.overlay) {
                    self.stats.noops += 1;
                }
            }
        }
    }

    fn apply_node_property(
        &mut self,
        node: &TargetId,
        property: Property,
        value: f32,
        scene: &mut dyn SceneSurface,
    ) -> VistaResult<()> {
        let handle = scene
            .resolve(node)
            .filter(|h| scene.is_alive(*h))
            .ok_or_else(|| VistaError::MissingHandle(node.clone()))?;

        match property {
            Property::Rotation(axis) => scene.set_rotation(handle, axis, value),
            Property::Opacity => {
                for material in scene.mesh_materials(handle) {
                    scene.set_opacity(material, value);
                }
            }
            other => {
                debug!(node = node.as_str(), property = ?other, "unsupported scene property");
                self.stats.noops += 1;
            }
        }
        Ok(())
    }

    /// Handle errors are dropped here: logged and counted, never reported
    fn recover(&mut self, error: VistaError) {
        debug!(kind = error.kind(), %error, "directive dropped");
        self.stats.noops += 1;
    }

    fn assign_texture(&mut self, uri: &MediaUri, now: FrameTime, media: &mut dyn MediaSurface) {
        match media.assign_texture(uri) {
            Ok(()) => debug!(%uri, "texture assigned"),
            Err(e) => {
                warn!(%uri, reason = %e, "texture failed to load, store keeps the new value");
                self.stats.media_failures += 1;
                self.report(
                    now,
                    VistaError::MediaLoadFailure {
                        uri: uri.clone(),
                        reason: e.reason,
                    },
                );
            }
        }
    }

    fn binding_failed(&mut self, now: FrameTime, error: VistaError) {
        warn!(%error, "scroll binding failed closed");
        self.stats.invalid_bindings += 1;
        self.report(now, error);
    }

    fn report(&self, now: FrameTime, error: VistaError) {
        if let Some(sink) = &self.sink {
            sink.record(Diagnostic::new(now, error));
        }
    }
}
