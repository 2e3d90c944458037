//! Page simulator - a `Stage` driven frame by frame against in-memory surfaces

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use vista_core::{FrameTime, NodeHandle, ScaleVariant, SectionId};
use vista_runtime::{
    DiagnosticSink, Diagnostics, FrameInput, FrameReport, SectionSpec, Stage, StageConfig, Surfaces,
    UnmountReport,
};
use vista_time::{LayoutProvider, Viewport};

use crate::{InMemoryMedia, InMemoryOverlay, InMemoryScene, PageLayout, DESKTOP};

/// Frame interval of the simulated display
pub const FRAME: Duration = Duration::from_millis(16);

/// Upper bound on frames `settle` waits for
pub const MAX_SETTLE_FRAMES: usize = 2_000;

/// Overlay elements of the product page: (selector, opacity, offset_y)
const PRODUCT_OVERLAY: [(&str, f32, f32); 15] = [
    ("box1", 0.0, 40.0),
    ("box2", 0.0, 40.0),
    ("box3", 0.0, 40.0),
    ("box4", 0.0, 40.0),
    ("box5", 0.0, 40.0),
    (".mask img", 1.0, 0.0),
    (".content", 0.0, 40.0),
    (".content p", 0.0, 10.0),
    (".p1", 1.0, 0.0),
    (".p2", 1.0, 0.0),
    (".p3", 1.0, 0.0),
    (".p4", 1.0, 0.0),
    (".p5", 1.0, 0.0),
    (".p6", 1.0, 0.0),
    (".p7", 1.0, 0.0),
];

macro_rules! surfaces {
    ($sim:expr) => {
        &mut Surfaces {
            scene: &mut $sim.scene,
            overlay: &mut $sim.overlay,
            media: &mut $sim.media,
        }
    };
}

/// Simulated page
pub struct PageSimulator {
    pub stage: Stage,
    pub layout: PageLayout,
    pub scene: InMemoryScene,
    pub overlay: InMemoryOverlay,
    pub media: InMemoryMedia,
    now: FrameTime,
    large: Option<NodeHandle>,
    small: Option<NodeHandle>,
}

impl PageSimulator {
    /// Empty page: no scene nodes, no overlay elements
    pub fn new(config: StageConfig, layout: PageLayout) -> Self {
        PageSimulator {
            stage: Stage::new(config, layout.viewport()),
            layout,
            scene: InMemoryScene::new(),
            overlay: InMemoryOverlay::new(),
            media: InMemoryMedia::new(),
            now: FrameTime::ZERO,
            large: None,
            small: None,
        }
    }

    /// The product page on a desktop viewport, both models attached with
    /// the large one active
    pub fn product(config: StageConfig) -> Self {
        Self::product_with_viewport(config, DESKTOP)
    }

    pub fn product_with_viewport(config: StageConfig, viewport: Viewport) -> Self {
        let mut sim = Self::new(config, PageLayout::product_page(viewport));

        sim.scene.add_node(Some("macbook"), 0.0, 1.0, 1);
        let large = sim.scene.add_node(Some("macbook-16"), 0.0, 1.0, 3);
        let small = sim.scene.add_node(Some("macbook-14"), -5.0, 0.0, 2);
        sim.stage.attach_model(ScaleVariant::Large, large);
        sim.stage.attach_model(ScaleVariant::Small, small);
        sim.large = Some(large);
        sim.small = Some(small);

        for (id, opacity, offset_y) in PRODUCT_OVERLAY {
            sim.overlay.mount(id, opacity, offset_y);
        }
        sim
    }

    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.stage = self.stage.with_diagnostics(sink);
        self
    }

    /// Attach a diagnostic log sized by the stage configuration
    pub fn with_config_diagnostics(mut self) -> (Self, Diagnostics) {
        let (stage, diagnostics) = self.stage.with_config_diagnostics();
        self.stage = stage;
        (self, diagnostics)
    }

    pub fn now(&self) -> FrameTime {
        self.now
    }

    pub fn large(&self) -> Option<NodeHandle> {
        self.large
    }

    pub fn small(&self) -> Option<NodeHandle> {
        self.small
    }

    pub fn mount(&mut self, spec: SectionSpec) -> SectionId {
        self.stage
            .mount_section(spec, &self.layout, self.now, surfaces!(self))
    }

    pub fn unmount(&mut self, id: SectionId) -> Option<UnmountReport> {
        self.stage.unmount_section(id, self.now, surfaces!(self))
    }

    /// One frame with a scroll event
    pub fn scroll_to(&mut self, scroll_y: f64) -> FrameReport {
        self.now = self.now + FRAME;
        self.stage
            .frame(FrameInput::scroll(self.now, scroll_y), surfaces!(self))
    }

    /// One frame without scrolling
    pub fn step(&mut self) -> FrameReport {
        self.now = self.now + FRAME;
        self.stage.frame(FrameInput::tick(self.now), surfaces!(self))
    }

    /// Scroll through every position of `path`, one frame each; returns
    /// the number of directives produced
    pub fn follow(&mut self, path: &[f64]) -> usize {
        path.iter().map(|y| self.scroll_to(*y).directives).sum()
    }

    /// Tick until scrub smoothing and every tween have settled; returns the
    /// number of directives produced on the way
    pub fn settle(&mut self) -> usize {
        let mut directives = 0;
        for _ in 0..MAX_SETTLE_FRAMES {
            let report = self.step();
            directives += report.directives;
            if report.updates.is_empty() && !self.is_animating() {
                return directives;
            }
        }
        warn!(frames = MAX_SETTLE_FRAMES, "page did not settle");
        directives
    }

    /// Tick for at least `duration`
    pub fn wait(&mut self, duration: Duration) {
        let until = self.now + duration;
        while self.now < until {
            self.step();
        }
    }

    pub fn is_animating(&self) -> bool {
        self.stage.controller().is_animating() || self.stage.reveals().is_animating()
    }

    pub fn resize(&mut self, viewport: Viewport) -> FrameReport {
        self.layout.set_viewport(viewport);
        self.stage
            .resize(viewport, &self.layout, self.now, surfaces!(self))
    }

    pub fn select_variant(&mut self, variant: ScaleVariant) -> bool {
        self.stage.select_variant(variant, self.now, surfaces!(self))
    }

    pub fn reset(&mut self) -> bool {
        self.stage.reset(self.now, surfaces!(self))
    }
}
