//! Simulated page layout

use std::collections::HashMap;

use vista_core::TriggerId;
use vista_time::{LayoutProvider, Region, Viewport};

/// `#f-canvas`, the features section canvas
pub const FEATURES_CANVAS: TriggerId = TriggerId(1);
/// `#showcase`
pub const SHOWCASE: TriggerId = TriggerId(2);
/// `#performance`
pub const PERFORMANCE: TriggerId = TriggerId(3);
/// `.content p` inside the performance section
pub const PERFORMANCE_TEXT: TriggerId = TriggerId(4);

pub const DESKTOP: Viewport = Viewport {
    width: 1440.0,
    height: 900.0,
};
pub const TABLET: Viewport = Viewport {
    width: 800.0,
    height: 900.0,
};

/// Document regions keyed by trigger, plus the viewport
#[derive(Clone, Debug)]
pub struct PageLayout {
    viewport: Viewport,
    regions: HashMap<TriggerId, Region>,
}

impl PageLayout {
    pub fn new(viewport: Viewport) -> Self {
        PageLayout {
            viewport,
            regions: HashMap::new(),
        }
    }

    /// The product page: hero, features, showcase, performance
    pub fn product_page(viewport: Viewport) -> Self {
        PageLayout::new(viewport)
            .with_region(FEATURES_CANVAS, Region::new(900.0, 2700.0))
            .with_region(SHOWCASE, Region::new(4000.0, 1800.0))
            .with_region(PERFORMANCE, Region::new(6200.0, 1600.0))
            .with_region(PERFORMANCE_TEXT, Region::new(6400.0, 300.0))
    }

    pub fn with_region(mut self, trigger: TriggerId, region: Region) -> Self {
        self.regions.insert(trigger, region);
        self
    }

    pub fn set_region(&mut self, trigger: TriggerId, region: Region) {
        self.regions.insert(trigger, region);
    }

    pub fn remove_region(&mut self, trigger: TriggerId) -> Option<Region> {
        self.regions.remove(&trigger)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

impl LayoutProvider for PageLayout {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn region(&self, trigger: TriggerId) -> Option<Region> {
        self.regions.get(&trigger).copied()
    }
}
