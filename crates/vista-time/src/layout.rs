//! Layout collaborator
//!
//! Trigger regions are measured by the host. Positions are document
//! coordinates in CSS pixels, growing downward.

use vista_core::TriggerId;

/// Viewport size in CSS pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(1440.0, 900.0)
    }
}

/// Vertical extent of a trigger region in the document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub top: f64,
    pub height: f64,
}

impl Region {
    pub fn new(top: f64, height: f64) -> Self {
        Region { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Measures trigger regions for the tracker
pub trait LayoutProvider {
    /// Current viewport size
    fn viewport(&self) -> Viewport;

    /// Region of a trigger, `None` if the element is absent
    fn region(&self, trigger: TriggerId) -> Option<Region>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_bottom() {
        let r = Region::new(100.0, 250.0);
        assert_eq!(r.bottom(), 350.0);
    }
}
