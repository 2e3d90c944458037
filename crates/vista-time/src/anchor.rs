//! Scroll anchors
//!
//! An anchor names the scroll position at which an edge of the trigger region
//! meets an edge of the viewport. `"top center"` is reached when the top of
//! the trigger crosses the vertical middle of the viewport.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{Region, Viewport};

/// Error parsing an anchor description
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnchorParseError {
    #[error("anchor needs two edges, got {0:?}")]
    WrongArity(String),

    #[error("unknown edge {0:?}")]
    UnknownEdge(String),
}

/// Edge of a trigger region or of the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
    /// Fraction of the height from the top, `"80%"` is `Fraction(0.8)`
    Fraction(f64),
}

impl Edge {
    /// Position of the edge as a fraction of the height from the top
    pub fn fraction(self) -> f64 {
        match self {
            Edge::Top => 0.0,
            Edge::Center => 0.5,
            Edge::Bottom => 1.0,
            Edge::Fraction(f) => f,
        }
    }
}

impl FromStr for Edge {
    type Err = AnchorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Edge::Top),
            "center" => Ok(Edge::Center),
            "bottom" => Ok(Edge::Bottom),
            other => other
                .strip_suffix('%')
                .and_then(|n| n.parse::<f64>().ok())
                .filter(|n| n.is_finite())
                .map(|n| Edge::Fraction(n / 100.0))
                .ok_or_else(|| AnchorParseError::UnknownEdge(other.to_string())),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Top => f.write_str("top"),
            Edge::Center => f.write_str("center"),
            Edge::Bottom => f.write_str("bottom"),
            Edge::Fraction(v) => write!(f, "{}%", v * 100.0),
        }
    }
}

/// Meeting point of a trigger edge and a viewport edge
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub trigger: Edge,
    pub viewport: Edge,
}

impl Anchor {
    pub const fn new(trigger: Edge, viewport: Edge) -> Self {
        Anchor { trigger, viewport }
    }

    /// `"top top"`: trigger top reaches the viewport top
    pub const TOP_TOP: Anchor = Anchor::new(Edge::Top, Edge::Top);
    /// `"top center"`: trigger top reaches the viewport middle
    pub const TOP_CENTER: Anchor = Anchor::new(Edge::Top, Edge::Center);
    /// `"top bottom"`: trigger top enters from the viewport bottom
    pub const TOP_BOTTOM: Anchor = Anchor::new(Edge::Top, Edge::Bottom);
    /// `"bottom top"`: trigger bottom leaves through the viewport top
    pub const BOTTOM_TOP: Anchor = Anchor::new(Edge::Bottom, Edge::Top);

    /// Document scroll offset at which this anchor is reached
    pub fn resolve(&self, region: Region, viewport: Viewport) -> f64 {
        let trigger_pos = region.top + region.height * self.trigger.fraction();
        let viewport_pos = viewport.height * self.viewport.fraction();
        trigger_pos - viewport_pos
    }
}

impl FromStr for Anchor {
    type Err = AnchorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(trigger), Some(viewport), None) => Ok(Anchor {
                trigger: trigger.parse()?,
                viewport: viewport.parse()?,
            }),
            _ => Err(AnchorParseError::WrongArity(s.to_string())),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.trigger, self.viewport)
    }
}
