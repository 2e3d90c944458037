//! Value types carried by the visual state and directives

use std::fmt;
use std::sync::Arc;

/// Path of a video asset assigned to a texture slot (`/videos/feature-2.mp4`)
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MediaUri(Arc<str>);

impl MediaUri {
    pub fn new(uri: &str) -> Self {
        MediaUri(Arc::from(uri))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MediaUri {
    fn from(uri: &str) -> Self {
        MediaUri::new(uri)
    }
}

impl fmt::Debug for MediaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Media({})", self.0)
    }
}

impl fmt::Display for MediaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product color token (`#2e2c2e`)
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ColorToken(Arc<str>);

impl ColorToken {
    pub fn new(token: &str) -> Self {
        ColorToken(Arc::from(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColorToken {
    fn from(token: &str) -> Self {
        ColorToken::new(token)
    }
}

impl fmt::Debug for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.0)
    }
}

/// Viewport class reported by the media-query collaborator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ViewportClass {
    /// Phones and tablets
    Compact,
    #[default]
    Regular,
}

impl ViewportClass {
    /// Classify a viewport width; widths at or below the breakpoint are compact
    pub fn classify(width: f64, breakpoint: f64) -> Self {
        if width <= breakpoint {
            ViewportClass::Compact
        } else {
            ViewportClass::Regular
        }
    }

    pub fn is_compact(self) -> bool {
        self == ViewportClass::Compact
    }
}

/// Which of the two mutually exclusive model variants is chosen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ScaleVariant {
    #[default]
    Large,
    Small,
}

impl ScaleVariant {
    pub const ALL: [ScaleVariant; 2] = [ScaleVariant::Large, ScaleVariant::Small];

    /// The variant that is not `self`
    pub fn other(self) -> Self {
        match self {
            ScaleVariant::Large => ScaleVariant::Small,
            ScaleVariant::Small => ScaleVariant::Large,
        }
    }

    /// Mesh scale the rendering surface applies for this variant
    pub fn model_scale(self, class: ViewportClass) -> f32 {
        match (self, class) {
            (ScaleVariant::Large, ViewportClass::Regular) => 0.08,
            (ScaleVariant::Large, ViewportClass::Compact) => 0.05,
            (ScaleVariant::Small, ViewportClass::Regular) => 0.06,
            (ScaleVariant::Small, ViewportClass::Compact) => 0.03,
        }
    }

    /// Recover the variant from a raw model scale (size picker values)
    pub fn from_model_scale(scale: f32) -> Option<Self> {
        const EPS: f32 = 1e-4;
        [ViewportClass::Regular, ViewportClass::Compact]
            .iter()
            .flat_map(|class| ScaleVariant::ALL.iter().map(move |v| (*v, *class)))
            .find(|(v, class)| (v.model_scale(*class) - scale).abs() < EPS)
            .map(|(v, _)| v)
    }

    /// Side the variant leaves the stage towards when it becomes inactive
    /// (+1 right, -1 left)
    pub fn exit_side(self) -> f32 {
        match self {
            ScaleVariant::Large => 1.0,
            ScaleVariant::Small => -1.0,
        }
    }
}

/// Rotation axis of a scene node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Animatable property of a scene node or overlay element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Opacity,
    /// Vertical offset in CSS pixels
    OffsetY,
    /// Uniform scale
    Scale,
    /// Layout offsets in percent of the containing block
    Left,
    Right,
    Bottom,
    /// Rotation in radians
    Rotation(Axis),
}
