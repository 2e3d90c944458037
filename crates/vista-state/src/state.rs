//! Visual state and the actions that mutate it

use vista_core::{ColorToken, MediaUri, ScaleVariant};

/// Product color the page opens with
pub const DEFAULT_COLOR: &str = "#2e2c2e";
/// Screen texture the page opens with
pub const DEFAULT_TEXTURE: &str = "/videos/feature-1.mp4";

/// The shared visual state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisualState {
    pub color: ColorToken,
    pub scale_variant: ScaleVariant,
    pub texture: MediaUri,
}

impl Default for VisualState {
    fn default() -> Self {
        VisualState {
            color: ColorToken::new(DEFAULT_COLOR),
            scale_variant: ScaleVariant::Large,
            texture: MediaUri::new(DEFAULT_TEXTURE),
        }
    }
}

/// Every way the visual state can change
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreAction {
    SetColor(ColorToken),
    SetScaleVariant(ScaleVariant),
    SetTexture(MediaUri),
    /// Back to the defaults
    Reset,
}

impl StoreAction {
    pub fn name(&self) -> &'static str {
        match self {
            StoreAction::SetColor(_) => "set_color",
            StoreAction::SetScaleVariant(_) => "set_scale_variant",
            StoreAction::SetTexture(_) => "set_texture",
            StoreAction::Reset => "reset",
        }
    }
}

impl VisualState {
    /// Apply an action in place; returns whether anything changed
    pub fn apply(&mut self, action: &StoreAction) -> bool {
        match action {
            StoreAction::SetColor(color) => replace(&mut self.color, color),
            StoreAction::SetScaleVariant(variant) => replace(&mut self.scale_variant, variant),
            StoreAction::SetTexture(texture) => replace(&mut self.texture, texture),
            StoreAction::Reset => {
                let defaults = VisualState::default();
                let changed = *self != defaults;
                *self = defaults;
                changed
            }
        }
    }
}

fn replace<T: Clone + PartialEq>(slot: &mut T, value: &T) -> bool {
    if slot == value {
        return false;
    }
    *slot = value.clone();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = VisualState::default();
        assert_eq!(state.color.as_str(), "#2e2c2e");
        assert_eq!(state.scale_variant, ScaleVariant::Large);
        assert_eq!(state.texture.as_str(), "/videos/feature-1.mp4");
    }

    #[test]
    fn test_apply_reports_change() {
        let mut state = VisualState::default();
        assert!(state.apply(&StoreAction::SetScaleVariant(ScaleVariant::Small)));
        assert!(!state.apply(&StoreAction::SetScaleVariant(ScaleVariant::Small)));
        assert!(state.apply(&StoreAction::Reset));
        assert!(!state.apply(&StoreAction::Reset));
        assert_eq!(state, VisualState::default());
    }
}
