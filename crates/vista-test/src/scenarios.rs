//! End-to-end scroll scenarios
//!
//! Each scenario drives the product page through a `PageSimulator` and
//! reports the expectations it violated.

use std::sync::Arc;
use std::time::Duration;

use vista_core::{Property, ScaleVariant, SectionId, TriggerId};
use vista_runtime::{presets, Diagnostics, SectionSpec, StageConfig};
use vista_time::{Anchor, PinChange, ScrollBinding};
use vista_timeline::{Action, TimelineBuilder};

use crate::{PageSimulator, DESKTOP, FEATURES_CANVAS, PERFORMANCE, PERFORMANCE_TEXT, TABLET};

// ============================================================================
// RESULT
// ============================================================================

/// Outcome of one scenario
#[derive(Clone, Debug, Default)]
pub struct ScenarioResult {
    pub name: &'static str,
    pub violations: Vec<String>,
}

impl ScenarioResult {
    fn new(name: &'static str) -> Self {
        ScenarioResult {
            name,
            violations: Vec::new(),
        }
    }

    fn check(&mut self, ok: bool, what: impl Into<String>) {
        if !ok {
            self.violations.push(what.into());
        }
    }

    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn features(sim: &mut PageSimulator) -> Option<SectionId> {
    let policy = sim.stage.config().reveal_policy;
    let spec = presets::features_section(FEATURES_CANVAS, policy).ok()?;
    Some(sim.mount(spec))
}

// ============================================================================
// SCENARIOS
// ============================================================================

/// Past the third video: it plays and the first three blocks are in
pub fn scenario_feature_midpoint() -> ScenarioResult {
    let mut result = ScenarioResult::new("feature_midpoint");
    let mut sim = PageSimulator::product(StageConfig::default());
    if features(&mut sim).is_none() {
        result.check(false, "features preset failed to build");
        return result;
    }

    // Content binding spans 450..3600; 0.6 is past the third video
    sim.scroll_to(2340.0);
    sim.settle();

    let texture = sim.stage.snapshot().texture.clone();
    result.check(
        texture.as_str() == "/videos/feature-3.mp4",
        format!("texture is {texture}"),
    );
    result.check(
        sim.media.current() == Some(&texture),
        "media surface not showing the store texture",
    );
    for block in ["box1", "box2", "box3"] {
        let opacity = sim.overlay.property(block, Property::Opacity).unwrap_or(0.0);
        result.check(close(opacity, 1.0), format!("{block} opacity {opacity}"));
        let offset = sim.overlay.property(block, Property::OffsetY).unwrap_or(-1.0);
        result.check(close(offset, 0.0), format!("{block} offset {offset}"));
    }
    for block in ["box4", "box5"] {
        let opacity = sim.overlay.property(block, Property::Opacity).unwrap_or(0.0);
        result.check(close(opacity, 0.0), format!("{block} revealed early"));
    }
    result
}

/// At the top of the page only the first video is set; the first block
/// waits for the user to scroll
pub fn scenario_top_of_page() -> ScenarioResult {
    let mut result = ScenarioResult::new("top_of_page");
    let mut sim = PageSimulator::product(StageConfig::default());
    if features(&mut sim).is_none() {
        result.check(false, "features preset failed to build");
        return result;
    }
    sim.settle();

    for block in ["box1", "box2", "box3", "box4", "box5"] {
        let opacity = sim.overlay.property(block, Property::Opacity);
        result.check(
            opacity.is_some_and(|o| o == 0.0),
            format!("{block} visible at scroll 0: {opacity:?}"),
        );
    }
    result.check(
        sim.stage.snapshot().texture.as_str() == "/videos/feature-1.mp4",
        "first video not set",
    );

    // Content binding spans 450..3600; box1 enters at 2/7
    sim.scroll_to(450.0 + 0.28 * 3150.0);
    sim.settle();
    let opacity = sim.overlay.property("box1", Property::Opacity);
    result.check(
        opacity.is_some_and(|o| o == 0.0),
        format!("box1 entered early: {opacity:?}"),
    );

    sim.scroll_to(450.0 + 0.3 * 3150.0);
    sim.settle();
    let opacity = sim.overlay.property("box1", Property::Opacity);
    result.check(
        opacity.is_some_and(|o| close(o, 1.0)),
        format!("box1 not revealed: {opacity:?}"),
    );
    result
}

/// Switching the model size slides the large model out and the small one in
pub fn scenario_size_switch() -> ScenarioResult {
    let mut result = ScenarioResult::new("size_switch");
    let mut sim = PageSimulator::product(StageConfig::default());
    let (Some(large), Some(small)) = (sim.large(), sim.small()) else {
        result.check(false, "product page has no models");
        return result;
    };

    result.check(sim.select_variant(ScaleVariant::Small), "variant unchanged");
    sim.wait(Duration::from_millis(1_000) + crate::FRAME);

    let large_state = sim.scene.node(large).map(|n| n.position_x);
    let small_state = sim.scene.node(small).map(|n| n.position_x);
    result.check(
        large_state.is_some_and(|x| close(x, 5.0)),
        format!("large at {large_state:?}"),
    );
    result.check(
        small_state.is_some_and(|x| close(x, 0.0)),
        format!("small at {small_state:?}"),
    );
    result.check(
        sim.scene.opacities(large).iter().all(|o| close(*o, 0.0)),
        "large model still visible",
    );
    result.check(
        sim.scene.opacities(small).iter().all(|o| close(*o, 1.0)),
        "small model not fully visible",
    );
    result.check(!sim.is_animating(), "tweens still running");
    result
}

/// Unmounting while pinned releases the pin and silences the section
pub fn scenario_unmount_while_pinned() -> ScenarioResult {
    let mut result = ScenarioResult::new("unmount_while_pinned");
    let mut sim = PageSimulator::product(StageConfig::default());
    let Some(id) = features(&mut sim) else {
        result.check(false, "features preset failed to build");
        return result;
    };

    sim.scroll_to(2000.0);
    sim.settle();
    let pinned = sim
        .stage
        .section_subscriptions(id)
        .into_iter()
        .any(|s| sim.stage.tracker().is_pinned(s));
    result.check(pinned, "canvas not pinned mid-section");

    let report = sim.unmount(id);
    result.check(
        report.is_some_and(|r| r.released_pins == 1 && r.unbound == 2),
        format!("unmount report {report:?}"),
    );
    result.check(!sim.stage.is_mounted(id), "section still mounted");

    let before = sim.overlay.writes_to("box4");
    let directives = sim.follow(&[2600.0, 3200.0, 3600.0]) + sim.settle();
    result.check(directives == 0, format!("{directives} directives after unmount"));
    result.check(
        sim.overlay.writes_to("box4") == before,
        "overlay written after unmount",
    );
    result.check(sim.stage.sequencer().is_empty(), "timelines leaked");
    result
}

/// The image layout only runs on regular viewports
pub fn scenario_layout_gate() -> ScenarioResult {
    let mut result = ScenarioResult::new("layout_gate");
    let mut sim = PageSimulator::product(StageConfig::default());
    let spec = match presets::performance_section(PERFORMANCE, PERFORMANCE_TEXT) {
        Ok(spec) => spec,
        Err(e) => {
            result.check(false, e.to_string());
            return result;
        }
    };
    sim.mount(spec);

    // Layout binding spans 5300..7800
    sim.scroll_to(6550.0);
    sim.settle();
    let written = sim.overlay.writes_to(".p1");
    result.check(written > 0, "layout never wrote .p1");

    sim.resize(TABLET);
    sim.scroll_to(5400.0);
    sim.settle();
    result.check(
        sim.overlay.writes_to(".p1") == written,
        "layout still running on a compact viewport",
    );
    let text = sim.overlay.property(".content p", Property::Opacity);
    result.check(text.is_some_and(|o| close(o, 0.0)), format!("text opacity {text:?}"));

    // Text binding spans 5500..5950
    sim.scroll_to(5950.0);
    let text = sim.overlay.property(".content p", Property::Opacity);
    result.check(text.is_some_and(|o| close(o, 1.0)), format!("text opacity {text:?}"));

    sim.resize(DESKTOP);
    result.check(sim.stage.stats().rebinds == 1, "layout not rebound");
    sim.scroll_to(7000.0);
    sim.settle();
    result.check(
        sim.overlay.writes_to(".p1") > written,
        "layout idle after returning to desktop",
    );
    result
}

/// A texture that fails to load is reported and the store keeps its value
pub fn scenario_media_failure() -> ScenarioResult {
    let mut result = ScenarioResult::new("media_failure");
    let config = StageConfig {
        max_diagnostics: 4,
        ..StageConfig::default()
    };
    let (mut sim, diagnostics) = PageSimulator::product(config).with_config_diagnostics();
    result.check(diagnostics.capacity() == 4, "log not sized by config");
    sim.media.fail_on("/videos/feature-3.mp4");
    if features(&mut sim).is_none() {
        result.check(false, "features preset failed to build");
        return result;
    }

    sim.scroll_to(2340.0);
    sim.settle();

    result.check(
        sim.stage.snapshot().texture.as_str() == "/videos/feature-3.mp4",
        "store dropped the failed texture",
    );
    result.check(sim.stage.stats().media_failures == 1, "failure not counted");
    result.check(
        diagnostics.count_kind("media_load_failure") == 1,
        "failure not recorded",
    );
    // The reveals keep going
    let opacity = sim.overlay.property("box3", Property::Opacity);
    result.check(opacity.is_some_and(|o| close(o, 1.0)), "box3 not revealed");
    result
}

/// A scene bound to a trigger missing from the page is reported and inert
pub fn scenario_invalid_binding() -> ScenarioResult {
    let mut result = ScenarioResult::new("invalid_binding");
    let diagnostics = Diagnostics::new(16);
    let mut sim =
        PageSimulator::product(StageConfig::default()).with_diagnostics(Arc::new(diagnostics.clone()));

    let timeline = match TimelineBuilder::new("orphan")
        .at(0.5, Action::reveal("box1"))
        .build()
    {
        Ok(timeline) => timeline,
        Err(e) => {
            result.check(false, e.to_string());
            return result;
        }
    };
    let binding = ScrollBinding::new(TriggerId::new(99), Anchor::TOP_TOP, Anchor::BOTTOM_TOP);
    sim.mount(SectionSpec::new("orphan").scene(binding, timeline));

    let directives = sim.follow(&[0.0, 1000.0, 5000.0]);
    result.check(sim.stage.stats().invalid_bindings == 1, "binding not flagged");
    result.check(
        diagnostics.count_kind("invalid_binding") == 1,
        "binding not reported",
    );
    result.check(directives == 0, "orphan scene produced directives");
    result
}

/// The canvas leaves the layout: the next resize reports both features
/// bindings and releases the pin
pub fn scenario_trigger_lost_on_resize() -> ScenarioResult {
    let mut result = ScenarioResult::new("trigger_lost_on_resize");
    let diagnostics = Diagnostics::new(16);
    let mut sim =
        PageSimulator::product(StageConfig::default()).with_diagnostics(Arc::new(diagnostics.clone()));
    let Some(id) = features(&mut sim) else {
        result.check(false, "features preset failed to build");
        return result;
    };

    sim.scroll_to(2000.0);
    sim.settle();
    result.check(diagnostics.is_empty(), "diagnostics before the resize");

    sim.layout.remove_region(FEATURES_CANVAS);
    let report = sim.resize(DESKTOP);
    result.check(sim.stage.stats().invalid_bindings == 2, "bindings not flagged");
    result.check(
        diagnostics.count_kind("invalid_binding") == 2,
        "bindings not reported",
    );
    result.check(
        report.pin_changes().any(|(_, change)| change == PinChange::Released),
        "pin kept after the trigger left",
    );
    let resolved = sim
        .stage
        .section_subscriptions(id)
        .into_iter()
        .any(|s| sim.stage.tracker().is_resolved(s));
    result.check(!resolved, "binding still resolved");

    // Failing bindings are reported once
    sim.resize(DESKTOP);
    result.check(diagnostics.len() == 2, "failure reported twice");
    result
}

/// Run every scenario
pub fn run_all() -> Vec<ScenarioResult> {
    vec![
        scenario_top_of_page(),
        scenario_feature_midpoint(),
        scenario_size_switch(),
        scenario_unmount_while_pinned(),
        scenario_layout_gate(),
        scenario_media_failure(),
        scenario_invalid_binding(),
        scenario_trigger_lost_on_resize(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_core::{Axis, TargetId};

    fn assert_passed(result: ScenarioResult) {
        assert!(result.passed(), "{}: {:?}", result.name, result.violations);
    }

    #[test]
    fn test_top_of_page() {
        assert_passed(scenario_top_of_page());
    }

    #[test]
    fn test_feature_midpoint() {
        assert_passed(scenario_feature_midpoint());
    }

    #[test]
    fn test_size_switch() {
        assert_passed(scenario_size_switch());
    }

    #[test]
    fn test_unmount_while_pinned() {
        assert_passed(scenario_unmount_while_pinned());
    }

    #[test]
    fn test_layout_gate() {
        assert_passed(scenario_layout_gate());
    }

    #[test]
    fn test_media_failure() {
        assert_passed(scenario_media_failure());
    }

    #[test]
    fn test_invalid_binding() {
        assert_passed(scenario_invalid_binding());
    }

    #[test]
    fn test_trigger_lost_on_resize() {
        assert_passed(scenario_trigger_lost_on_resize());
    }

    #[test]
    fn test_scroll_back_restores_texture() {
        let mut sim = PageSimulator::product(StageConfig::default());
        features(&mut sim).unwrap();
        sim.scroll_to(3600.0);
        sim.settle();
        assert_eq!(sim.stage.snapshot().texture.as_str(), "/videos/feature-5.mp4");

        sim.scroll_to(0.0);
        sim.settle();
        assert_eq!(sim.stage.snapshot().texture.as_str(), "/videos/feature-1.mp4");
        // Blocks stay in by default
        assert_eq!(sim.overlay.visible().iter().filter(|id| id.starts_with("box")).count(), 5);
    }

    #[test]
    fn test_showcase_tracks_follow_scroll() {
        let mut sim = PageSimulator::product(StageConfig::default());
        let spec = presets::showcase_section(crate::SHOWCASE).unwrap();
        sim.mount(spec);

        // Showcase binding spans 4000..5800, no smoothing
        sim.scroll_to(4000.0);
        assert_eq!(sim.overlay.property(".mask img", Property::Scale), Some(80.0));

        sim.scroll_to(5800.0);
        let scale = sim.overlay.property(".mask img", Property::Scale).unwrap();
        assert!(close(scale, 1.1));
        let opacity = sim.overlay.property(".content", Property::Opacity).unwrap();
        assert!(close(opacity, 1.0));
    }

    #[test]
    fn test_missing_scene_node_is_dropped_quietly() {
        let diagnostics = Diagnostics::new(16);
        let mut sim =
            PageSimulator::product(StageConfig::default()).with_diagnostics(Arc::new(diagnostics.clone()));
        let timeline = TimelineBuilder::new("ghost")
            .at(
                0.5,
                Action::SetRotation {
                    node: TargetId::new("ghost"),
                    axis: Axis::Y,
                    angle: 1.0,
                },
            )
            .build()
            .unwrap();
        let binding = ScrollBinding::new(FEATURES_CANVAS, Anchor::TOP_TOP, Anchor::BOTTOM_TOP);
        sim.mount(SectionSpec::new("ghost").scene(binding, timeline));

        let report = sim.scroll_to(5000.0);
        assert_eq!(report.directives, 1);
        assert_eq!(sim.stage.stats().noops, 1);
        // Missing handles are not diagnostics
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_all_scenarios_pass() {
        assert!(run_all().iter().all(ScenarioResult::passed));
    }
}
