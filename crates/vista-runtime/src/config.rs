//! Stage configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vista_core::{Easing, VistaError, VistaResult};
use vista_time::TrackerConfig;
use vista_timeline::RevealPolicy;
use vista_visual::{ControllerConfig, RevealConfig};

use crate::{Diagnostics, DEFAULT_MAX_DIAGNOSTICS};

/// Stage configuration
///
/// Durations are written in milliseconds when serialized. Missing fields
/// take their default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Length of a model variant transition
    #[serde(with = "duration_ms", rename = "transition_duration_ms")]
    pub transition_duration: Duration,
    /// Distance an inactive model variant is parked off center
    pub variant_offset: f32,
    /// Length of an overlay block reveal
    #[serde(with = "duration_ms", rename = "reveal_duration_ms")]
    pub reveal_duration: Duration,
    /// Viewport widths at or below this are compact (CSS pixels)
    pub compact_breakpoint: f64,
    /// Scrubbed progress snaps to raw once closer than this
    pub snap_epsilon: f64,
    /// Whether revealed blocks hide again on scroll-back
    pub reveal_policy: RevealPolicy,
    /// Dispatch `Reset` to the store when a section unmounts
    pub reset_on_unmount: bool,
    /// Bound on buffered diagnostics
    pub max_diagnostics: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            transition_duration: Duration::from_secs(1),
            variant_offset: 5.0,
            reveal_duration: Duration::from_millis(500),
            compact_breakpoint: 1024.0,
            snap_epsilon: 1e-4,
            reveal_policy: RevealPolicy::Monotonic,
            reset_on_unmount: false,
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
        }
    }
}

impl StageConfig {
    /// Configuration for users who asked for reduced motion: transitions
    /// and reveals land on the next frame
    pub fn reduced_motion() -> Self {
        Self {
            transition_duration: Duration::ZERO,
            reveal_duration: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> VistaResult<Self> {
        let config: StageConfig = serde_json::from_str(json)
            .map_err(|e| VistaError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> VistaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| VistaError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> VistaResult<()> {
        if !self.variant_offset.is_finite() || self.variant_offset <= 0.0 {
            return Err(VistaError::InvalidConfig(format!(
                "variant_offset must be positive, got {}",
                self.variant_offset
            )));
        }
        if !self.compact_breakpoint.is_finite() || self.compact_breakpoint < 0.0 {
            return Err(VistaError::InvalidConfig(format!(
                "compact_breakpoint must be non-negative, got {}",
                self.compact_breakpoint
            )));
        }
        if !self.snap_epsilon.is_finite() || self.snap_epsilon <= 0.0 || self.snap_epsilon >= 1.0 {
            return Err(VistaError::InvalidConfig(format!(
                "snap_epsilon must be in (0, 1), got {}",
                self.snap_epsilon
            )));
        }
        if self.max_diagnostics == 0 {
            return Err(VistaError::InvalidConfig(
                "max_diagnostics must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            compact_breakpoint: self.compact_breakpoint,
            snap_epsilon: self.snap_epsilon,
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            duration: self.transition_duration,
            offset: self.variant_offset,
            easing: Easing::Power1Out,
        }
    }

    /// Empty diagnostic log bounded by `max_diagnostics`
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::new(self.max_diagnostics)
    }

    pub fn reveal_config(&self) -> RevealConfig {
        RevealConfig {
            duration: self.reveal_duration,
            easing: Easing::Power1Out,
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
