//! Scroll bindings

use std::time::Duration;

use vista_core::{TriggerId, VistaError, VistaResult};

use crate::{Anchor, Region, Viewport};

/// How raw progress reaches the timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Scrub {
    /// Progress follows the scrollbar directly (`scrub: true`)
    #[default]
    Instant,
    /// Progress catches up with the scrollbar over a time constant (`scrub: 1`)
    Smoothed(Duration),
}

impl Scrub {
    /// Build from a smoothing time in seconds; zero or less is instant
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_finite() && secs > 0.0 {
            Scrub::Smoothed(Duration::from_secs_f64(secs))
        } else {
            Scrub::Instant
        }
    }

    pub fn time_constant(self) -> Option<Duration> {
        match self {
            Scrub::Instant => None,
            Scrub::Smoothed(tau) => Some(tau),
        }
    }
}

/// Declares how raw scroll maps to `[0, 1]` progress for one trigger region
/// Immutable once bound; re-declaring means unbinding and binding again.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollBinding {
    pub trigger: TriggerId,
    pub start: Anchor,
    pub end: Anchor,
    /// Freeze the trigger region in the viewport while progress is interior
    pub pin: bool,
    pub scrub: Scrub,
}

impl ScrollBinding {
    pub fn new(trigger: TriggerId, start: Anchor, end: Anchor) -> Self {
        ScrollBinding {
            trigger,
            start,
            end,
            pin: false,
            scrub: Scrub::Instant,
        }
    }

    pub fn pinned(mut self) -> Self {
        self.pin = true;
        self
    }

    pub fn with_scrub(mut self, scrub: Scrub) -> Self {
        self.scrub = scrub;
        self
    }

    /// Resolve the scroll range `[start, end)` in document offsets
    pub fn resolve(&self, region: Option<Region>, viewport: Viewport) -> VistaResult<(f64, f64)> {
        let region = region.ok_or_else(|| VistaError::InvalidBinding {
            trigger: self.trigger,
            reason: "trigger region absent".to_string(),
        })?;

        let start = self.start.resolve(region, viewport);
        let end = self.end.resolve(region, viewport);

        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(VistaError::InvalidBinding {
                trigger: self.trigger,
                reason: format!(
                    "start anchor '{}' ({start}) must precede end anchor '{}' ({end})",
                    self.start, self.end
                ),
            });
        }

        Ok((start, end))
    }
}
