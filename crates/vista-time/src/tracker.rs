//! Viewport Scroll Tracker - maps scroll position to per-binding progress

use std::collections::BTreeMap;

use tracing::debug;
use vista_core::{
    Direction, FrameTime, Progress, Subscription, TriggerId, ViewportClass, VistaError, VistaResult,
};

use crate::{LayoutProvider, ProgressFilter, ScrollBinding, Viewport};

/// Tracker configuration
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    /// Widths at or below this are the compact class (CSS pixels)
    pub compact_breakpoint: f64,
    /// Smoothed progress snaps to raw once closer than this
    pub snap_epsilon: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            compact_breakpoint: 1024.0,
            snap_epsilon: 1e-4,
        }
    }
}

/// Pin transition reported alongside a progress update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinChange {
    Engaged,
    Released,
}

/// Progress emitted to a subscriber
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressUpdate {
    pub subscription: Subscription,
    pub trigger: TriggerId,
    pub progress: Progress,
    pub direction: Direction,
    pub pinned: bool,
    pub pin_change: Option<PinChange>,
}

/// Result of binding a scroll binding
#[derive(Clone, Debug, PartialEq)]
pub struct Bound {
    pub subscription: Subscription,
    /// Why the binding failed to resolve; it fails closed until a resize
    /// resolves it
    pub unresolved: Option<VistaError>,
}

/// Result of unbinding a subscription
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unbound {
    pub subscription: Subscription,
    /// The trigger region was pinned and has been released
    pub released_pin: bool,
}

/// Result of a resize
#[derive(Clone, Debug, Default)]
pub struct ResizeReport {
    /// Set when the viewport crossed the compact breakpoint
    pub class_change: Option<ViewportClass>,
    pub updates: Vec<ProgressUpdate>,
    /// Bindings that resolved before the resize and no longer do
    pub unresolved: Vec<(Subscription, VistaError)>,
}

/// Live binding state
struct BoundScroll {
    binding: ScrollBinding,
    /// Resolved scroll range; `None` while the binding fails closed
    range: Option<(f64, f64)>,
    filter: ProgressFilter,
    emitted: Progress,
    pinned: bool,
}

impl BoundScroll {
    fn raw_progress(&self, scroll_y: f64) -> Progress {
        match self.range {
            Some((start, end)) => Progress::between(scroll_y, start, end),
            None => Progress::START,
        }
    }
}

/// Viewport Scroll Tracker
pub struct ScrollTracker {
    bindings: BTreeMap<Subscription, BoundScroll>,
    next_subscription: u64,
    scroll_y: f64,
    viewport: Viewport,
    class: ViewportClass,
    config: TrackerConfig,
}

impl ScrollTracker {
    /// Create a tracker with default configuration
    pub fn new(viewport: Viewport) -> Self {
        Self::with_config(viewport, TrackerConfig::default())
    }

    /// Create a tracker with custom configuration
    pub fn with_config(viewport: Viewport, config: TrackerConfig) -> Self {
        ScrollTracker {
            bindings: BTreeMap::new(),
            next_subscription: 1,
            scroll_y: 0.0,
            class: ViewportClass::classify(viewport.width, config.compact_breakpoint),
            viewport,
            config,
        }
    }

    /// Bind a scroll binding and start tracking it
    ///
    /// An unresolvable binding still gets a subscription; it fails closed
    /// (progress stays 0, no pin) until a later resize resolves it.
    pub fn bind(&mut self, binding: ScrollBinding, layout: &dyn LayoutProvider) -> Bound {
        let subscription = Subscription::new(self.next_subscription);
        self.next_subscription += 1;

        let (range, unresolved) = match Self::resolve_range(&binding, layout, self.viewport) {
            Ok(range) => (Some(range), None),
            Err(error) => (None, Some(error)),
        };
        let raw = match range {
            Some((start, end)) => Progress::between(self.scroll_y, start, end),
            None => Progress::START,
        };

        debug!(?subscription, trigger = %binding.trigger, ?range, "scroll binding attached");

        let filter = ProgressFilter::new(binding.scrub.time_constant(), raw, self.config.snap_epsilon);
        self.bindings.insert(
            subscription,
            BoundScroll {
                binding,
                range,
                filter,
                emitted: raw,
                pinned: false,
            },
        );
        Bound {
            subscription,
            unresolved,
        }
    }

    /// Stop emission for a subscription and release its pin
    pub fn unbind(&mut self, subscription: Subscription) -> Option<Unbound> {
        let bound = self.bindings.remove(&subscription)?;
        debug!(?subscription, released_pin = bound.pinned, "scroll binding detached");
        Some(Unbound {
            subscription,
            released_pin: bound.pinned,
        })
    }

    /// Current progress of a binding without waiting for a scroll event
    pub fn sample(&self, subscription: Subscription) -> Option<ProgressUpdate> {
        let bound = self.bindings.get(&subscription)?;
        bound.range?;
        Some(ProgressUpdate {
            subscription,
            trigger: bound.binding.trigger,
            progress: bound.emitted,
            direction: Direction::Idle,
            pinned: bound.pinned,
            pin_change: None,
        })
    }

    /// Scroll event: recompute every live binding and emit its progress
    pub fn on_scroll(&mut self, scroll_y: f64, now: FrameTime) -> Vec<ProgressUpdate> {
        if scroll_y.is_finite() {
            self.scroll_y = scroll_y;
        }
        self.sample_all(now, true)
    }

    /// Frame tick: advance scrub smoothing, emit only bindings still moving
    pub fn tick(&mut self, now: FrameTime) -> Vec<ProgressUpdate> {
        self.sample_all(now, false)
    }

    /// Resize: recompute anchors (they are viewport relative) and detect
    /// viewport class crossings
    pub fn on_resize(
        &mut self,
        viewport: Viewport,
        layout: &dyn LayoutProvider,
        now: FrameTime,
    ) -> ResizeReport {
        self.viewport = viewport;

        let class = ViewportClass::classify(viewport.width, self.config.compact_breakpoint);
        let class_change = (class != self.class).then_some(class);
        self.class = class;

        let scroll_y = self.scroll_y;
        let mut unresolved = Vec::new();
        for (subscription, bound) in self.bindings.iter_mut() {
            let was_resolved = bound.range.is_some();
            match Self::resolve_range(&bound.binding, layout, viewport) {
                Ok(range) => {
                    bound.range = Some(range);
                    if !was_resolved {
                        // First resolution: start from the page, not from 0
                        bound.filter.set_target(bound.raw_progress(scroll_y));
                        bound.filter.settle();
                    }
                }
                Err(error) => {
                    bound.range = None;
                    if was_resolved {
                        unresolved.push((*subscription, error));
                    }
                }
            }
        }

        ResizeReport {
            class_change,
            updates: self.sample_all(now, true),
            unresolved,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn viewport_class(&self) -> ViewportClass {
        self.class
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn is_bound(&self, subscription: Subscription) -> bool {
        self.bindings.contains_key(&subscription)
    }

    pub fn is_pinned(&self, subscription: Subscription) -> bool {
        self.bindings.get(&subscription).is_some_and(|b| b.pinned)
    }

    /// Whether the binding resolved (false while failing closed)
    pub fn is_resolved(&self, subscription: Subscription) -> bool {
        self.bindings
            .get(&subscription)
            .is_some_and(|b| b.range.is_some())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn resolve_range(
        binding: &ScrollBinding,
        layout: &dyn LayoutProvider,
        viewport: Viewport,
    ) -> VistaResult<(f64, f64)> {
        binding
            .resolve(layout.region(binding.trigger), viewport)
            .map_err(|error| {
                debug!(trigger = %binding.trigger, %error, "scroll binding failed closed");
                error
            })
    }

    fn sample_all(&mut self, now: FrameTime, emit_all: bool) -> Vec<ProgressUpdate> {
        let scroll_y = self.scroll_y;
        let mut updates = Vec::new();

        for (subscription, bound) in self.bindings.iter_mut() {
            if bound.range.is_none() {
                // Fail closed: no progress, no pin
                if bound.pinned {
                    bound.pinned = false;
                    updates.push(ProgressUpdate {
                        subscription: *subscription,
                        trigger: bound.binding.trigger,
                        progress: Progress::START,
                        direction: Direction::Idle,
                        pinned: false,
                        pin_change: Some(PinChange::Released),
                    });
                }
                continue;
            }

            let raw = bound.raw_progress(scroll_y);
            bound.filter.set_target(raw);
            let progress = bound.filter.advance(now);

            let pinned = bound.binding.pin && raw.is_interior();
            let pin_change = match (bound.pinned, pinned) {
                (false, true) => Some(PinChange::Engaged),
                (true, false) => Some(PinChange::Released),
                _ => None,
            };
            bound.pinned = pinned;

            let direction = progress.direction_from(bound.emitted);
            let moved = direction != Direction::Idle;
            bound.emitted = progress;

            if emit_all || moved || pin_change.is_some() {
                updates.push(ProgressUpdate {
                    subscription: *subscription,
                    trigger: bound.binding.trigger,
                    progress,
                    direction,
                    pinned,
                    pin_change,
                });
            }
        }

        updates
    }
}
