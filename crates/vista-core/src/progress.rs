//! Normalized scroll progress

use std::fmt;

/// Scroll progress through a binding, always in `[0, 1]`
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Progress(f64);

impl Progress {
    pub const START: Progress = Progress(0.0);
    pub const END: Progress = Progress(1.0);

    /// Clamp into `[0, 1]`; NaN maps to the start
    #[inline]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Progress(0.0)
        } else {
            Progress(value.clamp(0.0, 1.0))
        }
    }

    /// Progress of `position` between `start` and `end`
    /// A degenerate range (end <= start) yields the start
    pub fn between(position: f64, start: f64, end: f64) -> Self {
        let span = end - start;
        if span.is_nan() || span <= 0.0 {
            return Progress::START;
        }
        Progress::new((position - start) / span)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Strictly between start and end (the pinned interval)
    #[inline]
    pub fn is_interior(self) -> bool {
        self.0 > 0.0 && self.0 < 1.0
    }

    /// Direction of travel from `previous` to `self`
    pub fn direction_from(self, previous: Progress) -> Direction {
        if self.0 > previous.0 {
            Direction::Forward
        } else if self.0 < previous.0 {
            Direction::Backward
        } else {
            Direction::Idle
        }
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p({:.4})", self.0)
    }
}

impl From<f64> for Progress {
    fn from(value: f64) -> Self {
        Progress::new(value)
    }
}

/// Scroll direction as observed by the tracker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    Forward,
    Backward,
    #[default]
    Idle,
}
