//! Scrub smoothing
//!
//! A first-order low-pass filter over raw progress. With a time constant
//! `tau`, after `tau` seconds the smoothed value has covered ~63% of the
//! remaining distance to the raw value. Once within `snap_epsilon` it snaps.

use std::time::Duration;

use vista_core::{FrameTime, Progress};

/// Low-pass filtered progress for one binding
#[derive(Clone, Debug)]
pub struct ProgressFilter {
    tau: Option<Duration>,
    current: f64,
    target: f64,
    last_update: Option<FrameTime>,
    snap_epsilon: f64,
}

impl ProgressFilter {
    /// Start settled at `initial`
    pub fn new(tau: Option<Duration>, initial: Progress, snap_epsilon: f64) -> Self {
        ProgressFilter {
            tau: tau.filter(|t| !t.is_zero()),
            current: initial.value(),
            target: initial.value(),
            last_update: None,
            snap_epsilon,
        }
    }

    /// Set the raw progress the filter converges to
    pub fn set_target(&mut self, target: Progress) {
        self.target = target.value();
    }

    /// Advance the filter to `now` and return the smoothed progress
    pub fn advance(&mut self, now: FrameTime) -> Progress {
        match self.tau {
            None => self.current = self.target,
            Some(tau) => {
                let dt = match self.last_update {
                    Some(last) => now.since(last),
                    None => Duration::ZERO,
                };
                let alpha = 1.0 - (-dt.as_secs_f64() / tau.as_secs_f64()).exp();
                self.current += (self.target - self.current) * alpha;

                if (self.target - self.current).abs() < self.snap_epsilon {
                    self.current = self.target;
                }
            }
        }
        self.last_update = Some(now);
        Progress::new(self.current)
    }

    /// Jump straight to the target, skipping the lag
    pub fn settle(&mut self) {
        self.current = self.target;
    }

    pub fn current(&self) -> Progress {
        Progress::new(self.current)
    }

    pub fn target(&self) -> Progress {
        Progress::new(self.target)
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_instant_filter_follows_target() {
        let mut f = ProgressFilter::new(None, Progress::START, 1e-4);
        f.set_target(Progress::new(0.7));
        assert_eq!(f.advance(FrameTime::ZERO).value(), 0.7);
        assert!(f.is_settled());
    }

    #[test]
    fn test_smoothed_filter_lags() {
        let mut f = ProgressFilter::new(Some(Duration::from_secs(1)), Progress::START, 1e-4);
        f.advance(FrameTime::ZERO);
        f.set_target(Progress::END);

        let after_one_tau = f.advance(FrameTime::from_millis(1000)).value();
        // 1 - e^-1
        assert!((after_one_tau - 0.632).abs() < 0.01);
        assert!(!f.is_settled());
    }

    #[test]
    fn test_smoothed_filter_converges_and_snaps() {
        let mut f = ProgressFilter::new(Some(Duration::from_millis(200)), Progress::START, 1e-4);
        f.advance(FrameTime::ZERO);
        f.set_target(Progress::new(0.5));

        let mut t = 0;
        for _ in 0..200 {
            t += 16;
            f.advance(FrameTime::from_millis(t));
        }
        assert!(f.is_settled());
        assert_eq!(f.current().value(), 0.5);
    }

    #[test]
    fn test_settle_skips_the_lag() {
        let mut f = ProgressFilter::new(Some(Duration::from_secs(1)), Progress::START, 1e-4);
        f.set_target(Progress::new(0.4));
        f.settle();
        assert!(f.is_settled());
        assert_eq!(f.advance(FrameTime::from_millis(16)).value(), 0.4);
    }

    #[test]
    fn test_first_advance_does_not_jump() {
        // No elapsed time on the first sample, so nothing moves
        let mut f = ProgressFilter::new(Some(Duration::from_secs(1)), Progress::START, 1e-4);
        f.set_target(Progress::END);
        assert_eq!(f.advance(FrameTime::from_millis(5000)).value(), 0.0);
    }

    proptest! {
        #[test]
        fn smoothed_value_stays_between_start_and_target(
            target in 0.0f64..=1.0,
            steps in proptest::collection::vec(1u64..100, 1..50),
        ) {
            let mut f = ProgressFilter::new(Some(Duration::from_millis(300)), Progress::START, 1e-4);
            f.advance(FrameTime::ZERO);
            f.set_target(Progress::new(target));
            let mut t = 0;
            for dt in steps {
                t += dt;
                let v = f.advance(FrameTime::from_millis(t)).value();
                prop_assert!(v >= 0.0 && v <= target + 1e-12);
            }
        }
    }
}
