//! Tween engine
//!
//! Tweens are pure functions of frame time. A `TweenSet` keeps at most one
//! tween per key, so starting a new one on a busy key replaces the old one
//! from wherever the caller says the property currently is.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use vista_core::{Easing, FrameTime};

/// A single scalar tween
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start: FrameTime,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start: FrameTime, duration: Duration) -> Self {
        Tween {
            from,
            to,
            start,
            duration,
            easing: Easing::Linear,
        }
    }

    pub fn eased(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Normalized elapsed time in [0, 1]
    pub fn progress(&self, now: FrameTime) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (now.since(self.start).as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, now: FrameTime) -> f32 {
        self.easing.interpolate(self.from, self.to, self.progress(now))
    }

    pub fn is_finished(&self, now: FrameTime) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Keyed tweens with last-writer-wins semantics
#[derive(Debug)]
pub struct TweenSet<K> {
    tweens: HashMap<K, Tween>,
}

impl<K: Eq + Hash + Clone> TweenSet<K> {
    pub fn new() -> Self {
        TweenSet {
            tweens: HashMap::new(),
        }
    }

    /// Start a tween, replacing any in flight on the same key
    pub fn start(&mut self, key: K, tween: Tween) -> Option<Tween> {
        self.tweens.insert(key, tween)
    }

    pub fn get(&self, key: &K) -> Option<&Tween> {
        self.tweens.get(key)
    }

    pub fn cancel(&mut self, key: &K) -> Option<Tween> {
        self.tweens.remove(key)
    }

    /// Cancel every tween whose key matches; returns how many were dropped
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) -> usize {
        let before = self.tweens.len();
        self.tweens.retain(|k, _| !pred(k));
        before - self.tweens.len()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }

    /// Current value of every tween; finished tweens yield their final
    /// value once and are retired
    pub fn tick(&mut self, now: FrameTime) -> Vec<(K, f32)> {
        let mut writes = Vec::with_capacity(self.tweens.len());
        self.tweens.retain(|key, tween| {
            writes.push((key.clone(), tween.value_at(now)));
            !tween.is_finished(now)
        });
        writes
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for TweenSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
