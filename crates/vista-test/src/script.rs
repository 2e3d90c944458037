//! Seeded scroll scripts
//!
//! Real scrolling is neither smooth nor monotonic: wheels overshoot and
//! trackpads jitter. Scripts reproduce that with a seeded RNG so a failing
//! run can be replayed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generator of scroll positions, one per frame
pub struct ScrollScript {
    rng: StdRng,
}

impl ScrollScript {
    pub fn new(seed: u64) -> Self {
        ScrollScript {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Glide from `from` to `to` over `steps` frames with up to `jitter`
    /// pixels of noise per frame; the last position is exactly `to`
    pub fn glide(&mut self, from: f64, to: f64, steps: usize, jitter: f64) -> Vec<f64> {
        let steps = steps.max(1);
        let mut path: Vec<f64> = (1..steps)
            .map(|i| {
                let t = i as f64 / steps as f64;
                let noise = if jitter > 0.0 {
                    self.rng.gen_range(-jitter..=jitter)
                } else {
                    0.0
                };
                (from + (to - from) * t + noise).max(0.0)
            })
            .collect();
        path.push(to);
        path
    }

    /// Random positions in `[low, high]`
    pub fn wander(&mut self, low: f64, high: f64, steps: usize) -> Vec<f64> {
        (0..steps).map(|_| self.rng.gen_range(low..=high)).collect()
    }
}
