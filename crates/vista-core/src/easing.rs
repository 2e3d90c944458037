//! Easing curves
//!
//! A fixed vocabulary matching the `power1` family the page was designed
//! with. There is no plugin mechanism.

/// Easing function applied to a normalized `t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic ease-in (`power1.in`)
    Power1In,
    /// Quadratic ease-out (`power1.out`)
    Power1Out,
    /// Quadratic ease-in-out (`power1.inOut`)
    Power1InOut,
}

impl Easing {
    /// Apply easing to `t`, clamped to [0, 1]
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::Power1In => t * t,
            Easing::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }

    /// Eased value between `from` and `to`; lands exactly on the endpoints
    pub fn interpolate(&self, from: f32, to: f32, t: f64) -> f32 {
        let eased = self.apply(t);
        if eased >= 1.0 {
            return to;
        }
        if eased <= 0.0 {
            return from;
        }
        let eased = eased as f32;
        from * (1.0 - eased) + to * eased
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::Power1In,
            Easing::Power1Out,
            Easing::Power1InOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_curve_shapes() {
        assert!(Easing::Power1In.apply(0.5) < 0.5);
        assert!(Easing::Power1Out.apply(0.5) > 0.5);
        assert!((Easing::Power1InOut.apply(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_hits_endpoints_exactly() {
        // 80 -> 1.1 drifts in f32 when computed as from + (to - from) * t
        assert_eq!(Easing::Linear.interpolate(80.0, 1.1, 1.0), 1.1);
        assert_eq!(Easing::Power1Out.interpolate(80.0, 1.1, 1.0), 1.1);
        assert_eq!(Easing::Power1InOut.interpolate(0.0, 6.2831855, 1.0), 6.2831855);
        assert_eq!(Easing::Power1In.interpolate(80.0, 1.1, 0.0), 80.0);
        assert!((Easing::Linear.interpolate(0.0, 10.0, 0.25) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(Easing::Linear.apply(-3.0), 0.0);
        assert_eq!(Easing::Linear.apply(7.0), 1.0);
        assert_eq!(Easing::Power1In.apply(f64::NAN), 0.0);
    }
}
