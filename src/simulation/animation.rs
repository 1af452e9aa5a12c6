/// Triangle-wave value bouncing between two bounds.
///
/// Used per particle for independent size/opacity animation, and once per
/// engine on the normalized range [0, 1] as the shared phase for `sync`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillator {
    pub value: f32,
    pub rising: bool,
}

impl Oscillator {
    /// A shared phase starting at the top of its range, heading down
    pub fn shared() -> Self {
        Self {
            value: 1.0,
            rising: false,
        }
    }

    /// Ordered `(low, high)` for an animation between `min` and `base`
    pub fn bounds(min: f32, base: f32) -> (f32, f32) {
        let min = min.max(0.0);
        let base = base.max(0.0);
        (min.min(base), min.max(base))
    }

    /// Move `rate * dt` units, reflecting at `lo` and `hi`
    pub fn advance(&mut self, lo: f32, hi: f32, rate: f32, dt: f32) {
        let range = hi - lo;
        if !(range > 0.0) || !rate.is_finite() {
            self.value = hi.max(0.0);
            return;
        }

        self.value = self.value.clamp(lo, hi);
        let mut remaining = (rate * dt).max(0.0) % (2.0 * range);

        while remaining > 0.0 {
            if self.rising {
                let room = hi - self.value;
                if remaining < room {
                    self.value += remaining;
                    break;
                }
                self.value = hi;
                self.rising = false;
                remaining -= room;
            } else {
                let room = self.value - lo;
                if remaining < room {
                    self.value -= remaining;
                    break;
                }
                self.value = lo;
                self.rising = true;
                remaining -= room;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falls_then_rises() {
        let mut osc = Oscillator {
            value: 2.0,
            rising: false,
        };
        osc.advance(0.5, 2.0, 1.0, 1.0);
        assert!((osc.value - 1.0).abs() < 1e-6);
        assert!(!osc.rising);

        osc.advance(0.5, 2.0, 1.0, 1.0);
        assert!((osc.value - 1.0).abs() < 1e-6);
        assert!(osc.rising);
    }

    #[test]
    fn test_stays_within_bounds_for_large_steps() {
        let mut osc = Oscillator {
            value: 0.3,
            rising: true,
        };
        for _ in 0..100 {
            osc.advance(0.1, 0.9, 37.0, 0.7);
            assert!(osc.value >= 0.1 && osc.value <= 0.9);
        }
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut osc = Oscillator {
            value: 0.4,
            rising: true,
        };
        osc.advance(0.0, 1.0, 5.0, 0.0);
        assert_eq!(osc.value, 0.4);
    }

    #[test]
    fn test_degenerate_range_pins_to_high() {
        let mut osc = Oscillator::shared();
        osc.advance(3.0, 3.0, 1.0, 0.1);
        assert_eq!(osc.value, 3.0);
    }

    #[test]
    fn test_bounds_are_ordered() {
        assert_eq!(Oscillator::bounds(0.1, 2.0), (0.1, 2.0));
        assert_eq!(Oscillator::bounds(1.5, 0.5), (0.5, 1.5));
        assert_eq!(Oscillator::bounds(-1.0, 0.5), (0.0, 0.5));
    }
}
