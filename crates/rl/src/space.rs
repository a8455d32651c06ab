/// Defines a space in which an action, observation, or other may exist.
pub trait Space<T> {
    /// Tests whether the sample is contained within the space.
    fn contains(&self, sample: &T) -> bool;

    /// Randomly samples from the space.
    fn sample(&mut self) -> T;

    /// Dimensions of a sample.
    fn shape(&self) -> Vec<usize>;

    /// Reseed the space's random number generator.
    fn seed(&mut self, seed: u64);
}

/// Resolution of the unit draw behind [`BoxSpace::sample`]; `f32` holds every
/// multiple of `1 / UNIT_STEPS` in `[0, 1]` exactly.
const UNIT_STEPS: u32 = 1 << 24;

/// Map `step` in `0..=UNIT_STEPS` onto `[low, high]`, hitting both ends.
fn lerp_closed(low: f32, high: f32, step: u32) -> f32 {
    if step >= UNIT_STEPS {
        return high;
    }
    let t = step as f32 / UNIT_STEPS as f32;
    (low + (high - low) * t).clamp(low, high)
}

/// A continuous box in `R^n`.
///
/// Samples are drawn uniformly and independently per dimension from the
/// closed interval `[low[i], high[i]]`; both bounds can be returned.
#[derive(Debug)]
pub struct BoxSpace {
    low: Vec<f32>,
    high: Vec<f32>,
    rng: fastrand::Rng,
}

impl BoxSpace {
    /// Create a box from per-dimension bounds.
    ///
    /// # Panics
    ///
    /// Panics if the bounds have different lengths or any `low[i] > high[i]`.
    #[must_use]
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Self {
        assert_eq!(low.len(), high.len(), "box bounds must have equal length");
        assert!(
            low.iter().zip(high.iter()).all(|(l, h)| l <= h),
            "box lower bound exceeds upper bound"
        );
        Self {
            low,
            high,
            rng: fastrand::Rng::new(),
        }
    }

    /// A box with the same bounds on every dimension.
    #[must_use]
    pub fn uniform(dim: usize, low: f32, high: f32) -> Self {
        Self::new(vec![low; dim], vec![high; dim])
    }

    #[must_use]
    pub fn low(&self) -> &[f32] {
        &self.low
    }

    #[must_use]
    pub fn high(&self) -> &[f32] {
        &self.high
    }

    /// Clip `values` into the box in place.
    pub fn clip(&self, values: &mut [f32]) {
        for ((v, l), h) in values.iter_mut().zip(&self.low).zip(&self.high) {
            *v = v.clamp(*l, *h);
        }
    }
}

impl Space<Vec<f32>> for BoxSpace {
    fn contains(&self, sample: &Vec<f32>) -> bool {
        if sample.len() != self.low.len() {
            return false;
        }

        sample
            .iter()
            .zip(self.low.iter())
            .zip(self.high.iter())
            .all(|((&s, &l), &h)| l <= s && s <= h)
    }

    fn sample(&mut self) -> Vec<f32> {
        self.low
            .iter()
            .zip(self.high.iter())
            .map(|(&l, &h)| lerp_closed(l, h, self.rng.u32(..=UNIT_STEPS)))
            .collect()
    }

    fn shape(&self) -> Vec<usize> {
        vec![self.low.len()]
    }

    fn seed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }
}

#[cfg(test)]
mod test {
    use super::{lerp_closed, BoxSpace, Space, UNIT_STEPS};

    #[test]
    fn test_box_space() {
        let low = vec![0.0, -0.1, 0.1];
        let high = vec![1.0, 1.1, 0.9];

        let mut space = BoxSpace::new(low, high);

        assert_eq!(space.shape(), vec![3]);

        assert!(space.contains(&vec![0.0, 1.1, 0.3]));
        assert!(!space.contains(&vec![30.0, 1.1, 0.3]));
        assert!(!space.contains(&vec![0.5, 0.5]));

        for _ in 0..100 {
            let sample = space.sample();
            assert!(space.contains(&sample), "{sample:?}");
        }
    }

    #[test]
    fn test_seeding_is_reproducible() {
        let mut a = BoxSpace::uniform(4, -1.0, 1.0);
        let mut b = BoxSpace::uniform(4, -1.0, 1.0);
        a.seed(7);
        b.seed(7);
        assert_eq!(a.sample(), b.sample());
    }

    #[test]
    fn test_sampling_reaches_both_bounds() {
        assert_eq!(lerp_closed(0.0, 1.0, 0), 0.0);
        assert_eq!(lerp_closed(0.0, 1.0, UNIT_STEPS), 1.0);
        assert_eq!(lerp_closed(-1.0, 1.0, UNIT_STEPS), 1.0);
        assert_eq!(lerp_closed(-3.0, 7.1, UNIT_STEPS), 7.1);
        assert_eq!(lerp_closed(-3.0, 7.1, 0), -3.0);
        let mid = lerp_closed(-1.0, 1.0, UNIT_STEPS / 2);
        assert!(mid.abs() < 1e-6);
    }

    #[test]
    fn test_clip() {
        let space = BoxSpace::uniform(3, -1.0, 1.0);
        let mut values = [2.0, -0.5, -3.0];
        space.clip(&mut values);
        assert_eq!(values, [1.0, -0.5, -1.0]);
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn test_mismatched_bounds_panic() {
        let _ = BoxSpace::new(vec![0.0], vec![1.0, 2.0]);
    }
}
