use derive_more::Display;
use rand::{
    distributions::uniform::{SampleRange, SampleUniform, UniformSampler},
    RngCore,
};
use std::{
    fmt::{Debug, Display},
    ops,
};

/// A float type we can build ranges over. Only `f32` (colors) and `f64`
/// (geometry) are needed.
pub trait Rangeable:
    Copy
    + Debug
    + Display
    + PartialOrd
    + ops::Add<Output = Self>
    + ops::Sub<Output = Self>
    + ops::Mul<Output = Self>
    + ops::Div<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;
}

impl Rangeable for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
}

impl Rangeable for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
}

/// A range between two numeric values, inclusive on both ends. Also usable as
/// an argument to [rand::Rng::gen_range], which is how most of the texture
/// decoration sizes are sampled.
#[derive(Copy, Clone, Debug, Display, PartialEq)]
#[display(fmt = "[{}, {}]", min, max)]
pub struct NumRange<T: Rangeable> {
    pub min: T,
    pub max: T,
}

impl<T: Rangeable> NumRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// The range `[0, 1]`
    pub const fn normal() -> Self {
        Self::new(T::ZERO, T::ONE)
    }

    /// Force a value into this range.
    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

impl<T: Rangeable + SampleUniform> SampleRange<T> for NumRange<T> {
    #[inline]
    fn sample_single<R: RngCore + ?Sized>(self, rng: &mut R) -> T {
        T::Sampler::sample_single_inclusive(self.min, self.max, rng)
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    #[test]
    fn test_clamp() {
        let range: NumRange<f32> = NumRange::normal();
        assert_approx_eq!(range.clamp(-0.5), 0.0);
        assert_approx_eq!(range.clamp(0.25), 0.25);
        assert_approx_eq!(range.clamp(1.5), 1.0);
    }

    #[test]
    fn test_sample() {
        let range: NumRange<f64> = NumRange::new(0.2, 0.4);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let value = rng.gen_range(range);
            assert!((0.2..=0.4).contains(&value));
        }
    }
}
