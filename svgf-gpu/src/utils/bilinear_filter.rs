use core::ops;

use glam::{ivec2, IVec2, Vec2, Vec4};

/// Bilinear filter whose taps can be individually rejected.
#[derive(Clone, Copy, Debug)]
pub struct BilinearFilter<T> {
    /// Sample at `f(x=0, y=0)`
    pub s00: T,

    /// Sample at `f(x=1, y=0)`
    pub s10: T,

    /// Sample at `f(x=0, y=1)`
    pub s01: T,

    /// Sample at `f(x=1, y=1)`
    pub s11: T,

    /// Validity of each sample (`1.0` if valid, `0.0` if rejected)
    pub weights: Vec4,
}

impl<T> BilinearFilter<T>
where
    T: Copy + Default,
    T: ops::Add<Output = T>,
    T: ops::Mul<f32, Output = T>,
{
    /// Minimum sum of weights below which the filter is considered empty.
    pub const MIN_WEIGHT: f32 = 0.01;

    /// Gathers four taps surrounding `pos`; taps for which `sample` returns
    /// `None` are rejected.
    pub fn gather(pos: Vec2, sample: impl Fn(IVec2) -> Option<T>) -> Self {
        let [p00, p10, p01, p11] = Self::coords(pos);
        let mut weights = Vec4::ZERO;

        let tap = |pos, weight: &mut f32| {
            if let Some(s) = sample(pos) {
                *weight = 1.0;
                s
            } else {
                T::default()
            }
        };

        let s00 = tap(p00, &mut weights.x);
        let s10 = tap(p10, &mut weights.y);
        let s01 = tap(p01, &mut weights.z);
        let s11 = tap(p11, &mut weights.w);

        Self {
            s00,
            s10,
            s01,
            s11,
            weights,
        }
    }

    pub fn coords(pos: Vec2) -> [IVec2; 4] {
        let p00 = pos.floor().as_ivec2();

        [p00, p00 + ivec2(1, 0), p00 + ivec2(0, 1), p00 + ivec2(1, 1)]
    }

    /// Evaluates the filter at `uv` (the fractional part of the gathered
    /// position); returns `None` when too few taps survived.
    pub fn eval(&self, uv: Vec2) -> Option<T> {
        let weights = self.weights
            * Vec4::new(
                (1.0 - uv.x) * (1.0 - uv.y),
                uv.x * (1.0 - uv.y),
                (1.0 - uv.x) * uv.y,
                uv.x * uv.y,
            );

        let w_sum = weights.dot(Vec4::ONE);

        if w_sum < Self::MIN_WEIGHT {
            None
        } else {
            Some(
                (self.s00 * weights.x
                    + self.s10 * weights.y
                    + self.s01 * weights.z
                    + self.s11 * weights.w)
                    * (1.0 / w_sum),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec2;

    use super::*;

    fn ramp(pos: IVec2) -> Option<f32> {
        Some(pos.x as f32 + 10.0 * pos.y as f32)
    }

    #[test]
    fn interpolation() {
        let target = BilinearFilter::gather(vec2(2.25, 1.5), ramp);

        assert_relative_eq!(
            17.25,
            target.eval(vec2(0.25, 0.5)).unwrap(),
            epsilon = 0.0001
        );
    }

    #[test]
    fn rejected_taps_are_renormalized() {
        let target = BilinearFilter::gather(vec2(2.5, 1.0), |pos| {
            if pos.x == 3 {
                None
            } else {
                ramp(pos)
            }
        });

        assert_eq!(Some(12.0), target.eval(vec2(0.5, 0.0)));
    }

    #[test]
    fn fully_rejected() {
        let target = BilinearFilter::gather(vec2(0.0, 0.0), |pos| {
            if pos == IVec2::ZERO {
                None
            } else {
                ramp(pos)
            }
        });

        assert_eq!(None, target.eval(vec2(0.0, 0.0)));
    }
}
