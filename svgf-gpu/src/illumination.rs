use core::ops;

use bytemuck::{Pod, Zeroable};
use glam::{vec2, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::{F32Ext, Vec3Ext};

/// Demodulated illumination of a single pixel, split into its direct and
/// indirect parts.
///
/// Each part keeps its color in `xyz` and its luminance variance in `w`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Illumination {
    pub direct: Vec4,
    pub indirect: Vec4,
}

impl Illumination {
    pub fn new(direct: Vec4, indirect: Vec4) -> Self {
        Self { direct, indirect }
    }

    pub fn direct_color(&self) -> Vec3 {
        self.direct.xyz()
    }

    pub fn indirect_color(&self) -> Vec3 {
        self.indirect.xyz()
    }

    pub fn direct_variance(&self) -> f32 {
        self.direct.w
    }

    pub fn indirect_variance(&self) -> f32 {
        self.indirect.w
    }

    /// Returns luminances of both parts, `(direct, indirect)`.
    pub fn luminance(&self) -> (f32, f32) {
        (
            self.direct.xyz().luminance(),
            self.indirect.xyz().luminance(),
        )
    }

    pub fn with_variance(mut self, direct: f32, indirect: f32) -> Self {
        self.direct.w = direct;
        self.indirect.w = indirect;
        self
    }

    /// Clamps variances of both parts to be at least `epsilon`.
    pub fn with_min_variance(mut self, epsilon: f32) -> Self {
        self.direct.w = self.direct.w.max(epsilon);
        self.indirect.w = self.indirect.w.max(epsilon);
        self
    }

    /// Applies `f` to both parts.
    pub fn map(self, f: impl Fn(Vec4) -> Vec4) -> Self {
        Self {
            direct: f(self.direct),
            indirect: f(self.indirect),
        }
    }
}

impl ops::Add for Illumination {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            direct: self.direct + rhs.direct,
            indirect: self.indirect + rhs.indirect,
        }
    }
}

impl ops::Sub for Illumination {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            direct: self.direct - rhs.direct,
            indirect: self.indirect - rhs.indirect,
        }
    }
}

impl ops::Mul<f32> for Illumination {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        self.map(|v| v * rhs)
    }
}

/// First and second raw moments of luminance, for both illumination parts.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Moments {
    /// `x` = first moment, `y` = second moment
    pub direct: Vec2,

    /// `x` = first moment, `y` = second moment
    pub indirect: Vec2,
}

impl Moments {
    /// Computes moments of a single sample.
    pub fn from_illumination(illumination: &Illumination) -> Self {
        let (direct, indirect) = illumination.luminance();

        Self {
            direct: vec2(direct, direct.sqr()),
            indirect: vec2(indirect, indirect.sqr()),
        }
    }

    /// Returns the variances, `(direct, indirect)`, never negative.
    pub fn variance(&self) -> (f32, f32) {
        (
            (self.direct.y - self.direct.x.sqr()).max(0.0),
            (self.indirect.y - self.indirect.x.sqr()).max(0.0),
        )
    }
}

impl ops::Add for Moments {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            direct: self.direct + rhs.direct,
            indirect: self.indirect + rhs.indirect,
        }
    }
}

impl ops::Sub for Moments {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            direct: self.direct - rhs.direct,
            indirect: self.indirect - rhs.indirect,
        }
    }
}

impl ops::Mul<f32> for Moments {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            direct: self.direct * rhs,
            indirect: self.indirect * rhs,
        }
    }
}

/// Output of the reprojection pass: temporally accumulated illumination
/// together with its moments and history length.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Reprojected {
    pub illumination: Illumination,
    pub moments: Moments,
    pub history_length: f32,
    pub _pad: [f32; 3],
}

impl Reprojected {
    pub fn new(
        illumination: Illumination,
        moments: Moments,
        history_length: f32,
    ) -> Self {
        Self {
            illumination,
            moments,
            history_length,
            _pad: Default::default(),
        }
    }

    /// Whether this pixel carries any history; cleared pixels don't.
    pub fn has_history(&self) -> bool {
        self.history_length > 0.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec4;

    use super::*;

    #[test]
    fn moments() {
        let a = Moments::from_illumination(&Illumination::new(
            vec4(1.0, 1.0, 1.0, 0.0),
            vec4(0.0, 0.0, 0.0, 0.0),
        ));

        let b = Moments::from_illumination(&Illumination::new(
            vec4(3.0, 3.0, 3.0, 0.0),
            vec4(0.0, 0.0, 0.0, 0.0),
        ));

        let (direct, indirect) = ((a + b) * 0.5).variance();

        assert_relative_eq!(1.0, direct, epsilon = 0.0001);
        assert_eq!(0.0, indirect);
    }

    #[test]
    fn variance_is_never_negative() {
        let target = Moments {
            direct: vec2(2.0, 3.9),
            indirect: vec2(0.0, 0.0),
        };

        assert_eq!((0.0, 0.0), target.variance());
    }

    #[test]
    fn layout() {
        assert_eq!(32, std::mem::size_of::<Illumination>());
        assert_eq!(64, std::mem::size_of::<Reprojected>());
    }
}
