use glam::Vec3;

use crate::{F32Ext, SVGF_EPSILON};

/// Geometric and photometric description of a pixel, as seen by the
/// edge-stopping function.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KernelSample {
    pub depth: f32,
    pub normal: Vec3,
    pub luminance: f32,
}

impl KernelSample {
    pub fn new(depth: f32, normal: Vec3, luminance: f32) -> Self {
        Self {
            depth,
            normal,
            luminance,
        }
    }
}

/// Sensitivities of the edge-stopping function for a single tap.
///
/// `depth` is already scaled by the tap's distance from the center pixel;
/// `depth == 0.0` disables the depth term.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeStopping {
    pub depth: f32,
    pub normal: f32,
    pub luminance: f32,
}

/// Edge-stopping function used by the spatial stages (the moment filter and
/// the à-trous iterations) to weigh a neighbor against the center pixel.
///
/// Implementations must return a finite, non-negative weight; the center
/// pixel always contributes with weight `1.0` regardless of the kernel.
pub trait FilterKernel: Send + Sync {
    fn weight(
        &self,
        center: KernelSample,
        sample: KernelSample,
        phi: EdgeStopping,
    ) -> f32;
}

/// The classic SVGF weighting: exponential fall-off in depth and luminance
/// times a cosine lobe in normal.
#[derive(Clone, Copy, Debug, Default)]
pub struct SvgfKernel;

impl FilterKernel for SvgfKernel {
    fn weight(
        &self,
        center: KernelSample,
        sample: KernelSample,
        phi: EdgeStopping,
    ) -> f32 {
        let w_normal =
            center.normal.dot(sample.normal).saturate().powf(phi.normal);

        let w_depth = if phi.depth == 0.0 {
            0.0
        } else {
            (center.depth - sample.depth).abs() / phi.depth
        };

        let w_luminance = (center.luminance - sample.luminance).abs()
            / phi.luminance.max(SVGF_EPSILON);

        let w = (-w_luminance - w_depth).exp() * w_normal;

        if w.is_finite() {
            w
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    fn phi() -> EdgeStopping {
        EdgeStopping {
            depth: 1.0,
            normal: 128.0,
            luminance: 1.0,
        }
    }

    #[test]
    fn identical_samples() {
        let s = KernelSample::new(5.0, Vec3::Z, 0.5);

        assert_relative_eq!(1.0, SvgfKernel.weight(s, s, phi()));
    }

    #[test]
    fn depth_and_luminance_falloff() {
        let center = KernelSample::new(5.0, Vec3::Z, 0.5);
        let sample = KernelSample::new(6.0, Vec3::Z, 1.5);

        assert_relative_eq!(
            (-2.0f32).exp(),
            SvgfKernel.weight(center, sample, phi()),
            epsilon = 0.0001
        );
    }

    #[test]
    fn disabled_depth_term() {
        let center = KernelSample::new(5.0, Vec3::Z, 0.5);
        let sample = KernelSample::new(500.0, Vec3::Z, 0.5);

        let phi = EdgeStopping {
            depth: 0.0,
            ..phi()
        };

        assert_relative_eq!(1.0, SvgfKernel.weight(center, sample, phi));
    }

    #[test]
    fn opposite_normals() {
        let center = KernelSample::new(5.0, Vec3::Z, 0.5);
        let sample = KernelSample::new(5.0, -Vec3::Z, 0.5);

        assert_eq!(0.0, SvgfKernel.weight(center, sample, phi()));

        let sample =
            KernelSample::new(5.0, vec3(0.0, 1.0, 1.0).normalize(), 0.5);

        assert!(SvgfKernel.weight(center, sample, phi()) < 0.001);
    }

    #[test]
    fn zero_luminance_sensitivity() {
        let center = KernelSample::new(5.0, Vec3::Z, 0.5);
        let sample = KernelSample::new(5.0, Vec3::Z, 0.5);

        let phi = EdgeStopping {
            luminance: 0.0,
            ..phi()
        };

        assert_relative_eq!(1.0, SvgfKernel.weight(center, sample, phi));
    }
}
