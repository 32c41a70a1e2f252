use glam::{vec4, IVec2, Vec3, Vec4, Vec4Swizzles};

use crate::{KernelSample, Normal, Tex};

/// Compact normal+depth G-buffer pixel, used for similarity weighting by the
/// spatial stages.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompactNormDepth {
    pub normal: Vec3,
    pub depth: f32,
    pub depth_fwidth: f32,
}

impl CompactNormDepth {
    pub fn new(normal: Vec3, depth: f32, depth_fwidth: f32) -> Self {
        Self {
            normal,
            depth,
            depth_fwidth,
        }
    }

    pub fn pack(self) -> Vec4 {
        let normal = Normal::encode(self.normal);

        vec4(normal.x, normal.y, self.depth, self.depth_fwidth)
    }

    pub fn unpack(d0: Vec4) -> Self {
        Self {
            normal: Normal::decode(d0.xy()),
            depth: d0.z,
            depth_fwidth: d0.w,
        }
    }

    /// Returns whether this pixel carries no geometry.
    pub fn is_sky(&self) -> bool {
        self.depth <= 0.0
    }

    pub fn as_kernel_sample(&self, luminance: f32) -> KernelSample {
        KernelSample::new(self.depth, self.normal, luminance)
    }
}

/// Read-only view of a compact normal+depth buffer.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceMap<'a> {
    tex: Tex<'a, Vec4>,
}

impl<'a> SurfaceMap<'a> {
    pub fn new(tex: Tex<'a, Vec4>) -> Self {
        Self { tex }
    }

    /// Returns the surface at given point, provided the point lays inside the
    /// screen and isn't a background pixel.
    pub fn get(&self, pos: IVec2) -> Option<CompactNormDepth> {
        self.tex
            .get(pos)
            .map(CompactNormDepth::unpack)
            .filter(|surface| !surface.is_sky())
    }

    pub fn is_sky(&self, pos: IVec2) -> bool {
        self.get(pos).is_none()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{ivec2, uvec2, vec3};

    use super::*;

    #[test]
    fn packing() {
        let n = vec3(0.3, -0.4, 0.5).normalize();
        let target = CompactNormDepth::new(n, 4.0, 0.25).pack();
        let target = CompactNormDepth::unpack(target);

        assert_relative_eq!(n.x, target.normal.x, epsilon = 0.001);
        assert_relative_eq!(n.y, target.normal.y, epsilon = 0.001);
        assert_relative_eq!(n.z, target.normal.z, epsilon = 0.001);
        assert_eq!(4.0, target.depth);
        assert_eq!(0.25, target.depth_fwidth);
    }

    #[test]
    fn background() {
        let data = [
            CompactNormDepth::new(Vec3::Z, 1.0, 0.0).pack(),
            CompactNormDepth::new(Vec3::Z, 0.0, 0.0).pack(),
        ];

        let target = SurfaceMap::new(Tex::new(&data, uvec2(2, 1)));

        assert!(!target.is_sky(ivec2(0, 0)));
        assert!(target.is_sky(ivec2(1, 0)));
        assert!(target.is_sky(ivec2(2, 0)));
    }
}
