use glam::{vec4, IVec2, Vec3, Vec4};

use crate::{Normal, Tex};

/// Linear-depth G-buffer pixel used by the reprojector to validate history.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinearZ {
    /// Linear depth of the surface seen through this pixel; `<= 0.0` marks
    /// background pixels.
    pub depth: f32,

    /// Maximum screen-space derivative of `depth`.
    pub depth_fwidth: f32,

    /// Depth of the same surface point as seen from the previous frame's
    /// camera.
    pub reprojected_depth: f32,

    pub normal: Vec3,
}

impl LinearZ {
    /// Tolerance for the depth test, in units of `depth_fwidth`.
    pub const MAX_DEPTH_DIFFERENCE: f32 = 10.0;

    /// Tolerance for the normal test, in units of `0.01`.
    pub const MAX_NORMAL_DIFFERENCE: f32 = 16.0;

    pub fn new(
        depth: f32,
        depth_fwidth: f32,
        reprojected_depth: f32,
        normal: Vec3,
    ) -> Self {
        Self {
            depth,
            depth_fwidth,
            reprojected_depth,
            normal,
        }
    }

    pub fn pack(self) -> Vec4 {
        vec4(
            self.depth,
            self.depth_fwidth,
            self.reprojected_depth,
            Normal::pack(self.normal),
        )
    }

    pub fn unpack(d0: Vec4) -> Self {
        Self {
            depth: d0.x,
            depth_fwidth: d0.y,
            reprojected_depth: d0.z,
            normal: Normal::unpack(d0.w),
        }
    }

    pub fn is_sky(&self) -> bool {
        self.depth <= 0.0
    }

    /// Returns whether `prev` (read from the previous frame at the position
    /// this pixel reprojects to) looks like the same surface.
    pub fn is_consistent_with(&self, prev: &Self) -> bool {
        if self.is_sky() || prev.is_sky() {
            return false;
        }

        let depth_diff = (prev.depth - self.reprojected_depth).abs()
            / (self.depth_fwidth + 0.01);

        if depth_diff > Self::MAX_DEPTH_DIFFERENCE {
            return false;
        }

        let normal_diff = self.normal.distance(prev.normal) / 0.01;

        normal_diff <= Self::MAX_NORMAL_DIFFERENCE
    }
}

/// Read-only view of a linear-depth buffer.
#[derive(Clone, Copy, Debug)]
pub struct LinearZMap<'a> {
    tex: Tex<'a, Vec4>,
}

impl<'a> LinearZMap<'a> {
    pub fn new(tex: Tex<'a, Vec4>) -> Self {
        Self { tex }
    }

    pub fn tex(&self) -> Tex<'a, Vec4> {
        self.tex
    }

    pub fn get(&self, pos: IVec2) -> Option<LinearZ> {
        self.tex.get(pos).map(LinearZ::unpack)
    }
}
