use glam::{UVec2, Vec4};
use log::debug;
use svgf_gpu::{Illumination, Reprojected};

use crate::{DoubleBuffered, Texture};

/// Buffers owned by the denoiser, all sized to the screen.
#[derive(Debug)]
pub struct DenoiserBuffers {
    size: UVec2,

    /// Output of the reprojector; the previous instance holds what the
    /// previous frame accumulated.
    pub reprojected: DoubleBuffered<Texture<Reprojected>>,

    /// Linear depth of the previous frame.
    pub prev_linear_z: Texture<Vec4>,

    /// Filtered illumination of the previous frame, used by the reprojector
    /// as the temporal history.
    pub filtered_past: Texture<Illumination>,

    /// Working buffers of the spatial stages; the previous instance holds
    /// the latest result.
    pub ping_pong: DoubleBuffered<Texture<Illumination>>,
}

impl DenoiserBuffers {
    pub fn new(size: UVec2) -> Self {
        debug!("Allocating denoiser buffers; size={:?}", size);

        Self {
            size,
            reprojected: DoubleBuffered::new("svgf_reprojected", size),
            prev_linear_z: Texture::new("svgf_prev_linear_z", size),
            filtered_past: Texture::new("svgf_filtered_past", size),
            ping_pong: DoubleBuffered::new("svgf_ping_pong", size),
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn clear(&mut self) {
        debug!("Clearing denoiser buffers");

        self.reprojected.clear();
        self.prev_linear_z.clear();
        self.filtered_past.clear();
        self.ping_pong.clear();
    }

    /// Returns the reprojection buffer written by the most recent frame.
    ///
    /// The buffers get swapped at the end of each frame, so that's the
    /// previous instance.
    pub fn latest_reprojected(&self) -> &Texture<Reprojected> {
        self.reprojected.prev()
    }

    /// Returns the most recent output of the spatial stages.
    pub fn latest_filtered(&self) -> &Texture<Illumination> {
        self.ping_pong.prev()
    }
}
