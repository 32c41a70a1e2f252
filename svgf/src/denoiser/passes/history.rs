use log::trace;

use crate::{ComputePass, DenoiserBuffers, FrameInputs};

/// Bookkeeping that carries state over to the next frame.
#[derive(Debug)]
pub struct HistoryPass {
    pass: ComputePass,
}

impl HistoryPass {
    pub fn new() -> Self {
        Self {
            pass: ComputePass::new("history"),
        }
    }

    /// Snapshots the latest output of the spatial stages as the next frame's
    /// temporal history.
    pub fn capture(&self, buffers: &mut DenoiserBuffers) {
        trace!("Capturing filtered illumination");

        buffers
            .filtered_past
            .copy_from(buffers.ping_pong.prev());
    }

    /// Snapshots the (unfiltered) output of the reprojector as the next
    /// frame's temporal history.
    pub fn capture_unfiltered(&self, buffers: &mut DenoiserBuffers) {
        trace!("Capturing unfiltered illumination");

        let reprojected = buffers.reprojected.curr().readable();

        self.pass.run(&mut buffers.filtered_past, |pos| {
            reprojected.read(pos).illumination
        });
    }

    /// Finishes the frame: what was written as current becomes previous.
    ///
    /// Must be called after all of the frame's stages have run.
    pub fn swap(&self, inputs: &FrameInputs, buffers: &mut DenoiserBuffers) {
        buffers.reprojected.swap();
        buffers.prev_linear_z.copy_from(inputs.linear_z);
    }
}
