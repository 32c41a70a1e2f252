use svgf_gpu::{LinearZMap, ReprojectPassParams};

use crate::{ComputePass, DenoiserBuffers, DenoiserConfig, FrameInputs};

#[derive(Debug)]
pub struct ReprojectionPass {
    pass: ComputePass,
}

impl ReprojectionPass {
    pub fn new() -> Self {
        Self {
            pass: ComputePass::new("reprojection"),
        }
    }

    pub fn run(
        &self,
        config: &DenoiserConfig,
        inputs: &FrameInputs,
        buffers: &mut DenoiserBuffers,
    ) {
        let params = ReprojectPassParams {
            alpha: config.alpha,
            moments_alpha: config.moments_alpha,
            max_history_length: config.max_history_length as f32,
            _pad: Default::default(),
        };

        let direct = inputs.direct.readable();
        let indirect = inputs.indirect.readable();
        let linear_z = LinearZMap::new(inputs.linear_z.readable());
        let prev_linear_z = LinearZMap::new(buffers.prev_linear_z.readable());
        let motion_vectors = inputs.motion_vectors.readable();
        let filtered_past = buffers.filtered_past.readable();
        let (reprojected, prev_reprojected) = buffers.reprojected.split_mut();
        let prev_reprojected = prev_reprojected.readable();

        self.pass.run(reprojected, |pos| {
            svgf_shaders::reproject::reproject(
                pos,
                &params,
                direct,
                indirect,
                linear_z,
                prev_linear_z,
                motion_vectors,
                prev_reprojected,
                filtered_past,
            )
        });
    }
}
