use svgf_gpu::{FilterKernel, FilterMomentsPassParams, SurfaceMap};

use crate::{ComputePass, DenoiserBuffers, DenoiserConfig, FrameInputs};

#[derive(Debug)]
pub struct MomentFilterPass {
    pass: ComputePass,
}

impl MomentFilterPass {
    pub fn new() -> Self {
        Self {
            pass: ComputePass::new("moment_filter"),
        }
    }

    pub fn run<K>(
        &self,
        config: &DenoiserConfig,
        kernel: &K,
        inputs: &FrameInputs,
        buffers: &mut DenoiserBuffers,
    ) where
        K: FilterKernel,
    {
        let params = FilterMomentsPassParams {
            phi_color: config.phi_color,
            phi_normal: config.phi_normal,
            history_threshold: config.moment_history_threshold as f32,
            variance_epsilon: config.variance_epsilon,
        };

        let surface_map = SurfaceMap::new(inputs.compact_norm_depth.readable());
        let reprojected = buffers.reprojected.curr().readable();

        self.pass.run(buffers.ping_pong.curr_mut(), |pos| {
            svgf_shaders::filter_moments::filter_moments(
                pos,
                &params,
                kernel,
                surface_map,
                reprojected,
            )
        });

        buffers.ping_pong.swap();
    }
}
