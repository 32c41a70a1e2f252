use log::trace;
use svgf_gpu::{AtrousPassParams, FilterKernel, SurfaceMap};

use crate::{ComputePass, DenoiserBuffers, DenoiserConfig, FrameInputs, Texture};

#[derive(Debug)]
pub struct AtrousPass {
    pass: ComputePass,
}

impl AtrousPass {
    pub fn new() -> Self {
        Self {
            pass: ComputePass::new("atrous"),
        }
    }

    /// Runs a single iteration, leaving its result in the ping-pong buffers.
    pub fn run<K>(
        &self,
        config: &DenoiserConfig,
        kernel: &K,
        iteration: u32,
        inputs: &FrameInputs,
        buffers: &mut DenoiserBuffers,
    ) where
        K: FilterKernel,
    {
        let params = Self::params(config, iteration);
        let surface_map = SurfaceMap::new(inputs.compact_norm_depth.readable());
        let (target, source) = buffers.ping_pong.split_mut();
        let source = source.readable();

        self.pass.run(target, |pos| {
            svgf_shaders::atrous::atrous(
                pos,
                &params,
                kernel,
                surface_map,
                source,
            )
        });

        buffers.ping_pong.swap();
    }

    /// Runs the last iteration, additionally modulating its result into
    /// `output`.
    pub fn run_and_modulate<K>(
        &self,
        config: &DenoiserConfig,
        kernel: &K,
        iteration: u32,
        inputs: &FrameInputs,
        buffers: &mut DenoiserBuffers,
        output: &mut Texture,
    ) where
        K: FilterKernel,
    {
        let params = Self::params(config, iteration);
        let surface_map = SurfaceMap::new(inputs.compact_norm_depth.readable());
        let direct_albedo = inputs.direct_albedo.readable();
        let indirect_albedo = inputs.indirect_albedo.readable();
        let (target, source) = buffers.ping_pong.split_mut();
        let source = source.readable();

        self.pass.run2(target, output, |pos| {
            let illumination = svgf_shaders::atrous::atrous(
                pos,
                &params,
                kernel,
                surface_map,
                source,
            );

            let color = svgf_shaders::modulate::modulate(
                illumination,
                direct_albedo.read(pos),
                indirect_albedo.read(pos),
            );

            (illumination, color)
        });

        buffers.ping_pong.swap();
    }

    fn params(config: &DenoiserConfig, iteration: u32) -> AtrousPassParams {
        let params = AtrousPassParams::for_iteration(
            config.phi_color,
            config.phi_normal,
            config.variance_epsilon,
            iteration,
        );

        trace!("À-trous iteration {iteration}; step={}", params.step);

        params
    }
}
