use crate::{ComputePass, DenoiserBuffers, FrameInputs, Texture};

#[derive(Debug)]
pub struct ModulationPass {
    pass: ComputePass,
}

impl ModulationPass {
    pub fn new() -> Self {
        Self {
            pass: ComputePass::new("modulation"),
        }
    }

    /// Modulates this frame's temporally accumulated illumination, as it came
    /// out of the reprojector.
    ///
    /// Used when there are no wavelet iterations to fuse the modulation into.
    pub fn modulate(
        &self,
        inputs: &FrameInputs,
        buffers: &DenoiserBuffers,
        output: &mut Texture,
    ) {
        let reprojected = buffers.reprojected.curr().readable();
        let direct_albedo = inputs.direct_albedo.readable();
        let indirect_albedo = inputs.indirect_albedo.readable();

        self.pass.run(output, |pos| {
            svgf_shaders::modulate::modulate(
                reprojected.read(pos).illumination,
                direct_albedo.read(pos),
                indirect_albedo.read(pos),
            )
        });
    }

    /// Combines this frame's raw inputs, bypassing the whole pipeline.
    pub fn combine_unfiltered(
        &self,
        inputs: &FrameInputs,
        output: &mut Texture,
    ) {
        let direct = inputs.direct.readable();
        let indirect = inputs.indirect.readable();
        let direct_albedo = inputs.direct_albedo.readable();
        let indirect_albedo = inputs.indirect_albedo.readable();

        self.pass.run(output, |pos| {
            svgf_shaders::modulate::combine_unfiltered(
                direct.read(pos),
                indirect.read(pos),
                direct_albedo.read(pos),
                indirect_albedo.read(pos),
            )
        });
    }
}
