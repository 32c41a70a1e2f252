mod buffers;
mod pass;
mod passes;

use derivative::Derivative;
use glam::{UVec2, Vec4};
use log::{debug, info, trace, warn};
use svgf_gpu::{FilterKernel, Illumination, SvgfKernel};

pub use self::buffers::*;
pub use self::pass::*;
pub use self::passes::*;
use crate::{
    Channels, DenoiserConfig, DenoiserError, FrameInputs, FrameStatus,
    Resources, SkipReason, Texture,
};

/// Buffers that can be inspected through [`Denoiser::debug_buffer()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugBuffer {
    /// Temporally accumulated illumination (`direct + indirect`).
    Reprojected,

    /// Illumination captured for the next frame (`direct + indirect`).
    FilteredPast,

    /// Illumination after the last spatial stage (`direct + indirect`).
    Illumination,

    /// Variance after the last spatial stage (`x` = direct, `y` = indirect).
    Variance,

    /// History length of each pixel, in frames (`x`).
    HistoryLength,
}

/// Spatiotemporal variance-guided filter.
///
/// Takes one frame of noisy, demodulated illumination together with a
/// couple of G-buffers, and produces the filtered, modulated image, keeping
/// whatever history it needs for the next frame.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Denoiser<K = SvgfKernel> {
    #[derivative(Debug = "ignore")]
    kernel: K,
    channels: Channels,
    config: DenoiserConfig,
    pending_config: Option<DenoiserConfig>,
    buffers: Option<DenoiserBuffers>,
    passes: DenoiserPasses,
    needs_clear: bool,
    frame: u32,
}

impl Denoiser {
    pub fn new(channels: Channels) -> Self {
        Self::with_kernel(channels, SvgfKernel)
    }
}

impl<K> Denoiser<K>
where
    K: FilterKernel,
{
    /// Creates a denoiser that uses a custom edge-stopping function.
    pub fn with_kernel(channels: Channels, kernel: K) -> Self {
        info!(
            "Creating denoiser; direct={}, indirect={}, output={}",
            channels.direct, channels.indirect, channels.output
        );

        Self {
            kernel,
            channels,
            config: Default::default(),
            pending_config: None,
            buffers: None,
            passes: Default::default(),
            needs_clear: false,
            frame: 0,
        }
    }

    pub fn channels(&self) -> &Channels {
        &self.channels
    }

    /// Declares textures used by this denoiser, so that `resources` allocates
    /// them.
    pub fn initialize(&self, resources: &mut Resources) {
        debug!("Requesting denoiser textures");

        for name in self.channels.inputs() {
            resources.request_texture(name);
        }

        resources.request_texture(&self.channels.output);
    }

    /// Returns the configuration the next frame is going to use.
    pub fn config(&self) -> &DenoiserConfig {
        self.pending_config.as_ref().unwrap_or(&self.config)
    }

    /// Stages a new configuration; it takes effect at the beginning of the
    /// next frame.
    pub fn configure(&mut self, config: DenoiserConfig) {
        let config = config.sanitized();

        debug!("Configuring denoiser: {:?}", config);

        self.pending_config = Some(config);
    }

    pub fn size(&self) -> Option<UVec2> {
        self.buffers.as_ref().map(|buffers| buffers.size())
    }

    /// Returns the number of frames executed so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Reallocates all of the buffers; the history gets cleared before the
    /// next frame.
    ///
    /// Zero-sized resizes are ignored.
    pub fn resize(&mut self, size: UVec2) {
        if size.x == 0 || size.y == 0 {
            debug!("Ignoring resize to {:?}", size);
            return;
        }

        info!("Resizing denoiser; size={:?}", size);

        self.buffers = Some(DenoiserBuffers::new(size));
        self.needs_clear = true;
    }

    /// Runs a single frame.
    ///
    /// When `output` is not available (yet), the frame is skipped without
    /// touching any of the buffers.
    pub fn execute(
        &mut self,
        inputs: &FrameInputs,
        output: Option<&mut Texture>,
    ) -> Result<FrameStatus, DenoiserError> {
        if let Some(config) = self.pending_config.take() {
            debug!("Applying config: {:?}", config);

            self.config = config;
        }

        let Some(output) = output else {
            return Ok(Self::skip(SkipReason::OutputUnavailable));
        };

        let Some(buffers) = &mut self.buffers else {
            return Ok(Self::skip(SkipReason::NotAllocated));
        };

        inputs.validate(buffers.size())?;

        if output.size() != buffers.size() {
            return Err(DenoiserError::OutputSizeMismatch {
                expected: buffers.size(),
                got: output.size(),
            });
        }

        if self.needs_clear {
            buffers.clear();
            self.needs_clear = false;
        }

        trace!("Executing frame {}", self.frame);

        let status = if self.config.enabled {
            Self::filter(
                &self.passes,
                &self.config,
                &self.kernel,
                inputs,
                buffers,
                output,
            );

            FrameStatus::Filtered
        } else {
            self.passes.modulation.combine_unfiltered(inputs, output);

            FrameStatus::Combined
        };

        self.frame += 1;

        Ok(status)
    }

    /// Runs a single frame, using textures from `resources`.
    ///
    /// See: [`Self::initialize()`].
    pub fn execute_with(
        &mut self,
        resources: &mut Resources,
    ) -> Result<FrameStatus, DenoiserError> {
        let Some(mut output) = resources.take(&self.channels.output) else {
            return Ok(Self::skip(SkipReason::OutputUnavailable));
        };

        let status = FrameInputs::from_resources(resources, &self.channels)
            .and_then(|inputs| self.execute(&inputs, Some(&mut output)));

        resources.insert(self.channels.output.clone(), output);

        status
    }

    /// Returns the history length of given pixel, as of the latest frame.
    pub fn history_length(&self, pos: UVec2) -> Option<u32> {
        let buffers = self.buffers.as_ref()?;

        if pos.x >= buffers.size().x || pos.y >= buffers.size().y {
            return None;
        }

        Some(buffers.latest_reprojected().read(pos).history_length as u32)
    }

    /// Returns a copy of one of the internal buffers, converted into colors.
    pub fn debug_buffer(&self, buffer: DebugBuffer) -> Option<Texture> {
        let buffers = self.buffers.as_ref()?;

        let color = |illumination: Illumination| {
            (illumination.direct_color() + illumination.indirect_color())
                .extend(1.0)
        };

        let texture = match buffer {
            DebugBuffer::Reprojected => buffers
                .latest_reprojected()
                .map("svgf_debug_reprojected", |pixel| {
                    color(pixel.illumination)
                }),

            DebugBuffer::FilteredPast => buffers
                .filtered_past
                .map("svgf_debug_filtered_past", color),

            DebugBuffer::Illumination => buffers
                .latest_filtered()
                .map("svgf_debug_illumination", color),

            DebugBuffer::Variance => buffers
                .latest_filtered()
                .map("svgf_debug_variance", |pixel| {
                    Vec4::new(
                        pixel.direct_variance(),
                        pixel.indirect_variance(),
                        0.0,
                        1.0,
                    )
                }),

            DebugBuffer::HistoryLength => buffers
                .latest_reprojected()
                .map("svgf_debug_history_length", |pixel| {
                    Vec4::new(pixel.history_length, 0.0, 0.0, 1.0)
                }),
        };

        Some(texture)
    }

    fn filter(
        passes: &DenoiserPasses,
        config: &DenoiserConfig,
        kernel: &K,
        inputs: &FrameInputs,
        buffers: &mut DenoiserBuffers,
        output: &mut Texture,
    ) {
        let feedback_iteration = config.feedback_iteration();

        passes.reprojection.run(config, inputs, buffers);
        passes.moment_filter.run(config, kernel, inputs, buffers);

        for iteration in 0..config.iterations {
            if iteration + 1 == config.iterations {
                passes.atrous.run_and_modulate(
                    config, kernel, iteration, inputs, buffers, output,
                );
            } else {
                passes.atrous.run(config, kernel, iteration, inputs, buffers);
            }

            if feedback_iteration == Some(iteration) {
                passes.history.capture(buffers);
            }
        }

        if config.iterations == 0 {
            passes.modulation.modulate(inputs, buffers, output);
        }

        if feedback_iteration.is_none() {
            passes.history.capture_unfiltered(buffers);
        }

        passes.history.swap(inputs, buffers);
    }

    fn skip(reason: SkipReason) -> FrameStatus {
        warn!("Skipping frame: {:?}", reason);

        FrameStatus::Skipped(reason)
    }
}

impl<K> Drop for Denoiser<K> {
    fn drop(&mut self) {
        info!("Deleting denoiser; frames={}", self.frame);
    }
}
