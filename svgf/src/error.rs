use glam::UVec2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DenoiserError {
    #[error(
        "input `{channel}` has size {got}, but the denoiser expects {expected}"
    )]
    InputSizeMismatch {
        channel: String,
        expected: UVec2,
        got: UVec2,
    },

    #[error("output has size {got}, but the denoiser expects {expected}")]
    OutputSizeMismatch { expected: UVec2, got: UVec2 },

    #[error("input `{0}` is not available")]
    MissingInput(String),

    #[cfg(feature = "png")]
    #[error("couldn't export texture")]
    Export(#[from] image::ImageError),
}

/// Outcome of a frame that didn't fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// The whole pipeline ran and the output holds the filtered image.
    Filtered,

    /// Filtering is disabled; the output holds the raw, combined inputs.
    Combined,

    /// Nothing was written.
    Skipped(SkipReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The output buffer hasn't been allocated yet.
    OutputUnavailable,

    /// The denoiser hasn't been resized yet.
    NotAllocated,
}
