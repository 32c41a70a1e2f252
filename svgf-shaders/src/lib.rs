//! Per-pixel kernels of the denoiser's stages.
//!
//! Every kernel is a pure function of the pixel position and read-only views
//! of the buffers it depends on; it returns the value of the pixel being
//! computed and it's up to the caller to store it.

pub mod atrous;
pub mod filter_moments;
pub mod modulate;
pub mod reproject;
