//! CPU implementation of the spatiotemporal variance-guided filter (SVGF):
//! a real-time denoiser for one-sample-per-pixel path-traced images.
//!
//! The entry point is [`Denoiser`]; see [`FrameInputs`] for the buffers it
//! expects each frame.

#![allow(clippy::new_without_default)]

mod buffers;
mod config;
mod denoiser;
mod error;
mod resources;
mod utils;

pub use self::buffers::*;
pub use self::config::*;
pub use self::denoiser::*;
pub use self::error::*;
pub use self::resources::*;
pub use svgf_gpu as gpu;
pub use svgf_gpu::{
    CompactNormDepth, EdgeStopping, FilterKernel, Illumination, KernelSample,
    LinearZ, SvgfKernel,
};
