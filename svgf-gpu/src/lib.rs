//! Common structs, algorithms etc. used by the denoiser's kernels and its
//! host-side passes.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]

mod illumination;
mod kernel;
mod linear_z;
mod normal;
mod passes;
mod reprojection;
mod surface;
mod tex;
mod utils;

pub use self::illumination::*;
pub use self::kernel::*;
pub use self::linear_z::*;
pub use self::normal::*;
pub use self::passes::*;
pub use self::reprojection::*;
pub use self::surface::*;
pub use self::tex::*;
pub use self::utils::*;

pub mod prelude {
    pub use glam::*;

    pub use crate::*;
}

/// Smallest positive value used to guard divisions in the kernels.
pub const SVGF_EPSILON: f32 = 1e-8;
