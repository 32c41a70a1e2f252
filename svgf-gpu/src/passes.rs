use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct ReprojectPassParams {
    /// Minimum blend factor of the current frame's illumination.
    pub alpha: f32,

    /// Minimum blend factor of the current frame's moments.
    pub moments_alpha: f32,

    pub max_history_length: f32,
    pub _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct FilterMomentsPassParams {
    pub phi_color: f32,
    pub phi_normal: f32,

    /// Pixels with at least this many frames of history keep their temporal
    /// variance; others get it estimated spatially.
    pub history_threshold: f32,

    pub variance_epsilon: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct AtrousPassParams {
    pub phi_color: f32,
    pub phi_normal: f32,
    pub variance_epsilon: f32,

    /// Distance between taps, `2^iteration`.
    pub step: u32,
}

impl AtrousPassParams {
    pub fn for_iteration(
        phi_color: f32,
        phi_normal: f32,
        variance_epsilon: f32,
        iteration: u32,
    ) -> Self {
        Self {
            phi_color,
            phi_normal,
            variance_epsilon,
            step: 1 << iteration,
        }
    }
}
