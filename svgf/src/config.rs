/// Upper bound for the number of à-trous iterations.
pub const MAX_ITERATIONS: u32 = 16;

/// Upper bound for the edge-stopping sensitivities.
pub const MAX_PHI: f32 = 10000.0;

/// Tunables of the denoiser.
///
/// Changes are staged through [`crate::Denoiser::configure()`] and take
/// effect at the beginning of the next frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DenoiserConfig {
    /// When disabled, the denoiser just combines the raw inputs with their
    /// albedos.
    pub enabled: bool,

    /// Number of à-trous iterations; `0` skips spatial filtering.
    pub iterations: u32,

    /// Iteration whose output becomes the next frame's temporal history.
    ///
    /// Out-of-range values (negative ones) make the next frame reuse the
    /// unfiltered reprojection output instead; values past the last
    /// iteration select the last one.
    pub feedback_tap: i32,

    /// Floor for the variance estimates.
    pub variance_epsilon: f32,

    /// Luminance sensitivity of the edge-stopping function.
    pub phi_color: f32,

    /// Normal sensitivity of the edge-stopping function.
    pub phi_normal: f32,

    /// Minimum blend factor of the current frame's illumination.
    pub alpha: f32,

    /// Minimum blend factor of the current frame's moments.
    pub moments_alpha: f32,

    /// Cap for the per-pixel history length.
    pub max_history_length: u32,

    /// History length below which variance gets estimated spatially.
    pub moment_history_threshold: u32,
}

impl DenoiserConfig {
    /// Returns a copy with every value clamped into its valid range.
    pub fn sanitized(&self) -> Self {
        Self {
            enabled: self.enabled,
            iterations: self.iterations.min(MAX_ITERATIONS),
            feedback_tap: self.feedback_tap,
            variance_epsilon: sanitize(self.variance_epsilon, 0.0, 1.0),
            phi_color: sanitize(self.phi_color, 0.0, MAX_PHI),
            phi_normal: sanitize(self.phi_normal, 0.0, MAX_PHI),
            alpha: sanitize(self.alpha, 0.0, 1.0),
            moments_alpha: sanitize(self.moments_alpha, 0.0, 1.0),
            max_history_length: self.max_history_length.max(1),
            moment_history_threshold: self.moment_history_threshold,
        }
    }

    /// Returns the iteration whose output should be captured for the next
    /// frame, or `None` when the unfiltered reprojection output should be.
    pub fn feedback_iteration(&self) -> Option<u32> {
        if self.feedback_tap < 0 || self.iterations == 0 {
            None
        } else {
            Some((self.feedback_tap as u32).min(self.iterations - 1))
        }
    }
}

impl Default for DenoiserConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            iterations: 4,
            feedback_tap: 1,
            variance_epsilon: 1e-4,
            phi_color: 10.0,
            phi_normal: 128.0,
            alpha: 0.05,
            moments_alpha: 0.2,
            max_history_length: 32,
            moment_history_threshold: 4,
        }
    }
}

fn sanitize(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
