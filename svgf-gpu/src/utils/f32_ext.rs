use glam::{vec4, Vec4};

pub trait F32Ext
where
    Self: Sized,
{
    fn sqr(self) -> Self;
    fn saturate(self) -> Self;

    /// Returns `(w, w, w, w²)`: weight applied to a pixel that keeps color in
    /// `xyz` and variance in `w`.
    fn as_color_variance_weight(self) -> Vec4;
}

impl F32Ext for f32 {
    fn sqr(self) -> Self {
        self * self
    }

    fn saturate(self) -> Self {
        self.clamp(0.0, 1.0)
    }

    fn as_color_variance_weight(self) -> Vec4 {
        vec4(self, self, self, self * self)
    }
}
