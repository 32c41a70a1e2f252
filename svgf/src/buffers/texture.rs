use bytemuck::{Pod, Zeroable};
use derivative::Derivative;
use glam::{UVec2, Vec4};
use svgf_gpu::Tex;

/// Screen-sized buffer of pixels, stored row by row.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Texture<T = Vec4> {
    label: String,
    size: UVec2,
    #[derivative(Debug = "ignore")]
    pixels: Vec<T>,
}

impl<T> Texture<T>
where
    T: Pod,
{
    /// Allocates a zeroed texture.
    pub fn new(label: impl AsRef<str>, size: UVec2) -> Self {
        let label = label.as_ref();

        log::debug!("Allocating texture `{label}`; size={:?}", size);

        Self {
            label: label.to_owned(),
            size,
            pixels: vec![T::zeroed(); (size.x * size.y) as usize],
        }
    }

    /// Allocates a texture and fills it with `f(position)`.
    pub fn from_fn(
        label: impl AsRef<str>,
        size: UVec2,
        mut f: impl FnMut(UVec2) -> T,
    ) -> Self {
        let mut this = Self::new(label, size);

        for y in 0..size.y {
            for x in 0..size.x {
                let pos = UVec2::new(x, y);

                this.write(pos, f(pos));
            }
        }

        this
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    pub fn read(&self, pos: UVec2) -> T {
        self.pixels[self.idx(pos)]
    }

    pub fn write(&mut self, pos: UVec2, value: T) {
        let idx = self.idx(pos);

        self.pixels[idx] = value;
    }

    /// Returns a read-only view, as seen by the kernels.
    pub fn readable(&self) -> Tex<'_, T> {
        Tex::new(&self.pixels, self.size)
    }

    pub fn clear(&mut self) {
        self.pixels.fill(T::zeroed());
    }

    /// Copies pixels of another texture of the same size.
    pub fn copy_from(&mut self, other: &Self) {
        assert_eq!(self.size, other.size);

        self.pixels.copy_from_slice(&other.pixels);
    }

    /// Returns the raw contents of this texture.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Converts this texture into a color one, using `f` to map each pixel.
    pub fn map(
        &self,
        label: impl AsRef<str>,
        f: impl Fn(T) -> Vec4,
    ) -> Texture {
        Texture {
            label: label.as_ref().to_owned(),
            size: self.size,
            pixels: self.pixels.iter().map(|pixel| f(*pixel)).collect(),
        }
    }

    fn idx(&self, pos: UVec2) -> usize {
        (pos.y * self.size.x + pos.x) as usize
    }
}

#[cfg(feature = "png")]
impl Texture {
    /// Saves this texture as an 8-bit PNG, clamping colors to `[0, 1]`; alpha
    /// is ignored.
    pub fn save_png(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), crate::DenoiserError> {
        let path = path.as_ref();

        log::debug!("Saving texture `{}` to {}", self.label, path.display());

        let image =
            image::RgbImage::from_fn(self.size.x, self.size.y, |x, y| {
                let color = self
                    .read(UVec2::new(x, y))
                    .truncate()
                    .clamp(glam::Vec3::ZERO, glam::Vec3::ONE);

                let color = (color * 255.0).round().as_uvec3();

                image::Rgb([color.x as u8, color.y as u8, color.z as u8])
            });

        image.save(path)?;

        Ok(())
    }
}
