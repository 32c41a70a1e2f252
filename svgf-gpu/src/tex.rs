use glam::{IVec2, UVec2, Vec4};

/// Read-only view of a screen-sized texture.
///
/// This is what kernels get to see of the buffers owned by the host; since a
/// view can't be written through, a kernel can never observe a texture that's
/// being written during the same dispatch.
#[derive(Clone, Copy, Debug)]
pub struct Tex<'a, T = Vec4> {
    data: &'a [T],
    size: UVec2,
}

pub type TexRgba32<'a> = Tex<'a, Vec4>;

impl<'a, T> Tex<'a, T>
where
    T: Copy,
{
    pub fn new(data: &'a [T], size: UVec2) -> Self {
        assert_eq!(data.len(), (size.x * size.y) as usize);

        Self { data, size }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Returns whether given point lays inside the texture.
    pub fn contains(&self, pos: IVec2) -> bool {
        let size = self.size.as_ivec2();

        pos.x >= 0 && pos.y >= 0 && pos.x < size.x && pos.y < size.y
    }

    /// Clamps given point to the nearest texel.
    pub fn clamp(&self, pos: IVec2) -> UVec2 {
        pos.clamp(IVec2::ZERO, self.size.as_ivec2() - 1).as_uvec2()
    }

    /// Returns a unique index for given point; used to index into the
    /// underlying storage.
    pub fn screen_to_idx(&self, pos: UVec2) -> usize {
        (pos.y * self.size.x + pos.x) as usize
    }

    pub fn read(&self, pos: UVec2) -> T {
        self.data[self.screen_to_idx(pos)]
    }

    /// Reads texel at given point, provided it lays inside the texture.
    pub fn get(&self, pos: IVec2) -> Option<T> {
        if self.contains(pos) {
            Some(self.read(pos.as_uvec2()))
        } else {
            None
        }
    }
}
