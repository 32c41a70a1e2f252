use glam::{uvec2, vec3, Vec2, Vec3, Vec3Swizzles};

pub struct Normal;

impl Normal {
    /// Compresses normal from Vec3 into Vec2 using octahedron-normal mapping.
    pub fn encode(n: Vec3) -> Vec2 {
        let n = n / (n.x.abs() + n.y.abs() + n.z.abs());

        let n = if n.z >= 0.0 {
            n.xy()
        } else {
            let mut t = 1.0 - n.yx().abs();

            t.x = t.x.copysign(n.x);
            t.y = t.y.copysign(n.y);
            t
        };

        n * 0.5 + 0.5
    }

    /// See: [`Self::encode()`].
    pub fn decode(n: Vec2) -> Vec3 {
        let n = n * 2.0 - 1.0;
        let mut n = vec3(n.x, n.y, 1.0 - n.x.abs() - n.y.abs());
        let t = (-n.z).max(0.0);

        n.x -= t.copysign(n.x);
        n.y -= t.copysign(n.y);
        n.normalize()
    }

    /// Encodes normal as two 16-bit unorms stored in the bits of a single
    /// `f32`, so that it fits into one channel of a G-buffer texture.
    ///
    /// The returned value is meant to be copied around, never computed with.
    pub fn pack(n: Vec3) -> f32 {
        let n = Self::encode(n).clamp(Vec2::ZERO, Vec2::ONE) * 65535.0;
        let n = n.round().as_uvec2();

        f32::from_bits(n.x | (n.y << 16))
    }

    /// See: [`Self::pack()`].
    pub fn unpack(n: f32) -> Vec3 {
        let n = n.to_bits();
        let n = uvec2(n & 0xffff, n >> 16).as_vec2() / 65535.0;

        Self::decode(n)
    }
}
