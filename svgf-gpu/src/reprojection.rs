use glam::{IVec2, UVec2, Vec2};

/// Position a pixel had in the previous frame, as told by its motion vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reprojection {
    pub prev_pos: Vec2,
}

impl Reprojection {
    /// How far outside the screen the previous position may lay while its
    /// taps still touch the screen.
    const MARGIN: f32 = 2.0;

    /// Builds reprojection of the pixel at `pos`, given its motion vector (in
    /// pixels, pointing from the current to the previous position).
    pub fn from_motion(pos: UVec2, motion: Vec2) -> Self {
        Self {
            prev_pos: pos.as_vec2() + motion,
        }
    }

    /// Returns whether the previous position is finite and lays close enough
    /// to a screen of given size for any of its neighbours to be on it.
    ///
    /// Positions further away can't yield any history, and their integer
    /// coordinates might not even be representable.
    pub fn is_near_screen(&self, size: UVec2) -> bool {
        let min = Vec2::splat(-Self::MARGIN);
        let max = size.as_vec2() + Self::MARGIN;

        self.prev_pos.is_finite()
            && self.prev_pos.cmpge(min).all()
            && self.prev_pos.cmple(max).all()
    }

    pub fn prev_pos_round(&self) -> IVec2 {
        self.prev_pos.round().as_ivec2()
    }

    pub fn prev_pos_fract(&self) -> Vec2 {
        self.prev_pos - self.prev_pos.floor()
    }
}

#[cfg(test)]
mod tests {
    use glam::{ivec2, uvec2, vec2};

    use super::*;

    #[test]
    fn positions() {
        let target = Reprojection::from_motion(uvec2(4, 2), vec2(-1.25, 0.5));

        assert_eq!(vec2(2.75, 2.5), target.prev_pos);
        assert_eq!(ivec2(3, 3), target.prev_pos_round());
        assert_eq!(vec2(0.75, 0.5), target.prev_pos_fract());
    }

    #[test]
    fn near_screen() {
        let size = uvec2(8, 4);
        let at = |motion| Reprojection::from_motion(uvec2(0, 0), motion);

        assert!(at(vec2(3.5, 2.0)).is_near_screen(size));
        assert!(at(vec2(-1.5, 0.0)).is_near_screen(size));
        assert!(at(vec2(9.0, 5.0)).is_near_screen(size));
        assert!(!at(vec2(-3.0, 0.0)).is_near_screen(size));
        assert!(!at(vec2(0.0, 1e12)).is_near_screen(size));
        assert!(!at(vec2(f32::INFINITY, 0.0)).is_near_screen(size));
        assert!(!at(vec2(f32::NAN, 0.0)).is_near_screen(size));
    }
}
