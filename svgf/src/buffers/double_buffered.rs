use bytemuck::Pod;
use glam::UVec2;

use crate::Texture;

/// Two instances of a resource, one being written during the current frame
/// and the other one holding whatever the previous frame wrote.
///
/// Roles are exchanged through [`Self::swap()`], so that no data gets
/// physically copied between frames.
#[derive(Debug)]
pub struct DoubleBuffered<T> {
    a: T,
    b: T,
    alternate: bool,
}

impl<T> DoubleBuffered<Texture<T>>
where
    T: Pod,
{
    /// Creates a double-buffered texture.
    ///
    /// See: [`Texture::new()`].
    pub fn new(label: impl AsRef<str>, size: UVec2) -> Self {
        let label = label.as_ref();

        Self {
            a: Texture::new(format!("{}_a", label), size),
            b: Texture::new(format!("{}_b", label), size),
            alternate: false,
        }
    }

    pub fn clear(&mut self) {
        self.a.clear();
        self.b.clear();
    }
}

impl<T> DoubleBuffered<T> {
    pub fn curr(&self) -> &T {
        if self.alternate {
            &self.b
        } else {
            &self.a
        }
    }

    pub fn prev(&self) -> &T {
        if self.alternate {
            &self.a
        } else {
            &self.b
        }
    }

    pub fn curr_mut(&mut self) -> &mut T {
        if self.alternate {
            &mut self.b
        } else {
            &mut self.a
        }
    }

    /// Returns the current instance for writing together with the previous
    /// one for reading.
    pub fn split_mut(&mut self) -> (&mut T, &T) {
        if self.alternate {
            (&mut self.b, &self.a)
        } else {
            (&mut self.a, &self.b)
        }
    }

    /// Exchanges roles of both instances; what was written as current becomes
    /// the previous one.
    pub fn swap(&mut self) {
        self.alternate = !self.alternate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swapping() {
        let mut target = DoubleBuffered {
            a: 1,
            b: 2,
            alternate: false,
        };

        assert_eq!((&1, &2), (target.curr(), target.prev()));

        {
            let (curr, prev) = target.split_mut();

            *curr = *prev * 10;
        }

        target.swap();

        assert_eq!((&2, &20), (target.curr(), target.prev()));

        *target.curr_mut() = 3;

        assert_eq!((&3, &20), (target.curr(), target.prev()));
    }
}
