//! Board symmetries composed with an optional colour swap.
//!
//! The eight symmetries of a square board (four quarter turns, each with or
//! without a mirror) together with a stone-colour swap form a group of order
//! 16. A transform is applied as: mirror the x axis if `reflected`, then turn
//! clockwise `rotation` quarter turns, then swap colours if `color_flipped`.
//!
//! Odd quarter turns exchange width and height, so rectangular boards only
//! use the four transforms with an even rotation.

use crate::board::{Color, Point};

/// One element of the symmetry group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Transform {
    rotation: u8,
    reflected: bool,
    color_flipped: bool,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        rotation: 0,
        reflected: false,
        color_flipped: false,
    };

    pub fn new(rotation: u8, reflected: bool, color_flipped: bool) -> Self {
        Self {
            rotation: rotation % 4,
            reflected,
            color_flipped,
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Whether the transform maps a `width x height` board onto itself.
    #[inline]
    pub fn fits(&self, width: usize, height: usize) -> bool {
        self.rotation % 2 == 0 || width == height
    }

    /// Every transform valid for the given board shape.
    pub fn all(width: usize, height: usize, allow_color_flip: bool) -> Vec<Transform> {
        let flips: &[bool] = if allow_color_flip {
            &[false, true]
        } else {
            &[false]
        };
        let mut out = Vec::with_capacity(16);
        for &color_flipped in flips {
            for rotation in 0..4 {
                for reflected in [false, true] {
                    let t = Transform::new(rotation, reflected, color_flipped);
                    if t.fits(width, height) {
                        out.push(t);
                    }
                }
            }
        }
        out
    }

    /// The transform equivalent to applying `self` and then `then`.
    ///
    /// A mirror followed by a turn equals the opposite turn followed by the
    /// mirror, which is why the first rotation changes sign when `then`
    /// reflects.
    pub fn compose(self, then: Transform) -> Transform {
        let first = if then.reflected {
            (4 - self.rotation) % 4
        } else {
            self.rotation
        };
        Transform::new(
            (then.rotation + first) % 4,
            self.reflected ^ then.reflected,
            self.color_flipped ^ then.color_flipped,
        )
    }

    pub fn inverse(self) -> Transform {
        if self.reflected {
            // mirrored elements are involutions
            self
        } else {
            Transform::new((4 - self.rotation) % 4, false, self.color_flipped)
        }
    }

    /// Map a point of a `width x height` board.
    ///
    /// The result lives on a board whose sides are exchanged when the rotation
    /// is odd.
    pub fn apply(&self, pt: Point, width: usize, height: usize) -> Point {
        let (mut x, mut y) = pt;
        let (mut w, mut h) = (width, height);
        if self.reflected {
            x = w - 1 - x;
        }
        for _ in 0..self.rotation {
            let nx = h - 1 - y;
            let ny = x;
            x = nx;
            y = ny;
            std::mem::swap(&mut w, &mut h);
        }
        (x, y)
    }

    #[inline]
    pub fn apply_color(&self, color: Color) -> Color {
        if self.color_flipped {
            color.opponent()
        } else {
            color
        }
    }

    /// Board dimensions after the transform.
    #[inline]
    pub fn apply_dims(&self, width: usize, height: usize) -> (usize, usize) {
        if self.rotation % 2 == 1 {
            (height, width)
        } else {
            (width, height)
        }
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.rotation as u32 * 90)?;
        if self.reflected {
            write!(f, "m")?;
        }
        if self.color_flipped {
            write!(f, "c")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all16() -> Vec<Transform> {
        Transform::all(3, 3, true)
    }

    #[test]
    fn test_group_has_sixteen_elements() {
        let all = all16();
        assert_eq!(all.len(), 16);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(Transform::all(3, 3, false).len(), 8);
        assert_eq!(Transform::all(2, 3, false).len(), 4);
        assert_eq!(Transform::all(2, 3, true).len(), 8);
    }

    #[test]
    fn test_inverse_and_identity() {
        for a in all16() {
            assert!(a.compose(a.inverse()).is_identity(), "{a}");
            assert!(a.inverse().compose(a).is_identity(), "{a}");
            assert_eq!(a.compose(Transform::IDENTITY), a);
            assert_eq!(Transform::IDENTITY.compose(a), a);
        }
    }

    #[test]
    fn test_compose_is_associative() {
        let all = all16();
        for &a in &all {
            for &b in &all {
                for &c in &all {
                    assert_eq!(a.compose(b).compose(c), a.compose(b.compose(c)));
                }
            }
        }
    }

    #[test]
    fn test_apply_matches_compose() {
        let n = 3;
        for a in all16() {
            for b in all16() {
                let ab = a.compose(b);
                for x in 0..n {
                    for y in 0..n {
                        let step = b.apply(a.apply((x, y), n, n), n, n);
                        assert_eq!(step, ab.apply((x, y), n, n), "a={a} b={b}");
                    }
                }
                assert_eq!(
                    b.apply_color(a.apply_color(Color::Black)),
                    ab.apply_color(Color::Black)
                );
            }
        }
    }

    #[test]
    fn test_apply_matches_compose_on_rectangle() {
        let (w, h) = (2, 3);
        let all = Transform::all(w, h, false);
        for &a in &all {
            for &b in &all {
                for x in 0..w {
                    for y in 0..h {
                        let step = b.apply(a.apply((x, y), w, h), w, h);
                        assert_eq!(step, a.compose(b).apply((x, y), w, h));
                    }
                }
            }
        }
    }

    #[test]
    fn test_quarter_turn_is_clockwise() {
        let t = Transform::new(1, false, false);
        // top-left corner goes to top-right
        assert_eq!(t.apply((0, 0), 3, 3), (2, 0));
        assert_eq!(t.apply((2, 0), 3, 3), (2, 2));
        assert_eq!(t.apply_dims(2, 3), (3, 2));
    }
}
