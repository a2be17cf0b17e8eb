//! Board size and komi, fixed once per solving session.

use crate::constants::{MAX_AREA, MAX_SIDE};
use crate::error::SettingsError;

/// Immutable game settings shared by every component of a solve.
///
/// Komi is kept doubled so half-point komi never needs fractional arithmetic.
/// It is credited to White.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    width: usize,
    height: usize,
    komi2: i32,
}

impl Settings {
    /// Validate and build settings from a doubled komi.
    pub fn new(width: usize, height: usize, komi2: i32) -> Result<Self, SettingsError> {
        for side in [width, height] {
            if side == 0 || side > MAX_SIDE {
                return Err(SettingsError::SideOutOfRange {
                    side,
                    max: MAX_SIDE,
                });
            }
        }
        let area = width * height;
        if area > MAX_AREA {
            return Err(SettingsError::AreaTooLarge {
                area,
                max: MAX_AREA,
            });
        }
        Ok(Self {
            width,
            height,
            komi2,
        })
    }

    /// Build settings from a komi given in points, e.g. `0.5` or `-2`.
    pub fn with_komi(width: usize, height: usize, komi: f32) -> Result<Self, SettingsError> {
        let doubled = komi * 2.0;
        if doubled.fract() != 0.0 || !doubled.is_finite() {
            return Err(SettingsError::KomiNotHalfInteger { komi });
        }
        Self::new(width, height, doubled as i32)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of points on the board.
    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Upper bound of a doubled score (`2 * area`).
    #[inline]
    pub fn max_score(&self) -> u32 {
        2 * self.area() as u32
    }

    #[inline]
    pub fn komi2(&self) -> i32 {
        self.komi2
    }

    /// Komi in points, for display.
    pub fn komi(&self) -> f32 {
        self.komi2 as f32 / 2.0
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Colour-swapped positions are only equivalent when komi favours nobody.
    #[inline]
    pub fn allows_color_flip(&self) -> bool {
        self.komi2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_komi_is_doubled() {
        let s = Settings::with_komi(3, 3, 1.5).unwrap();
        assert_eq!(s.komi2(), 3);
        assert_eq!(s.komi(), 1.5);
        assert_eq!(s.max_score(), 18);
        assert!(!s.allows_color_flip());
    }

    #[test]
    fn test_rejects_bad_komi() {
        assert_eq!(
            Settings::with_komi(2, 2, 0.3),
            Err(SettingsError::KomiNotHalfInteger { komi: 0.3 })
        );
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(matches!(
            Settings::new(0, 2, 0),
            Err(SettingsError::SideOutOfRange { side: 0, .. })
        ));
        assert!(matches!(
            Settings::new(9, 9, 0),
            Err(SettingsError::AreaTooLarge { area: 81, .. })
        ));
        assert!(Settings::new(8, 10, 0).is_ok());
    }
}
