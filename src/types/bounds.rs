//! 2D domain bounds.

use std::fmt;

/// Axis-aligned rectangular extent in projected coordinates (meters).
///
/// # Example
///
/// ```
/// use shoreline_coupler::types::Bounds2D;
///
/// let bounds = Bounds2D::from_points(&[0.0, 40.0, 10.0], &[5.0, 0.0, 20.0]).unwrap();
/// assert_eq!(bounds.width(), 40.0);
/// assert_eq!(bounds.height(), 20.0);
/// assert_eq!(bounds.center(), (20.0, 10.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds2D {
    /// Minimum x-coordinate (western edge)
    pub x_min: f64,
    /// Maximum x-coordinate (eastern edge)
    pub x_max: f64,
    /// Minimum y-coordinate (southern edge)
    pub y_min: f64,
    /// Maximum y-coordinate (northern edge)
    pub y_max: f64,
}

impl Bounds2D {
    /// Create new bounds.
    ///
    /// # Panics
    ///
    /// Panics if `x_max < x_min` or `y_max < y_min`.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        assert!(
            x_max >= x_min,
            "x_max ({}) must not be less than x_min ({})",
            x_max,
            x_min
        );
        assert!(
            y_max >= y_min,
            "y_max ({}) must not be less than y_min ({})",
            y_max,
            y_min
        );

        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Smallest bounds containing every `(x[i], y[i])`.
    ///
    /// Returns `None` for empty input, mismatched lengths, or any non-finite
    /// coordinate.
    pub fn from_points(x: &[f64], y: &[f64]) -> Option<Self> {
        if x.is_empty() || x.len() != y.len() {
            return None;
        }

        let mut bounds = Self {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        };

        for (&px, &py) in x.iter().zip(y) {
            if !px.is_finite() || !py.is_finite() {
                return None;
            }
            bounds.x_min = bounds.x_min.min(px);
            bounds.x_max = bounds.x_max.max(px);
            bounds.y_min = bounds.y_min.min(py);
            bounds.y_max = bounds.y_max.max(py);
        }

        Some(bounds)
    }

    /// Extent along x.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent along y.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Check if a point is inside the bounds (inclusive).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Return bounds as tuple (x_min, x_max, y_min, y_max).
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.x_min, self.x_max, self.y_min, self.y_max)
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.2}, {:.2}] × [{:.2}, {:.2}]",
            self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_extent() {
        // UTM 18N vertices along a barrier island
        let x = [447_120.0, 447_620.0, 448_370.0];
        let y = [3_897_210.0, 3_897_050.0, 3_897_400.0];
        let b = Bounds2D::from_points(&x, &y).unwrap();

        assert_eq!(b.as_tuple(), (447_120.0, 448_370.0, 3_897_050.0, 3_897_400.0));
        assert_eq!(b.width(), 1250.0);
        assert_eq!(b.height(), 350.0);
        assert!(b.contains(447_620.0, 3_897_050.0));
        assert!(!b.contains(447_000.0, 3_897_200.0));
    }

    #[test]
    fn test_from_points_rejects_bad_input() {
        assert!(Bounds2D::from_points(&[], &[]).is_none());
        assert!(Bounds2D::from_points(&[1.0, 2.0], &[1.0]).is_none());
        assert!(Bounds2D::from_points(&[1.0, f64::NAN], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_single_point_has_zero_extent() {
        let b = Bounds2D::from_points(&[5.0], &[7.0]).unwrap();
        assert_eq!(b.width(), 0.0);
        assert_eq!(b.center(), (5.0, 7.0));
    }

    #[test]
    #[should_panic(expected = "y_max")]
    fn test_inverted_northing() {
        Bounds2D::new(0.0, 10.0, 3_897_400.0, 3_897_050.0);
    }
}
