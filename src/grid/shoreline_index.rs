//! Nearest-shoreline-vertex queries.
//!
//! The beach-profile builder needs, for every grid cell, the distance to the
//! closest shoreline vertex lying inside a square search window around the
//! cell. An R-tree over the vertices answers this without scanning the whole
//! shoreline per cell. Vertices outside the window count as lying at a fixed
//! outside distance, which caps the result whenever the window misses any.

use rstar::RTree;

use crate::types::Bounds2D;

/// R-tree over shoreline vertices.
pub struct ShorelineIndex {
    tree: RTree<[f64; 2]>,
    bounds: Option<Bounds2D>,
}

impl ShorelineIndex {
    /// Bulk-load the vertices `(x[i], y[i])`.
    ///
    /// Extra items of the longer slice are ignored.
    pub fn new(x: &[f64], y: &[f64]) -> Self {
        let n = x.len().min(y.len());
        let points: Vec<[f64; 2]> = x.iter().zip(y).map(|(&px, &py)| [px, py]).collect();
        Self {
            tree: RTree::bulk_load(points),
            bounds: Bounds2D::from_points(&x[..n], &y[..n]),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Squared distance to the nearest vertex with `|dx| < radius` and
    /// `|dy| < radius`, or `None` if the window is empty.
    ///
    /// Vertices are visited in order of increasing distance. The first one
    /// inside the window is the answer; the search stops once the distance
    /// exceeds the window's half-diagonal, beyond which no vertex can lie
    /// inside it.
    pub fn nearest_within_window(&self, x: f64, y: f64, radius: f64) -> Option<f64> {
        let max_distance_2 = 2.0 * radius * radius;

        for (point, distance_2) in self.tree.nearest_neighbor_iter_with_distance_2(&[x, y]) {
            if distance_2 >= max_distance_2 {
                return None;
            }
            if (point[0] - x).abs() < radius && (point[1] - y).abs() < radius {
                return Some(distance_2);
            }
        }

        None
    }

    /// True if every vertex lies inside the window around `(x, y)`.
    pub fn window_holds_all(&self, x: f64, y: f64, radius: f64) -> bool {
        match self.bounds {
            Some(b) => {
                b.x_min > x - radius
                    && b.x_max < x + radius
                    && b.y_min > y - radius
                    && b.y_max < y + radius
            }
            None => true,
        }
    }

    /// Squared shoreline distance with vertices outside the window counted
    /// at `outside_2`.
    ///
    /// The result is the smaller of the nearest in-window distance and
    /// `outside_2` unless the window holds every vertex.
    pub fn windowed_distance_2(&self, x: f64, y: f64, radius: f64, outside_2: f64) -> f64 {
        match self.nearest_within_window(x, y, radius) {
            Some(d2) if self.window_holds_all(x, y, radius) => d2,
            Some(d2) => d2.min(outside_2),
            None => outside_2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference implementation: scan every vertex inside the window.
    fn brute_force(x: &[f64], y: &[f64], px: f64, py: f64, radius: f64) -> Option<f64> {
        x.iter()
            .zip(y)
            .filter(|&(&vx, &vy)| (vx - px).abs() < radius && (vy - py).abs() < radius)
            .map(|(&vx, &vy)| (vx - px).powi(2) + (vy - py).powi(2))
            .reduce(f64::min)
    }

    #[test]
    fn test_matches_brute_force() {
        let x: Vec<f64> = (0..40).map(|i| i as f64 * 25.0).collect();
        let y: Vec<f64> = x.iter().map(|v| 200.0 + 50.0 * (v / 150.0).sin()).collect();
        let index = ShorelineIndex::new(&x, &y);

        for &(px, py) in &[(0.0, 0.0), (500.0, 900.0), (-300.0, 210.0), (2000.0, 2000.0)] {
            for &radius in &[100.0, 400.0, 1e5] {
                let expected = brute_force(&x, &y, px, py, radius);
                let actual = index.nearest_within_window(px, py, radius);
                assert_eq!(actual, expected, "point ({px}, {py}), radius {radius}");
            }
        }
    }

    #[test]
    fn test_window_excludes_nearest_outside_box() {
        // Nearest vertex is just outside the window along x; a farther one
        // sits inside near the corner.
        let x = [101.0, 90.0];
        let y = [0.0, 90.0];
        let index = ShorelineIndex::new(&x, &y);

        let d2 = index.nearest_within_window(0.0, 0.0, 100.0).unwrap();
        assert_eq!(d2, 90.0 * 90.0 * 2.0);
        assert!(!index.window_holds_all(0.0, 0.0, 100.0));
    }

    #[test]
    fn test_empty_window() {
        let index = ShorelineIndex::new(&[1000.0], &[1000.0]);
        assert_eq!(index.nearest_within_window(0.0, 0.0, 10.0), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_outside_vertex_caps_distance() {
        // In-window vertex at 140 m, another vertex beyond the window
        let index = ShorelineIndex::new(&[99.0, 500.0], &[99.0, 0.0]);
        assert_eq!(index.nearest_within_window(0.0, 0.0, 100.0), Some(2.0 * 99.0 * 99.0));
        assert_eq!(index.windowed_distance_2(0.0, 0.0, 100.0, 1.0e4), 1.0e4);

        // Once the window covers the whole shoreline there is no cap
        assert!(index.window_holds_all(0.0, 0.0, 1000.0));
        assert_eq!(
            index.windowed_distance_2(0.0, 0.0, 1000.0, 1.0e4),
            2.0 * 99.0 * 99.0
        );

        // Empty window
        assert_eq!(index.windowed_distance_2(5000.0, 0.0, 100.0, 1.0e4), 1.0e4);
    }
}
