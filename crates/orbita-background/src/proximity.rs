//! Pair search for star connections.
//!
//! The field only needs "every unordered pair closer than `threshold`". How
//! the pairs are found is behind [`ProximityIndex`] so the quadratic scan can
//! be swapped for bucketing without touching the drawing code.

use std::collections::HashMap;

use orbita_core::Point;

/// Two point indices (`a < b`) and the distance between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
}

/// Finds every unordered pair of points with `distance < threshold`.
pub trait ProximityIndex {
    /// Clear `out` and fill it with the close pairs of `points`.
    fn pairs_within(&mut self, points: &[Point], threshold: f64, out: &mut Vec<Pair>);
}

/// Checks all `n * (n - 1) / 2` pairs.
#[derive(Debug, Default, Clone, Copy)]
pub struct BruteForce;

impl ProximityIndex for BruteForce {
    fn pairs_within(&mut self, points: &[Point], threshold: f64, out: &mut Vec<Pair>) {
        out.clear();
        for (i, &p) in points.iter().enumerate() {
            for (j, &q) in points.iter().enumerate().skip(i + 1) {
                let distance = p.distance(q);
                if distance < threshold {
                    out.push(Pair {
                        a: i,
                        b: j,
                        distance,
                    });
                }
            }
        }
    }
}

/// Uniform grid with cells as wide as the threshold, so a close pair always
/// sits in the same or in neighbouring cells.
#[derive(Debug, Default)]
pub struct GridBuckets {
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

/// Own cell plus the forward half of the 8-neighbourhood; every pair of
/// adjacent cells is visited exactly once.
const FORWARD_NEIGHBOURS: [(i64, i64); 4] = [(1, 0), (-1, 1), (0, 1), (1, 1)];

impl GridBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(point: Point, size: f64) -> (i64, i64) {
        ((point.x / size).floor() as i64, (point.y / size).floor() as i64)
    }
}

impl ProximityIndex for GridBuckets {
    fn pairs_within(&mut self, points: &[Point], threshold: f64, out: &mut Vec<Pair>) {
        out.clear();
        if threshold <= 0.0 || points.len() < 2 {
            return;
        }

        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        for (i, &p) in points.iter().enumerate() {
            self.buckets
                .entry(Self::cell(p, threshold))
                .or_default()
                .push(i);
        }

        let mut push_if_close = |i: usize, j: usize| {
            let distance = points[i].distance(points[j]);
            if distance < threshold {
                let (a, b) = if i < j { (i, j) } else { (j, i) };
                out.push(Pair { a, b, distance });
            }
        };

        for (&(cx, cy), members) in &self.buckets {
            for (k, &i) in members.iter().enumerate() {
                for &j in &members[k + 1..] {
                    push_if_close(i, j);
                }
            }
            for (dx, dy) in FORWARD_NEIGHBOURS {
                let (Some(nx), Some(ny)) = (cx.checked_add(dx), cy.checked_add(dy)) else {
                    continue;
                };
                let Some(neighbours) = self.buckets.get(&(nx, ny)) else {
                    continue;
                };
                for &i in members {
                    for &j in neighbours {
                        push_if_close(i, j);
                    }
                }
            }
        }

        self.buckets.retain(|_, bucket| !bucket.is_empty());
        // Bucket iteration order is unspecified; emit pairs in index order.
        out.sort_unstable_by_key(|p| (p.a, p.b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn sorted(mut pairs: Vec<Pair>) -> Vec<(usize, usize)> {
        pairs.sort_by_key(|p| (p.a, p.b));
        pairs.into_iter().map(|p| (p.a, p.b)).collect()
    }

    #[test]
    fn test_threshold_is_strict() {
        let points = [Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(0.0, 99.5)];
        let mut out = Vec::new();
        BruteForce.pairs_within(&points, 100.0, &mut out);
        assert_eq!(sorted(out), [(0, 2)]);
    }

    #[test]
    fn test_pairs_are_ordered_and_unique() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
        let mut out = Vec::new();
        BruteForce.pairs_within(&points, 10.0, &mut out);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|p| p.a < p.b));
    }

    #[test]
    fn test_empty_and_single_point() {
        let mut out = vec![Pair {
            a: 0,
            b: 1,
            distance: 0.0,
        }];
        GridBuckets::new().pairs_within(&[], 100.0, &mut out);
        assert!(out.is_empty());
        BruteForce.pairs_within(&[Point::new(5.0, 5.0)], 100.0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_grid_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(9);
        let points: Vec<Point> = (0..300)
            .map(|_| Point::new(rng.gen_range(-150.0..950.0), rng.gen_range(-150.0..750.0)))
            .collect();

        let mut brute = Vec::new();
        BruteForce.pairs_within(&points, 100.0, &mut brute);

        let mut grid_index = GridBuckets::new();
        let mut grid = Vec::new();
        grid_index.pairs_within(&points, 100.0, &mut grid);
        assert!(!brute.is_empty());
        assert_eq!(brute, grid);

        // Reusing the index with moved points must not leak stale buckets.
        let shifted: Vec<Point> = points.iter().map(|p| p.offset(37.0, -12.0)).collect();
        let mut brute_shifted = Vec::new();
        BruteForce.pairs_within(&shifted, 100.0, &mut brute_shifted);
        let mut grid_shifted = Vec::new();
        grid_index.pairs_within(&shifted, 100.0, &mut grid_shifted);
        assert_eq!(sorted(brute_shifted), sorted(grid_shifted));
    }

    #[test]
    fn test_grid_pairs_come_out_in_index_order() {
        let points: Vec<Point> = (0..40)
            .map(|i| Point::new((i * 37 % 400) as f64, (i * 53 % 300) as f64))
            .collect();
        let mut out = Vec::new();
        GridBuckets::new().pairs_within(&points, 100.0, &mut out);
        assert!(!out.is_empty());
        assert!(out.windows(2).all(|w| (w[0].a, w[0].b) < (w[1].a, w[1].b)));
    }

    #[test]
    fn test_grid_survives_extreme_coordinates() {
        let points = [
            Point::new(f64::MAX, f64::MAX),
            Point::new(f64::MAX, 0.0),
            Point::new(-f64::MAX, -f64::MAX),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
        ];
        let mut out = Vec::new();
        GridBuckets::new().pairs_within(&points, 100.0, &mut out);
        assert!(out.iter().any(|p| (p.a, p.b) == (3, 4)));
    }

    #[test]
    fn test_grid_neighbours_across_cell_edges() {
        // Same row, adjacent cells; and diagonal back-left neighbour.
        let points = [
            Point::new(99.0, 50.0),
            Point::new(101.0, 50.0),
            Point::new(105.0, 199.0),
            Point::new(95.0, 201.0),
        ];
        let mut out = Vec::new();
        GridBuckets::new().pairs_within(&points, 100.0, &mut out);
        let pairs = sorted(out);
        assert!(pairs.contains(&(0, 1)));
        assert!(pairs.contains(&(2, 3)));
    }
}
