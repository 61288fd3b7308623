//! Uniform bucket-grid spatial index
//!
//! Points are hashed into square cells of a fixed size. Radius queries only
//! visit the cells overlapping the query disk; nearest-neighbor queries search
//! outward ring by ring and stop once no unvisited ring can hold a closer
//! point. Coordinates are plain `[x, y]` pairs so the same index serves both
//! degree space (clustering) and projected meters (safety checks).

use std::collections::HashMap;

type CellKey = (i64, i64);

/// Bucket-grid index over a fixed set of 2D points
#[derive(Debug, Clone)]
pub struct GridIndex {
    points: Vec<[f64; 2]>,
    cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
    /// Inclusive cell-key extent of all points: (min_x, min_y, max_x, max_y)
    extent: Option<(i64, i64, i64, i64)>,
}

impl GridIndex {
    /// Build an index; `cell_size` must be positive and finite
    ///
    /// Non-finite points are kept for index numbering but never returned.
    pub fn new(points: Vec<[f64; 2]>, cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0 && cell_size.is_finite());

        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        let mut extent: Option<(i64, i64, i64, i64)> = None;

        for (i, p) in points.iter().enumerate() {
            if !p[0].is_finite() || !p[1].is_finite() {
                continue;
            }
            let key = Self::key_for(p, cell_size);
            cells.entry(key).or_default().push(i);
            extent = Some(match extent {
                None => (key.0, key.1, key.0, key.1),
                Some((x0, y0, x1, y1)) => {
                    (x0.min(key.0), y0.min(key.1), x1.max(key.0), y1.max(key.1))
                }
            });
        }

        Self {
            points,
            cell_size,
            cells,
            extent,
        }
    }

    fn key_for(p: &[f64; 2], cell_size: f64) -> CellKey {
        (
            (p[0] / cell_size).floor() as i64,
            (p[1] / cell_size).floor() as i64,
        )
    }

    /// Number of indexed points (including skipped non-finite ones)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    /// Point stored at `index`
    pub fn point(&self, index: usize) -> [f64; 2] {
        self.points[index]
    }

    /// Indices of all points at distance `<= radius` from `query`, ascending
    pub fn within(&self, query: [f64; 2], radius: f64) -> Vec<usize> {
        let mut found = Vec::new();
        if self.extent.is_none() || radius < 0.0 {
            return found;
        }

        let r2 = radius * radius;
        let min_key = Self::key_for(&[query[0] - radius, query[1] - radius], self.cell_size);
        let max_key = Self::key_for(&[query[0] + radius, query[1] + radius], self.cell_size);

        for cx in min_key.0..=max_key.0 {
            for cy in min_key.1..=max_key.1 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    for &i in bucket {
                        if dist2(self.points[i], query) <= r2 {
                            found.push(i);
                        }
                    }
                }
            }
        }

        found.sort_unstable();
        found
    }

    /// Nearest point to `query` as `(index, distance)`
    ///
    /// Ties resolve to the lowest index. Returns `None` for an empty index.
    pub fn nearest(&self, query: [f64; 2]) -> Option<(usize, f64)> {
        let (x0, y0, x1, y1) = self.extent?;
        let center = Self::key_for(&query, self.cell_size);

        // Rings beyond this distance from the query cell contain no points
        let max_ring = [
            (center.0 - x0).abs(),
            (x1 - center.0).abs(),
            (center.1 - y0).abs(),
            (y1 - center.1).abs(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0);

        let mut best: Option<(usize, f64)> = None;

        for ring in 0..=max_ring {
            for (cx, cy) in ring_cells(center, ring) {
                let Some(bucket) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for &i in bucket {
                    let d2 = dist2(self.points[i], query);
                    let better = match best {
                        None => true,
                        Some((bi, bd2)) => d2 < bd2 || (d2 == bd2 && i < bi),
                    };
                    if better {
                        best = Some((i, d2));
                    }
                }
            }

            // Any point in ring + 1 is at least `ring * cell_size` away
            if let Some((_, bd2)) = best {
                let reach = ring as f64 * self.cell_size;
                if bd2 < reach * reach {
                    break;
                }
            }
        }

        best.map(|(i, d2)| (i, d2.sqrt()))
    }
}

fn dist2(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Cells at Chebyshev distance exactly `ring` from `center`
fn ring_cells(center: CellKey, ring: i64) -> Vec<CellKey> {
    if ring == 0 {
        return vec![center];
    }
    let (cx, cy) = center;
    let mut cells = Vec::with_capacity((8 * ring) as usize);
    for dx in -ring..=ring {
        cells.push((cx + dx, cy - ring));
        cells.push((cx + dx, cy + ring));
    }
    for dy in (-ring + 1)..ring {
        cells.push((cx - ring, cy + dy));
        cells.push((cx + ring, cy + dy));
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_nearest(points: &[[f64; 2]], q: [f64; 2]) -> (usize, f64) {
        let mut best = (0, f64::INFINITY);
        for (i, p) in points.iter().enumerate() {
            let d = dist2(*p, q).sqrt();
            if d < best.1 {
                best = (i, d);
            }
        }
        best
    }

    #[test]
    fn test_empty_index() {
        let index = GridIndex::new(Vec::new(), 1.0);
        assert!(index.is_empty());
        assert!(index.nearest([0.0, 0.0]).is_none());
        assert!(index.within([0.0, 0.0], 10.0).is_empty());
    }

    #[test]
    fn test_within_is_closed() {
        let index = GridIndex::new(vec![[0.0, 0.0], [3.0, 4.0], [6.0, 8.0]], 2.0);
        assert_eq!(index.within([0.0, 0.0], 5.0), vec![0, 1]);
        assert_eq!(index.within([0.0, 0.0], 4.999), vec![0]);
    }

    #[test]
    fn test_within_crosses_negative_cells() {
        let index = GridIndex::new(vec![[-0.5, -0.5], [0.5, 0.5], [-3.0, 2.0]], 1.0);
        assert_eq!(index.within([0.0, 0.0], 1.0), vec![0, 1]);
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let points: Vec<[f64; 2]> = (0..200)
            .map(|i| {
                let t = i as f64;
                [(t * 7.31).sin() * 500.0, (t * 3.17).cos() * 500.0]
            })
            .collect();
        let index = GridIndex::new(points.clone(), 50.0);

        for q in [[0.0, 0.0], [480.0, -490.0], [-2000.0, 1500.0], [123.4, 56.7]] {
            let (i, d) = index.nearest(q).unwrap();
            let (bi, bd) = brute_nearest(&points, q);
            assert!((d - bd).abs() < 1e-9, "query {:?}: {} vs {}", q, d, bd);
            assert_eq!(dist2(points[i], q), dist2(points[bi], q));
        }
    }

    #[test]
    fn test_nearest_far_outside_extent() {
        let index = GridIndex::new(vec![[0.0, 0.0]], 1.0);
        let (i, d) = index.nearest([100.0, 0.0]).unwrap();
        assert_eq!(i, 0);
        assert!((d - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_tie_prefers_lowest_index() {
        let index = GridIndex::new(vec![[1.0, 0.0], [-1.0, 0.0]], 0.5);
        assert_eq!(index.nearest([0.0, 0.0]).unwrap().0, 0);
    }

    #[test]
    fn test_non_finite_points_skipped() {
        let index = GridIndex::new(vec![[f64::NAN, 0.0], [2.0, 2.0]], 1.0);
        assert_eq!(index.len(), 2);
        assert_eq!(index.nearest([0.0, 0.0]).unwrap().0, 1);
    }
}
