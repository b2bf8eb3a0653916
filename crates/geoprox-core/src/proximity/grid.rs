// crates/geoprox-core/src/proximity/grid.rs

//! Uniform lat/lng bucketing of schools.
//!
//! Cells are sized from the query radius so a facility only inspects a
//! handful of neighbouring buckets. Candidates are still confirmed with the
//! exact haversine distance, which keeps results identical to brute force.

use crate::geo::{GeoPoint, SearchWindow, KM_PER_DEGREE};
use crate::traits::{Located, ProximitySearch};
use std::collections::HashMap;

const MIN_CELL_DEG: f64 = 0.05;
const MAX_CELL_DEG: f64 = 45.0;

#[derive(Debug, Clone)]
pub struct SchoolGrid {
    lat_step: f64,
    lng_step: f64,
    rows: i64,
    cols: i64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SchoolGrid {
    pub fn build<S: Located>(schools: &[S], radius_km: f64) -> Self {
        let raw = (radius_km / KM_PER_DEGREE).clamp(MIN_CELL_DEG, MAX_CELL_DEG);
        // Steps divide the globe evenly so wrapped column indices line up.
        let rows = (180.0 / raw).ceil() as i64;
        let cols = (360.0 / raw).ceil() as i64;

        let mut grid = SchoolGrid {
            lat_step: 180.0 / rows as f64,
            lng_step: 360.0 / cols as f64,
            rows,
            cols,
            cells: HashMap::new(),
        };
        for (idx, school) in schools.iter().enumerate() {
            let key = grid.cell_of(&school.point());
            grid.cells.entry(key).or_default().push(idx);
        }
        grid
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    fn row_of(&self, lat: f64) -> i64 {
        (((lat + 90.0) / self.lat_step).floor() as i64).clamp(0, self.rows - 1)
    }

    fn col_of(&self, lng: f64) -> i64 {
        (((lng + 180.0) / self.lng_step).floor() as i64).rem_euclid(self.cols)
    }

    fn cell_of(&self, p: &GeoPoint) -> (i64, i64) {
        (self.row_of(p.lat), self.col_of(p.lng))
    }

    /// Calls `visit` with every school index whose cell may hold a point
    /// within `radius_km` of `center`. Over-approximates by one cell on each
    /// side to absorb rounding at cell borders.
    pub fn for_each_candidate(&self, center: &GeoPoint, radius_km: f64, mut visit: impl FnMut(usize)) {
        let window = SearchWindow::around(center, radius_km);
        let r0 = (self.row_of(window.min_lat) - 1).max(0);
        let r1 = (self.row_of(window.max_lat) + 1).min(self.rows - 1);

        let cols: Vec<i64> = match window.lng_span {
            Some((lo, hi)) => {
                let c0 = ((lo + 180.0) / self.lng_step).floor() as i64 - 1;
                let c1 = ((hi + 180.0) / self.lng_step).floor() as i64 + 1;
                if c1 - c0 + 1 >= self.cols {
                    (0..self.cols).collect()
                } else {
                    (c0..=c1).map(|c| c.rem_euclid(self.cols)).collect()
                }
            }
            None => (0..self.cols).collect(),
        };

        for row in r0..=r1 {
            for &col in &cols {
                if let Some(bucket) = self.cells.get(&(row, col)) {
                    bucket.iter().copied().for_each(&mut visit);
                }
            }
        }
    }
}

/// Grid-accelerated [`ProximitySearch`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GridSearch;

impl ProximitySearch for GridSearch {
    fn in_buffer_mask<F: Located, S: Located>(
        &self,
        facilities: &[F],
        schools: &[S],
        radius_km: f64,
    ) -> Vec<bool> {
        let mut mask = vec![false; schools.len()];
        if radius_km.is_nan() || radius_km < 0.0 || facilities.is_empty() || schools.is_empty() {
            return mask;
        }

        let grid = SchoolGrid::build(schools, radius_km);
        for facility in facilities {
            let center = facility.point();
            grid.for_each_candidate(&center, radius_km, |idx| {
                if !mask[idx] && center.distance_km(&schools[idx].point()) <= radius_km {
                    mask[idx] = true;
                }
            });
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proximity::BruteForce;

    /// Deterministic pseudo-random points; keeps tests free of extra crates.
    fn scatter(seed: u64, n: usize, lat: (f64, f64), lng: (f64, f64)) -> Vec<GeoPoint> {
        let mut state = seed;
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        };
        (0..n)
            .map(|_| {
                GeoPoint::new(
                    lat.0 + (lat.1 - lat.0) * next(),
                    lng.0 + (lng.1 - lng.0) * next(),
                )
            })
            .collect()
    }

    #[test]
    fn grid_matches_brute_force_at_several_radii() {
        let schools = scatter(7, 2_000, (29.0, 38.5), (60.5, 75.0));
        let facilities = scatter(11, 60, (29.0, 38.5), (60.5, 75.0));

        for radius in [0.0, 1.0, 5.0, 10.0, 50.0, 250.0, 500.0] {
            let brute = BruteForce.in_buffer_mask(&facilities, &schools, radius);
            let grid = GridSearch.in_buffer_mask(&facilities, &schools, radius);
            assert_eq!(brute, grid, "mismatch at radius {radius}");
        }
    }

    #[test]
    fn grid_handles_antimeridian_and_poles() {
        let schools = vec![
            GeoPoint::new(-17.0, 179.95),
            GeoPoint::new(-17.0, -179.95),
            GeoPoint::new(89.95, 10.0),
            GeoPoint::new(89.95, -170.0),
        ];
        let facilities = vec![GeoPoint::new(-17.0, 180.0), GeoPoint::new(89.99, 100.0)];

        let brute = BruteForce.in_buffer_mask(&facilities, &schools, 20.0);
        let grid = GridSearch.in_buffer_mask(&facilities, &schools, 20.0);
        assert_eq!(brute, vec![true, true, true, true]);
        assert_eq!(grid, brute);
    }

    #[test]
    fn coincident_points_hit_at_zero_radius() {
        let schools = vec![GeoPoint::new(34.5, 69.2), GeoPoint::new(34.52, 69.21)];
        let facilities = vec![GeoPoint::new(34.5, 69.2)];
        let mask = GridSearch.in_buffer_mask(&facilities, &schools, 0.0);
        assert_eq!(mask, vec![true, false]);
    }

    #[test]
    fn buckets_schools_sparsely() {
        let schools = vec![
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(10.001, 10.001),
            GeoPoint::new(-40.0, 120.0),
        ];
        let grid = SchoolGrid::build(&schools, 10.0);
        assert_eq!(grid.occupied_cells(), 2);
    }
}
