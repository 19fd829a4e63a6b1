//! Hexagonal binning (numbers-first).
//!
//! The tiling is two interleaved rectangular lattices. Lattice A has
//! `(nx + 1) × (ny + 1)` centres on the grid corners `(xmin + i·sx, ymin + j·sy)`,
//! lattice B has `nx × ny` centres offset by half a cell. A point belongs to
//! whichever of its two candidate centres is closer under the metric
//! `du² + 3·dv²` (in cell units), which is the Voronoi partition of the
//! combined lattice into hexagons.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::Points;

/// Binning parameters: hexagon counts and fixed bounds on both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HexGrid {
    /// Hexagons across the horizontal and vertical range
    pub grid_size: (usize, usize),
    /// Horizontal bounds `[min, max]`
    pub x_range: [f64; 2],
    /// Vertical bounds `[min, max]`
    pub y_range: [f64; 2],
}

impl Default for HexGrid {
    fn default() -> Self {
        Self::for_domain(30.0)
    }
}

impl HexGrid {
    /// Grid for a square simulation domain of side `size`: bounds
    /// `[-1, size + 1]` on both axes, `(30, 15)` hexagons.
    pub fn for_domain(size: f64) -> Self {
        Self { grid_size: (30, 15), x_range: [-1.0, size + 1.0], y_range: [-1.0, size + 1.0] }
    }

    /// Reject grids that cannot tile their bounds.
    pub fn validate(&self) -> Result<()> {
        let (nx, ny) = self.grid_size;
        if nx == 0 || ny == 0 {
            return Err(Error::InvalidGrid(format!("grid_size must be positive, got ({nx}, {ny})")));
        }
        for (name, [lo, hi]) in [("x_range", self.x_range), ("y_range", self.y_range)] {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(Error::InvalidGrid(format!("{name} must be finite, got [{lo}, {hi}]")));
            }
            if hi <= lo {
                let msg = format!("{name} must be increasing, got [{lo}, {hi}]");
                return Err(Error::InvalidGrid(msg));
            }
        }
        Ok(())
    }

    /// Cell spacing `(sx, sy)` in data units.
    pub fn spacing(&self) -> (f64, f64) {
        let (nx, ny) = self.grid_size;
        (
            (self.x_range[1] - self.x_range[0]) / nx as f64,
            (self.y_range[1] - self.y_range[0]) / ny as f64,
        )
    }

    /// Count points per hexagon.
    pub fn bin(&self, xs: &[f64], ys: &[f64]) -> Result<HexCounts> {
        if xs.len() != ys.len() {
            return Err(Error::ShapeMismatch { xs: xs.len(), ys: ys.len() });
        }
        self.validate()?;

        let (nx, ny) = self.grid_size;
        let (sx, sy) = self.spacing();
        let mut lattice_a = vec![vec![0u64; ny + 1]; nx + 1];
        let mut lattice_b = vec![vec![0u64; ny]; nx];
        let mut binned = 0u64;
        let mut dropped = 0u64;

        for (&x, &y) in xs.iter().zip(ys) {
            if !x.is_finite() || !y.is_finite() {
                dropped += 1;
                continue;
            }
            let u = (x - self.x_range[0]) / sx;
            let v = (y - self.y_range[0]) / sy;

            let (ia, ja) = (u.round_ties_even(), v.round_ties_even());
            let (ib, jb) = (u.floor(), v.floor());
            let d1 = (u - ia).powi(2) + 3.0 * (v - ja).powi(2);
            let d2 = (u - ib - 0.5).powi(2) + 3.0 * (v - jb - 0.5).powi(2);

            let slot = if d1 < d2 {
                match (lattice_index(ia, nx + 1), lattice_index(ja, ny + 1)) {
                    (Some(i), Some(j)) => Some(&mut lattice_a[i][j]),
                    _ => None,
                }
            } else {
                match (lattice_index(ib, nx), lattice_index(jb, ny)) {
                    (Some(i), Some(j)) => Some(&mut lattice_b[i][j]),
                    _ => None,
                }
            };
            match slot {
                Some(c) => {
                    *c += 1;
                    binned += 1;
                }
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::warn!(dropped, "points outside the grid bounds were not binned");
        }
        tracing::debug!(binned, nx, ny, "hexbin complete");

        Ok(HexCounts { grid: self.clone(), lattice_a, lattice_b, binned, dropped })
    }

    /// Count a paired point set.
    pub fn bin_points(&self, points: &Points) -> Result<HexCounts> {
        self.bin(&points.xs, &points.ys)
    }
}

fn lattice_index(k: f64, len: usize) -> Option<usize> {
    (k >= 0.0 && k < len as f64).then_some(k as usize)
}

/// One hexagonal cell with its count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HexCell {
    /// Centre in data coordinates
    pub center: (f64, f64),
    /// Number of points in the cell
    pub count: u64,
}

/// Per-hexagon counts for a [`HexGrid`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HexCounts {
    /// Grid the counts were taken on
    pub grid: HexGrid,
    /// Corner lattice, indexed `[i][j]`, `(nx + 1) × (ny + 1)`
    pub lattice_a: Vec<Vec<u64>>,
    /// Offset lattice, indexed `[i][j]`, `nx × ny`
    pub lattice_b: Vec<Vec<u64>>,
    /// Points that landed in a cell
    pub binned: u64,
    /// Points outside the bounds or non-finite
    pub dropped: u64,
}

impl HexCounts {
    /// All cells, lattice A first, each lattice in `[i][j]` order.
    pub fn cells(&self) -> impl Iterator<Item = HexCell> + '_ {
        let (sx, sy) = self.grid.spacing();
        let [x0, y0] = [self.grid.x_range[0], self.grid.y_range[0]];
        let a = self.lattice_a.iter().enumerate().flat_map(move |(i, col)| {
            col.iter().enumerate().map(move |(j, &count)| HexCell {
                center: (x0 + i as f64 * sx, y0 + j as f64 * sy),
                count,
            })
        });
        let b = self.lattice_b.iter().enumerate().flat_map(move |(i, col)| {
            col.iter().enumerate().map(move |(j, &count)| HexCell {
                center: (x0 + (i as f64 + 0.5) * sx, y0 + (j as f64 + 0.5) * sy),
                count,
            })
        });
        a.chain(b)
    }

    /// Total number of cells in both lattices.
    pub fn n_cells(&self) -> usize {
        let (nx, ny) = self.grid.grid_size;
        (nx + 1) * (ny + 1) + nx * ny
    }

    /// Largest cell count (0 for an empty map).
    pub fn max_count(&self) -> u64 {
        self.cells().map(|c| c.count).max().unwrap_or(0)
    }

    /// Smallest cell count.
    pub fn min_count(&self) -> u64 {
        self.cells().map(|c| c.count).min().unwrap_or(0)
    }

    /// Number of cells holding at least one point.
    pub fn populated(&self) -> usize {
        self.cells().filter(|c| c.count > 0).count()
    }

    /// Hexagon vertices around `center`, counter-clockwise from lower right.
    pub fn hexagon(&self, center: (f64, f64)) -> [(f64, f64); 6] {
        let (sx, sy) = self.grid.spacing();
        const DX: [f64; 6] = [0.5, 0.5, 0.0, -0.5, -0.5, 0.0];
        const DY: [f64; 6] = [-0.5, 0.5, 1.0, 0.5, -0.5, -1.0];
        std::array::from_fn(|k| (center.0 + DX[k] * sx, center.1 + DY[k] * sy / 3.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_grid() -> HexGrid {
        HexGrid { grid_size: (4, 2), x_range: [0.0, 4.0], y_range: [0.0, 2.0] }
    }

    #[test]
    fn defaults_match_domain_30() {
        let g = HexGrid::default();
        assert_eq!(g.grid_size, (30, 15));
        assert_eq!(g.x_range, [-1.0, 31.0]);
        assert_eq!(g.y_range, [-1.0, 31.0]);
        let (sx, sy) = g.spacing();
        assert_relative_eq!(sx, 32.0 / 30.0);
        assert_relative_eq!(sy, 32.0 / 15.0);
    }

    #[test]
    fn corner_and_offset_centres() {
        let g = unit_grid();
        let h = g.bin(&[1.0, 1.5], &[1.0, 0.5]).unwrap();
        assert_eq!(h.lattice_a[1][1], 1);
        assert_eq!(h.lattice_b[1][0], 1);
        assert_eq!(h.binned, 2);
        assert_eq!(h.dropped, 0);
        assert_eq!(h.max_count(), 1);
        assert_eq!(h.populated(), 2);
    }

    #[test]
    fn points_on_the_bounds() {
        let g = unit_grid();
        // u == nx exists only in lattice A; (4, 1.5) is nearer the B column that is not there.
        let h = g.bin(&[4.0, 4.0, 0.0, 0.0], &[0.0, 1.5, 1.5, 0.0]).unwrap();
        assert_eq!(h.lattice_a[4][0], 1);
        assert_eq!(h.lattice_b[0][1], 1);
        assert_eq!(h.lattice_a[0][0], 1);
        assert_eq!((h.binned, h.dropped), (3, 1));
    }

    #[test]
    fn equidistant_point_goes_to_offset_lattice() {
        let h = unit_grid().bin(&[0.25], &[0.25]).unwrap();
        assert_eq!(h.lattice_b[0][0], 1);
        assert_eq!(h.lattice_a[0][0], 0);
    }

    #[test]
    fn default_grid_corners() {
        let g = HexGrid::default();
        let h = g.bin(&[31.0, -1.0, 31.0, 31.0], &[-1.0, -1.0, 31.0, 15.0]).unwrap();
        assert_eq!(h.lattice_a[30][0], 1);
        assert_eq!(h.lattice_a[0][0], 1);
        assert_eq!(h.lattice_a[30][15], 1);
        // (31, 15) sits halfway up the right edge, closest to a B cell past nx.
        assert_eq!((h.binned, h.dropped), (3, 1));
    }

    #[test]
    fn repeated_points_accumulate() {
        let h = unit_grid().bin(&[2.0; 5], &[1.0; 5]).unwrap();
        assert_eq!(h.lattice_a[2][1], 5);
        assert_eq!(h.max_count(), 5);
        assert_eq!(h.min_count(), 0);
    }

    #[test]
    fn out_of_bounds_and_nan_dropped() {
        let h = unit_grid().bin(&[-5.0, 100.0, f64::NAN, 2.0], &[1.0, 1.0, 1.0, 1.0]).unwrap();
        assert_eq!(h.binned, 1);
        assert_eq!(h.dropped, 3);
    }

    #[test]
    fn empty_input() {
        let h = HexGrid::default().bin(&[], &[]).unwrap();
        assert_eq!(h.binned, 0);
        assert_eq!(h.max_count(), 0);
        assert_eq!(h.populated(), 0);
        assert_eq!(h.cells().count(), h.n_cells());
        assert_eq!(h.n_cells(), 31 * 16 + 30 * 15);
    }

    #[test]
    fn shape_mismatch() {
        let err = HexGrid::default().bin(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { xs: 2, ys: 1 }));
    }

    #[test]
    fn invalid_grids() {
        let zero = HexGrid { grid_size: (0, 3), ..HexGrid::default() };
        assert!(matches!(zero.bin(&[], &[]), Err(Error::InvalidGrid(_))));
        let inverted = HexGrid { x_range: [5.0, 1.0], ..HexGrid::default() };
        assert!(matches!(inverted.validate(), Err(Error::InvalidGrid(_))));
        let inf = HexGrid { y_range: [0.0, f64::INFINITY], ..HexGrid::default() };
        assert!(matches!(inf.validate(), Err(Error::InvalidGrid(_))));
    }

    #[test]
    fn scenario_points_land_in_bounds() {
        let h = HexGrid::default().bin(&[0.0, 15.0, 30.0], &[0.0, 7.0, 15.0]).unwrap();
        assert_eq!(h.binned, 3);
        assert_eq!(h.dropped, 0);
        assert_eq!(h.populated(), 3);
    }

    #[test]
    fn assignment_is_nearest_centre() {
        let g = HexGrid { grid_size: (7, 5), x_range: [-2.0, 12.0], y_range: [0.0, 9.0] };
        let (sx, sy) = g.spacing();

        // Deterministic interior points (one cell away from the border).
        let mut state = 0x2545_f491_4f6c_dd1du64;
        let mut next = || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        };
        for _ in 0..500 {
            let x = g.x_range[0] + sx + next() * (g.x_range[1] - g.x_range[0] - 2.0 * sx);
            let y = g.y_range[0] + sy + next() * (g.y_range[1] - g.y_range[0] - 2.0 * sy);
            let h = g.bin(&[x], &[y]).unwrap();
            assert_eq!(h.binned, 1);

            let hit = h.cells().find(|c| c.count == 1).unwrap();
            let dist = |c: &HexCell| {
                ((x - c.center.0) / sx).powi(2) + 3.0 * ((y - c.center.1) / sy).powi(2)
            };
            let best = h.cells().map(|c| dist(&c)).fold(f64::INFINITY, f64::min);
            assert_relative_eq!(dist(&hit), best, epsilon = 1e-9);
        }
    }

    #[test]
    fn hexagon_vertices() {
        let h = unit_grid().bin(&[], &[]).unwrap();
        let v = h.hexagon((1.0, 1.0));
        assert_relative_eq!(v[0].0, 1.5);
        assert_relative_eq!(v[0].1, 1.0 - 0.5 / 3.0);
        assert_relative_eq!(v[2].1, 1.0 + 1.0 / 3.0);
        assert_relative_eq!(v[5].1, 1.0 - 1.0 / 3.0);
    }
}
