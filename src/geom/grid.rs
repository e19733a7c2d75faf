//! Parameter sampling and the row-major scalar grids shared by the estimators.
//!
//! Grids follow the meshgrid convention: the first parameter (`u`) varies along
//! columns and the second (`v`) along rows, so `grid.get(row, col)` holds the
//! sample at `(u[col], v[row])`.

use serde::Serialize;

/// Returns `count` evenly spaced samples from `start` to `end`, both inclusive.
///
/// The first and last samples are exactly `start` and `end`. A `count` of 1
/// yields `[start]`; 0 yields an empty vector.
#[must_use]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            values[count - 1] = end;
            values
        }
    }
}

/// Dense row-major 2D array of `f64`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarGrid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl ScalarGrid {
    /// Wraps a row-major buffer. Returns `None` when `values.len() != rows * cols`.
    #[must_use]
    pub fn from_row_major(rows: usize, cols: usize, values: Vec<f64>) -> Option<Self> {
        (rows.checked_mul(cols)? == values.len()).then_some(Self { rows, cols, values })
    }

    /// Builds a grid by evaluating `f(row, col)` for every cell.
    #[must_use]
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                values.push(f(row, col));
            }
        }
        Self { rows, cols, values }
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            self.values.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.values.get(start..start + self.cols)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    #[must_use]
    pub fn all_finite(&self) -> bool {
        self.values.iter().all(|value| value.is_finite())
    }
}

/// Sampled `(u, v)` parameters of an n×n surface grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterGrid {
    pub u: ScalarGrid,
    pub v: ScalarGrid,
    u_step: f64,
    v_step: f64,
}

impl ParameterGrid {
    /// Outer product of the 1D samples: `u` along columns, `v` along rows.
    ///
    /// Step sizes are the spacing of an evenly sampled axis,
    /// `(last - first) / (len - 1)`, and 0 for axes with fewer than two samples.
    #[must_use]
    pub fn meshgrid(u_samples: &[f64], v_samples: &[f64]) -> Self {
        let rows = v_samples.len();
        let cols = u_samples.len();
        let u = ScalarGrid::from_fn(rows, cols, |_, col| u_samples[col]);
        let v = ScalarGrid::from_fn(rows, cols, |row, _| v_samples[row]);
        Self {
            u,
            v,
            u_step: axis_step(u_samples),
            v_step: axis_step(v_samples),
        }
    }

    /// Evenly sampled grid over `[u0, u1] × [v0, v1]` with `count` samples per axis.
    #[must_use]
    pub fn uniform(u_range: (f64, f64), v_range: (f64, f64), count: usize) -> Self {
        let u_samples = linspace(u_range.0, u_range.1, count);
        let v_samples = linspace(v_range.0, v_range.1, count);
        Self::meshgrid(&u_samples, &v_samples)
    }

    /// `(rows, cols)`; both arrays always share it.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        self.u.shape()
    }

    #[must_use]
    pub const fn u_step(&self) -> f64 {
        self.u_step
    }

    #[must_use]
    pub const fn v_step(&self) -> f64 {
        self.v_step
    }

    /// Iterates `(u, v)` pairs in row-major order.
    pub fn params(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.u.iter().zip(self.v.iter())
    }
}

fn axis_step(samples: &[f64]) -> f64 {
    match samples {
        [first, .., last] => (last - first) / (samples.len() - 1) as f64,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_endpoints() {
        let values = linspace(0.0, std::f64::consts::TAU, 7);
        assert_eq!(values.len(), 7);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[6], std::f64::consts::TAU);
        for pair in values.windows(2) {
            assert!((pair[1] - pair[0] - std::f64::consts::TAU / 6.0).abs() < 1e-12);
        }
    }

    #[test]
    fn linspace_small_counts() {
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert_eq!(linspace(-0.5, 0.5, 2), vec![-0.5, 0.5]);
    }

    #[test]
    fn meshgrid_orients_u_along_columns() {
        let grid = ParameterGrid::meshgrid(&[0.0, 1.0, 2.0], &[10.0, 20.0]);
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.v.shape(), (2, 3));
        assert_eq!(grid.u.row(0), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(grid.u.row(1), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(grid.v.row(1), Some(&[20.0, 20.0, 20.0][..]));
        assert_eq!(grid.u_step(), 1.0);
        assert_eq!(grid.v_step(), 10.0);
    }

    #[test]
    fn params_iterate_row_major() {
        let grid = ParameterGrid::meshgrid(&[0.0, 1.0], &[5.0, 6.0]);
        let pairs: Vec<_> = grid.params().collect();
        assert_eq!(pairs, vec![(0.0, 5.0), (1.0, 5.0), (0.0, 6.0), (1.0, 6.0)]);
    }

    #[test]
    fn scalar_grid_accessors() {
        let grid = ScalarGrid::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(grid.get(1, 0), Some(3.0));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 2), None);
        assert!(grid.row(2).is_none());
        assert_eq!(grid.row(1), Some(&[3.0, 4.0][..]));
        assert_eq!(grid.iter().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(ScalarGrid::from_row_major(2, 3, vec![0.0; 4]).is_none());
    }

    #[test]
    fn uniform_grid_step_matches_spacing() {
        let grid = ParameterGrid::uniform((0.0, 2.0), (-1.0, 1.0), 5);
        assert_eq!(grid.shape(), (5, 5));
        assert!((grid.u_step() - 0.5).abs() < 1e-15);
        assert!((grid.v_step() - 0.5).abs() < 1e-15);
        assert_eq!(grid.v.get(4, 0), Some(1.0));
    }
}
