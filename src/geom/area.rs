//! Surface-area estimation by the surface-element (cross-product) method.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::grid::ParameterGrid;
use super::surface::Surface;

/// Local area scaling `|∂r/∂u × ∂r/∂v|` at `(u, v)`.
#[must_use]
pub fn surface_element<S: Surface + ?Sized>(surface: &S, u: f64, v: f64) -> f64 {
    let (du, dv) = surface.partial_derivatives_at(u, v);
    du.cross(dv).length()
}

/// Riemann-sum estimate of the area of `surface` over `grid`.
///
/// Every grid sample, boundary samples included, is weighted by the same cell
/// size `u_step * v_step`. Row sums are accumulated first and then added in
/// row order, so the parallel build returns the same bits as the sequential
/// one. The cell size is taken as a measure, so grids sampled in
/// decreasing `u` or `v` (e.g. a negative width) still give a non-negative
/// area.
#[must_use]
pub fn riemann_surface_area<S: Surface + Sync + ?Sized>(surface: &S, grid: &ParameterGrid) -> f64 {
    let total: f64 = row_sums(surface, grid).into_iter().sum();
    total * (grid.u_step() * grid.v_step()).abs()
}

#[cfg(feature = "parallel")]
fn row_sums<S: Surface + Sync + ?Sized>(surface: &S, grid: &ParameterGrid) -> Vec<f64> {
    let (rows, _) = grid.shape();
    (0..rows)
        .into_par_iter()
        .map(|row| row_sum(surface, grid, row))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn row_sums<S: Surface + Sync + ?Sized>(surface: &S, grid: &ParameterGrid) -> Vec<f64> {
    let (rows, _) = grid.shape();
    (0..rows).map(|row| row_sum(surface, grid, row)).collect()
}

fn row_sum<S: Surface + ?Sized>(surface: &S, grid: &ParameterGrid, row: usize) -> f64 {
    let (Some(us), Some(vs)) = (grid.u.row(row), grid.v.row(row)) else {
        return 0.0;
    };
    us.iter()
        .zip(vs)
        .map(|(&u, &v)| surface_element(surface, u, v))
        .sum()
}
