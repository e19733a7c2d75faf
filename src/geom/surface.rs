use std::f64::consts::TAU;

use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::core::{BBox, Point3, Tolerance, Vec3};
use super::grid::{ParameterGrid, ScalarGrid};

pub trait Surface {
    fn point_at(&self, u: f64, v: f64) -> Point3;

    #[must_use]
    fn domain_u(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn domain_v(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    /// First partial derivatives `(∂r/∂u, ∂r/∂v)`.
    ///
    /// The default uses central differences of [`Surface::point_at`]; surfaces
    /// with a closed form should override it.
    #[must_use]
    fn partial_derivatives_at(&self, u: f64, v: f64) -> (Vec3, Vec3) {
        finite_difference_partials(self, u, v)
    }

    #[must_use]
    fn normal_at(&self, u: f64, v: f64) -> Option<Vec3> {
        let (du, dv) = self.partial_derivatives_at(u, v);
        du.cross(dv).normalized()
    }
}

/// Central-difference partial derivatives, one-sided at the domain boundary.
///
/// Step size is [`Tolerance::DERIVATIVE`] relative to each domain span. Axes
/// with an empty or non-finite span report a zero derivative.
#[must_use]
pub fn finite_difference_partials<S: Surface + ?Sized>(surface: &S, u: f64, v: f64) -> (Vec3, Vec3) {
    let (u0, u1) = surface.domain_u();
    let (v0, v1) = surface.domain_v();
    let (lo_u, hi_u) = (u0.min(u1), u0.max(u1));
    let (lo_v, hi_v) = (v0.min(v1), v0.max(v1));

    let u = u.clamp(lo_u, hi_u);
    let v = v.clamp(lo_v, hi_v);

    let mut du = Vec3::ZERO;
    let mut dv = Vec3::ZERO;

    let h = Tolerance::DERIVATIVE.relative_to(hi_u - lo_u);
    if h.is_finite() && h != 0.0 {
        let ua = (u - h).max(lo_u);
        let ub = (u + h).min(hi_u);
        if ua != ub {
            du = surface
                .point_at(ub, v)
                .sub_point(surface.point_at(ua, v))
                .mul_scalar(1.0 / (ub - ua));
        }
    }

    let h = Tolerance::DERIVATIVE.relative_to(hi_v - lo_v);
    if h.is_finite() && h != 0.0 {
        let va = (v - h).max(lo_v);
        let vb = (v + h).min(hi_v);
        if va != vb {
            dv = surface
                .point_at(u, vb)
                .sub_point(surface.point_at(u, va))
                .mul_scalar(1.0 / (vb - va));
        }
    }

    (du, dv)
}

/// Single half-twist Möbius band of centre-circle radius `radius` and strip
/// width `width`.
///
/// Parametrized over `u ∈ [0, 2π]` (around the band) and
/// `v ∈ [-width/2, width/2]` (across it):
///
/// ```text
/// x = (R + v·cos(u/2))·cos(u)
/// y = (R + v·cos(u/2))·sin(u)
/// z = v·sin(u/2)
/// ```
///
/// The seam identifies `(2π, v)` with `(0, -v)`, which is why the surface is
/// neither open nor closed in `u` in the usual sense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MobiusSurface {
    pub radius: f64,
    pub width: f64,
}

impl MobiusSurface {
    #[must_use]
    pub const fn new(radius: f64, width: f64) -> Self {
        Self { radius, width }
    }

    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// The point on the opposite sheet reached by crossing the seam.
    #[must_use]
    pub const fn seam_partner(v: f64) -> (f64, f64) {
        (0.0, -v)
    }
}

impl Surface for MobiusSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let (sin_u, cos_u) = u.sin_cos();
        let half = u / 2.0;
        let ring = self.radius + v * half.cos();
        Point3::new(ring * cos_u, ring * sin_u, v * half.sin())
    }

    fn domain_u(&self) -> (f64, f64) {
        (0.0, TAU)
    }

    fn domain_v(&self) -> (f64, f64) {
        let half = self.half_width();
        (-half, half)
    }

    fn partial_derivatives_at(&self, u: f64, v: f64) -> (Vec3, Vec3) {
        let (sin_u, cos_u) = u.sin_cos();
        let (sin_half, cos_half) = (u / 2.0).sin_cos();
        let ring = self.radius + v * cos_half;

        let du = Vec3::new(
            -ring * sin_u - 0.5 * v * sin_half * cos_u,
            ring * cos_u - 0.5 * v * sin_half * sin_u,
            0.5 * v * cos_half,
        );
        let dv = Vec3::new(cos_half * cos_u, cos_half * sin_u, sin_half);
        (du, dv)
    }
}

/// Cartesian samples of a surface over a parameter grid, one array per axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfacePoints {
    pub x: ScalarGrid,
    pub y: ScalarGrid,
    pub z: ScalarGrid,
}

impl SurfacePoints {
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        self.x.shape()
    }

    #[must_use]
    pub fn point(&self, row: usize, col: usize) -> Option<Point3> {
        Some(Point3::new(
            self.x.get(row, col)?,
            self.y.get(row, col)?,
            self.z.get(row, col)?,
        ))
    }

    /// Points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point3> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .zip(self.z.iter())
            .map(|((x, y), z)| Point3::new(x, y, z))
    }

    #[must_use]
    pub fn all_finite(&self) -> bool {
        self.x.all_finite() && self.y.all_finite() && self.z.all_finite()
    }

    #[must_use]
    pub fn bounds(&self) -> Option<BBox> {
        BBox::from_points(self.points())
    }
}

/// Evaluates `surface` at every `(u, v)` of `grid`.
#[must_use]
pub fn sample_surface_grid<S: Surface + Sync + ?Sized>(surface: &S, grid: &ParameterGrid) -> SurfacePoints {
    let (rows, cols) = grid.shape();
    let points = evaluate_rows(surface, grid);

    let mut xs = Vec::with_capacity(rows * cols);
    let mut ys = Vec::with_capacity(rows * cols);
    let mut zs = Vec::with_capacity(rows * cols);
    for p in points {
        xs.push(p.x);
        ys.push(p.y);
        zs.push(p.z);
    }

    SurfacePoints {
        x: grid_from_buffer(rows, cols, xs),
        y: grid_from_buffer(rows, cols, ys),
        z: grid_from_buffer(rows, cols, zs),
    }
}

fn grid_from_buffer(rows: usize, cols: usize, values: Vec<f64>) -> ScalarGrid {
    ScalarGrid::from_row_major(rows, cols, values)
        .unwrap_or_else(|| ScalarGrid::from_fn(rows, cols, |_, _| f64::NAN))
}

#[cfg(feature = "parallel")]
fn evaluate_rows<S: Surface + Sync + ?Sized>(surface: &S, grid: &ParameterGrid) -> Vec<Point3> {
    let (rows, _) = grid.shape();
    (0..rows)
        .into_par_iter()
        .flat_map_iter(|row| evaluate_row(surface, grid, row))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_rows<S: Surface + Sync + ?Sized>(surface: &S, grid: &ParameterGrid) -> Vec<Point3> {
    let (rows, _) = grid.shape();
    (0..rows).flat_map(|row| evaluate_row(surface, grid, row)).collect()
}

fn evaluate_row<S: Surface + ?Sized>(surface: &S, grid: &ParameterGrid, row: usize) -> Vec<Point3> {
    match (grid.u.row(row), grid.v.row(row)) {
        (Some(us), Some(vs)) => us
            .iter()
            .zip(vs)
            .map(|(&u, &v)| surface.point_at(u, v))
            .collect(),
        _ => Vec::new(),
    }
}
