//! The discretized Möbius strip and its two scalar estimates.
//!
//! A [`MobiusStrip`] samples the band once at construction: an n×n
//! [`ParameterGrid`] over `u ∈ [0, 2π]`, `v ∈ [-w/2, w/2]` and the matching
//! [`SurfacePoints`]. Area and edge length are read-only queries over that
//! immutable state, so repeated calls return identical bits.

use serde::{Deserialize, Serialize};

use super::area::riemann_surface_area;
use super::curve::{MobiusEdge, curve_chord_length, sample_curve_points};
use super::core::Point3;
use super::grid::ParameterGrid;
use super::mesh::GeomContext;
use super::metrics::TimingBucket;
use super::surface::{MobiusSurface, Surface, SurfacePoints, sample_surface_grid};

/// Result type for strip construction.
pub type MobiusResult<T> = Result<T, MobiusError>;

/// Rejected construction parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MobiusError {
    #[error("resolution must be at least 2 samples per axis, got {resolution}")]
    InvalidResolution { resolution: i64 },
    #[error("{parameter} must be a finite number, got {value}")]
    NonFiniteInput { parameter: &'static str, value: f64 },
}

/// Radius `R`, width `w` and per-axis sample count `n` of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MobiusParams {
    pub radius: f64,
    pub width: f64,
    pub resolution: usize,
}

impl MobiusParams {
    /// Checks the parameters without building any geometry.
    ///
    /// Sign is deliberately not checked: negative radius or width still give a
    /// well-defined (mirrored or self-intersecting) band.
    pub fn new(radius: f64, width: f64, resolution: i64) -> MobiusResult<Self> {
        if !radius.is_finite() {
            return Err(MobiusError::NonFiniteInput {
                parameter: "radius",
                value: radius,
            });
        }
        if !width.is_finite() {
            return Err(MobiusError::NonFiniteInput {
                parameter: "width",
                value: width,
            });
        }
        let resolution = usize::try_from(resolution)
            .ok()
            .filter(|&n| n >= 2)
            .ok_or(MobiusError::InvalidResolution { resolution })?;

        Ok(Self {
            radius,
            width,
            resolution,
        })
    }

    /// Re-checks parameters that arrived without going through [`MobiusParams::new`],
    /// e.g. from deserialization.
    pub fn validated(self) -> MobiusResult<Self> {
        let resolution =
            i64::try_from(self.resolution).map_err(|_| MobiusError::InvalidResolution {
                resolution: i64::MAX,
            })?;
        Self::new(self.radius, self.width, resolution)
    }
}

/// Lengths of the two boundary curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeLengths {
    /// Boundary at `v = +w/2`.
    pub positive: f64,
    /// Boundary at `v = -w/2`.
    pub negative: f64,
}

impl EdgeLengths {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.positive + self.negative
    }
}

/// Conditions the constructor accepts but a caller may want to know about.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct MobiusDiagnostics {
    /// `|R| <= |w|/2`: the inner boundary reaches the axis and the band crosses itself.
    pub self_intersecting: bool,
    /// `w == 0`: the band collapses onto its centre circle.
    pub degenerate_width: bool,
    /// `R < 0`: the band is the point reflection of the `|R|` band.
    pub negative_radius: bool,
    pub warnings: Vec<String>,
}

impl MobiusDiagnostics {
    #[must_use]
    pub fn for_params(params: &MobiusParams) -> Self {
        let half_width = params.width.abs() / 2.0;
        let self_intersecting = params.radius.abs() <= half_width && params.width != 0.0;
        let degenerate_width = params.width == 0.0;
        let negative_radius = params.radius < 0.0;

        let mut warnings = Vec::new();
        if self_intersecting {
            warnings.push(format!(
                "radius {} does not exceed half the width {}; the strip self-intersects",
                params.radius, half_width
            ));
        }
        if degenerate_width {
            warnings.push("width is zero; the strip degenerates to a circle".to_string());
        }
        if negative_radius {
            warnings.push(format!("negative radius {}", params.radius));
        }

        Self {
            self_intersecting,
            degenerate_width,
            negative_radius,
            warnings,
        }
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A sampled single half-twist Möbius band.
#[derive(Debug, Clone, PartialEq)]
pub struct MobiusStrip {
    params: MobiusParams,
    surface: MobiusSurface,
    grid: ParameterGrid,
    points: SurfacePoints,
}

impl MobiusStrip {
    /// Validates the parameters and samples the n×n grid.
    pub fn new(radius: f64, width: f64, resolution: i64) -> MobiusResult<Self> {
        Ok(Self::build(MobiusParams::new(radius, width, resolution)?))
    }

    pub fn from_params(params: MobiusParams) -> MobiusResult<Self> {
        Ok(Self::build(params.validated()?))
    }

    /// Same as [`MobiusStrip::from_params`], timing the sampling under
    /// [`TimingBucket::GridGeneration`].
    pub fn from_params_with_context(params: MobiusParams, ctx: &mut GeomContext) -> MobiusResult<Self> {
        let params = params.validated()?;
        Ok(ctx.metrics.time(TimingBucket::GridGeneration, || Self::build(params)))
    }

    fn build(params: MobiusParams) -> Self {
        let surface = MobiusSurface::new(params.radius, params.width);
        let grid = ParameterGrid::uniform(surface.domain_u(), surface.domain_v(), params.resolution);
        let points = sample_surface_grid(&surface, &grid);

        let diagnostics = MobiusDiagnostics::for_params(&params);
        for warning in &diagnostics.warnings {
            log::warn!("{warning}");
        }
        log::debug!(
            "sampled mobius strip R={} w={} on a {}x{} grid",
            params.radius,
            params.width,
            params.resolution,
            params.resolution
        );

        Self {
            params,
            surface,
            grid,
            points,
        }
    }

    #[must_use]
    pub const fn params(&self) -> &MobiusParams {
        &self.params
    }

    #[must_use]
    pub const fn surface(&self) -> &MobiusSurface {
        &self.surface
    }

    #[must_use]
    pub const fn grid(&self) -> &ParameterGrid {
        &self.grid
    }

    /// Sampled x, y and z arrays, each `resolution × resolution`.
    #[must_use]
    pub const fn surface_points(&self) -> &SurfacePoints {
        &self.points
    }

    #[must_use]
    pub fn diagnostics(&self) -> MobiusDiagnostics {
        MobiusDiagnostics::for_params(&self.params)
    }

    /// Riemann-sum estimate of `∬ |∂r/∂u × ∂r/∂v| du dv` over the grid.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        riemann_surface_area(&self.surface, &self.grid)
    }

    /// Combined chord length of both boundary curves.
    #[must_use]
    pub fn edge_length(&self) -> f64 {
        self.edge_lengths().total()
    }

    /// Chord length of each boundary curve, sampled at `resolution` values of `u`.
    #[must_use]
    pub fn edge_lengths(&self) -> EdgeLengths {
        let n = self.params.resolution;
        EdgeLengths {
            positive: curve_chord_length(&MobiusEdge::positive(self.surface), n),
            negative: curve_chord_length(&MobiusEdge::negative(self.surface), n),
        }
    }

    /// Sample points of both boundaries, positive first.
    #[must_use]
    pub fn edge_polylines(&self) -> [Vec<Point3>; 2] {
        let n = self.params.resolution;
        [
            sample_curve_points(&MobiusEdge::positive(self.surface), n),
            sample_curve_points(&MobiusEdge::negative(self.surface), n),
        ]
    }

    #[must_use]
    pub fn surface_area_with_context(&self, ctx: &mut GeomContext) -> f64 {
        ctx.metrics.time(TimingBucket::SurfaceArea, || self.surface_area())
    }

    #[must_use]
    pub fn edge_length_with_context(&self, ctx: &mut GeomContext) -> f64 {
        ctx.metrics.time(TimingBucket::EdgeLength, || self.edge_length())
    }
}
