//! Geometry kernel for the Möbius strip.
//!
//! Everything here is plain Rust with no wasm or I/O dependencies beyond
//! `std::io::Write` for OBJ export, so the same code backs the CLI, the wasm
//! bindings and the tests.

mod area;
mod core;
mod curve;
mod diagnostics;
mod grid;
mod mesh;
mod metrics;
mod mobius;
mod obj;
mod surface;

pub use area::{riemann_surface_area, surface_element};
pub use self::core::{BBox, Point3, Tolerance, Vec3};
pub use curve::{Curve3, MobiusEdge, curve_chord_length, polyline_length, sample_curve_points};
pub use diagnostics::GeomMeshDiagnostics;
pub use grid::{ParameterGrid, ScalarGrid, linspace};
pub use mesh::{
    GeomContext, GeomMesh, MeshOptions, mesh_mobius_strip, mesh_mobius_strip_with_context,
    triangulate_grid,
};
pub use metrics::{GeomMetrics, GeomTimingReport, TimingBucket};
pub use mobius::{
    EdgeLengths, MobiusDiagnostics, MobiusError, MobiusParams, MobiusResult, MobiusStrip,
};
pub use obj::write_obj;
pub use surface::{
    MobiusSurface, Surface, SurfacePoints, finite_difference_partials, sample_surface_grid,
};

#[cfg(test)]
mod tests;
