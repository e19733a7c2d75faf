use std::collections::HashMap;

use serde::Serialize;

use super::core::{Point3, Tolerance, Vec3};
use super::diagnostics::GeomMeshDiagnostics;
use super::metrics::{GeomMetrics, TimingBucket};
use super::mobius::MobiusStrip;
use super::surface::Surface;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    pub uvs: Option<Vec<[f64; 2]>>,
    pub normals: Option<Vec<[f64; 3]>>,
}

impl GeomMesh {
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            uvs: None,
            normals: None,
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions.iter().any(|p| p.iter().any(|c| !c.is_finite()))
    }

    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }

    #[must_use]
    pub fn has_triangle_indices(&self) -> bool {
        self.indices.len() % 3 == 0
    }

    #[must_use]
    pub fn has_valid_attribute_lengths(&self) -> bool {
        let n = self.positions.len();
        self.uvs.as_ref().is_none_or(|uvs| uvs.len() == n)
            && self.normals.as_ref().is_none_or(|normals| normals.len() == n)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.has_triangle_indices() {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if !self.has_valid_attribute_lengths() {
            return Err("mesh attribute buffers do not match vertex count".to_string());
        }
        Ok(())
    }

    /// Packed `[x0, y0, z0, x1, ...]` copy of the positions for JS typed arrays.
    #[must_use]
    pub fn positions_flat(&self) -> Vec<f64> {
        self.positions.iter().flatten().copied().collect()
    }
}

#[derive(Debug)]
pub struct GeomContext {
    pub tolerance: Tolerance,
    pub metrics: GeomMetrics,
}

impl GeomContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tolerance: Tolerance::ZERO_LENGTH,
            metrics: GeomMetrics::default(),
        }
    }
}

impl Default for GeomContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshOptions {
    /// Merge the `u = 2π` column onto the `u = 0` column, row-reversed, so the
    /// mesh has the band's real topology instead of a rectangle's.
    pub weld_seam: bool,
}

/// Whether every vertex of a `u_count × v_count` grid has a `u32` index.
fn grid_fits_u32(u_count: usize, v_count: usize) -> bool {
    u_count
        .checked_mul(v_count)
        .is_some_and(|count| count == 0 || u32::try_from(count - 1).is_ok())
}

/// Two triangles per grid cell over a row-major `u_count × v_count` grid.
///
/// Returns no triangles when the grid has more vertices than `u32` can index.
#[must_use]
pub fn triangulate_grid(u_count: usize, v_count: usize) -> Vec<u32> {
    if u_count < 2 || v_count < 2 || !grid_fits_u32(u_count, v_count) {
        return Vec::new();
    }

    let mut indices = Vec::with_capacity((u_count - 1) * (v_count - 1) * 6);
    for v in 0..v_count - 1 {
        for u in 0..u_count - 1 {
            let i0 = (v * u_count + u) as u32;
            let i1 = (v * u_count + u + 1) as u32;
            let i2 = ((v + 1) * u_count + u) as u32;
            let i3 = ((v + 1) * u_count + u + 1) as u32;

            indices.extend_from_slice(&[i0, i1, i2]);
            indices.extend_from_slice(&[i2, i1, i3]);
        }
    }
    indices
}

#[must_use]
pub fn mesh_mobius_strip(strip: &MobiusStrip, options: MeshOptions) -> (GeomMesh, GeomMeshDiagnostics) {
    let mut ctx = GeomContext::new();
    mesh_mobius_strip_with_context(strip, options, &mut ctx)
}

#[must_use]
pub fn mesh_mobius_strip_with_context(
    strip: &MobiusStrip,
    options: MeshOptions,
    ctx: &mut GeomContext,
) -> (GeomMesh, GeomMeshDiagnostics) {
    let tolerance = ctx.tolerance;

    let (mesh, mut diagnostics) = ctx.metrics.time(TimingBucket::Meshing, || {
        let (rows, cols) = strip.surface_points().shape();
        let mut points: Vec<Point3> = strip.surface_points().points().collect();
        let mut uvs = grid_uvs(rows, cols);
        let mut normals = analytic_normals(strip);
        let mut indices = triangulate_grid(cols, rows);

        let indexable = grid_fits_u32(cols, rows);
        let mut welded_vertex_count = 0;
        if options.weld_seam && cols >= 2 && indexable {
            let remap = seam_weld_remap(rows, cols);
            indices = indices.into_iter().map(|i| remap[i as usize]).collect();
            points = drop_seam_column(points, cols);
            uvs = drop_seam_column(uvs, cols);
            normals = drop_seam_column(normals, cols);
            welded_vertex_count = rows;
        }

        let (indices, degenerate_triangle_count) = cull_degenerate_triangles(&points, &indices, tolerance);
        let topology = edge_topology(&points, &indices);

        let mut warnings = Vec::new();
        if !indexable {
            warnings.push(format!("{rows}x{cols} grid exceeds the 32-bit index range; no triangles emitted"));
        }
        if degenerate_triangle_count > 0 {
            warnings.push(format!("{degenerate_triangle_count} degenerate triangles removed"));
        }
        if topology.non_manifold_edges > 0 {
            warnings.push("mesh has non-manifold edges".to_string());
        }

        let mesh = GeomMesh {
            positions: points.iter().map(|p| p.to_array()).collect(),
            indices,
            uvs: Some(uvs),
            normals: Some(normals),
        };

        let diagnostics = GeomMeshDiagnostics {
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            welded_vertex_count,
            degenerate_triangle_count,
            open_edge_count: topology.open_edges,
            non_manifold_edge_count: topology.non_manifold_edges,
            orientation_conflict_count: topology.orientation_conflicts,
            boundary_loop_count: topology.boundary_loops,
            boundary_length: topology.boundary_length,
            timing: None,
            warnings,
        };

        (mesh, diagnostics)
    });

    // Cumulative since the caller's last `begin`.
    diagnostics.timing = ctx.metrics.end();
    log::debug!("meshed mobius strip: {}", diagnostics.summary());
    (mesh, diagnostics)
}

fn grid_uvs(rows: usize, cols: usize) -> Vec<[f64; 2]> {
    let u_denom = cols.saturating_sub(1).max(1) as f64;
    let v_denom = rows.saturating_sub(1).max(1) as f64;
    let mut uvs = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            uvs.push([col as f64 / u_denom, row as f64 / v_denom]);
        }
    }
    uvs
}

fn analytic_normals(strip: &MobiusStrip) -> Vec<[f64; 3]> {
    strip
        .grid()
        .params()
        .map(|(u, v)| strip.surface().normal_at(u, v).unwrap_or(Vec3::Z).to_array())
        .collect()
}

/// Index remap onto a grid without its last column: `(row, cols-1)` becomes
/// `(rows-1-row, 0)`, every other vertex keeps its position in the shorter rows.
fn seam_weld_remap(rows: usize, cols: usize) -> Vec<u32> {
    let kept = cols - 1;
    let mut remap = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let target = if col == kept {
                (rows - 1 - row) * kept
            } else {
                row * kept + col
            };
            remap.push(target as u32);
        }
    }
    remap
}

fn drop_seam_column<T>(values: Vec<T>, cols: usize) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter(|(i, _)| i % cols != cols - 1)
        .map(|(_, value)| value)
        .collect()
}

fn cull_degenerate_triangles(points: &[Point3], indices: &[u32], tol: Tolerance) -> (Vec<u32>, usize) {
    let mut kept = Vec::with_capacity(indices.len());
    let mut culled = 0;
    for tri in indices.chunks_exact(3) {
        let (Some(&a), Some(&b), Some(&c)) = (
            points.get(tri[0] as usize),
            points.get(tri[1] as usize),
            points.get(tri[2] as usize),
        ) else {
            culled += 1;
            continue;
        };
        let doubled_area = (b - a).cross(c - a).length();
        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] || doubled_area.is_nan() || doubled_area <= tol.eps {
            culled += 1;
            continue;
        }
        kept.extend_from_slice(tri);
    }
    (kept, culled)
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct EdgeTopology {
    open_edges: usize,
    non_manifold_edges: usize,
    orientation_conflicts: usize,
    boundary_loops: usize,
    boundary_length: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct EdgeUse {
    count: u32,
    ascending: u32,
}

fn edge_topology(points: &[Point3], indices: &[u32]) -> EdgeTopology {
    let mut edges: HashMap<(u32, u32), EdgeUse> = HashMap::new();
    for tri in indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let entry = edges.entry((a.min(b), a.max(b))).or_default();
            entry.count += 1;
            if a < b {
                entry.ascending += 1;
            }
        }
    }

    let mut topology = EdgeTopology::default();
    let mut loops = DisjointSet::new(points.len());
    let mut boundary_vertices = Vec::new();

    // Sorted so the boundary length sums in a stable order.
    let mut keys: Vec<_> = edges.keys().copied().collect();
    keys.sort_unstable();
    for key in keys {
        let usage = edges[&key];
        match usage.count {
            1 => {
                topology.open_edges += 1;
                let (a, b) = (key.0 as usize, key.1 as usize);
                if let (Some(pa), Some(pb)) = (points.get(a), points.get(b)) {
                    topology.boundary_length += pa.distance_to(*pb);
                }
                loops.union(a, b);
                boundary_vertices.extend([a, b]);
            }
            2 => {
                if usage.ascending != 1 {
                    topology.orientation_conflicts += 1;
                }
            }
            _ => topology.non_manifold_edges += 1,
        }
    }

    let mut roots: Vec<usize> = boundary_vertices.into_iter().map(|v| loops.find(v)).collect();
    roots.sort_unstable();
    roots.dedup();
    topology.boundary_loops = roots.len();
    topology
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}
