//! Mesh diagnostics for triangulated strips.
//!
//! Collected while meshing and returned next to the mesh. Besides the usual
//! quality counters they record the two topological signatures of a Möbius
//! band once its seam is welded: a single boundary loop, and edges whose two
//! adjacent triangles traverse them in the same direction (no consistent
//! orientation exists).

use std::fmt;

use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct GeomMeshDiagnostics {
    pub vertex_count: usize,
    pub triangle_count: usize,

    /// Vertices merged when welding the seam column onto the first column.
    pub welded_vertex_count: usize,

    /// Zero-area triangles dropped from the index buffer.
    pub degenerate_triangle_count: usize,

    /// Edges with exactly one adjacent triangle.
    pub open_edge_count: usize,

    /// Edges with more than two adjacent triangles.
    pub non_manifold_edge_count: usize,

    /// Interior edges traversed in the same direction by both neighbours.
    pub orientation_conflict_count: usize,

    /// Connected components of the open-edge graph.
    pub boundary_loop_count: usize,

    /// Total length of all open edges.
    pub boundary_length: f64,

    /// Only populated with the `engine_metrics` feature on native targets.
    pub timing: Option<super::metrics::GeomTimingReport>,

    pub warnings: Vec<String>,
}

impl GeomMeshDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count == 0
    }

    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    /// `true` when every interior edge is traversed in opposite directions.
    #[must_use]
    pub fn is_consistently_oriented(&self) -> bool {
        self.orientation_conflict_count == 0
    }

    /// Format: `"V:{vertices} T:{triangles} [issues...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("V:{} T:{}", self.vertex_count, self.triangle_count)];

        if self.welded_vertex_count > 0 {
            parts.push(format!("welded:{}", self.welded_vertex_count));
        }
        if self.degenerate_triangle_count > 0 {
            parts.push(format!("degenerate:{}", self.degenerate_triangle_count));
        }
        if self.open_edge_count > 0 {
            parts.push(format!("open:{}", self.open_edge_count));
        }
        if self.non_manifold_edge_count > 0 {
            parts.push(format!("non-manifold:{}", self.non_manifold_edge_count));
        }
        if self.orientation_conflict_count > 0 {
            parts.push(format!("orientation-conflicts:{}", self.orientation_conflict_count));
        }
        parts.push(format!("loops:{}", self.boundary_loop_count));

        parts.join(" ")
    }
}

impl fmt::Display for GeomMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;
        if self.welded_vertex_count > 0 {
            writeln!(f, "  Welded vertices: {}", self.welded_vertex_count)?;
        }
        if self.degenerate_triangle_count > 0 {
            writeln!(f, "  Degenerate triangles removed: {}", self.degenerate_triangle_count)?;
        }
        writeln!(
            f,
            "  Boundary: {} open edges in {} loop(s), length {:.4}",
            self.open_edge_count, self.boundary_loop_count, self.boundary_length
        )?;
        if self.non_manifold_edge_count > 0 {
            writeln!(f, "  Non-manifold edges: {}", self.non_manifold_edge_count)?;
        }
        if self.orientation_conflict_count > 0 {
            writeln!(f, "  Orientation conflicts: {}", self.orientation_conflict_count)?;
        }
        for warning in &self.warnings {
            writeln!(f, "  Warning: {warning}")?;
        }
        if let Some(ref timing) = self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_only_present_issues() {
        let mut diag = GeomMeshDiagnostics::new();
        diag.vertex_count = 12;
        diag.triangle_count = 10;
        diag.boundary_loop_count = 1;
        assert_eq!(diag.summary(), "V:12 T:10 loops:1");

        diag.open_edge_count = 6;
        diag.orientation_conflict_count = 3;
        assert_eq!(diag.summary(), "V:12 T:10 open:6 orientation-conflicts:3 loops:1");
        assert!(!diag.is_watertight());
        assert!(!diag.is_consistently_oriented());
        assert!(diag.is_manifold());
    }

    #[test]
    fn display_includes_warnings() {
        let mut diag = GeomMeshDiagnostics::new();
        diag.warnings.push("mesh has open edges".to_string());
        let text = diag.to_string();
        assert!(text.starts_with("Mesh Diagnostics:"));
        assert!(text.contains("Warning: mesh has open edges"));
    }
}
