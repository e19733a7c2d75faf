//! Wavefront OBJ export for meshed strips.

use std::io::{self, Write};

use super::core::Point3;
use super::mesh::GeomMesh;

/// Writes `mesh` as object `name`, followed by each polyline as an `l` element.
///
/// Polyline vertices are appended after the mesh vertices and carry no
/// texture or normal indices. The mesh is not validated here.
pub fn write_obj<W: Write>(w: &mut W, mesh: &GeomMesh, name: &str, polylines: &[Vec<Point3>]) -> io::Result<()> {
    writeln!(w, "# mobius-engine")?;
    writeln!(w, "o {name}")?;

    for p in &mesh.positions {
        writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
    }

    if let Some(uvs) = mesh.uvs.as_ref() {
        for uv in uvs {
            writeln!(w, "vt {} {}", uv[0], uv[1])?;
        }
    }

    if let Some(normals) = mesh.normals.as_ref() {
        for n in normals {
            writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
        }
    }

    let has_uvs = mesh.uvs.is_some();
    let has_normals = mesh.normals.is_some();

    for tri in mesh.indices.chunks_exact(3) {
        let a = tri[0] + 1;
        let b = tri[1] + 1;
        let c = tri[2] + 1;

        match (has_uvs, has_normals) {
            (true, true) => writeln!(w, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?,
            (true, false) => writeln!(w, "f {a}/{a} {b}/{b} {c}/{c}")?,
            (false, true) => writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")?,
            (false, false) => writeln!(w, "f {a} {b} {c}")?,
        }
    }

    let mut next_index = mesh.positions.len() + 1;
    for polyline in polylines.iter().filter(|line| line.len() >= 2) {
        for p in polyline {
            writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
        }
        let refs: Vec<String> = (next_index..next_index + polyline.len())
            .map(|i| i.to_string())
            .collect();
        writeln!(w, "l {}", refs.join(" "))?;
        next_index += polyline.len();
    }

    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(mesh: &GeomMesh, polylines: &[Vec<Point3>]) -> String {
        let mut out = Vec::new();
        write_obj(&mut out, mesh, "quad", polylines).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn writes_positions_and_one_based_faces() {
        let mesh = GeomMesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2],
        );
        let text = render(&mesh, &[]);
        assert!(text.starts_with("# mobius-engine\no quad\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert!(text.contains("\nf 1 2 3\n"));
    }

    #[test]
    fn faces_reference_uvs_and_normals_when_present() {
        let mut mesh = GeomMesh::new(vec![[0.0; 3]; 3], vec![0, 1, 2]);
        mesh.normals = Some(vec![[0.0, 0.0, 1.0]; 3]);
        assert!(render(&mesh, &[]).contains("f 1//1 2//2 3//3"));
        mesh.uvs = Some(vec![[0.0, 0.0]; 3]);
        let text = render(&mesh, &[]);
        assert!(text.contains("f 1/1/1 2/2/2 3/3/3"));
        assert_eq!(text.lines().filter(|l| l.starts_with("vt ")).count(), 3);
    }

    #[test]
    fn polylines_follow_mesh_vertices() {
        let mesh = GeomMesh::new(vec![[0.0; 3]; 3], vec![0, 1, 2]);
        let line = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)];
        let text = render(&mesh, &[line, vec![Point3::ORIGIN]]);
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 5);
        assert!(text.trim_end().ends_with("l 4 5"));
    }
}
