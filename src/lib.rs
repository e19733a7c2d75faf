#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod parse;

use std::fmt;

use geom::{
    EdgeLengths, GeomMesh, GeomMeshDiagnostics, MeshOptions, MobiusDiagnostics, MobiusParams,
    MobiusStrip, Point3, mesh_mobius_strip,
};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not initialize rayon thread pool: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type")]
enum GeometryItem<'a> {
    Polyline {
        name: &'static str,
        points: Vec<[f64; 3]>,
    },
    Mesh {
        vertices: &'a [[f64; 3]],
        faces: Vec<[u32; 3]>,
        #[serde(skip_serializing_if = "Option::is_none")]
        normals: Option<&'a [[f64; 3]]>,
    },
}

#[derive(Debug, Serialize)]
struct StripSummary<'a> {
    params: &'a MobiusParams,
    surface_area: f64,
    edge_length: f64,
    edge_lengths: EdgeLengths,
    diagnostics: MobiusDiagnostics,
    mesh: &'a GeomMeshDiagnostics,
}

/// Public entry point for web consumers.
#[wasm_bindgen]
pub struct MobiusEngine {
    strip: MobiusStrip,
    mesh_options: MeshOptions,
    mesh: GeomMesh,
    mesh_diagnostics: GeomMeshDiagnostics,
}

#[wasm_bindgen]
impl MobiusEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(radius: f64, width: f64, resolution: i32) -> Result<MobiusEngine, JsValue> {
        let strip = MobiusStrip::new(radius, width, i64::from(resolution)).map_err(to_js_error)?;
        let mesh_options = MeshOptions::default();
        let (mesh, mesh_diagnostics) = mesh_mobius_strip(&strip, mesh_options);
        Ok(MobiusEngine {
            strip,
            mesh_options,
            mesh,
            mesh_diagnostics,
        })
    }

    /// Rebuild the strip with new parameters. On error the previous strip is kept.
    #[wasm_bindgen]
    pub fn set_params(&mut self, radius: f64, width: f64, resolution: i32) -> Result<(), JsValue> {
        self.strip = MobiusStrip::new(radius, width, i64::from(resolution)).map_err(to_js_error)?;
        self.remesh();
        Ok(())
    }

    /// Toggle welding of the seam column in the exported mesh.
    #[wasm_bindgen]
    pub fn set_weld_seam(&mut self, weld_seam: bool) {
        if self.mesh_options.weld_seam != weld_seam {
            self.mesh_options.weld_seam = weld_seam;
            self.remesh();
        }
    }

    #[wasm_bindgen]
    pub fn surface_area(&self) -> f64 {
        self.strip.surface_area()
    }

    #[wasm_bindgen]
    pub fn edge_length(&self) -> f64 {
        self.strip.edge_length()
    }

    /// Parameters, both estimates and the strip and mesh diagnostics.
    #[wasm_bindgen]
    pub fn get_summary(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.summary()).map_err(to_js_error)
    }

    /// Mesh plus the two boundary polylines, ready for a viewer.
    #[wasm_bindgen]
    pub fn get_geometry(&self) -> Result<JsValue, JsValue> {
        let edges = self.strip.edge_polylines();
        let items = geometry_items(&self.mesh, &edges);
        debug_log!("exporting {} geometry items ({})", items.len(), self.mesh_diagnostics.summary());
        serde_wasm_bindgen::to_value(&items).map_err(to_js_error)
    }

    /// Packed vertex positions for direct upload into a typed array.
    #[wasm_bindgen]
    pub fn get_positions(&self) -> Vec<f64> {
        self.mesh.positions_flat()
    }

    #[wasm_bindgen]
    pub fn get_indices(&self) -> Vec<u32> {
        self.mesh.indices.clone()
    }
}

impl MobiusEngine {
    fn remesh(&mut self) {
        let (mesh, diagnostics) = mesh_mobius_strip(&self.strip, self.mesh_options);
        self.mesh = mesh;
        self.mesh_diagnostics = diagnostics;
    }

    fn summary(&self) -> StripSummary<'_> {
        StripSummary {
            params: self.strip.params(),
            surface_area: self.strip.surface_area(),
            edge_length: self.strip.edge_length(),
            edge_lengths: self.strip.edge_lengths(),
            diagnostics: self.strip.diagnostics(),
            mesh: &self.mesh_diagnostics,
        }
    }
}

fn geometry_items<'a>(mesh: &'a GeomMesh, edges: &[Vec<Point3>; 2]) -> Vec<GeometryItem<'a>> {
    let mut items = Vec::with_capacity(3);
    if !mesh.indices.is_empty() {
        items.push(GeometryItem::Mesh {
            vertices: &mesh.positions,
            faces: mesh
                .indices
                .chunks_exact(3)
                .map(|tri| [tri[0], tri[1], tri[2]])
                .collect(),
            normals: mesh.normals.as_deref(),
        });
    }
    for (name, edge) in ["edge_positive", "edge_negative"].into_iter().zip(edges) {
        items.push(GeometryItem::Polyline {
            name,
            points: edge.iter().map(|p| p.to_array()).collect(),
        });
    }
    items
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::{GeometryItem, MobiusEngine, geometry_items};
    use crate::geom::{MeshOptions, MobiusStrip, mesh_mobius_strip};

    #[test]
    fn geometry_items_hold_mesh_and_both_edges() {
        let strip = MobiusStrip::new(3.0, 1.0, 6).unwrap();
        let (mesh, _) = mesh_mobius_strip(&strip, MeshOptions::default());
        let edges = strip.edge_polylines();
        let items = geometry_items(&mesh, &edges);

        assert_eq!(items.len(), 3);
        match &items[0] {
            GeometryItem::Mesh {
                vertices,
                faces,
                normals,
            } => {
                assert_eq!(vertices.len(), 36);
                assert_eq!(faces.len(), 50);
                assert_eq!(normals.map(<[[f64; 3]]>::len), Some(36));
            }
            other => panic!("expected Mesh, got {other:?}"),
        }
        match &items[2] {
            GeometryItem::Polyline { name, points } => {
                assert_eq!(*name, "edge_negative");
                assert_eq!(points.len(), 6);
            }
            other => panic!("expected Polyline, got {other:?}"),
        }
    }

    #[test]
    fn empty_mesh_exports_only_edges() {
        let strip = MobiusStrip::new(1.0, 0.0, 5).unwrap();
        let (mesh, _) = mesh_mobius_strip(&strip, MeshOptions::default());
        let items = geometry_items(&mesh, &strip.edge_polylines());
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| matches!(item, GeometryItem::Polyline { .. })));
    }

    #[test]
    fn engine_keeps_previous_strip_on_invalid_params() {
        let mut engine = MobiusEngine::new(5.0, 1.0, 20).unwrap();
        let area = engine.surface_area();
        assert!(engine.set_params(5.0, 1.0, 1).is_err());
        assert_eq!(engine.surface_area(), area);

        engine.set_weld_seam(true);
        assert_eq!(engine.mesh.vertex_count(), 20 * 19);
        assert_eq!(engine.summary().mesh.boundary_loop_count, 1);
        assert_eq!(engine.get_indices().len(), 6 * 19 * 19);
    }
}
