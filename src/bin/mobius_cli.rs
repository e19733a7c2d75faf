#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    if let Err(err) = native::run() {
        eprintln!("mobius_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use mobius_engine::geom::{
        GeomContext, MeshOptions, MobiusStrip, TimingBucket, mesh_mobius_strip_with_context,
        write_obj,
    };
    use mobius_engine::parse::parse_params;
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Read, Write};
    use std::path::{Path, PathBuf};

    const USAGE: &str = r#"mobius_cli (mobius-engine)

Reads radius, width and resolution from standard input and prints the
approximate surface area and edge length of the Möbius strip.

USAGE:
  echo "1 0.2 100" | mobius_cli [options]

OPTIONS:
  --obj <path>       Write the triangulated strip and its edge as OBJ
  --weld-seam        Merge the seam column before writing the OBJ
  --overwrite        Overwrite an existing OBJ file
  -h, --help         Show this help

ENVIRONMENT:
  RUST_LOG           Log filter for stderr (default: warn)
"#;

    struct Options {
        obj_path: Option<PathBuf>,
        weld_seam: bool,
        overwrite: bool,
    }

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let mut options = Options {
            obj_path: None,
            weld_seam: false,
            overwrite: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--obj" => options.obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--weld-seam" => options.weld_seam = true,
                "--overwrite" => options.overwrite = true,
                "-h" | "--help" => {
                    println!("{USAGE}");
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| format!("read stdin: {e}"))?;

        let params = parse_params(&input).map_err(|e| e.to_string())?;
        let mut ctx = GeomContext::new();
        ctx.metrics.begin();

        let strip = MobiusStrip::from_params_with_context(params, &mut ctx).map_err(|e| e.to_string())?;
        let area = strip.surface_area_with_context(&mut ctx);
        let length = strip.edge_length_with_context(&mut ctx);

        println!("Surface Area ≈ {area:.4}");
        println!("Edge Length ≈ {length:.4}");

        render(&strip, &options, &mut ctx)?;

        if let Some(report) = ctx.metrics.end() {
            log::info!(
                "timing: grid {} ns, area {} ns, edge {} ns, mesh {} ns, export {} ns",
                report.grid_generation_ns,
                report.surface_area_ns,
                report.edge_length_ns,
                report.meshing_ns,
                report.export_ns
            );
        }
        Ok(())
    }

    /// Meshing is only worth its O(n²) cost when it is written out or logged.
    fn needs_mesh(options: &Options, info_logging: bool) -> bool {
        options.obj_path.is_some() || info_logging
    }

    fn render(strip: &MobiusStrip, options: &Options, ctx: &mut GeomContext) -> Result<(), String> {
        if !needs_mesh(options, log::log_enabled!(log::Level::Info)) {
            return Ok(());
        }

        let mesh_options = MeshOptions {
            weld_seam: options.weld_seam,
        };
        let (mesh, diagnostics) = mesh_mobius_strip_with_context(strip, mesh_options, ctx);
        log::info!("mesh {}", diagnostics.summary());
        for warning in &diagnostics.warnings {
            log::warn!("{warning}");
        }

        let Some(path) = options.obj_path.as_deref() else {
            return Ok(());
        };

        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;
        let edges = strip.edge_polylines();
        ctx.metrics
            .time(TimingBucket::Export, || write_obj_file(path, options.overwrite, |w| {
                write_obj(w, &mesh, "mobius_strip", &edges)
            }))?;
        log::info!("wrote {}", path.display());
        Ok(())
    }

    fn write_obj_file(
        path: &Path,
        overwrite: bool,
        write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    ) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);
        write(&mut w).map_err(|e| format!("write obj: {e}"))?;
        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }

}
