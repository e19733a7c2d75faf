//! Opt-in timing hooks for the geometry engine.
//!
//! Timing is only collected when the `engine_metrics` feature is enabled and
//! the target is not WASM (`std::time::Instant` is unavailable there). In every
//! other build the calls compile to plain closure invocations.
//!
//! ```ignore
//! use mobius_engine::geom::{GeomMetrics, TimingBucket};
//!
//! let mut metrics = GeomMetrics::default();
//! metrics.begin();
//! let area = metrics.time(TimingBucket::SurfaceArea, || strip.surface_area());
//! if let Some(report) = metrics.end() {
//!     println!("area took {} ns", report.surface_area_ns);
//! }
//! ```

use serde::Serialize;

/// Phases of a strip evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Parameter grid and surface point evaluation.
    GridGeneration,
    /// Riemann-sum area integration.
    SurfaceArea,
    /// Boundary sampling and chord summation.
    EdgeLength,
    /// Triangulation, welding and topology diagnostics.
    Meshing,
    /// OBJ or serialized geometry export.
    Export,
}

/// Cumulative nanoseconds per [`TimingBucket`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct GeomTimingReport {
    pub grid_generation_ns: u64,
    pub surface_area_ns: u64,
    pub edge_length_ns: u64,
    pub meshing_ns: u64,
    pub export_ns: u64,
}

impl GeomTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.grid_generation_ns
            .saturating_add(self.surface_area_ns)
            .saturating_add(self.edge_length_ns)
            .saturating_add(self.meshing_ns)
            .saturating_add(self.export_ns)
    }

    /// Total in milliseconds, for display.
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }

    fn bucket_mut(&mut self, bucket: TimingBucket) -> &mut u64 {
        match bucket {
            TimingBucket::GridGeneration => &mut self.grid_generation_ns,
            TimingBucket::SurfaceArea => &mut self.surface_area_ns,
            TimingBucket::EdgeLength => &mut self.edge_length_ns,
            TimingBucket::Meshing => &mut self.meshing_ns,
            TimingBucket::Export => &mut self.export_ns,
        }
    }

    pub fn add(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = self.bucket_mut(bucket);
        *slot = slot.saturating_add(nanos);
    }
}

/// Accumulator for timing engine operations.
///
/// Call [`begin`](Self::begin) to reset, wrap work in [`time`](Self::time) and
/// read the totals with [`end`](Self::end), which is `None` whenever metrics
/// are compiled out.
#[derive(Debug, Default)]
pub struct GeomMetrics {
    #[cfg(all(feature = "engine_metrics", not(target_arch = "wasm32")))]
    report: GeomTimingReport,
}

impl GeomMetrics {
    pub fn begin(&mut self) {
        #[cfg(all(feature = "engine_metrics", not(target_arch = "wasm32")))]
        {
            self.report = GeomTimingReport::default();
        }
    }

    #[must_use]
    pub fn end(&self) -> Option<GeomTimingReport> {
        #[cfg(all(feature = "engine_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "engine_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Runs `f` and adds its wall time to `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "engine_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            // Cap at u64::MAX
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.report.add(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "engine_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }
}
