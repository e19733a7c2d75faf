use super::core::Point3;
use super::grid::linspace;
use super::surface::{MobiusSurface, Surface};

pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

/// Iso-curve of a Möbius band at a fixed cross offset `v`.
///
/// `v = ±width/2` are the two boundary curves; they meet end to end across
/// the seam and together form the single edge of the band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MobiusEdge {
    pub surface: MobiusSurface,
    pub v: f64,
}

impl MobiusEdge {
    #[must_use]
    pub const fn new(surface: MobiusSurface, v: f64) -> Self {
        Self { surface, v }
    }

    /// Boundary at `v = +width/2`.
    #[must_use]
    pub fn positive(surface: MobiusSurface) -> Self {
        Self::new(surface, surface.half_width())
    }

    /// Boundary at `v = -width/2`.
    #[must_use]
    pub fn negative(surface: MobiusSurface) -> Self {
        Self::new(surface, -surface.half_width())
    }
}

impl Curve3 for MobiusEdge {
    fn point_at(&self, t: f64) -> Point3 {
        self.surface.point_at(t, self.v)
    }

    fn domain(&self) -> (f64, f64) {
        self.surface.domain_u()
    }
}

/// Evaluates `curve` at `count` evenly spaced parameters spanning its domain.
#[must_use]
pub fn sample_curve_points<C: Curve3 + ?Sized>(curve: &C, count: usize) -> Vec<Point3> {
    let (t0, t1) = curve.domain();
    linspace(t0, t1, count)
        .into_iter()
        .map(|t| curve.point_at(t))
        .collect()
}

/// Sum of Euclidean distances between consecutive points.
#[must_use]
pub fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| w[1].distance_to(w[0])).sum()
}

/// Chord-length approximation of the arc length of `curve`, using `count`
/// samples (`count - 1` chords). Fewer than two samples measure zero.
#[must_use]
pub fn curve_chord_length<C: Curve3 + ?Sized>(curve: &C, count: usize) -> f64 {
    polyline_length(&sample_curve_points(curve, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    struct UnitCircle;

    impl Curve3 for UnitCircle {
        fn point_at(&self, t: f64) -> Point3 {
            Point3::new(t.cos(), t.sin(), 0.0)
        }

        fn domain(&self) -> (f64, f64) {
            (0.0, TAU)
        }
    }

    #[test]
    fn polyline_length_sums_segments() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
            Point3::new(3.0, 4.0, 2.0),
        ];
        assert!((polyline_length(&points) - 7.0).abs() < 1e-12);
        assert_eq!(polyline_length(&points[..1]), 0.0);
        assert_eq!(polyline_length(&[]), 0.0);
    }

    #[test]
    fn chord_length_of_circle_is_inscribed_polygon_perimeter() {
        // Four chords of the unit circle form a square of side √2.
        let length = curve_chord_length(&UnitCircle, 5);
        assert!((length - 4.0 * 2.0_f64.sqrt()).abs() < 1e-12);
        let fine = curve_chord_length(&UnitCircle, 2000);
        assert!(fine < TAU);
        assert!((fine - TAU).abs() < 1e-5);
    }

    #[test]
    fn chord_length_needs_two_samples() {
        assert_eq!(curve_chord_length(&UnitCircle, 1), 0.0);
        assert_eq!(curve_chord_length(&UnitCircle, 0), 0.0);
    }

    #[test]
    fn mobius_edges_sit_on_the_boundary() {
        let surface = MobiusSurface::new(4.0, 2.0);
        let top = MobiusEdge::positive(surface);
        let bottom = MobiusEdge::negative(surface);
        assert_eq!(top.v, 1.0);
        assert_eq!(bottom.v, -1.0);
        assert_eq!(top.point_at(0.0), Point3::new(5.0, 0.0, 0.0));
        assert_eq!(bottom.point_at(0.0), Point3::new(3.0, 0.0, 0.0));
        assert_eq!(top.domain(), (0.0, TAU));
    }
}
