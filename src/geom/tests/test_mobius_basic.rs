use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::{GeomContext, MobiusError, MobiusParams, MobiusStrip};

fn strip(radius: f64, width: f64, resolution: i64) -> MobiusStrip {
    MobiusStrip::new(radius, width, resolution).expect("valid strip")
}

#[test]
fn zero_width_strip_has_zero_area() {
    for n in [2, 3, 10, 57, 200] {
        let area = strip(1.0, 0.0, n).surface_area();
        assert!(area.abs() < 1e-12, "n={n} area={area}");
    }
}

#[test]
fn edge_length_converges_between_50_and_500() {
    let coarse = strip(5.0, 1.0, 50).edge_length();
    let fine = strip(5.0, 1.0, 500).edge_length();
    assert!(coarse < fine);
    assert!((fine - coarse).abs() / fine < 0.01, "coarse={coarse} fine={fine}");
}

#[test]
fn surface_area_converges_with_resolution() {
    let a50 = strip(5.0, 1.0, 50).surface_area();
    let a500 = strip(5.0, 1.0, 500).surface_area();
    let a1000 = strip(5.0, 1.0, 1000).surface_area();

    // Endpoint samples are counted with full weight, so the sum overshoots by
    // about (n/(n-1))² and decreases toward the true area.
    assert!(a50 > a500 && a500 > a1000);
    assert!((a500 - a1000) / a1000 < 0.01);

    let corrected = |area: f64, n: f64| area * ((n - 1.0) / n).powi(2);
    let c50 = corrected(a50, 50.0);
    let c500 = corrected(a500, 500.0);
    assert!((c50 - c500).abs() / c500 < 0.01, "c50={c50} c500={c500}");

    // Reference values for R=5, w=1.
    assert!((a50 - 32.725_519_546_691_9).abs() < 1e-9);
    assert!((a500 - 31.555_198_370_397_8).abs() < 1e-8);
}

#[test]
fn negative_width_has_the_same_non_negative_area() {
    let positive = strip(5.0, 1.0, 50);
    let negative = strip(5.0, -1.0, 50);
    let area = negative.surface_area();
    assert!(area >= 0.0, "area={area}");
    // Rows are visited in the opposite v order, so only agreement to rounding.
    assert!((area - positive.surface_area()).abs() < 1e-9);
    assert!((negative.edge_length() - positive.edge_length()).abs() < 1e-9);
    assert_eq!(format!("{area:.4}"), "32.7255");
}

#[test]
fn thin_strip_edge_is_twice_the_centre_circle() {
    let length = strip(10.0, 1e-6, 1000).edge_length();
    let expected = 2.0 * TAU * 10.0;
    assert!((length - expected).abs() / expected < 0.01, "length={length}");
}

#[test]
fn invalid_resolution_is_rejected() {
    for n in [1, 0, -1, -50] {
        assert_eq!(
            MobiusStrip::new(5.0, 1.0, n).unwrap_err(),
            MobiusError::InvalidResolution { resolution: n }
        );
    }
}

#[test]
fn non_finite_inputs_are_rejected() {
    assert!(matches!(
        MobiusStrip::new(f64::NAN, 1.0, 10),
        Err(MobiusError::NonFiniteInput { parameter: "radius", .. })
    ));
    assert!(matches!(
        MobiusStrip::new(1.0, f64::NEG_INFINITY, 10),
        Err(MobiusError::NonFiniteInput { parameter: "width", .. })
    ));
}

#[test]
fn minimal_resolution_gives_finite_estimates() {
    let strip = strip(5.0, 2.0, 2);
    let area = strip.surface_area();
    let length = strip.edge_length();
    assert!(area.is_finite() && area >= 0.0);
    assert!(length.is_finite() && length >= 0.0);
    // Two samples per boundary: one chord from (6,0,0) to (4,0,0) and back.
    assert!((length - 4.0).abs() < 1e-12);
}

#[test]
fn surface_points_are_n_by_n_and_finite() {
    for n in [2, 7, 33] {
        let strip = strip(3.0, 1.5, n);
        let points = strip.surface_points();
        let n = n as usize;
        assert_eq!(points.x.shape(), (n, n));
        assert_eq!(points.y.shape(), (n, n));
        assert_eq!(points.z.shape(), (n, n));
        assert!(points.all_finite());
        assert_eq!(strip.grid().shape(), (n, n));
    }
}

#[test]
fn grid_rows_hold_v_and_columns_hold_u() {
    let strip = strip(2.0, 1.0, 5);
    let grid = strip.grid();
    assert_eq!(grid.u.row(0).unwrap(), grid.u.row(4).unwrap());
    assert_eq!(grid.u.get(0, 0), Some(0.0));
    assert_eq!(grid.u.get(0, 4), Some(TAU));
    assert_eq!(grid.v.get(0, 2), Some(-0.5));
    assert_eq!(grid.v.get(4, 2), Some(0.5));
    assert!((grid.u_step() - TAU / 4.0).abs() < 1e-15);
    assert!((grid.v_step() - 0.25).abs() < 1e-15);
}

#[test]
fn repeated_queries_are_bit_identical() {
    let strip = strip(4.0, 1.3, 64);
    let area = strip.surface_area();
    let length = strip.edge_length();
    for _ in 0..3 {
        assert_eq!(strip.surface_area().to_bits(), area.to_bits());
        assert_eq!(strip.edge_length().to_bits(), length.to_bits());
    }
    let again = MobiusStrip::new(4.0, 1.3, 64).unwrap();
    assert_eq!(again.surface_area().to_bits(), area.to_bits());
    assert_eq!(again, strip);
}

#[test]
fn context_variants_match_plain_queries() {
    let mut ctx = GeomContext::new();
    ctx.metrics.begin();
    let params = MobiusParams::new(3.0, 0.8, 40).unwrap();
    let strip = MobiusStrip::from_params_with_context(params, &mut ctx).unwrap();
    assert_eq!(strip.surface_area_with_context(&mut ctx), strip.surface_area());
    assert_eq!(strip.edge_length_with_context(&mut ctx), strip.edge_length());
    if let Some(report) = ctx.metrics.end() {
        assert_eq!(report.meshing_ns, 0);
    }
}

#[test]
fn self_intersecting_parameters_still_evaluate() {
    let strip = strip(0.25, 1.0, 30);
    assert!(strip.diagnostics().self_intersecting);
    assert!(strip.surface_area().is_finite());
    assert!(strip.edge_length().is_finite());

    let mirrored = MobiusStrip::new(-3.0, 1.0, 30).unwrap();
    let original = MobiusStrip::new(3.0, 1.0, 30).unwrap();
    assert!(mirrored.diagnostics().negative_radius);
    assert!((mirrored.edge_length() - original.edge_length()).abs() < 1e-9);
}

#[test]
fn random_parameters_give_consistent_estimates() {
    let mut rng = StdRng::seed_from_u64(0x6d6f_6269_7573);
    for _ in 0..50 {
        let radius = rng.random_range(0.5..20.0);
        let width = rng.random_range(0.0..radius);
        let n = rng.random_range(2..120);
        let strip = strip(radius, width, n);

        let area = strip.surface_area();
        let lengths = strip.edge_lengths();
        assert!(area.is_finite() && area >= 0.0);
        assert!(lengths.positive >= 0.0 && lengths.negative >= 0.0);
        assert_eq!(lengths.total(), strip.edge_length());

        // Chords are bounded by the arc length, whose speed is at most
        // sqrt((R + w/2)² + w²/16).
        let max_speed = ((radius + width / 2.0).powi(2) + width * width / 16.0).sqrt();
        assert!(strip.edge_length() <= 2.0 * TAU * max_speed + 1e-9);
        assert!(strip.surface_points().all_finite());
    }
}
