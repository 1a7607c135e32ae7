use crate::geom::{
    Arc3, ArcLengthCurve, Circle3, CubicBezier3, Curve3, CurveError, CurveInput, LengthCurve,
    Line3, Point3, Polyline3, Tolerance, Vec3,
};

fn unit_square(closed: bool) -> Polyline3 {
    Polyline3::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        closed,
    )
    .unwrap()
}

#[test]
fn line_length_maps_linearly_to_parameter() {
    let line = Line3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0));
    assert_eq!(LengthCurve::length(&line), 10.0);
    assert_eq!(line.param_at_length(2.5), 0.25);
    assert_eq!(line.param_at_length(-1.0), 0.0);
    assert_eq!(line.param_at_length(11.0), 1.0);
    assert_eq!(line.point_at_param(0.5), Point3::new(5.0, 0.0, 0.0));
    assert_eq!(line.tangent_at_param(0.3), Vec3::new(10.0, 0.0, 0.0));
}

#[test]
fn zero_length_line_maps_everything_to_start() {
    let p = Point3::new(1.0, 2.0, 3.0);
    let line = Line3::new(p, p);
    assert_eq!(LengthCurve::length(&line), 0.0);
    assert_eq!(line.param_at_length(5.0), 0.0);
    assert_eq!(line.point_at_param(line.param_at_length(5.0)), p);
}

#[test]
fn open_polyline_walks_segments_by_length() {
    let square = unit_square(false);
    let tol = Tolerance::new(1e-12);
    assert_eq!(square.length(), 3.0);
    let p = square.point_at_param(square.param_at_length(1.5));
    assert!(tol.approx_eq_point3(p, Point3::new(1.0, 0.5, 0.0)));
    assert_eq!(square.point_at_param(1.0), Point3::new(0.0, 1.0, 0.0));
}

#[test]
fn closed_polyline_includes_closing_segment() {
    let square = unit_square(true);
    let tol = Tolerance::new(1e-12);
    assert!(square.is_closed());
    assert_eq!(square.length(), 4.0);
    assert_eq!(square.points().len(), 4);

    let p = square.point_at_param(square.param_at_length(3.5));
    assert!(tol.approx_eq_point3(p, Point3::new(0.0, 0.5, 0.0)));
    let t = square
        .tangent_at_param(square.param_at_length(3.5))
        .normalized()
        .unwrap();
    assert!(tol.approx_eq_vec3(t, Vec3::new(0.0, -1.0, 0.0)));
}

#[test]
fn closed_polyline_drops_repeated_end_vertex() {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(2.0, 2.0, 0.0),
        Point3::new(0.0, 0.0, 0.0),
    ];
    let polyline = Polyline3::new(points, true).unwrap();
    assert_eq!(polyline.points().len(), 3);
    let expected = 4.0 + 8.0_f64.sqrt();
    assert!((polyline.length() - expected).abs() < 1e-12);
}

#[test]
fn polyline_tangent_at_vertex_follows_next_segment() {
    let square = unit_square(false);
    let t = square
        .tangent_at_param(square.param_at_length(1.0))
        .normalized()
        .unwrap();
    assert_eq!(t, Vec3::new(0.0, 1.0, 0.0));

    let end = square.tangent_at_param(1.0).normalized().unwrap();
    assert_eq!(end, Vec3::new(-1.0, 0.0, 0.0));
}

#[test]
fn polyline_skips_coincident_vertices_for_tangent() {
    let polyline = Polyline3::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 4.0),
        ],
        false,
    )
    .unwrap();
    let t = polyline.tangent_at_param(0.0).normalized().unwrap();
    assert_eq!(t, Vec3::Z);
}

#[test]
fn polyline_rejects_bad_input() {
    assert_eq!(
        Polyline3::new(vec![Point3::ORIGIN], false),
        Err(CurveError::InsufficientPoints { count: 1 })
    );
    assert_eq!(
        Polyline3::new(vec![Point3::ORIGIN, Point3::new(f64::NAN, 0.0, 0.0)], false),
        Err(CurveError::NonFinite)
    );
}

#[test]
fn polyline_from_flat_rejects_trailing_partial_point() {
    assert_eq!(
        Polyline3::from_flat(&[0.0, 0.0, 0.0, 3.0, 4.0, 0.0, 9.0], false),
        Err(CurveError::PartialCoordinates { len: 7 })
    );
    let polyline = Polyline3::from_flat(&[0.0, 0.0, 0.0, 3.0, 4.0, 0.0], false).unwrap();
    assert_eq!(polyline.points().len(), 2);
    assert_eq!(polyline.length(), 5.0);
}

#[test]
fn circle_length_and_quarter_point() {
    let circle = Circle3::from_center_xaxis_normal(Point3::ORIGIN, Vec3::X, Vec3::Z, 2.0);
    let tol = Tolerance::new(1e-12);
    let length = LengthCurve::length(&circle);
    assert!((length - 4.0 * std::f64::consts::PI).abs() < 1e-12);

    let u = circle.param_at_length(length * 0.25);
    assert!(tol.approx_eq_point3(circle.point_at_param(u), Point3::new(0.0, 2.0, 0.0)));
    let t = circle.tangent_at_param(u).normalized().unwrap();
    assert!(tol.approx_eq_vec3(t, Vec3::new(-1.0, 0.0, 0.0)));
}

#[test]
fn circle_try_new_validates_radius() {
    assert_eq!(
        Circle3::try_new(Point3::ORIGIN, Vec3::Z, 0.0),
        Err(CurveError::InvalidRadius { radius: 0.0 })
    );
    assert!(Circle3::try_new(Point3::ORIGIN, Vec3::Z, 1.0).is_ok());
}

#[test]
fn arc_length_is_sweep_times_radius() {
    let arc = Arc3::new(Point3::ORIGIN, Vec3::Z, 3.0, 0.0, std::f64::consts::FRAC_PI_2);
    let expected = 1.5 * std::f64::consts::PI;
    assert!((LengthCurve::length(&arc) - expected).abs() < 1e-12);
    assert!((arc.param_at_length(expected / 2.0) - 0.5).abs() < 1e-12);
    assert!(!Curve3::is_closed(&arc));
}

#[test]
fn straight_bezier_table_is_exact() {
    let bezier = CubicBezier3::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
    );
    let curve = ArcLengthCurve::new(bezier);
    let tol = Tolerance::new(1e-9);
    assert!((curve.length() - 3.0).abs() < 1e-9);

    let u = curve.param_at_length(1.5);
    assert!((u - 0.5).abs() < 1e-9);
    assert!(tol.approx_eq_point3(curve.point_at_param(u), Point3::new(1.5, 0.0, 0.0)));
    assert_eq!(curve.param_at_length(-2.0), 0.0);
    assert_eq!(curve.param_at_length(10.0), 1.0);
}

#[test]
fn curved_bezier_lengths_are_monotonic() {
    let bezier = CubicBezier3::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 2.0, 0.0),
        Point3::new(3.0, 2.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
    );
    let curve = ArcLengthCurve::with_samples(bezier, 512);
    let chord = 3.0;
    assert!(curve.length() > chord);

    let mut previous = 0.0;
    for i in 1..=10 {
        let u = curve.param_at_length(curve.length() * f64::from(i) / 10.0);
        assert!(u >= previous);
        previous = u;
    }
    assert!((previous - 1.0).abs() < 1e-12);
}

#[test]
fn curve_input_dispatches_to_inner_curve() {
    let input = CurveInput::Polyline(unit_square(true));
    assert_eq!(input.kind(), "polyline");
    assert!(input.is_closed());
    assert_eq!(input.length(), 4.0);

    let line = CurveInput::Line(Line3::new(Point3::ORIGIN, Point3::new(0.0, 0.0, 2.0)));
    assert!(!line.is_closed());
    assert_eq!(line.point_at_param(line.param_at_length(1.0)), Point3::new(0.0, 0.0, 1.0));
}
