use crate::geom::{
    AngleUnit, Axis, AxisPair, EulerAngles, FrameBasis, Point3, Tolerance, Transform, Vec3,
    twist_up_vector,
};

const VALID_PAIRS: [(Axis, Axis); 6] = [
    (Axis::X, Axis::Y),
    (Axis::X, Axis::Z),
    (Axis::Y, Axis::X),
    (Axis::Y, Axis::Z),
    (Axis::Z, Axis::X),
    (Axis::Z, Axis::Y),
];

fn assert_orthonormal(basis: FrameBasis) {
    let tol = Tolerance::new(1e-9);
    for v in [basis.tangent, basis.normal, basis.bitangent] {
        assert!(tol.approx_eq_f64(v.length(), 1.0), "not unit: {v:?}");
    }
    assert!(tol.approx_eq_f64(basis.tangent.dot(basis.normal), 0.0));
    assert!(tol.approx_eq_f64(basis.tangent.dot(basis.bitangent), 0.0));
    assert!(tol.approx_eq_f64(basis.normal.dot(basis.bitangent), 0.0));
    // Right-handed.
    assert!(tol.approx_eq_vec3(basis.tangent.cross(basis.normal), basis.bitangent));
}

#[test]
fn corrective_rotation_sends_front_to_x_and_up_to_y() {
    let tol = Tolerance::new(1e-12);
    for (front, up) in VALID_PAIRS {
        let pair = AxisPair::new(front, up);
        assert!(pair.is_valid());
        let q = pair.corrective_rotation();
        assert!(
            tol.approx_eq_vec3(q.rotate_vec(front.unit()), Vec3::X),
            "front {front} up {up}"
        );
        assert!(
            tol.approx_eq_vec3(q.rotate_vec(up.unit()), Vec3::Y),
            "front {front} up {up}"
        );
        let norm = q.w * q.w + q.x * q.x + q.y * q.y + q.z * q.z;
        assert!(tol.approx_eq_f64(norm, 1.0));
    }
}

#[test]
fn oriented_frame_aligns_front_with_tangent_and_up_with_normal() {
    let tol = Tolerance::new(1e-9);
    let (basis, fallback) =
        FrameBasis::from_tangent_up(Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
    assert!(!fallback.any());

    for (front, up) in VALID_PAIRS {
        let xf = basis.oriented(Point3::new(1.0, 2.0, 3.0), AxisPair::new(front, up));
        assert!(tol.approx_eq_vec3(xf.apply_vec(front.unit()), basis.tangent));
        assert!(tol.approx_eq_vec3(xf.apply_vec(up.unit()), basis.normal));
        assert_eq!(xf.translation(), Vec3::new(1.0, 2.0, 3.0));
    }
}

#[test]
fn invalid_pair_keeps_base_frame() {
    let (basis, _) = FrameBasis::from_tangent_up(Vec3::new(0.2, 0.9, -0.4), Vec3::Z);
    let origin = Point3::new(-1.0, 0.5, 4.0);
    let base = basis.to_transform(origin);
    for axis in Axis::ALL {
        let xf = basis.oriented(origin, AxisPair::new(axis, axis));
        assert_eq!(xf, base);
    }
}

#[test]
fn basis_is_orthonormal_for_non_perpendicular_up() {
    let cases = [
        (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.3, 1.0, 0.2)),
        (Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 1.0, 1.0)),
        (Vec3::new(2.0, -1.0, 0.5), Vec3::new(0.0, 1.0, 0.0)),
        (Vec3::new(-0.1, 0.2, 0.97), Vec3::new(1.0, 0.0, 0.0)),
    ];
    for (tangent, up) in cases {
        let (basis, fallback) = FrameBasis::from_tangent_up(tangent, up);
        assert!(!fallback.any());
        assert_orthonormal(basis);
        // The normal leans toward the up hint.
        assert!(basis.normal.dot(up) > 0.0);
    }
}

#[test]
fn parallel_up_uses_deterministic_perpendicular() {
    let (basis, fallback) = FrameBasis::from_tangent_up(Vec3::new(0.0, 3.0, 0.0), Vec3::Y);
    assert!(fallback.parallel_up);
    assert!(!fallback.zero_tangent);
    assert_orthonormal(basis);

    let (again, _) = FrameBasis::from_tangent_up(Vec3::new(0.0, 3.0, 0.0), Vec3::Y);
    assert_eq!(basis, again);

    let (_, zero_up) = FrameBasis::from_tangent_up(Vec3::X, Vec3::ZERO);
    assert!(zero_up.parallel_up);
}

#[test]
fn zero_tangent_falls_back_to_world_x() {
    let (basis, fallback) = FrameBasis::from_tangent_up(Vec3::ZERO, Vec3::Y);
    assert!(fallback.zero_tangent);
    assert!(!fallback.parallel_up);
    assert_eq!(basis.tangent, Vec3::X);
    assert_orthonormal(basis);
}

#[test]
fn twist_rotates_up_about_tangent() {
    let tol = Tolerance::new(1e-12);
    let up = twist_up_vector(Vec3::Y, Vec3::X, std::f64::consts::FRAC_PI_2);
    assert!(tol.approx_eq_vec3(up, Vec3::Z));

    let up = twist_up_vector(Vec3::Y, Vec3::new(5.0, 0.0, 0.0), std::f64::consts::PI);
    assert!(tol.approx_eq_vec3(up, Vec3::new(0.0, -1.0, 0.0)));
}

#[test]
fn aligned_frame_has_zero_euler_angles() {
    let (basis, _) = FrameBasis::from_tangent_up(Vec3::X, Vec3::Y);
    let xf = basis.oriented(Point3::ORIGIN, AxisPair::default());
    assert_eq!(xf, Transform::identity());
    let angles = EulerAngles::from_transform(xf).to_unit(AngleUnit::Degrees);
    assert_eq!(angles, Vec3::ZERO);
}

#[test]
fn tangent_along_y_yields_quarter_turn_about_z() {
    let tol = Tolerance::new(1e-9);
    let (basis, _) = FrameBasis::from_tangent_up(Vec3::Y, Vec3::new(-1.0, 0.0, 0.0));
    let xf = basis.oriented(Point3::ORIGIN, AxisPair::default());
    let angles = EulerAngles::from_transform(xf).to_unit(AngleUnit::Degrees);
    assert!(tol.approx_eq_vec3(angles, Vec3::new(0.0, 0.0, 90.0)));
}
