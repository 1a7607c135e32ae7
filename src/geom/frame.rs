//! Orientation frames along a curve: orthonormal basis construction, up-vector
//! twist, front/up axis remapping and Euler decomposition.

use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::core::{Point3, Quat, Tolerance, Transform, Vec3};
use super::curve::orthogonal_unit_vector;

// ─────────────────────────────────────────────────────────────────────────────
// Axis
// ─────────────────────────────────────────────────────────────────────────────

/// Local object axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Host enum index: x = 0, y = 1, z = 2.
    #[must_use]
    pub const fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    #[must_use]
    pub const fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown axis `{0}` (expected x, y or z)")]
pub struct ParseAxisError(pub String);

impl FromStr for Axis {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "0" => Ok(Self::X),
            "y" | "1" => Ok(Self::Y),
            "z" | "2" => Ok(Self::Z),
            _ => Err(ParseAxisError(s.to_owned())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AxisPair
// ─────────────────────────────────────────────────────────────────────────────

const H: f64 = FRAC_1_SQRT_2;

const fn quat(w: f64, x: f64, y: f64, z: f64) -> Quat {
    Quat { w, x, y, z }
}

/// Corrective rotations indexed `[front][up]`. Each valid entry maps the
/// front axis onto +X and the up axis onto +Y. The diagonal holds the
/// identity for the invalid `front == up` pairs.
const CORRECTIVE: [[Quat; 3]; 3] = [
    // front = X
    [
        Quat::IDENTITY,
        // up = Y: already aligned.
        Quat::IDENTITY,
        // up = Z: Rx(-90).
        quat(H, -H, 0.0, 0.0),
    ],
    // front = Y
    [
        // up = X: Rz(-90) * Ry(-180).
        quat(0.0, -H, -H, 0.0),
        Quat::IDENTITY,
        // up = Z: Rz(-90) * Ry(-90).
        quat(0.5, -0.5, -0.5, -0.5),
    ],
    // front = Z
    [
        // up = X: Ry(90) * Rz(90).
        quat(0.5, 0.5, 0.5, 0.5),
        // up = Y: Ry(90).
        quat(H, 0.0, H, 0.0),
        Quat::IDENTITY,
    ],
];

/// Which object axis follows the curve tangent and which follows the normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisPair {
    pub front: Axis,
    pub up: Axis,
}

impl AxisPair {
    #[must_use]
    pub const fn new(front: Axis, up: Axis) -> Self {
        Self { front, up }
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.front.index() != self.up.index()
    }

    /// Fixed rotation applied in object space before the curve basis.
    /// Invalid pairs yield the identity, leaving the base frame untouched.
    #[must_use]
    pub const fn corrective_rotation(self) -> Quat {
        CORRECTIVE[self.front.index()][self.up.index()]
    }
}

impl Default for AxisPair {
    fn default() -> Self {
        Self::new(Axis::X, Axis::Y)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Basis
// ─────────────────────────────────────────────────────────────────────────────

/// Rotates `up` around `tangent` by `twist` radians.
///
/// Twists within [`Tolerance::TWIST`] of zero return `up` unchanged.
#[must_use]
pub fn twist_up_vector(up: Vec3, tangent: Vec3, twist: f64) -> Vec3 {
    if twist.abs() <= Tolerance::TWIST.eps {
        return up;
    }
    Quat::from_axis_angle(tangent, twist).map_or(up, |q| q.rotate_vec(up))
}

/// Degenerate inputs that were replaced while building a [`FrameBasis`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasisFallback {
    /// Tangent had no length; world +X was used.
    pub zero_tangent: bool,
    /// Up vector was zero or parallel to the tangent; a perpendicular was used.
    pub parallel_up: bool,
}

impl BasisFallback {
    #[must_use]
    pub const fn any(self) -> bool {
        self.zero_tangent || self.parallel_up
    }
}

/// Right-handed orthonormal triad at a curve sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBasis {
    pub tangent: Vec3,
    pub normal: Vec3,
    pub bitangent: Vec3,
}

impl FrameBasis {
    /// Gram-Schmidt style construction from a tangent and an up hint.
    ///
    /// `normal` is the component of `up` perpendicular to the tangent and
    /// `bitangent = tangent x normal`. Degenerate inputs never produce NaN;
    /// see [`BasisFallback`] for what gets substituted.
    #[must_use]
    pub fn from_tangent_up(tangent: Vec3, up: Vec3) -> (Self, BasisFallback) {
        let mut fallback = BasisFallback::default();

        let tangent = tangent.normalized().unwrap_or_else(|| {
            fallback.zero_tangent = true;
            Vec3::X
        });

        let mut cross1 = tangent.cross(up);
        if !cross1.is_finite() || Tolerance::ZERO_LENGTH.is_zero_vec3(cross1) {
            fallback.parallel_up = true;
            cross1 = tangent.cross(orthogonal_unit_vector(tangent));
        }

        let normal = cross1
            .cross(tangent)
            .normalized()
            .unwrap_or_else(|| orthogonal_unit_vector(tangent));
        let bitangent = tangent.cross(normal).normalized().unwrap_or(Vec3::Z);

        (
            Self {
                tangent,
                normal,
                bitangent,
            },
            fallback,
        )
    }

    /// Basis as a transform with the triad in columns, placed at `origin`.
    #[must_use]
    pub fn to_transform(self, origin: Point3) -> Transform {
        Transform::from_axes(origin, self.tangent, self.normal, self.bitangent)
    }

    /// Final sample transform: basis applied after the corrective rotation
    /// for `axes`, so `axes.front` follows the tangent and `axes.up` the normal.
    #[must_use]
    pub fn oriented(self, origin: Point3, axes: AxisPair) -> Transform {
        self.to_transform(origin)
            .compose(Transform::from_quat(axes.corrective_rotation()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Euler angles
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    #[must_use]
    pub fn convert_radians(self, value: f64) -> f64 {
        match self {
            Self::Degrees => value.to_degrees(),
            Self::Radians => value,
        }
    }
}

/// XYZ-order rotation (`Rz * Ry * Rx`), stored in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerAngles {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerAngles {
    #[must_use]
    pub fn from_transform(transform: Transform) -> Self {
        let [x, y, z] = transform.euler_xyz();
        Self { x, y, z }
    }

    #[must_use]
    pub fn to_unit(self, unit: AngleUnit) -> Vec3 {
        Vec3::new(
            unit.convert_radians(self.x),
            unit.convert_radians(self.y),
            unit.convert_radians(self.z),
        )
    }
}
