mod core;
mod curve;
mod frame;

pub use core::{Point3, Quat, Tolerance, Transform, Vec3};
pub use curve::{
    Arc3, ArcLengthCurve, Circle3, CubicBezier3, Curve3, CurveError, CurveInput, LengthCurve,
    Line3, Polyline3,
};
pub use frame::{
    AngleUnit, Axis, AxisPair, BasisFallback, EulerAngles, FrameBasis, ParseAxisError,
    twist_up_vector,
};

#[cfg(test)]
mod tests;
