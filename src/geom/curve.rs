use super::core::{Point3, Tolerance, Vec3};

/// Errors raised while constructing curves from host data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    /// A polyline needs at least two vertices.
    #[error("polyline requires at least 2 points, got {count}")]
    InsufficientPoints { count: usize },

    /// A coordinate or scalar input was NaN or infinite.
    #[error("curve input contains a non-finite value")]
    NonFinite,

    /// Flat coordinate buffers hold whole `xyz` triples.
    #[error("flat coordinate buffer length {len} is not a multiple of 3")]
    PartialCoordinates { len: usize },

    /// Radius must be strictly positive.
    #[error("radius must be > 0, got {radius}")]
    InvalidRadius { radius: f64 },
}

/// Parametric curve evaluated on its own domain.
pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn is_closed(&self) -> bool {
        false
    }

    #[must_use]
    fn derivative_at(&self, t: f64) -> Vec3 {
        let (a, b) = self.domain();
        let span = b - a;
        if !span.is_finite() || span == 0.0 {
            return Vec3::ZERO;
        }

        let h = Tolerance::DERIVATIVE.relative_to(span);
        if !h.is_finite() || h == 0.0 {
            return Vec3::ZERO;
        }

        let t0 = (t - h).max(a);
        let t1 = (t + h).min(b);
        if t1 == t0 {
            return Vec3::ZERO;
        }

        let p0 = self.point_at(t0);
        let p1 = self.point_at(t1);
        p1.sub_point(p0).mul_scalar(1.0 / (t1 - t0))
    }

    /// Returns the unit tangent vector at parameter `t`.
    /// Returns `None` if the derivative is zero or degenerate.
    #[must_use]
    fn tangent_at(&self, t: f64) -> Option<Vec3> {
        self.derivative_at(t).normalized()
    }
}

/// Arc-length parametrization of a curve, the only curve service the
/// necklace sampler depends on.
///
/// `param_at_length` receives lengths already resolved into
/// `[0, length()]`; implementations clamp anything outside that range.
/// `tangent_at_param` does not need to be normalized.
pub trait LengthCurve {
    fn length(&self) -> f64;
    fn param_at_length(&self, length: f64) -> f64;
    fn point_at_param(&self, param: f64) -> Point3;
    fn tangent_at_param(&self, param: f64) -> Vec3;
}

impl<T: LengthCurve + ?Sized> LengthCurve for &T {
    fn length(&self) -> f64 {
        (**self).length()
    }

    fn param_at_length(&self, length: f64) -> f64 {
        (**self).param_at_length(length)
    }

    fn point_at_param(&self, param: f64) -> Point3 {
        (**self).point_at_param(param)
    }

    fn tangent_at_param(&self, param: f64) -> Vec3 {
        (**self).tangent_at_param(param)
    }
}

/// Maps a length onto a unit domain, guarding zero-length curves.
fn unit_param(length: f64, total: f64) -> f64 {
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }
    (length / total).clamp(0.0, 1.0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Line3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    #[must_use]
    pub const fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn direction(self) -> Vec3 {
        self.end.sub_point(self.start)
    }
}

impl Curve3 for Line3 {
    fn point_at(&self, t: f64) -> Point3 {
        let dir = self.direction();
        self.start.add_vec(dir.mul_scalar(t))
    }

    fn derivative_at(&self, _t: f64) -> Vec3 {
        self.direction()
    }
}

impl LengthCurve for Line3 {
    fn length(&self) -> f64 {
        self.direction().length()
    }

    fn param_at_length(&self, length: f64) -> f64 {
        unit_param(length, LengthCurve::length(self))
    }

    fn point_at_param(&self, param: f64) -> Point3 {
        self.point_at(param.clamp(0.0, 1.0))
    }

    fn tangent_at_param(&self, _param: f64) -> Vec3 {
        self.direction()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Polyline3
// ─────────────────────────────────────────────────────────────────────────────

/// Polyline parametrized by normalized arc length on `[0, 1]`.
///
/// A closed polyline stores its closing segment explicitly, so every
/// lookup below works on an open vertex chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline3 {
    vertices: Vec<Point3>,
    cumulative_lengths: Vec<f64>,
    total_length: f64,
    closed: bool,
}

impl Polyline3 {
    pub fn new(mut points: Vec<Point3>, closed: bool) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::InsufficientPoints {
                count: points.len(),
            });
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(CurveError::NonFinite);
        }
        if closed && points.len() > 2 && points.first() == points.last() {
            points.pop();
        }
        if closed {
            let first = points[0];
            points.push(first);
        }

        let mut cumulative_lengths = Vec::with_capacity(points.len());
        cumulative_lengths.push(0.0);
        let mut total = 0.0;
        for window in points.windows(2) {
            total += window[1].sub_point(window[0]).length();
            cumulative_lengths.push(total);
        }

        Ok(Self {
            vertices: points,
            cumulative_lengths,
            total_length: total,
            closed,
        })
    }

    /// Builds a polyline from a flat `[x0, y0, z0, x1, ...]` buffer.
    pub fn from_flat(coordinates: &[f64], closed: bool) -> Result<Self, CurveError> {
        if coordinates.len() % 3 != 0 {
            return Err(CurveError::PartialCoordinates {
                len: coordinates.len(),
            });
        }
        let points = coordinates
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Self::new(points, closed)
    }

    /// Input vertices, without the duplicated closing vertex.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        if self.closed {
            &self.vertices[..self.vertices.len() - 1]
        } else {
            &self.vertices
        }
    }

    #[must_use]
    pub const fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Index of the segment that contains `target` (an absolute length).
    /// Vertices belong to the segment that starts at them, except the last.
    fn segment_index(&self, target: f64) -> usize {
        let last_segment = self.vertices.len() - 2;
        let idx = match self
            .cumulative_lengths
            .binary_search_by(|value| value.total_cmp(&target))
        {
            Ok(i) => i,
            Err(i) => i.max(1) - 1,
        };
        idx.min(last_segment)
    }
}

impl Curve3 for Polyline3 {
    fn point_at(&self, t: f64) -> Point3 {
        if self.total_length <= 0.0 || !self.total_length.is_finite() {
            return self.vertices[0];
        }

        let target = t.clamp(0.0, 1.0) * self.total_length;
        let idx = self.segment_index(target);
        let seg_start = self.vertices[idx];
        let seg_end = self.vertices[idx + 1];
        let seg_len = self.cumulative_lengths[idx + 1] - self.cumulative_lengths[idx];
        if seg_len == 0.0 {
            return seg_start;
        }
        let local = target - self.cumulative_lengths[idx];
        seg_start.lerp(seg_end, (local / seg_len).clamp(0.0, 1.0))
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        if self.total_length <= 0.0 || !self.total_length.is_finite() {
            return Vec3::ZERO;
        }
        let target = t.clamp(0.0, 1.0) * self.total_length;
        let mut idx = self.segment_index(target);
        // Skip zero-length segments so coincident vertices still yield a direction.
        while idx + 1 < self.vertices.len() - 1
            && self.vertices[idx + 1].sub_point(self.vertices[idx]).length_squared() == 0.0
        {
            idx += 1;
        }
        self.vertices[idx + 1]
            .sub_point(self.vertices[idx])
            .mul_scalar(self.total_length)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl LengthCurve for Polyline3 {
    fn length(&self) -> f64 {
        self.total_length
    }

    fn param_at_length(&self, length: f64) -> f64 {
        unit_param(length, self.total_length)
    }

    fn point_at_param(&self, param: f64) -> Point3 {
        self.point_at(param)
    }

    fn tangent_at_param(&self, param: f64) -> Vec3 {
        self.derivative_at(param)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Circle3 / Arc3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle3 {
    pub center: Point3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub radius: f64,
}

impl Circle3 {
    #[must_use]
    pub fn new(center: Point3, normal: Vec3, radius: f64) -> Self {
        let (x_axis, y_axis) = frame_axes_from_normal(normal);
        Self {
            center,
            x_axis,
            y_axis,
            radius,
        }
    }

    #[must_use]
    pub fn from_center_xaxis_normal(center: Point3, x_axis: Vec3, normal: Vec3, radius: f64) -> Self {
        let (x_axis, y_axis) = frame_axes_from_xaxis_normal(x_axis, normal);
        Self {
            center,
            x_axis,
            y_axis,
            radius,
        }
    }

    /// Validating constructor used for host-supplied circles.
    pub fn try_new(center: Point3, normal: Vec3, radius: f64) -> Result<Self, CurveError> {
        if !center.is_finite() || !normal.is_finite() || !radius.is_finite() {
            return Err(CurveError::NonFinite);
        }
        if radius <= 0.0 {
            return Err(CurveError::InvalidRadius { radius });
        }
        Ok(Self::new(center, normal, radius))
    }
}

impl Curve3 for Circle3 {
    fn point_at(&self, t: f64) -> Point3 {
        let angle = std::f64::consts::TAU * t.clamp(0.0, 1.0);
        self.center
            .add_vec(self.x_axis.mul_scalar(self.radius * angle.cos()))
            .add_vec(self.y_axis.mul_scalar(self.radius * angle.sin()))
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let angle = std::f64::consts::TAU * t.clamp(0.0, 1.0);
        let dx = self.x_axis.mul_scalar(-self.radius * angle.sin());
        let dy = self.y_axis.mul_scalar(self.radius * angle.cos());
        dx.add(dy).mul_scalar(std::f64::consts::TAU)
    }
}

impl LengthCurve for Circle3 {
    fn length(&self) -> f64 {
        std::f64::consts::TAU * self.radius.abs()
    }

    fn param_at_length(&self, length: f64) -> f64 {
        unit_param(length, LengthCurve::length(self))
    }

    fn point_at_param(&self, param: f64) -> Point3 {
        self.point_at(param)
    }

    fn tangent_at_param(&self, param: f64) -> Vec3 {
        self.derivative_at(param)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc3 {
    pub center: Point3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

impl Arc3 {
    #[must_use]
    pub fn new(center: Point3, normal: Vec3, radius: f64, start_angle: f64, sweep_angle: f64) -> Self {
        let (x_axis, y_axis) = frame_axes_from_normal(normal);
        Self {
            center,
            x_axis,
            y_axis,
            radius,
            start_angle,
            sweep_angle,
        }
    }
}

impl Curve3 for Arc3 {
    fn point_at(&self, t: f64) -> Point3 {
        let angle = self.start_angle + self.sweep_angle * t.clamp(0.0, 1.0);
        self.center
            .add_vec(self.x_axis.mul_scalar(self.radius * angle.cos()))
            .add_vec(self.y_axis.mul_scalar(self.radius * angle.sin()))
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let angle = self.start_angle + self.sweep_angle * t.clamp(0.0, 1.0);
        let dx = self.x_axis.mul_scalar(-self.radius * angle.sin());
        let dy = self.y_axis.mul_scalar(self.radius * angle.cos());
        dx.add(dy).mul_scalar(self.sweep_angle)
    }

    fn is_closed(&self) -> bool {
        const FULL_CIRCLE_TOLERANCE: f64 = 1e-9;
        (self.sweep_angle.abs() - std::f64::consts::TAU).abs() < FULL_CIRCLE_TOLERANCE
    }
}

impl LengthCurve for Arc3 {
    fn length(&self) -> f64 {
        self.sweep_angle.abs() * self.radius.abs()
    }

    fn param_at_length(&self, length: f64) -> f64 {
        unit_param(length, LengthCurve::length(self))
    }

    fn point_at_param(&self, param: f64) -> Point3 {
        self.point_at(param)
    }

    fn tangent_at_param(&self, param: f64) -> Vec3 {
        self.derivative_at(param)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CubicBezier3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier3 {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
}

impl CubicBezier3 {
    #[must_use]
    pub const fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self { p0, p1, p2, p3 }
    }
}

impl Curve3 for CubicBezier3 {
    fn point_at(&self, t: f64) -> Point3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let u2 = u * u;
        let t2 = t * t;
        let w = [u2 * u, 3.0 * u2 * t, 3.0 * u * t2, t2 * t];
        let p = [self.p0, self.p1, self.p2, self.p3];
        Point3::new(
            w[0] * p[0].x + w[1] * p[1].x + w[2] * p[2].x + w[3] * p[3].x,
            w[0] * p[0].y + w[1] * p[1].y + w[2] * p[2].y + w[3] * p[3].y,
            w[0] * p[0].z + w[1] * p[1].z + w[2] * p[2].z + w[3] * p[3].z,
        )
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = self.p1.sub_point(self.p0);
        let b = self.p2.sub_point(self.p1);
        let c = self.p3.sub_point(self.p2);
        a.mul_scalar(3.0 * u * u)
            .add(b.mul_scalar(6.0 * u * t))
            .add(c.mul_scalar(3.0 * t * t))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Arc-length table adapter
// ─────────────────────────────────────────────────────────────────────────────

/// An entry in the arc-length lookup table.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ArcLengthEntry {
    parameter: f64,
    arc_length: f64,
}

/// Gives any parametric [`Curve3`] an arc-length parametrization by
/// tabulating cumulative chord lengths over its domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLengthCurve<C> {
    curve: C,
    table: Vec<ArcLengthEntry>,
}

impl<C: Curve3> ArcLengthCurve<C> {
    pub const DEFAULT_SAMPLES: usize = 256;

    #[must_use]
    pub fn new(curve: C) -> Self {
        Self::with_samples(curve, Self::DEFAULT_SAMPLES)
    }

    #[must_use]
    pub fn with_samples(curve: C, samples: usize) -> Self {
        let table = build_arc_length_table(&curve, samples);
        Self { curve, table }
    }

    #[must_use]
    pub fn curve(&self) -> &C {
        &self.curve
    }
}

impl<C: Curve3> LengthCurve for ArcLengthCurve<C> {
    fn length(&self) -> f64 {
        self.table.last().map_or(0.0, |e| e.arc_length)
    }

    fn param_at_length(&self, length: f64) -> f64 {
        let (t0, t1) = self.curve.domain();
        parameter_at_arc_length(&self.table, t0, t1, length)
    }

    fn point_at_param(&self, param: f64) -> Point3 {
        self.curve.point_at(param)
    }

    fn tangent_at_param(&self, param: f64) -> Vec3 {
        self.curve.derivative_at(param)
    }
}

/// Builds an arc-length lookup table for a curve.
fn build_arc_length_table<C: Curve3>(curve: &C, samples: usize) -> Vec<ArcLengthEntry> {
    let samples = samples.max(2);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;

    let mut table = Vec::with_capacity(samples);
    let mut prev = curve.point_at(t0);
    let mut cumulative = 0.0;

    table.push(ArcLengthEntry {
        parameter: t0,
        arc_length: 0.0,
    });

    for i in 1..samples {
        let u = i as f64 / (samples - 1) as f64;
        let t = t0 + span * u;
        let curr = curve.point_at(t);
        cumulative += curr.sub_point(prev).length();
        table.push(ArcLengthEntry {
            parameter: t,
            arc_length: cumulative,
        });
        prev = curr;
    }

    table
}

/// Finds the parameter value corresponding to a target arc length.
fn parameter_at_arc_length(table: &[ArcLengthEntry], t0: f64, t1: f64, target_length: f64) -> f64 {
    if table.is_empty() {
        return t0;
    }
    if table.len() == 1 {
        return table[0].parameter;
    }

    let total = table.last().map_or(0.0, |e| e.arc_length);
    if target_length <= 0.0 {
        return t0;
    }
    if target_length >= total {
        return t1;
    }

    let idx = table
        .binary_search_by(|entry| entry.arc_length.total_cmp(&target_length))
        .unwrap_or_else(|i| i.saturating_sub(1));

    let idx = idx.min(table.len() - 2);
    let e0 = &table[idx];
    let e1 = &table[idx + 1];

    let segment_length = e1.arc_length - e0.arc_length;
    if segment_length.abs() < 1e-14 {
        return e0.parameter;
    }

    let ratio = (target_length - e0.arc_length) / segment_length;
    e0.parameter + (e1.parameter - e0.parameter) * ratio.clamp(0.0, 1.0)
}

// ─────────────────────────────────────────────────────────────────────────────
// CurveInput
// ─────────────────────────────────────────────────────────────────────────────

/// Curve handed over by a host, dispatched statically to its
/// [`LengthCurve`] implementation.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveInput {
    Line(Line3),
    Polyline(Polyline3),
    Circle(Circle3),
    Arc(Arc3),
    Bezier(ArcLengthCurve<CubicBezier3>),
}

impl CurveInput {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Line(_) => "line",
            Self::Polyline(_) => "polyline",
            Self::Circle(_) => "circle",
            Self::Arc(_) => "arc",
            Self::Bezier(_) => "bezier",
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        match self {
            Self::Line(_) | Self::Bezier(_) => false,
            Self::Polyline(curve) => Curve3::is_closed(curve),
            Self::Circle(_) => true,
            Self::Arc(curve) => Curve3::is_closed(curve),
        }
    }

    fn as_length_curve(&self) -> &dyn LengthCurve {
        match self {
            Self::Line(curve) => curve,
            Self::Polyline(curve) => curve,
            Self::Circle(curve) => curve,
            Self::Arc(curve) => curve,
            Self::Bezier(curve) => curve,
        }
    }
}

impl LengthCurve for CurveInput {
    fn length(&self) -> f64 {
        self.as_length_curve().length()
    }

    fn param_at_length(&self, length: f64) -> f64 {
        self.as_length_curve().param_at_length(length)
    }

    fn point_at_param(&self, param: f64) -> Point3 {
        self.as_length_curve().point_at_param(param)
    }

    fn tangent_at_param(&self, param: f64) -> Vec3 {
        self.as_length_curve().tangent_at_param(param)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame helpers
// ─────────────────────────────────────────────────────────────────────────────

fn frame_axes_from_normal(normal: Vec3) -> (Vec3, Vec3) {
    let z = normal.normalized().unwrap_or(Vec3::Z);
    let x = orthogonal_unit_vector(z);
    let y = z.cross(x).normalized().unwrap_or(Vec3::Y);
    (x, y)
}

fn frame_axes_from_xaxis_normal(x_axis: Vec3, normal: Vec3) -> (Vec3, Vec3) {
    let z = normal.normalized().unwrap_or(Vec3::Z);
    let projected = x_axis.sub(z.mul_scalar(x_axis.dot(z)));
    let x = projected
        .normalized()
        .unwrap_or_else(|| orthogonal_unit_vector(z));
    let y = z.cross(x).normalized().unwrap_or(Vec3::Y);
    (x, y)
}

/// Deterministic unit vector perpendicular to `reference`.
pub(crate) fn orthogonal_unit_vector(reference: Vec3) -> Vec3 {
    let candidate = if reference.x.abs() < reference.y.abs() {
        Vec3::new(0.0, -reference.z, reference.y)
    } else {
        Vec3::new(-reference.z, 0.0, reference.x)
    };

    candidate.normalized().unwrap_or(Vec3::X)
}
