//! Curve frame sampler.
//!
//! Places `sample_count` frames along a curve by arc length. Each frame
//! carries a position and an Euler rotation whose axes follow the curve
//! tangent, an up hint (optionally twisted around the tangent) and a
//! configurable front/up axis remap.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::geom::{
    AngleUnit, BasisFallback, EulerAngles, FrameBasis, LengthCurve, Point3, Vec3,
    twist_up_vector,
};

use super::config::{SamplingConfig, ValidatedConfig};
use super::error::{NecklaceError, NecklaceResult};

/// Maps a requested arc length into `[0, max_length]`.
///
/// Negative lengths wrap back from the end when `loop_enabled` is set and
/// clamp to zero otherwise; lengths past the end wrap from the start or clamp
/// to `max_length`. A curve without length resolves everything to `0`.
#[must_use]
pub fn resolve_length(length: f64, max_length: f64, loop_enabled: bool) -> f64 {
    if max_length <= 0.0 {
        return 0.0;
    }

    if length < 0.0 {
        if loop_enabled {
            max_length - (-length).rem_euclid(max_length)
        } else {
            0.0
        }
    } else if length > max_length {
        if loop_enabled {
            length.rem_euclid(max_length)
        } else {
            max_length
        }
    } else {
        length
    }
}

/// Distance between consecutive sample bases.
///
/// With `anchor_end` the last of `count` samples lands on the curve end;
/// without it the samples split the curve into `count` equal arcs.
#[must_use]
pub fn increment(count: usize, max_length: f64, anchor_end: bool) -> f64 {
    if count < 2 {
        return max_length;
    }
    let divisions = if anchor_end { count - 1 } else { count };
    max_length / divisions as f64
}

/// Unresolved arc-length target of every sample: running base plus the
/// sample's own shift plus the global shift.
///
/// With `anchor_end` the last base is exactly `max_length`; the running sum
/// can overshoot by a few ulps, which loop mode would wrap to the start.
#[must_use]
pub fn arc_length_targets(
    max_length: f64,
    shifts: &[f64],
    global_shift: f64,
    anchor_end: bool,
) -> Vec<f64> {
    let count = shifts.len();
    let step = increment(count, max_length, anchor_end);
    let mut base = 0.0;
    let mut targets = Vec::with_capacity(count);
    for (index, shift) in shifts.iter().enumerate() {
        if anchor_end && count >= 2 && index + 1 == count {
            base = max_length;
        }
        targets.push(base + shift + global_shift);
        base += step;
    }
    targets
}

/// One placed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub index: usize,
    /// Requested length before wrapping or clamping.
    pub target_length: f64,
    /// Length actually evaluated on the curve.
    pub length: f64,
    pub parameter: f64,
    pub position: Point3,
    /// XYZ Euler rotation in the configured unit.
    pub rotation: Vec3,
    #[serde(skip)]
    pub basis: FrameBasis,
}

/// Counters describing inputs that needed special handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDiagnostics {
    pub zero_tangents: usize,
    pub parallel_up_vectors: usize,
    pub wrapped_lengths: usize,
    pub clamped_lengths: usize,
}

impl SampleDiagnostics {
    #[must_use]
    pub const fn degenerate_frames(&self) -> usize {
        self.zero_tangents + self.parallel_up_vectors
    }
}

/// Output of [`sample`], in sample order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleResult {
    pub samples: Vec<Sample>,
    pub curve_length: f64,
    pub angle_unit: AngleUnit,
    pub diagnostics: SampleDiagnostics,
}

impl SampleResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn positions(&self) -> Vec<Point3> {
        self.samples.iter().map(|s| s.position).collect()
    }

    #[must_use]
    pub fn rotations(&self) -> Vec<Vec3> {
        self.samples.iter().map(|s| s.rotation).collect()
    }

    /// Resolved arc lengths.
    #[must_use]
    pub fn lengths(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.length).collect()
    }

    /// Positions as `[x0, y0, z0, x1, ...]`.
    #[must_use]
    pub fn flat_positions(&self) -> Vec<f64> {
        self.samples
            .iter()
            .flat_map(|s| s.position.to_array())
            .collect()
    }

    /// Rotations as `[rx0, ry0, rz0, rx1, ...]`.
    #[must_use]
    pub fn flat_rotations(&self) -> Vec<f64> {
        self.samples
            .iter()
            .flat_map(|s| s.rotation.to_array())
            .collect()
    }
}

/// Curve query results for one sample.
#[derive(Debug, Clone, Copy)]
struct CurveEvaluation {
    target_length: f64,
    length: f64,
    parameter: f64,
    point: Point3,
    tangent: Vec3,
}

/// Samples frames along `curve`.
///
/// `shifts` must hold exactly one entry per requested sample. On error
/// nothing is returned.
pub fn sample<C: LengthCurve + ?Sized>(
    curve: &C,
    config: &SamplingConfig,
    shifts: &[f64],
) -> NecklaceResult<SampleResult> {
    let config = config.validate()?;
    sample_validated(curve, &config, shifts)
}

pub fn sample_validated<C: LengthCurve + ?Sized>(
    curve: &C,
    config: &ValidatedConfig,
    shifts: &[f64],
) -> NecklaceResult<SampleResult> {
    if shifts.len() != config.sample_count {
        return Err(NecklaceError::ShiftLengthMismatch {
            expected: config.sample_count,
            actual: shifts.len(),
        });
    }
    if shifts.iter().any(|s| !s.is_finite()) {
        return Err(NecklaceError::NonFinite { field: "shift" });
    }

    let max_length = curve.length();
    if !max_length.is_finite() || max_length < 0.0 {
        return Err(NecklaceError::InvalidCurveLength { length: max_length });
    }

    let mut result = SampleResult {
        samples: Vec::with_capacity(config.sample_count),
        curve_length: max_length,
        angle_unit: config.angle_unit,
        diagnostics: SampleDiagnostics::default(),
    };
    if config.sample_count == 0 {
        return Ok(result);
    }

    let targets = arc_length_targets(max_length, shifts, config.global_shift, config.anchor_end);
    let mut evaluations = Vec::with_capacity(targets.len());
    for target in targets {
        let length = resolve_length(target, max_length, config.loop_enabled);
        if max_length > 0.0 && !(0.0..=max_length).contains(&target) {
            if config.loop_enabled {
                result.diagnostics.wrapped_lengths += 1;
            } else {
                result.diagnostics.clamped_lengths += 1;
            }
        }

        let parameter = curve.param_at_length(length);
        let point = curve.point_at_param(parameter);
        if !point.is_finite() {
            return Err(NecklaceError::NonFiniteEvaluation { param: parameter });
        }
        let tangent = curve.tangent_at_param(parameter);
        evaluations.push(CurveEvaluation {
            target_length: target,
            length,
            parameter,
            point,
            tangent: if tangent.is_finite() { tangent } else { Vec3::ZERO },
        });
    }

    for (sample, fallback) in build_frames(&evaluations, config) {
        if fallback.zero_tangent {
            result.diagnostics.zero_tangents += 1;
        }
        if fallback.parallel_up {
            result.diagnostics.parallel_up_vectors += 1;
        }
        result.samples.push(sample);
    }

    if result.diagnostics.degenerate_frames() > 0 {
        log::debug!(
            "necklace: {} zero tangent(s), {} up vector(s) parallel to tangent",
            result.diagnostics.zero_tangents,
            result.diagnostics.parallel_up_vectors
        );
    }
    log::debug!(
        "necklace: sampled {} frame(s) over length {max_length}",
        result.samples.len()
    );

    Ok(result)
}

#[cfg(feature = "parallel")]
fn build_frames(
    evaluations: &[CurveEvaluation],
    config: &ValidatedConfig,
) -> Vec<(Sample, BasisFallback)> {
    evaluations
        .par_iter()
        .enumerate()
        .map(|(index, evaluation)| build_frame(index, evaluation, config))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn build_frames(
    evaluations: &[CurveEvaluation],
    config: &ValidatedConfig,
) -> Vec<(Sample, BasisFallback)> {
    evaluations
        .iter()
        .enumerate()
        .map(|(index, evaluation)| build_frame(index, evaluation, config))
        .collect()
}

fn build_frame(
    index: usize,
    evaluation: &CurveEvaluation,
    config: &ValidatedConfig,
) -> (Sample, BasisFallback) {
    let up = twist_up_vector(config.up_vector, evaluation.tangent, config.twist);
    let (basis, fallback) = FrameBasis::from_tangent_up(evaluation.tangent, up);
    let transform = basis.oriented(evaluation.point, config.axes);
    let rotation = EulerAngles::from_transform(transform).to_unit(config.angle_unit);

    let sample = Sample {
        index,
        target_length: evaluation.target_length,
        length: evaluation.length,
        parameter: evaluation.parameter,
        position: evaluation.point,
        rotation,
        basis,
    };
    (sample, fallback)
}
