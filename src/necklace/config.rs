use serde::{Deserialize, Serialize};

use crate::geom::{AngleUnit, Axis, AxisPair, Vec3};

use super::error::{NecklaceError, NecklaceResult};

/// Inputs of one sampling computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SamplingConfig {
    /// Object axis that follows the curve tangent.
    pub front_axis: Axis,
    /// Object axis that follows the frame normal.
    pub up_axis: Axis,
    /// Up hint used to build the frame normal.
    pub up_vector: Vec3,
    /// Rotation of the up hint around the tangent, in radians.
    pub twist: f64,
    /// Signed so that host values can be rejected instead of wrapped.
    pub sample_count: i64,
    /// Wrap out-of-range lengths instead of clamping them.
    pub loop_enabled: bool,
    /// Length added to every sample target.
    pub global_shift: f64,
    /// Place the last sample on the curve end point.
    pub anchor_end: bool,
    /// Unit of the reported Euler angles.
    pub angle_unit: AngleUnit,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            front_axis: Axis::X,
            up_axis: Axis::Y,
            up_vector: Vec3::Z,
            twist: 0.0,
            sample_count: 1,
            loop_enabled: false,
            global_shift: 0.0,
            anchor_end: true,
            angle_unit: AngleUnit::Degrees,
        }
    }
}

impl SamplingConfig {
    #[must_use]
    pub const fn with_sample_count(mut self, count: i64) -> Self {
        self.sample_count = count;
        self
    }

    #[must_use]
    pub const fn with_axes(mut self, front: Axis, up: Axis) -> Self {
        self.front_axis = front;
        self.up_axis = up;
        self
    }

    #[must_use]
    pub const fn with_up_vector(mut self, up: Vec3) -> Self {
        self.up_vector = up;
        self
    }

    #[must_use]
    pub const fn with_twist(mut self, radians: f64) -> Self {
        self.twist = radians;
        self
    }

    #[must_use]
    pub const fn with_loop(mut self, enabled: bool) -> Self {
        self.loop_enabled = enabled;
        self
    }

    #[must_use]
    pub const fn with_global_shift(mut self, shift: f64) -> Self {
        self.global_shift = shift;
        self
    }

    #[must_use]
    pub const fn with_anchor_end(mut self, anchor: bool) -> Self {
        self.anchor_end = anchor;
        self
    }

    #[must_use]
    pub const fn with_angle_unit(mut self, unit: AngleUnit) -> Self {
        self.angle_unit = unit;
        self
    }

    #[must_use]
    pub const fn axes(&self) -> AxisPair {
        AxisPair::new(self.front_axis, self.up_axis)
    }

    /// Checks the preconditions that do not depend on the curve.
    pub fn validate(&self) -> NecklaceResult<ValidatedConfig> {
        let sample_count = usize::try_from(self.sample_count).map_err(|_| {
            NecklaceError::NegativeSampleCount {
                count: self.sample_count,
            }
        })?;
        if !self.up_vector.is_finite() {
            return Err(NecklaceError::NonFinite { field: "upVector" });
        }
        if !self.twist.is_finite() {
            return Err(NecklaceError::NonFinite { field: "twist" });
        }
        if !self.global_shift.is_finite() {
            return Err(NecklaceError::NonFinite {
                field: "globalShift",
            });
        }

        Ok(ValidatedConfig {
            sample_count,
            axes: self.axes(),
            up_vector: self.up_vector,
            twist: self.twist,
            loop_enabled: self.loop_enabled,
            global_shift: self.global_shift,
            anchor_end: self.anchor_end,
            angle_unit: self.angle_unit,
        })
    }
}

/// [`SamplingConfig`] after validation; the count is known to be non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedConfig {
    pub sample_count: usize,
    pub axes: AxisPair,
    pub up_vector: Vec3,
    pub twist: f64,
    pub loop_enabled: bool,
    pub global_shift: f64,
    pub anchor_end: bool,
    pub angle_unit: AngleUnit,
}

/// The four node flavours. They share one computation and differ only in
/// end anchoring and whether a global length shift is exposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeVariant {
    #[default]
    Necklace,
    NecklaceShift,
    NecklaceSpread,
    NecklaceSpreadShift,
}

impl NodeVariant {
    pub const ALL: [Self; 4] = [
        Self::Necklace,
        Self::NecklaceShift,
        Self::NecklaceSpread,
        Self::NecklaceSpreadShift,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Necklace => "necklace",
            Self::NecklaceShift => "necklaceShift",
            Self::NecklaceSpread => "necklaceSpread",
            Self::NecklaceSpreadShift => "necklaceSpreadShift",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Necklace => "Necklace",
            Self::NecklaceShift => "Necklace Shift",
            Self::NecklaceSpread => "Necklace Spread",
            Self::NecklaceSpreadShift => "Necklace Spread Shift",
        }
    }

    /// Case-insensitive lookup by id or display name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim();
        Self::ALL.into_iter().find(|variant| {
            variant.id().eq_ignore_ascii_case(needle)
                || variant.display_name().eq_ignore_ascii_case(needle)
        })
    }

    #[must_use]
    pub const fn anchor_end(self) -> bool {
        matches!(self, Self::Necklace | Self::NecklaceShift)
    }

    #[must_use]
    pub const fn has_global_shift(self) -> bool {
        matches!(self, Self::NecklaceShift | Self::NecklaceSpreadShift)
    }

    /// Default configuration for this variant.
    #[must_use]
    pub fn config(self) -> SamplingConfig {
        SamplingConfig::default().with_anchor_end(self.anchor_end())
    }

    /// Forces the variant-controlled fields onto `config`.
    #[must_use]
    pub fn apply(self, config: SamplingConfig) -> SamplingConfig {
        let shift = if self.has_global_shift() {
            config.global_shift
        } else {
            0.0
        };
        config
            .with_anchor_end(self.anchor_end())
            .with_global_shift(shift)
    }
}
