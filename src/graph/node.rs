//! Necklace-node: attributen, dirty-tracking en de per-instantie shift-cache.

use std::collections::BTreeMap;
use std::fmt;

use crate::geom::{Axis, LengthCurve, Vec3};
use crate::necklace::{
    NecklaceError, NodeVariant, SampleResult, SamplingConfig, ShiftCache, ShiftPolicy,
    sample_validated,
};

use super::value::{Value, ValueError};

/// Waarde die meta-informatie over een pin beschrijft (bv. een closed-vlag).
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Number(f64),
    Integer(i64),
    Boolean(bool),
    Text(String),
}

impl MetaValue {
    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            Self::Integer(v) => Some(*v != 0),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Self::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Alias voor een verzameling meta-informatie.
pub type MetaMap = BTreeMap<String, MetaValue>;

/// Hulpfuncties voor case-insensitieve meta-opzoekingen.
pub trait MetaLookupExt {
    /// Zoek een meta-item op zonder hoofdlettergevoeligheid.
    fn get_normalized(&self, key: &str) -> Option<&MetaValue>;
}

impl MetaLookupExt for MetaMap {
    fn get_normalized(&self, key: &str) -> Option<&MetaValue> {
        if let Some(value) = self.get(key) {
            return Some(value);
        }
        self.iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    }
}

/// Alle attributen van een necklace-node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    InputCurve,
    FrontAxis,
    UpAxis,
    UpVector,
    Twist,
    Loop,
    NumSample,
    /// Per-sample lengteverschuiving (array-attribuut).
    UShift,
    LengthShift,
    AnchorEnd,
    OutPosition,
    OutRotation,
}

const OUTPUTS: [Attribute; 2] = [Attribute::OutPosition, Attribute::OutRotation];

impl Attribute {
    pub const ALL: [Self; 12] = [
        Self::InputCurve,
        Self::FrontAxis,
        Self::UpAxis,
        Self::UpVector,
        Self::Twist,
        Self::Loop,
        Self::NumSample,
        Self::UShift,
        Self::LengthShift,
        Self::AnchorEnd,
        Self::OutPosition,
        Self::OutRotation,
    ];

    #[must_use]
    pub const fn long_name(self) -> &'static str {
        match self {
            Self::InputCurve => "inputCurve",
            Self::FrontAxis => "frontAxis",
            Self::UpAxis => "upAxis",
            Self::UpVector => "upVector",
            Self::Twist => "twist",
            Self::Loop => "loop",
            Self::NumSample => "numSample",
            Self::UShift => "uVal",
            Self::LengthShift => "lengthShift",
            Self::AnchorEnd => "anchorEnd",
            Self::OutPosition => "outPosition",
            Self::OutRotation => "outRotation",
        }
    }

    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::InputCurve => "in",
            Self::FrontAxis => "fa",
            Self::UpAxis => "ua",
            Self::UpVector => "up",
            Self::Twist => "twi",
            Self::Loop => "lp",
            Self::NumSample => "ns",
            Self::UShift => "u",
            Self::LengthShift => "ls",
            Self::AnchorEnd => "ae",
            Self::OutPosition => "oup",
            Self::OutRotation => "our",
        }
    }

    /// Zoekt een attribuut op lange of korte naam, hoofdletterongevoelig.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim();
        Self::ALL.into_iter().find(|attr| {
            attr.long_name().eq_ignore_ascii_case(needle)
                || attr.short_name().eq_ignore_ascii_case(needle)
        })
    }

    #[must_use]
    pub const fn is_output(self) -> bool {
        matches!(self, Self::OutPosition | Self::OutRotation)
    }

    /// Outputs die opnieuw berekend moeten worden als dit attribuut wijzigt.
    #[must_use]
    pub const fn affects(self) -> &'static [Self] {
        if self.is_output() { &[] } else { &OUTPUTS }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long_name())
    }
}

/// Fouten bij het zetten van attributen of het berekenen van een node.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NodeError {
    #[error("onbekend attribuut `{0}`")]
    UnknownAttribute(String),
    #[error("attribuut `{0}` kan niet gezet worden")]
    NotWritable(Attribute),
    #[error("attribuut `{attribute}` wordt niet ondersteund door variant `{variant}`")]
    Unsupported {
        attribute: Attribute,
        variant: &'static str,
    },
    #[error("ongeldige as-index {value} voor `{attribute}` (verwacht 0, 1 of 2)")]
    InvalidAxis { attribute: Attribute, value: i64 },
    #[error("attribuut `{attribute}`: {source}")]
    Value {
        attribute: Attribute,
        source: ValueError,
    },
    #[error(transparent)]
    Necklace(#[from] NecklaceError),
}

/// Eén necklace-node. Elke instantie bezit zijn eigen shift-cache en
/// outputs; er is geen gedeelde toestand tussen nodes.
#[derive(Debug, Clone)]
pub struct NecklaceNode {
    variant: NodeVariant,
    config: SamplingConfig,
    cache: ShiftCache,
    dirty: bool,
    result: Option<SampleResult>,
}

impl Default for NecklaceNode {
    fn default() -> Self {
        Self::new(NodeVariant::default())
    }
}

impl NecklaceNode {
    #[must_use]
    pub fn new(variant: NodeVariant) -> Self {
        Self {
            variant,
            config: variant.config(),
            cache: ShiftCache::new(),
            dirty: true,
            result: None,
        }
    }

    #[must_use]
    pub const fn variant(&self) -> NodeVariant {
        self.variant
    }

    #[must_use]
    pub const fn config(&self) -> &SamplingConfig {
        &self.config
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Laatste geslaagde berekening, ook als de node inmiddels dirty is.
    #[must_use]
    pub const fn result(&self) -> Option<&SampleResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn shifts(&self) -> &[f64] {
        self.cache.shifts()
    }

    pub fn set_shift_policy(&mut self, policy: ShiftPolicy) {
        self.cache.set_policy(policy);
    }

    fn touch(&mut self, attribute: Attribute) {
        if !attribute.affects().is_empty() {
            self.dirty = true;
        }
    }

    /// Markeer de curve als gewijzigd.
    pub fn invalidate_curve(&mut self) {
        self.touch(Attribute::InputCurve);
    }

    /// Zet een scalair, as- of vectorattribuut.
    pub fn set_attribute(&mut self, attribute: Attribute, value: &Value) -> Result<(), NodeError> {
        let wrap = |source: ValueError| NodeError::Value { attribute, source };
        match attribute {
            Attribute::FrontAxis => self.config.front_axis = axis_from_value(attribute, value)?,
            Attribute::UpAxis => self.config.up_axis = axis_from_value(attribute, value)?,
            Attribute::UpVector => {
                self.config.up_vector = Vec3::from_array(value.to_triple().map_err(wrap)?);
            }
            Attribute::Twist => self.config.twist = value.to_number().map_err(wrap)?,
            Attribute::Loop => self.config.loop_enabled = value.to_boolean().map_err(wrap)?,
            Attribute::NumSample => self.config.sample_count = value.to_integer().map_err(wrap)?,
            Attribute::AnchorEnd => {
                // Anchoring is fixed per variant; only its own value is accepted.
                if value.to_boolean().map_err(wrap)? != self.variant.anchor_end() {
                    return Err(NodeError::Unsupported {
                        attribute,
                        variant: self.variant.id(),
                    });
                }
            }
            Attribute::LengthShift => {
                if !self.variant.has_global_shift() {
                    return Err(NodeError::Unsupported {
                        attribute,
                        variant: self.variant.id(),
                    });
                }
                self.config.global_shift = value.to_number().map_err(wrap)?;
            }
            Attribute::UShift => {
                let list = value.expect_list().map_err(wrap)?;
                let shifts = list
                    .iter()
                    .map(Value::to_number)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(wrap)?;
                self.set_shifts(&shifts)?;
            }
            Attribute::InputCurve | Attribute::OutPosition | Attribute::OutRotation => {
                return Err(NodeError::NotWritable(attribute));
            }
        }
        self.touch(attribute);
        Ok(())
    }

    /// Zet een attribuut op naam (lang of kort).
    pub fn set_named(&mut self, name: &str, value: &Value) -> Result<(), NodeError> {
        let attribute =
            Attribute::from_name(name).ok_or_else(|| NodeError::UnknownAttribute(name.to_owned()))?;
        self.set_attribute(attribute, value)
    }

    /// Vervangt de volledige configuratie; variantregels (verankering en
    /// globale verschuiving) blijven gelden, net als bij de componenten.
    pub fn set_config(&mut self, config: SamplingConfig) {
        self.config = self.variant.apply(config);
        self.dirty = true;
    }

    /// Wijzigt één element van `uVal`. De opslag wordt eerst afgestemd op
    /// het huidige `numSample`, net als bij een berekening.
    pub fn set_shift(&mut self, index: usize, value: f64) -> Result<(), NodeError> {
        self.reconcile_shifts()?;
        self.cache.set_shift(index, value)?;
        self.touch(Attribute::UShift);
        Ok(())
    }

    pub fn set_shifts(&mut self, values: &[f64]) -> Result<(), NodeError> {
        self.reconcile_shifts()?;
        self.cache.set_shifts(values)?;
        self.touch(Attribute::UShift);
        Ok(())
    }

    fn reconcile_shifts(&mut self) -> Result<usize, NodeError> {
        let count = usize::try_from(self.config.sample_count).map_err(|_| {
            NecklaceError::NegativeSampleCount {
                count: self.config.sample_count,
            }
        })?;
        self.cache.reconcile(count)?;
        Ok(count)
    }

    /// Herberekent de outputs als de node dirty is. Geeft `true` terug als
    /// er daadwerkelijk gerekend is. Bij een fout blijven de vorige outputs
    /// staan en blijft de node dirty.
    pub fn compute<C: LengthCurve + ?Sized>(&mut self, curve: &C) -> Result<bool, NodeError> {
        if !self.dirty {
            return Ok(false);
        }

        let validated = self.config.validate()?;
        if self.cache.reconcile(validated.sample_count)? {
            log::debug!(
                "{}: shifts opnieuw aangemaakt voor {} samples",
                self.variant.id(),
                validated.sample_count
            );
        }
        let result = sample_validated(curve, &validated, self.cache.shifts())?;
        self.result = Some(result);
        self.dirty = false;
        Ok(true)
    }

    /// Outputwaarde als `Value::List`, of `None` zolang er niets berekend is.
    #[must_use]
    pub fn output(&self, attribute: Attribute) -> Option<Value> {
        let result = self.result.as_ref()?;
        match attribute {
            Attribute::OutPosition => Some(Value::from(result.positions())),
            Attribute::OutRotation => Some(Value::from(result.rotations())),
            _ => None,
        }
    }
}

fn axis_from_value(attribute: Attribute, value: &Value) -> Result<Axis, NodeError> {
    let index = value
        .to_integer()
        .map_err(|source| NodeError::Value { attribute, source })?;
    Axis::from_index(index).ok_or(NodeError::InvalidAxis {
        attribute,
        value: index,
    })
}
