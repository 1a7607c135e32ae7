//! Necklace-componenten: stateless varianten van de necklace-node.
//!
//! Pinnen (positioneel): `C` curve, `N` aantal samples, `FA`/`UA` as-indices,
//! `UP` up-vector, `TW` twist (radialen), `L` loop, `S` shifts per sample,
//! `G` globale verschuiving (alleen shift-varianten).

use std::collections::BTreeMap;

use crate::graph::node::MetaMap;
use crate::graph::value::Value;
use crate::necklace::{NodeVariant, SampleResult, SamplingConfig, reconcile, sample};

use super::coerce::{
    coerce_axis, coerce_boolean, coerce_curve, coerce_integer, coerce_number, coerce_number_list,
    coerce_vector,
};
use super::{Component, ComponentError, ComponentResult};

const PIN_OUTPUT_POSITIONS: &str = "P";
const PIN_OUTPUT_ROTATIONS: &str = "R";
const PIN_OUTPUT_LENGTHS: &str = "L";

const INPUT_PINS: &[&str] = &["C", "N", "FA", "UA", "UP", "TW", "L", "S"];
const INPUT_PINS_SHIFT: &[&str] = &["C", "N", "FA", "UA", "UP", "TW", "L", "S", "G"];

/// Eén geregistreerde necklace-variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentKind {
    variant: NodeVariant,
}

impl ComponentKind {
    #[must_use]
    pub const fn new(variant: NodeVariant) -> Self {
        Self { variant }
    }

    #[must_use]
    pub const fn variant(&self) -> NodeVariant {
        self.variant
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.variant.display_name()
    }

    #[must_use]
    pub const fn input_pins(&self) -> &'static [&'static str] {
        if self.variant.has_global_shift() {
            INPUT_PINS_SHIFT
        } else {
            INPUT_PINS
        }
    }
}

/// Registratiegegevens voor een component.
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub ids: &'static [&'static str],
    pub names: &'static [&'static str],
    pub kind: ComponentKind,
}

/// Volledige lijst met componentregistraties voor de necklace-varianten.
pub const REGISTRATIONS: &[Registration] = &[
    Registration {
        ids: &["necklace"],
        names: &["Necklace", "Nkl"],
        kind: ComponentKind::new(NodeVariant::Necklace),
    },
    Registration {
        ids: &["necklaceShift"],
        names: &["Necklace Shift", "NklS"],
        kind: ComponentKind::new(NodeVariant::NecklaceShift),
    },
    Registration {
        ids: &["necklaceSpread"],
        names: &["Necklace Spread", "NklSp"],
        kind: ComponentKind::new(NodeVariant::NecklaceSpread),
    },
    Registration {
        ids: &["necklaceSpreadShift"],
        names: &["Necklace Spread Shift", "NklSpS"],
        kind: ComponentKind::new(NodeVariant::NecklaceSpreadShift),
    },
];

impl Component for ComponentKind {
    fn evaluate(&self, inputs: &[Value], meta: &MetaMap) -> ComponentResult {
        let context = self.name();
        if inputs.is_empty() {
            return Err(ComponentError::new(format!(
                "{context} vereist minimaal een curve"
            )));
        }

        let curve = coerce_curve(inputs.first(), meta, context)?;
        let config = self.read_config(inputs, context)?;

        // Een negatief aantal wordt door de sampler zelf geweigerd.
        let requested = usize::try_from(config.sample_count).unwrap_or(0);
        let given = match inputs.get(7) {
            Some(value) => coerce_number_list(value, context)?,
            None => Vec::new(),
        };
        let (shifts, reset) = reconcile(requested, Some(given.len()), &given)?;
        if reset && !given.is_empty() {
            log::debug!(
                "{context}: {} shifts voor {requested} samples, shifts op nul gezet",
                given.len()
            );
        }

        let result = sample(&curve, &config, &shifts)?;
        Ok(outputs(&result))
    }
}

impl ComponentKind {
    fn read_config(&self, inputs: &[Value], context: &str) -> Result<SamplingConfig, ComponentError> {
        let mut config = self.variant.config();

        if let Some(value) = inputs.get(1) {
            config.sample_count = coerce_integer(value, context)?;
        }
        if let Some(value) = inputs.get(2) {
            config.front_axis = coerce_axis(value, context)?;
        }
        if let Some(value) = inputs.get(3) {
            config.up_axis = coerce_axis(value, context)?;
        }
        if let Some(value) = inputs.get(4) {
            config.up_vector = coerce_vector(value, context)?;
        }
        if let Some(value) = inputs.get(5) {
            config.twist = coerce_number(value, context)?;
        }
        if let Some(value) = inputs.get(6) {
            config.loop_enabled = coerce_boolean(value, context)?;
        }
        if self.variant.has_global_shift() {
            if let Some(value) = inputs.get(8) {
                config.global_shift = coerce_number(value, context)?;
            }
        }

        Ok(self.variant.apply(config))
    }
}

fn outputs(result: &SampleResult) -> BTreeMap<String, Value> {
    let mut outputs = BTreeMap::new();
    outputs.insert(
        PIN_OUTPUT_POSITIONS.to_owned(),
        Value::from(result.positions()),
    );
    outputs.insert(
        PIN_OUTPUT_ROTATIONS.to_owned(),
        Value::from(result.rotations()),
    );
    outputs.insert(PIN_OUTPUT_LENGTHS.to_owned(), Value::from(result.lengths()));
    outputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::necklace::NecklaceError;

    fn line_curve() -> Value {
        Value::List(vec![
            Value::Point([0.0, 0.0, 0.0]),
            Value::Point([10.0, 0.0, 0.0]),
        ])
    }

    fn lengths(outputs: &BTreeMap<String, Value>) -> Vec<f64> {
        outputs[PIN_OUTPUT_LENGTHS]
            .expect_list()
            .unwrap()
            .iter()
            .map(|v| v.expect_number().unwrap())
            .collect()
    }

    #[test]
    fn anchored_variant_reaches_curve_end() {
        let component = ComponentKind::new(NodeVariant::Necklace);
        let outputs = component
            .evaluate(&[line_curve(), Value::Integer(3)], &MetaMap::new())
            .unwrap();
        assert_eq!(lengths(&outputs), vec![0.0, 5.0, 10.0]);
        assert_eq!(
            outputs[PIN_OUTPUT_POSITIONS].expect_list().unwrap()[2],
            Value::Point([10.0, 0.0, 0.0])
        );
    }

    #[test]
    fn spread_variant_leaves_end_free() {
        let component = ComponentKind::new(NodeVariant::NecklaceSpread);
        let outputs = component
            .evaluate(&[line_curve(), Value::Number(4.0)], &MetaMap::new())
            .unwrap();
        assert_eq!(lengths(&outputs), vec![0.0, 2.5, 5.0, 7.5]);
    }

    #[test]
    fn shift_list_is_applied_when_length_matches() {
        let component = ComponentKind::new(NodeVariant::Necklace);
        let shifts = Value::List(vec![Value::Number(1.0), Value::Number(-1.0)]);
        let inputs = [
            line_curve(),
            Value::Integer(2),
            Value::Integer(0),
            Value::Integer(1),
            Value::Vector([0.0, 0.0, 1.0]),
            Value::Number(0.0),
            Value::Boolean(false),
            shifts,
        ];
        let outputs = component.evaluate(&inputs, &MetaMap::new()).unwrap();
        assert_eq!(lengths(&outputs), vec![1.0, 9.0]);
    }

    #[test]
    fn mismatched_shift_list_resets_to_zero() {
        let component = ComponentKind::new(NodeVariant::Necklace);
        let inputs = [
            line_curve(),
            Value::Integer(3),
            Value::Integer(0),
            Value::Integer(1),
            Value::Vector([0.0, 0.0, 1.0]),
            Value::Number(0.0),
            Value::Boolean(false),
            Value::List(vec![Value::Number(4.0)]),
        ];
        let outputs = component.evaluate(&inputs, &MetaMap::new()).unwrap();
        assert_eq!(lengths(&outputs), vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn global_shift_only_for_shift_variants() {
        let mut inputs = vec![
            line_curve(),
            Value::Integer(2),
            Value::Integer(0),
            Value::Integer(1),
            Value::Vector([0.0, 0.0, 1.0]),
            Value::Number(0.0),
            Value::Boolean(true),
            Value::List(vec![]),
        ];
        inputs.push(Value::Number(3.0));

        let plain = ComponentKind::new(NodeVariant::Necklace)
            .evaluate(&inputs, &MetaMap::new())
            .unwrap();
        assert_eq!(lengths(&plain), vec![0.0, 10.0]);

        let shifted = ComponentKind::new(NodeVariant::NecklaceShift)
            .evaluate(&inputs, &MetaMap::new())
            .unwrap();
        assert_eq!(lengths(&shifted), vec![3.0, 3.0]);
    }

    #[test]
    fn negative_count_is_reported() {
        let component = ComponentKind::new(NodeVariant::Necklace);
        let err = component
            .evaluate(&[line_curve(), Value::Integer(-2)], &MetaMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ComponentError::Necklace(NecklaceError::NegativeSampleCount { count: -2 })
        ));
    }

    #[test]
    fn unallocatable_count_is_reported() {
        let component = ComponentKind::new(NodeVariant::Necklace);
        let err = component
            .evaluate(&[line_curve(), Value::Number(1e300)], &MetaMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ComponentError::Necklace(NecklaceError::SampleCountTooLarge { .. })
        ));
    }

    #[test]
    fn missing_curve_is_reported() {
        let component = ComponentKind::new(NodeVariant::Necklace);
        assert!(component.evaluate(&[], &MetaMap::new()).is_err());
    }

    #[test]
    fn pins_depend_on_variant() {
        assert_eq!(ComponentKind::new(NodeVariant::Necklace).input_pins().len(), 8);
        assert_eq!(
            ComponentKind::new(NodeVariant::NecklaceSpreadShift).input_pins().last(),
            Some(&"G")
        );
    }
}
