//! Hulpfuncties voor het converteren van `Value`-types.

use crate::geom::{Axis, CurveInput, Point3, Polyline3, Vec3};
use crate::graph::node::{MetaLookupExt, MetaMap};
use crate::graph::value::Value;

use super::ComponentError;

pub fn coerce_number(value: &Value, context: &str) -> Result<f64, ComponentError> {
    match value {
        Value::List(l) if l.len() == 1 => coerce_number(&l[0], context),
        other => other.to_number().map_err(|_| {
            ComponentError::new(format!(
                "{context} verwachtte een getal, kreeg {}",
                other.kind()
            ))
        }),
    }
}

pub fn coerce_integer(value: &Value, context: &str) -> Result<i64, ComponentError> {
    match value {
        Value::List(l) if l.len() == 1 => coerce_integer(&l[0], context),
        other => other.to_integer().map_err(|_| {
            ComponentError::new(format!(
                "{context} verwachtte een geheel getal, kreeg {}",
                other.kind()
            ))
        }),
    }
}

pub fn coerce_boolean(value: &Value, context: &str) -> Result<bool, ComponentError> {
    match value {
        Value::List(l) if l.len() == 1 => coerce_boolean(&l[0], context),
        other => other.to_boolean().map_err(|_| {
            ComponentError::new(format!(
                "{context} verwachtte een booleaanse waarde, kreeg {}",
                other.kind()
            ))
        }),
    }
}

pub fn coerce_vector(value: &Value, context: &str) -> Result<Vec3, ComponentError> {
    match value {
        Value::List(l) if l.len() == 1 => coerce_vector(&l[0], context),
        other => other.to_triple().map(Vec3::from_array).map_err(|_| {
            ComponentError::new(format!(
                "{context} verwachtte een vector, kreeg {}",
                other.kind()
            ))
        }),
    }
}

/// As-index (0 = x, 1 = y, 2 = z).
pub fn coerce_axis(value: &Value, context: &str) -> Result<Axis, ComponentError> {
    let index = coerce_integer(value, context)?;
    Axis::from_index(index).ok_or_else(|| {
        ComponentError::new(format!(
            "{context} verwachtte as-index 0, 1 of 2, kreeg {index}"
        ))
    })
}

/// Een lijst getallen; een los getal wordt een lijst van één.
pub fn coerce_number_list(value: &Value, context: &str) -> Result<Vec<f64>, ComponentError> {
    match value {
        Value::List(values) => values
            .iter()
            .map(|entry| coerce_number(entry, context))
            .collect(),
        other => Ok(vec![coerce_number(other, context)?]),
    }
}

/// Bouwt een polyline uit (geneste lijsten van) punten. De meta-sleutel
/// `closed` sluit de curve.
pub fn coerce_curve(
    value: Option<&Value>,
    meta: &MetaMap,
    context: &str,
) -> Result<CurveInput, ComponentError> {
    let Some(value) = value else {
        return Err(ComponentError::new(format!(
            "{context} vereist een curve"
        )));
    };

    let mut points = Vec::new();
    collect_points(value, &mut points, context)?;

    let closed = meta
        .get_normalized("closed")
        .and_then(|meta| meta.as_boolean())
        .unwrap_or(false);

    Polyline3::new(points, closed)
        .map(CurveInput::Polyline)
        .map_err(|err| ComponentError::new(format!("{context}: {err}")))
}

fn collect_points(
    value: &Value,
    output: &mut Vec<Point3>,
    context: &str,
) -> Result<(), ComponentError> {
    match value {
        Value::Point(point) => {
            output.push(Point3::from_array(*point));
            Ok(())
        }
        Value::List(values) => {
            for entry in values {
                collect_points(entry, output, context)?;
            }
            Ok(())
        }
        other => Err(ComponentError::new(format!(
            "{context} verwacht punten, kreeg {}",
            other.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::LengthCurve;
    use crate::graph::node::MetaValue;

    #[test]
    fn single_item_lists_unwrap() {
        let value = Value::List(vec![Value::Integer(7)]);
        assert_eq!(coerce_integer(&value, "test").unwrap(), 7);
        assert_eq!(coerce_number(&value, "test").unwrap(), 7.0);
    }

    #[test]
    fn axis_out_of_range_is_error() {
        assert_eq!(coerce_axis(&Value::Integer(2), "test").unwrap(), Axis::Z);
        let err = coerce_axis(&Value::Integer(5), "test").unwrap_err();
        assert!(err.message().contains("as-index"));
    }

    #[test]
    fn number_list_accepts_scalar() {
        assert_eq!(coerce_number_list(&Value::Number(1.5), "test").unwrap(), vec![1.5]);
        let list = Value::List(vec![Value::Number(1.0), Value::Integer(2)]);
        assert_eq!(coerce_number_list(&list, "test").unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn curve_from_nested_points_respects_closed_meta() {
        let value = Value::List(vec![
            Value::Point([0.0, 0.0, 0.0]),
            Value::List(vec![Value::Point([2.0, 0.0, 0.0]), Value::Point([2.0, 2.0, 0.0])]),
        ]);
        let open = coerce_curve(Some(&value), &MetaMap::new(), "test").unwrap();
        assert_eq!(open.length(), 4.0);

        let mut meta = MetaMap::new();
        meta.insert("Closed".to_owned(), MetaValue::Boolean(true));
        let closed = coerce_curve(Some(&value), &meta, "test").unwrap();
        assert!(closed.is_closed());
        assert!((closed.length() - (4.0 + 8.0_f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn curve_needs_points() {
        assert!(coerce_curve(None, &MetaMap::new(), "test").is_err());
        let single = Value::Point([0.0, 0.0, 0.0]);
        assert!(coerce_curve(Some(&single), &MetaMap::new(), "test").is_err());
        assert!(coerce_curve(Some(&Value::Number(1.0)), &MetaMap::new(), "test").is_err());
    }
}
