//! Basis Value-enum waarin node-attributen en componentwaarden worden
//! opgeslagen.

use core::fmt;

use crate::geom::{Point3, Vec3};

/// Beschikbare waardetypes op pinnen en attributen.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Een enkele numerieke waarde.
    Number(f64),
    /// Een geheel getal (bv. een sample-aantal of enum-index).
    Integer(i64),
    /// Een booleaanse waarde.
    Boolean(bool),
    /// Een 3D-punt.
    Point([f64; 3]),
    /// Een 3D-vector.
    Vector([f64; 3]),
    /// Een lijst van waarden.
    List(Vec<Value>),
}

impl Value {
    /// Geeft de variantnaam terug. Wordt gebruikt in foutmeldingen.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Number(_) => ValueKind::Number,
            Self::Integer(_) => ValueKind::Integer,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Point(_) => ValueKind::Point,
            Self::Vector(_) => ValueKind::Vector,
            Self::List(_) => ValueKind::List,
        }
    }

    /// Verwacht een `Number` en retourneert de f64-waarde.
    pub fn expect_number(&self) -> Result<f64, ValueError> {
        match self {
            Self::Number(value) => Ok(*value),
            _ => Err(ValueError::type_mismatch("Number", self.kind())),
        }
    }

    /// Verwacht een `Integer` en retourneert de waarde.
    pub fn expect_integer(&self) -> Result<i64, ValueError> {
        match self {
            Self::Integer(value) => Ok(*value),
            _ => Err(ValueError::type_mismatch("Integer", self.kind())),
        }
    }

    /// Verwacht een `Boolean` en retourneert de waarde.
    pub fn expect_boolean(&self) -> Result<bool, ValueError> {
        match self {
            Self::Boolean(value) => Ok(*value),
            _ => Err(ValueError::type_mismatch("Boolean", self.kind())),
        }
    }

    /// Verwacht een `Point` en retourneert de coördinaten.
    pub fn expect_point(&self) -> Result<[f64; 3], ValueError> {
        match self {
            Self::Point(point) => Ok(*point),
            _ => Err(ValueError::type_mismatch("Point", self.kind())),
        }
    }

    /// Verwacht een `Vector` en retourneert de componenten.
    pub fn expect_vector(&self) -> Result<[f64; 3], ValueError> {
        match self {
            Self::Vector(vector) => Ok(*vector),
            _ => Err(ValueError::type_mismatch("Vector", self.kind())),
        }
    }

    /// Verwacht een lijst en geeft een slice terug.
    pub fn expect_list(&self) -> Result<&[Value], ValueError> {
        match self {
            Self::List(values) => Ok(values),
            _ => Err(ValueError::type_mismatch("List", self.kind())),
        }
    }

    /// Numerieke lezing die ook gehele getallen en booleans accepteert,
    /// zoals een host-attribuut dat doet.
    pub fn to_number(&self) -> Result<f64, ValueError> {
        match self {
            Self::Number(value) => Ok(*value),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(value) => Ok(*value as f64),
            Self::Boolean(value) => Ok(if *value { 1.0 } else { 0.0 }),
            _ => Err(ValueError::type_mismatch("Number", self.kind())),
        }
    }

    /// Geheel getal; een `Number` wordt afgerond.
    pub fn to_integer(&self) -> Result<i64, ValueError> {
        match self {
            Self::Integer(value) => Ok(*value),
            #[allow(clippy::cast_possible_truncation)]
            Self::Number(value) if value.is_finite() => Ok(value.round() as i64),
            Self::Boolean(value) => Ok(i64::from(*value)),
            _ => Err(ValueError::type_mismatch("Integer", self.kind())),
        }
    }

    /// Boolean; getallen gelden als waar wanneer ze niet nul zijn.
    pub fn to_boolean(&self) -> Result<bool, ValueError> {
        match self {
            Self::Boolean(value) => Ok(*value),
            Self::Integer(value) => Ok(*value != 0),
            Self::Number(value) => Ok(*value != 0.0),
            _ => Err(ValueError::type_mismatch("Boolean", self.kind())),
        }
    }

    /// Drie componenten uit een punt, vector of lijst van drie getallen.
    pub fn to_triple(&self) -> Result<[f64; 3], ValueError> {
        match self {
            Self::Point(xyz) | Self::Vector(xyz) => Ok(*xyz),
            Self::List(values) if values.len() == 3 => Ok([
                values[0].to_number()?,
                values[1].to_number()?,
                values[2].to_number()?,
            ]),
            _ => Err(ValueError::type_mismatch("Vector", self.kind())),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Point3> for Value {
    fn from(value: Point3) -> Self {
        Self::Point(value.to_array())
    }
}

impl From<Vec3> for Value {
    fn from(value: Vec3) -> Self {
        Self::Vector(value.to_array())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Typefout voor wanneer een `Value` naar het verkeerde type wordt
/// geconverteerd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    expected: &'static str,
    found: ValueKind,
}

impl ValueError {
    #[must_use]
    pub fn type_mismatch(expected: &'static str, found: ValueKind) -> Self {
        Self { expected, found }
    }

    /// Hulptoegang voor tests en foutafhandeling.
    #[must_use]
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    #[must_use]
    pub fn found(&self) -> ValueKind {
        self.found
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "verwachtte type `{}` maar kreeg `{}`",
            self.expected, self.found
        )
    }
}

impl std::error::Error for ValueError {}

/// Beschrijft het soort `Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Integer,
    Boolean,
    Point,
    Vector,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "Number",
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
            Self::Point => "Point",
            Self::Vector => "Vector",
            Self::List => "List",
        };
        f.write_str(name)
    }
}
