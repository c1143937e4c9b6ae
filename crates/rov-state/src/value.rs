//! The heterogeneous value type stored in the processor context.
//!
//! The original design note asks for a closed sum type instead of reflective
//! casts: typed accessors pattern-match and return `Option`, and the only
//! implicit conversion is the numeric widening `Int → Num` *by value*.

use rov_core::{Complex, Point};

/// One context or stack slot.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Num(f64),
    Text(String),
    Pos(Point),
    Dir(Complex),
    Path(Vec<Point>),
}

impl Value {
    /// Human-readable variant name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Num(_) => "num",
            Value::Text(_) => "text",
            Value::Pos(_) => "pos",
            Value::Dir(_) => "dir",
            Value::Path(_) => "path",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric read with widening: `Int` converts by value.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integer read; `Num` truncates by value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Num(n) => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pos(&self) -> Option<Point> {
        match self {
            Value::Pos(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_dir(&self) -> Option<Complex> {
        match self {
            Value::Dir(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&[Point]> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Num(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Point> for Value {
    fn from(v: Point) -> Self {
        Value::Pos(v)
    }
}

impl From<Complex> for Value {
    fn from(v: Complex) -> Self {
        Value::Dir(v)
    }
}

impl From<Vec<Point>> for Value {
    fn from(v: Vec<Point>) -> Self {
        Value::Path(v)
    }
}
