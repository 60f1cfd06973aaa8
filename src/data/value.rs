use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal values stored in a node's value slots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Vector2([f64; 2]),
    Vector3([f64; 3]),
    Quaternion([f64; 4]),
    Color([f64; 4]),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The kind this value carries, or `None` for `Null`.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(ValueKind::Bool),
            Value::Int(_) => Some(ValueKind::Int),
            Value::Float(_) => Some(ValueKind::Float),
            Value::String(_) => Some(ValueKind::String),
            Value::Vector2(_) => Some(ValueKind::Vector2),
            Value::Vector3(_) => Some(ValueKind::Vector3),
            Value::Quaternion(_) => Some(ValueKind::Quaternion),
            Value::Color(_) => Some(ValueKind::Color),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Vector2([x, y]) => write!(f, "({}, {})", x, y),
            Value::Vector3([x, y, z]) => write!(f, "({}, {}, {})", x, y, z),
            Value::Quaternion([x, y, z, w]) => write!(f, "({}, {}, {}, {})", x, y, z, w),
            Value::Color([r, g, b, a]) => write!(f, "rgba({}, {}, {}, {})", r, g, b, a),
        }
    }
}

/// The editable shape of a literal value.
///
/// One enum drives defaults, parsing and validation for every primitive a
/// port can hold; reference types (objects, components) have no literal form
/// and map to [`ValueKind::Object`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    Vector2,
    Vector3,
    Quaternion,
    Color,
    Object,
}

impl ValueKind {
    /// Maps a registered type name onto its literal kind.
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name {
            "bool" => ValueKind::Bool,
            "int" => ValueKind::Int,
            "float" => ValueKind::Float,
            "string" => ValueKind::String,
            "Vector2" => ValueKind::Vector2,
            "Vector3" => ValueKind::Vector3,
            "Quaternion" => ValueKind::Quaternion,
            "Color" => ValueKind::Color,
            _ => ValueKind::Object,
        }
    }

    pub fn default_value(self) -> Value {
        match self {
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::String => Value::String(String::new()),
            ValueKind::Vector2 => Value::Vector2([0.0; 2]),
            ValueKind::Vector3 => Value::Vector3([0.0; 3]),
            ValueKind::Quaternion => Value::Quaternion([0.0, 0.0, 0.0, 1.0]),
            ValueKind::Color => Value::Color([1.0; 4]),
            ValueKind::Object => Value::Null,
        }
    }

    /// Whether `value` may be stored in a slot of this kind. `Null` is always
    /// accepted and means "use the default".
    pub fn accepts(self, value: &Value) -> bool {
        match value.kind() {
            None => true,
            Some(kind) => kind == self || (self == ValueKind::Float && kind == ValueKind::Int),
        }
    }

    /// Parses user text into a value of this kind.
    ///
    /// Vector-like kinds take comma separated components, with optional
    /// surrounding parentheses.
    pub fn parse(self, text: &str) -> Option<Value> {
        let text = text.trim();
        match self {
            ValueKind::Bool => text.parse().ok().map(Value::Bool),
            ValueKind::Int => text.parse().ok().map(Value::Int),
            ValueKind::Float => text.parse().ok().map(Value::Float),
            ValueKind::String => Some(Value::String(text.to_string())),
            ValueKind::Vector2 => parse_components::<2>(text).map(Value::Vector2),
            ValueKind::Vector3 => parse_components::<3>(text).map(Value::Vector3),
            ValueKind::Quaternion => parse_components::<4>(text).map(Value::Quaternion),
            ValueKind::Color => parse_components::<4>(text).map(Value::Color),
            ValueKind::Object => (text.is_empty() || text == "null").then_some(Value::Null),
        }
    }
}

fn parse_components<const N: usize>(text: &str) -> Option<[f64; N]> {
    let inner = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(text);
    let mut out = [0.0; N];
    let mut parts = inner.split(',');
    for slot in out.iter_mut() {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}
