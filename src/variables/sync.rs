use crate::data::Value;
use std::fmt;
use std::str::FromStr;

/// How a synced variable's value is applied on remote clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncMode {
    /// Synced, applied as-is.
    None,
    Linear,
    Smooth,
}

impl SyncMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncMode::None => "none",
            SyncMode::Linear => "linear",
            SyncMode::Smooth => "smooth",
        }
    }

    /// Whether a variable of `value_type` may use this mode.
    pub fn supported_by(self, value_type: &str) -> bool {
        match self {
            SyncMode::None => is_syncable(value_type),
            SyncMode::Linear | SyncMode::Smooth => is_interpolatable(value_type),
        }
    }

    /// Reads the mode stored in a variable's sync slot. `Null` or an
    /// unrecognized string means the variable is not synced.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(|s| s.parse().ok())
    }
}

impl FromStr for SyncMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SyncMode::None),
            "linear" => Ok(SyncMode::Linear),
            "smooth" => Ok(SyncMode::Smooth),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_syncable(value_type: &str) -> bool {
    matches!(value_type, "bool" | "string") || is_interpolatable(value_type)
}

pub fn is_interpolatable(value_type: &str) -> bool {
    matches!(
        value_type,
        "int" | "float" | "Vector2" | "Vector3" | "Quaternion" | "Color"
    )
}
