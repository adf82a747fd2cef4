//! Field schema and typed field values

use std::fmt;

use serde::Serialize;

/// Suffix appended to a raw token that failed to parse as an integer
pub const ERROR_INT_MARKER: &str = "#ERROR_INT";

/// Suffix appended to a raw token that failed to parse as a boolean
pub const ERROR_BOOL_MARKER: &str = "#ERROR_BOOL";

/// Wire type of a single payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Int,
    Bool,
}

impl FieldType {
    /// Convert a raw payload token according to this type
    ///
    /// Never fails: a token that does not parse becomes
    /// [`FieldValue::Invalid`] carrying the token plus the type's error marker.
    pub fn convert(self, raw: &str) -> FieldValue {
        match self {
            Self::String => FieldValue::Str(raw.to_string()),
            Self::Int => match raw.parse::<i64>() {
                Ok(value) => FieldValue::Int(value),
                Err(_) => FieldValue::Invalid(format!("{raw}{ERROR_INT_MARKER}")),
            },
            Self::Bool => match parse_bool(raw) {
                Some(value) => FieldValue::Bool(value),
                None => FieldValue::Invalid(format!("{raw}{ERROR_BOOL_MARKER}")),
            },
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean literals as Hyprland tooling emits them
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`; anything
/// else (including `yes`, `tRUE`, padded values) is rejected.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// A named, typed position in an event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    name: &'static str,
    ty: FieldType,
}

impl FieldSpec {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub const fn int(name: &'static str) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub const fn bool(name: &'static str) -> Self {
        Self::new(name, FieldType::Bool)
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn ty(&self) -> FieldType {
        self.ty
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty)
    }
}

/// A decoded field value
///
/// Serializes untagged, so JSON output contains plain strings, numbers and
/// booleans. `Invalid` serializes as its marker string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Raw token suffixed with [`ERROR_INT_MARKER`] or [`ERROR_BOOL_MARKER`]
    Invalid(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) | Self::Invalid(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}
