//! Scalar values crossing the HTTP boundary and the native labels stored in
//! model artifacts.
//!
//! Request cells and prediction outputs are both carried as [`Scalar`], which
//! only has transport-safe kinds and serializes to a bare JSON value. Artifacts
//! keep class labels in the width they were trained with ([`Label`]); every
//! label goes through [`Label::to_scalar`] before it is written to a response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A transport-safe scalar value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
}

impl Scalar {
    /// Convert a JSON cell into a scalar.
    ///
    /// Returns `None` for arrays and objects, which cannot be table cells.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else {
                    // u64 above i64::MAX, or a fractional number
                    n.as_f64().map(Self::Float)
                }
            }
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// A class label as stored in a model artifact.
///
/// Artifacts are written by external tooling which may keep labels in any
/// integer or float width, so the width is part of the stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bool(bool),
}

impl Label {
    /// Normalize to the nearest transport scalar.
    ///
    /// Integers become `Int` unless they do not fit in an `i64`, in which case
    /// they become `Float`. Floats of either width become `Float`.
    pub fn to_scalar(&self) -> Scalar {
        match self {
            Self::I32(v) => Scalar::Int(i64::from(*v)),
            Self::I64(v) => Scalar::Int(*v),
            Self::U32(v) => Scalar::Int(i64::from(*v)),
            Self::U64(v) => i64::try_from(*v).map_or_else(
                |_| {
                    #[allow(clippy::cast_precision_loss)]
                    let wide = *v as f64;
                    Scalar::Float(wide)
                },
                Scalar::Int,
            ),
            Self::F32(v) => Scalar::Float(f64::from(*v)),
            Self::F64(v) => Scalar::Float(*v),
            Self::Str(s) => Scalar::Str(s.clone()),
            Self::Bool(b) => Scalar::Bool(*b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_serializes_as_plain_json() {
        let values = vec![
            Scalar::Int(1),
            Scalar::Float(0.5),
            Scalar::from("open_palm"),
            Scalar::Bool(true),
            Scalar::Null,
        ];
        let encoded = serde_json::to_value(&values).unwrap();
        assert_eq!(encoded, json!([1, 0.5, "open_palm", true, null]));
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Scalar::from_json(&json!(7)), Some(Scalar::Int(7)));
        assert_eq!(Scalar::from_json(&json!(-2)), Some(Scalar::Int(-2)));
        assert_eq!(Scalar::from_json(&json!(1.25)), Some(Scalar::Float(1.25)));
        assert_eq!(
            Scalar::from_json(&json!(u64::MAX)),
            Some(Scalar::Float(u64::MAX as f64))
        );
    }

    #[test]
    fn test_from_json_rejects_nested_values() {
        assert_eq!(Scalar::from_json(&json!([1, 2])), None);
        assert_eq!(Scalar::from_json(&json!({"x": 1})), None);
    }

    #[test]
    fn test_native_labels_become_plain_numbers() {
        assert_eq!(Label::I32(-4).to_scalar(), Scalar::Int(-4));
        assert_eq!(Label::U32(9).to_scalar(), Scalar::Int(9));
        assert_eq!(Label::U64(12).to_scalar(), Scalar::Int(12));
        assert_eq!(Label::F32(0.5).to_scalar(), Scalar::Float(0.5));
        assert_eq!(Label::F64(2.0).to_scalar(), Scalar::Float(2.0));

        let encoded = serde_json::to_value(Label::U32(9).to_scalar()).unwrap();
        assert_eq!(encoded, json!(9));
    }

    #[test]
    fn test_u64_beyond_i64_becomes_float() {
        let scalar = Label::U64(u64::MAX).to_scalar();
        assert!(matches!(scalar, Scalar::Float(_)));
    }

    #[test]
    fn test_string_and_bool_labels_unchanged() {
        assert_eq!(Label::Str("fist".into()).to_scalar(), Scalar::from("fist"));
        assert_eq!(Label::Bool(false).to_scalar(), Scalar::Bool(false));
    }
}
