//! Conversion between in-memory vectors and the Postgres array-literal text
//! form (`{1,1,2}`) that Lantern columns (`REAL[]` / `INT[]`) use.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LanternError;

/// An ordered embedding vector.
///
/// Element order is the dimensional axis order and is preserved exactly by
/// [`encode`] and [`decode`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector(Vec<f32>);

impl Vector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// Render as a Postgres array literal, e.g. `{1,1,2}`.
    pub fn to_sql(&self) -> String {
        encode(&self.0)
    }
}

impl From<Vec<f32>> for Vector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

impl From<&[f32]> for Vector {
    fn from(values: &[f32]) -> Self {
        Self(values.to_vec())
    }
}

impl<const N: usize> From<[f32; N]> for Vector {
    fn from(values: [f32; N]) -> Self {
        Self(values.to_vec())
    }
}

impl From<Vector> for Vec<f32> {
    fn from(vector: Vector) -> Self {
        vector.0
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl FromStr for Vector {
    type Err = LanternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// A value headed for a vector position in SQL.
///
/// `Raw` holds text that is already in backend shape (for example a literal
/// read back from another query) and is passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorValue {
    Vector(Vector),
    Raw(String),
}

impl VectorValue {
    /// Text form of the value: vectors are encoded, raw text is returned as is.
    pub fn to_sql(&self) -> Cow<'_, str> {
        match self {
            VectorValue::Vector(v) => Cow::Owned(v.to_sql()),
            VectorValue::Raw(raw) => Cow::Borrowed(raw),
        }
    }
}

impl From<Vector> for VectorValue {
    fn from(vector: Vector) -> Self {
        VectorValue::Vector(vector)
    }
}

impl From<Vec<f32>> for VectorValue {
    fn from(values: Vec<f32>) -> Self {
        VectorValue::Vector(Vector(values))
    }
}

impl From<&[f32]> for VectorValue {
    fn from(values: &[f32]) -> Self {
        VectorValue::Vector(Vector::from(values))
    }
}

impl<const N: usize> From<[f32; N]> for VectorValue {
    fn from(values: [f32; N]) -> Self {
        VectorValue::Vector(Vector::from(values))
    }
}

impl From<&str> for VectorValue {
    fn from(raw: &str) -> Self {
        VectorValue::Raw(raw.to_string())
    }
}

impl From<String> for VectorValue {
    fn from(raw: String) -> Self {
        VectorValue::Raw(raw)
    }
}

/// Encode a sequence of numbers as `{n1,n2,...}`.
///
/// Each element is written with its `Display` form, so integers (for `INT[]`
/// columns) are emitted exactly and floats in their shortest round-trip form.
pub fn encode<T: fmt::Display>(values: &[T]) -> String {
    let mut out = String::with_capacity(values.len() * 4 + 2);
    out.push('{');
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&v.to_string());
    }
    out.push('}');
    out
}

/// Parse a Postgres array literal such as `{1,1,2}` into a [`Vector`].
///
/// A decode failure means the stored data does not look like a vector and is
/// reported as [`LanternError::MalformedVector`]; there is no fallback value.
pub fn decode(text: &str) -> Result<Vector, LanternError> {
    let inner = text
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| malformed(text, "expected a literal enclosed in '{' and '}'"))?;

    if inner.trim().is_empty() {
        return Ok(Vector::default());
    }

    inner
        .split(',')
        .enumerate()
        .map(|(i, element)| {
            let element = element.trim();
            element
                .parse::<f32>()
                .map_err(|_| malformed(text, &format!("element {i} ('{element}') is not a number")))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Vector)
}

fn malformed(input: &str, reason: &str) -> LanternError {
    LanternError::MalformedVector {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn encodes_whole_numbers_without_fraction() {
        assert_eq!(encode(&[1.0, 1.0, 1.0]), "{1,1,1}");
    }

    #[test]
    fn encodes_fractions_and_negatives() {
        assert_eq!(encode(&[0.5, -2.25, 3.0]), "{0.5,-2.25,3}");
    }

    #[test]
    fn empty_vector_encodes_to_braces() {
        assert_eq!(encode::<f32>(&[]), "{}");
        assert!(decode("{}").unwrap().is_empty());
    }

    #[test]
    fn decodes_in_encounter_order() {
        let v = decode("{3,1,2}").unwrap();
        assert_eq!(v.as_slice(), &[3.0, 1.0, 2.0]);
    }

    #[test]
    fn decode_tolerates_spaces_between_elements() {
        let v = decode("{1, 2.5, -3}").unwrap();
        assert_eq!(v.as_slice(), &[1.0, 2.5, -3.0]);
    }

    #[test]
    fn integers_encode_exactly() {
        assert_eq!(
            encode(&[16_777_217i32, i32::MAX, i32::MIN]),
            "{16777217,2147483647,-2147483648}"
        );
    }

    #[test]
    fn round_trip_preserves_values() {
        let values: Vec<f32> = vec![0.1, -0.000_123, 1e20, 42.0, 0.0, 0.1, 0.1];
        let decoded = decode(&encode(&values)).unwrap();
        assert_eq!(decoded.into_inner(), values);
    }

    #[test]
    fn decode_rejects_missing_braces() {
        let err = decode("1,2,3").unwrap_err();
        assert!(matches!(err, LanternError::MalformedVector { .. }));
        assert!(decode("{1,2").is_err());
        assert!(decode("").is_err());
    }

    #[test]
    fn decode_rejects_non_numeric_elements() {
        match decode("{1,abc,3}").unwrap_err() {
            LanternError::MalformedVector { input, reason } => {
                assert_eq!(input, "{1,abc,3}");
                assert!(reason.contains("element 1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(decode("{1,,3}").is_err());
    }

    #[test]
    fn raw_values_pass_through_unchanged() {
        let value = VectorValue::from("{1,1,2}");
        assert_eq!(value.to_sql(), "{1,1,2}");

        let value = VectorValue::from("already shaped");
        assert_eq!(value.to_sql(), "already shaped");
    }

    #[test]
    fn vector_display_and_from_str() {
        let v: Vector = "{1,2}".parse().unwrap();
        assert_eq!(v.to_string(), "{1,2}");
        assert_eq!(Vector::from([1.0f32, 2.0]), v);
    }

    fn finite_f32() -> impl Strategy<Value = f32> {
        prop::num::f32::NORMAL | prop::num::f32::SUBNORMAL | prop::num::f32::ZERO
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(values in prop::collection::vec(finite_f32(), 0..64)) {
            let decoded = decode(&encode(&values)).unwrap();
            prop_assert_eq!(decoded.into_inner(), values);
        }

        #[test]
        fn encoded_text_is_a_braced_list(values in prop::collection::vec(finite_f32(), 0..64)) {
            let text = encode(&values);
            prop_assert!(text.starts_with('{') && text.ends_with('}'), "text not brace-delimited: {}", text);
            let commas = text.matches(',').count();
            prop_assert_eq!(commas, values.len().saturating_sub(1));
        }
    }
}
