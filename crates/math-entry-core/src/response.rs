//! Response Codec.
//!
//! Converts between the live field state and the interaction's response,
//! which travels as `{ base: { string } }` outside gap mode and
//! `{ list: { string: [...] } }` in gap mode.
//!
//! Decoding is best-effort. A payload of the wrong shape is ignored, and a
//! list that does not match the inner field count is applied index by index.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapter::MathEditingAdapter;
use crate::error::MathEntryError;
use crate::platform::{MathBackend, MathField};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseResponse {
    pub string: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    pub string: Vec<String>,
}

/// The interaction's response value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseValue {
    Base(BaseResponse),
    List(ListResponse),
}

impl ResponseValue {
    pub fn base(latex: impl Into<String>) -> Self {
        ResponseValue::Base(BaseResponse {
            string: latex.into(),
        })
    }

    pub fn list<I, S>(latex: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResponseValue::List(ListResponse {
            string: latex.into_iter().map(Into::into).collect(),
        })
    }

    /// Read the envelope `gap_mode` expects out of an arbitrary JSON value.
    ///
    /// Only the `list` key (gap mode) or the `base` key is looked at; sibling
    /// keys, including the other mode's envelope, are ignored.
    pub fn from_value(value: &Value, gap_mode: bool) -> Result<Self, MathEntryError> {
        let key = if gap_mode { "list" } else { "base" };
        let envelope = value
            .get(key)
            .filter(|envelope| !envelope.is_null())
            .ok_or_else(|| MathEntryError::InvalidResponse(format!("missing `{key}` envelope")))?;

        Ok(if gap_mode {
            ResponseValue::List(ListResponse::deserialize(envelope)?)
        } else {
            ResponseValue::Base(BaseResponse::deserialize(envelope)?)
        })
    }

    pub fn to_value(&self) -> Value {
        match self {
            ResponseValue::Base(base) => serde_json::json!({ "base": { "string": base.string } }),
            ResponseValue::List(list) => serde_json::json!({ "list": { "string": list.string } }),
        }
    }
}

/// Read the current response out of the field.
///
/// Without a field this yields an empty value of the right shape.
pub fn encode<B: MathBackend>(adapter: &MathEditingAdapter<B>, gap_mode: bool) -> ResponseValue {
    if gap_mode {
        ResponseValue::list(adapter.inner_fields().iter().map(MathField::latex))
    } else {
        ResponseValue::base(adapter.single().map(MathField::latex).unwrap_or_default())
    }
}

/// Write a response into the field.
pub fn apply<B: MathBackend>(
    adapter: &MathEditingAdapter<B>,
    gap_mode: bool,
    response: &ResponseValue,
) {
    match (gap_mode, response) {
        (true, ResponseValue::List(list)) => {
            let inner_fields = adapter.inner_fields();
            if list.string.len() != inner_fields.len() {
                // Trailing fields keep their content when the list is short.
                tracing::warn!(
                    values = list.string.len(),
                    inner_fields = inner_fields.len(),
                    "response list length differs from inner field count"
                );
            }
            for (field, latex) in inner_fields.iter().zip(&list.string) {
                field.set_latex(latex);
            }
        }
        (false, ResponseValue::Base(base)) => {
            if base.string.is_empty() {
                tracing::trace!("ignoring empty base response");
                return;
            }
            if !adapter.set_single_latex(&base.string) {
                tracing::warn!("no editable field to receive the response");
            }
        }
        (gap_mode, _) => {
            tracing::warn!(gap_mode, "ignoring response of the wrong shape for this mode");
        }
    }
}

/// Empty every field, keeping the field structure.
pub fn clear<B: MathBackend>(adapter: &MathEditingAdapter<B>, gap_mode: bool) {
    if gap_mode {
        for field in adapter.inner_fields() {
            field.set_latex("");
        }
    } else {
        adapter.set_single_latex("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shapes() {
        assert_eq!(
            serde_json::to_value(ResponseValue::base(r"\frac{1}{2}")).unwrap(),
            json!({ "base": { "string": r"\frac{1}{2}" } })
        );
        assert_eq!(
            serde_json::to_value(ResponseValue::list(["5", ""])).unwrap(),
            json!({ "list": { "string": ["5", ""] } })
        );
    }

    #[test]
    fn test_to_value_matches_serde() {
        for response in [ResponseValue::base("x"), ResponseValue::list(["a", "b"])] {
            assert_eq!(response.to_value(), serde_json::to_value(&response).unwrap());
        }
    }

    #[test]
    fn test_from_value_reads_the_mode_envelope() {
        assert_eq!(
            ResponseValue::from_value(&json!({ "base": { "string": "x^2" } }), false).unwrap(),
            ResponseValue::base("x^2")
        );
        assert_eq!(
            ResponseValue::from_value(&json!({ "list": { "string": ["1", "2"] } }), true)
                .unwrap(),
            ResponseValue::list(["1", "2"])
        );
    }

    #[test]
    fn test_from_value_ignores_sibling_keys() {
        let value = json!({ "base": { "string": "y", "identifier": "RESPONSE" } });
        assert_eq!(
            ResponseValue::from_value(&value, false).unwrap(),
            ResponseValue::base("y")
        );

        let value = json!({ "base": null, "list": { "string": ["5"] } });
        assert_eq!(
            ResponseValue::from_value(&value, true).unwrap(),
            ResponseValue::list(["5"])
        );

        let value = json!({ "list": { "string": ["6"] }, "record": null });
        assert_eq!(
            ResponseValue::from_value(&value, true).unwrap(),
            ResponseValue::list(["6"])
        );

        let value = json!({ "base": { "string": "b" }, "list": { "string": ["l"] } });
        assert_eq!(
            ResponseValue::from_value(&value, false).unwrap(),
            ResponseValue::base("b")
        );
        assert_eq!(
            ResponseValue::from_value(&value, true).unwrap(),
            ResponseValue::list(["l"])
        );
    }

    #[test]
    fn test_from_value_rejects_malformed() {
        for (value, gap_mode) in [
            (json!(null), false),
            (json!({}), true),
            (json!({ "base": null }), false),
            (json!({ "base": { "string": 3 } }), false),
            (json!({ "list": { "string": "not a list" } }), true),
            (json!({ "list": { "string": ["a"] } }), false),
            (json!({ "base": { "string": "a" } }), true),
            (json!({ "record": [] }), false),
        ] {
            assert!(
                ResponseValue::from_value(&value, gap_mode).is_err(),
                "{value} should be rejected (gap mode: {gap_mode})"
            );
        }
    }
}
