use serde_json::{Map, Value};

use crate::client::error::QuickRestError;

/// Represents the body of a POST request.
///
/// A body is either a JSON object, sent as `application/json`, or a text,
/// sent as `text/plain`.
///
/// # Examples
///
/// ```rust
/// use quick_rest::CallBody;
/// use serde_json::json;
///
/// let text = CallBody::from("hello");
/// let json = CallBody::try_from(json!({"name": "alice"}))?;
///
/// // anything else is rejected
/// assert!(CallBody::try_from(json!([1, 2, 3])).is_err());
/// # Ok::<(), quick_rest::QuickRestError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CallBody {
    /// A JSON object body.
    Json(Map<String, Value>),
    /// A plain text body.
    Text(String),
}

impl CallBody {
    /// Creates a JSON body from a value serialized as a JSON object.
    ///
    /// # Errors
    ///
    /// Fails if the value cannot be serialized, or is not serialized as a JSON
    /// object. Use [`text`](Self::text) for a plain text body.
    pub fn json<T>(value: &T) -> Result<Self, QuickRestError>
    where
        T: serde::Serialize + ?Sized,
    {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self::Json(map)),
            value => Err(QuickRestError::UnsupportedBody { value }),
        }
    }

    /// Creates a plain text body.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub(in crate::client) fn as_parts(&self) -> (Option<&Map<String, Value>>, Option<&str>) {
        match self {
            Self::Json(map) => (Some(map), None),
            Self::Text(text) => (None, Some(text.as_str())),
        }
    }
}

impl From<Map<String, Value>> for CallBody {
    fn from(value: Map<String, Value>) -> Self {
        Self::Json(value)
    }
}

impl From<&str> for CallBody {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CallBody {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl TryFrom<Value> for CallBody {
    type Error = QuickRestError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self::Json(map)),
            Value::String(text) => Ok(Self::Text(text)),
            value => Err(QuickRestError::UnsupportedBody { value }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_object_value_is_json() {
        let body = CallBody::try_from(json!({"a": 1})).expect("object body");

        let (json, text) = body.as_parts();
        assert_eq!(json.and_then(|map| map.get("a")), Some(&json!(1)));
        assert_eq!(text, None);
    }

    #[test]
    fn test_string_value_is_text() {
        let body = CallBody::try_from(json!("hello")).expect("text body");

        assert_eq!(body, CallBody::text("hello"));
        assert_eq!(body.as_parts(), (None, Some("hello")));
    }

    #[rstest]
    #[case::number(json!(42))]
    #[case::array(json!([1, 2]))]
    #[case::boolean(json!(true))]
    #[case::null(json!(null))]
    fn test_other_values_are_rejected(#[case] value: Value) {
        let error = CallBody::try_from(value).expect_err("unsupported body");

        assert_eq!(error.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_json_from_serializable() {
        #[derive(serde::Serialize)]
        struct Login<'a> {
            username: &'a str,
        }

        let body = CallBody::json(&Login { username: "alice" }).expect("json body");

        let expected = json!({"username": "alice"});
        assert_eq!(body, CallBody::try_from(expected).expect("object body"));
    }

    #[rstest]
    #[case::string(json!("hello"))]
    #[case::number(json!(42))]
    #[case::array(json!([1, 2]))]
    fn test_json_rejects_non_objects(#[case] value: Value) {
        let error = CallBody::json(&value).expect_err("not an object");

        assert!(matches!(error, QuickRestError::UnsupportedBody { .. }));
        assert_eq!(error.kind(), ErrorKind::Argument);
    }
}
