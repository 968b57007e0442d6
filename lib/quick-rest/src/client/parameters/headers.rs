use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use indexmap::IndexMap;

use crate::client::error::QuickRestError;

/// Represents HTTP headers for an API call.
///
/// Headers keep their insertion order. Adding a header whose name is already
/// present replaces the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallHeaders {
    headers: IndexMap<String, String>,
}

impl CallHeaders {
    /// Creates a new empty CallHeaders instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header to the collection.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quick_rest::CallHeaders;
    ///
    /// let headers = CallHeaders::new()
    ///     .add_header("Accept", "application/json")
    ///     .add_header("X-Request-ID", "abc-123-def");
    /// assert_eq!(headers.len(), 2);
    /// ```
    #[must_use]
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Merges another CallHeaders instance into this one.
    ///
    /// Headers from the other instance will override headers with the same name in this instance.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (name, value) in other.headers {
            self.headers.insert(name, value);
        }
        self
    }

    /// Returns the value of a header.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Checks if the headers collection is empty.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns the number of headers.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Iterates over the headers, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Writes the headers into a wire header map.
    ///
    /// Names are case-insensitive on the wire: a later header replaces an
    /// earlier one even when their spelling differs in case.
    pub(in crate::client) fn write_to(&self, map: &mut HeaderMap) -> Result<(), QuickRestError> {
        for (name, value) in &self.headers {
            map.insert(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for CallHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |headers, (name, value)| {
                headers.add_header(name, value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_empty_headers() {
        let headers = CallHeaders::new();

        assert!(headers.is_empty());
        assert_eq!(headers.len(), 0);
    }

    #[test]
    fn test_add_multiple_headers_keeps_order() {
        let headers = CallHeaders::new()
            .add_header("Authorization", "Bearer token123")
            .add_header("X-Request-ID", "abc-123-def")
            .add_header("Accept", "application/json");

        let names: Vec<_> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Authorization", "X-Request-ID", "Accept"]);
    }

    #[test]
    fn test_merge_other_takes_precedence() {
        let base = CallHeaders::new()
            .add_header("K", "v1")
            .add_header("Keep", "kept");
        let other = CallHeaders::new().add_header("K", "v2");

        let merged = base.merge(other);

        assert_eq!(merged.get("K"), Some("v2"));
        assert_eq!(merged.get("Keep"), Some("kept"));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_write_to_later_header_wins_case_insensitively() {
        let headers = CallHeaders::new()
            .add_header("x-api-key", "from-auth")
            .add_header("X-Api-Key", "from-caller");

        let mut map = HeaderMap::new();
        headers.write_to(&mut map).expect("valid headers");

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("x-api-key").expect("header set"), "from-caller");
    }

    #[test]
    fn test_write_to_rejects_invalid_header_name() {
        let headers = CallHeaders::new().add_header("Invalid Header", "value");

        let mut map = HeaderMap::new();
        let result = headers.write_to(&mut map);

        assert!(matches!(result, Err(QuickRestError::InvalidHeaderName(_))));
    }

    #[test]
    fn test_write_to_rejects_invalid_header_value() {
        let headers = CallHeaders::new().add_header("X-Test", "\0invalid");

        let mut map = HeaderMap::new();
        let result = headers.write_to(&mut map);

        assert!(matches!(result, Err(QuickRestError::InvalidHeaderValue(_))));
    }
}
