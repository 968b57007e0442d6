use std::time::Duration;

use super::CallHeaders;

/// Per-call options for [`RestClient::get_with`](crate::RestClient::get_with)
/// and [`RestClient::post_with`](crate::RestClient::post_with).
///
/// Each call builds its own options; the default is empty headers and the
/// client-wide timeout.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use quick_rest::{CallHeaders, CallOptions};
///
/// let options = CallOptions::new()
///     .with_headers(CallHeaders::new().add_header("Accept", "application/json"))
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    pub(in crate::client) headers: CallHeaders,
    pub(in crate::client) timeout: Option<Duration>,
}

impl CallOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the caller headers.
    ///
    /// They are layered on top of the authentication headers, so a caller
    /// header replaces an authentication header with the same name.
    #[must_use]
    pub fn with_headers(mut self, headers: CallHeaders) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single caller header.
    #[must_use]
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers = self.headers.add_header(name, value);
        self
    }

    /// Overrides the client-wide timeout for this call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The caller headers.
    pub fn headers(&self) -> &CallHeaders {
        &self.headers
    }

    /// The timeout override, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl From<CallHeaders> for CallOptions {
    fn from(headers: CallHeaders) -> Self {
        Self::new().with_headers(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_empty() {
        let options = CallOptions::default();

        assert!(options.headers().is_empty());
        assert_eq!(options.timeout(), None);
    }

    #[test]
    fn test_add_header_accumulates() {
        let options = CallOptions::new()
            .add_header("A", "1")
            .add_header("B", "2")
            .with_timeout(Duration::from_millis(250));

        assert_eq!(options.headers().len(), 2);
        assert_eq!(options.timeout(), Some(Duration::from_millis(250)));
    }
}
