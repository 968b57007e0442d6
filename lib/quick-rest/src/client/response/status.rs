use http::StatusCode;

/// Checks if a status code is accepted as a successful exchange.
///
/// Only the leading digit is considered: `2xx` and `3xx` are accepted,
/// everything else (including informational `1xx`) is a failure.
pub(in crate::client) fn is_success(status: StatusCode) -> bool {
    matches!(status.as_u16() / 100, 2 | 3)
}
