//! Request parameter types for building API calls.
//!
//! - [`CallHeaders`] - HTTP headers
//! - [`CallOptions`] - Per-call headers and timeout
//! - [`CallBody`] - POST body, JSON object or text

mod headers;
pub use self::headers::CallHeaders;

mod options;
pub use self::options::CallOptions;

mod body;
pub use self::body::CallBody;
