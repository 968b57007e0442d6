/// Coarse classification of [`QuickRestError`] variants.
///
/// Callers that only care about *why* a call failed (bad status, bad argument,
/// unexpected payload shape...) can match on the kind instead of every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The server answered with a status whose first digit is not `2` or `3`.
    Server,
    /// The call was made with invalid arguments.
    Argument,
    /// The response payload does not have the expected format.
    Format,
    /// The authentication response did not carry the expected token.
    Token,
    /// The requested feature is declared but not supported.
    NotImplemented,
    /// The request could not be built or exchanged.
    Transport,
    /// A file export failed.
    Io,
}

/// Errors that can occur when using the [`RestClient`](crate::RestClient).
///
/// All variants implement `std::error::Error`. None of them are recovered
/// internally: there is no retry and no fallback.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum QuickRestError {
    /// HTTP client error from the underlying reqwest library.
    ///
    /// Occurs when network requests fail, timeouts occur, or connection issues arise.
    ReqwestError(reqwest::Error),

    /// URL parsing error when joining the base URL and the route.
    UrlError(url::ParseError),

    /// Invalid HTTP header name, from credentials or caller headers.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// Invalid HTTP header value, from credentials, caller headers or a token.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// File export error.
    IoError(std::io::Error),

    /// Request body serialization error.
    JsonValueError(serde_json::Error),

    /// The server returned a status code whose first digit is not `2` or `3`.
    #[display("{status_code}: {reason}")]
    #[from(skip)]
    ServerError {
        /// The numeric HTTP status code.
        status_code: u16,
        /// The protocol reason phrase, empty when unknown.
        reason: String,
    },

    /// A POST was attempted without a JSON body nor a text body.
    #[display("Missing body, need either a JSON object or a text")]
    #[from(skip)]
    MissingBody,

    /// The POST data is neither a JSON object nor a string.
    #[display("Unsupported body, data must be either a JSON object or a string. Got: {value}")]
    #[from(skip)]
    UnsupportedBody {
        /// The rejected value.
        value: serde_json::Value,
    },

    /// The text encoding label is not known.
    #[display("Unknown text encoding '{label}'")]
    #[from(skip)]
    UnknownEncoding {
        /// The label that was provided.
        label: String,
    },

    /// The response bytes are not valid for the text encoding.
    #[display("Response is not valid {encoding} text")]
    #[from(skip)]
    InvalidEncoding {
        /// Name of the encoding used to decode.
        encoding: &'static str,
    },

    /// An export contains characters the text encoding cannot represent.
    #[display("Export cannot be written as {encoding} text")]
    #[from(skip)]
    UnencodableText {
        /// Name of the encoding used to write.
        encoding: &'static str,
    },

    /// The response body is not valid JSON.
    #[display("Failed to decode JSON response: {error}\n{body}")]
    #[from(skip)]
    JsonDecode {
        /// The underlying JSON parsing error.
        error: serde_json::Error,
        /// The response text that failed to parse.
        body: String,
    },

    /// The response body could not be deserialized into the requested type.
    #[display("Failed to deserialize JSON at '{path}': {error}")]
    #[from(skip)]
    JsonPath {
        /// The JSON path where deserialization failed.
        path: String,
        /// The underlying JSON error.
        error: serde_json::Error,
    },

    /// The decoded response does not have the shape an export requires.
    #[display("Invalid response format: {message}")]
    #[from(skip)]
    Format {
        /// Description of the mismatch.
        message: String,
    },

    /// The authentication response does not contain the token field.
    #[display("Token not found or invalid token name \"{field}\".\nServer response: {response}")]
    #[from(skip)]
    TokenNotFound {
        /// The configured token field name.
        field: String,
        /// The decoded authentication response.
        response: serde_json::Value,
    },

    /// The feature is declared but not supported yet.
    #[display("{feature} not yet supported")]
    #[from(skip)]
    NotImplemented {
        /// Name of the unsupported feature.
        feature: &'static str,
    },
}

impl QuickRestError {
    /// Returns the coarse [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ServerError { .. } => ErrorKind::Server,
            Self::MissingBody | Self::UnsupportedBody { .. } | Self::UnknownEncoding { .. } => {
                ErrorKind::Argument
            }
            Self::InvalidEncoding { .. }
            | Self::UnencodableText { .. }
            | Self::JsonDecode { .. }
            | Self::JsonPath { .. }
            | Self::Format { .. } => ErrorKind::Format,
            Self::TokenNotFound { .. } => ErrorKind::Token,
            Self::NotImplemented { .. } => ErrorKind::NotImplemented,
            Self::ReqwestError(_)
            | Self::UrlError(_)
            | Self::InvalidHeaderName(_)
            | Self::InvalidHeaderValue(_)
            | Self::JsonValueError(_) => ErrorKind::Transport,
            Self::IoError(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }
}
