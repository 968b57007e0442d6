use std::time::Duration;

use encoding_rs::Encoding;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method};
use hyper::ext::ReasonPhrase;
use reqwest::blocking::{RequestBuilder, Response};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

mod builder;
pub use self::builder::RestClientBuilder;

mod parameters;
pub use self::parameters::{CallBody, CallHeaders, CallOptions};

mod response;
pub use self::response::{CsvOptions, ServerResponse};

mod auth;
pub use self::auth::{Authentication, Credentials, JwtAuth, SecureString};

mod oauth;
pub use self::oauth::OAuthConfig;

mod error;
pub use self::error::{ErrorKind, QuickRestError};


/// Blocking HTTP client for a REST API.
///
/// Every call appends its route to the base URL, attaches the headers of the
/// configured [`Authentication`] with the caller headers on top, and accepts
/// the response only when the status code starts with `2` or `3`.
///
/// Use [`RestClientBuilder`] to create instances.
///
/// # Example
///
/// ```rust,no_run
/// use quick_rest::{CallOptions, Credentials, JwtAuth, RestClient};
///
/// # fn example() -> Result<(), quick_rest::QuickRestError> {
/// let jwt = JwtAuth::new("/auth/login", "access_token", "Authorization")
///     .with_prefix("Bearer ")
///     .with_credentials(Credentials::new().add("username", "alice").add("password", "s3cr3t"));
/// let client = RestClient::jwt("https://api.example.com", jwt)?;
///
/// // Every call authenticates first
/// let users = client.get("/users")?.decode()?;
/// let created = client
///     .post_with(
///         "/notes",
///         "Remember the milk",
///         CallOptions::new().add_header("X-Request-ID", "abc-123"),
///     )?
///     .decode()?;
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// The client holds no mutable state, it can be cloned and shared across
/// threads.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::blocking::Client,
    base_url: String,
    encoding: &'static Encoding,
    credentials: Option<Credentials>,
    authentication: Option<Authentication>,
}

// Create
impl RestClient {
    /// Creates a builder with the default configuration.
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::default()
    }

    /// Creates a client without authentication.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self, QuickRestError> {
        Self::builder().with_base_url(base_url).build()
    }

    /// Creates a client sending the credentials as headers with every request.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be initialized.
    pub fn key(base_url: impl Into<String>, credentials: Credentials) -> Result<Self, QuickRestError> {
        Self::builder()
            .with_base_url(base_url)
            .with_key_auth(credentials)
            .build()
    }

    /// Creates a client fetching a token before every request.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be initialized.
    pub fn jwt(base_url: impl Into<String>, jwt: JwtAuth) -> Result<Self, QuickRestError> {
        Self::builder()
            .with_base_url(base_url)
            .with_jwt_auth(jwt)
            .build()
    }
}

// Accessors
impl RestClient {
    /// The base URL every route is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The text encoding given to every response.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// The stored credentials, if any.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// The authentication strategy, if any.
    pub fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }
}

// Calls
impl RestClient {
    /// Sends a GET request to `route`.
    ///
    /// # Errors
    ///
    /// Fails if authentication fails, if the exchange fails, or if the
    /// status code does not start with `2` or `3`.
    pub fn get(&self, route: &str) -> Result<ServerResponse, QuickRestError> {
        self.get_with(route, CallOptions::default())
    }

    /// Sends a GET request to `route` with per-call options.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub fn get_with(
        &self,
        route: &str,
        options: CallOptions,
    ) -> Result<ServerResponse, QuickRestError> {
        let CallOptions { headers, timeout } = options;
        let headers = self.auth_headers()?.merge(headers);
        self.call_get(route, &headers, timeout)
    }

    /// Sends a POST request to `route`.
    ///
    /// A JSON object is sent as `application/json`, a text as `text/plain`.
    ///
    /// # Errors
    ///
    /// Fails if the body is empty, if authentication fails, if the exchange
    /// fails, or if the status code does not start with `2` or `3`.
    pub fn post(
        &self,
        route: &str,
        data: impl Into<CallBody>,
    ) -> Result<ServerResponse, QuickRestError> {
        self.post_with(route, data, CallOptions::default())
    }

    /// Sends a POST request to `route` with per-call options.
    ///
    /// # Errors
    ///
    /// See [`post`](Self::post).
    pub fn post_with(
        &self,
        route: &str,
        data: impl Into<CallBody>,
        options: CallOptions,
    ) -> Result<ServerResponse, QuickRestError> {
        let data = data.into();
        let CallOptions { headers, timeout } = options;
        let headers = self.auth_headers()?.merge(headers);
        let (json, text) = data.as_parts();
        self.call_post(route, &headers, json, text, timeout)
    }
}

// Authentication
impl RestClient {
    fn auth_headers(&self) -> Result<CallHeaders, QuickRestError> {
        match &self.authentication {
            None => Ok(CallHeaders::new()),
            Some(Authentication::Key(credentials)) => Ok(credentials.to_headers()),
            Some(Authentication::Jwt(jwt)) => {
                let token = self.authenticate(jwt)?;
                Ok(jwt.to_headers(&token))
            }
        }
    }

    fn authenticate(&self, jwt: &JwtAuth) -> Result<String, QuickRestError> {
        debug!(route = %jwt.auth_route, "authenticating...");
        let body = jwt.credentials.to_json();
        let response = self.call_post(&jwt.auth_route, &CallHeaders::new(), Some(&body), None, None)?;

        let decoded = response.decode()?;
        match decoded.get(&jwt.token_field) {
            Some(Value::String(token)) => Ok(token.clone()),
            Some(token) => Ok(token.to_string()),
            None => Err(QuickRestError::TokenNotFound {
                field: jwt.token_field.clone(),
                response: decoded,
            }),
        }
    }
}

// Exchange
impl RestClient {
    fn call_get(
        &self,
        route: &str,
        headers: &CallHeaders,
        timeout: Option<Duration>,
    ) -> Result<ServerResponse, QuickRestError> {
        let request = self.prepare(Method::GET, route, headers, timeout)?;
        self.send(request)
    }

    fn call_post(
        &self,
        route: &str,
        headers: &CallHeaders,
        json: Option<&Map<String, Value>>,
        text: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<ServerResponse, QuickRestError> {
        let request = match (json, text) {
            (Some(json), _) if !json.is_empty() => self
                .prepare(Method::POST, route, headers, timeout)?
                .json(json),
            (_, Some(text)) if !text.is_empty() => {
                // Written last, so it replaces any caller content type
                let headers = headers
                    .clone()
                    .add_header(CONTENT_TYPE.as_str(), mime::TEXT_PLAIN.as_ref());
                self.prepare(Method::POST, route, &headers, timeout)?
                    .body(text.to_string())
            }
            _ => return Err(QuickRestError::MissingBody),
        };

        self.send(request)
    }

    fn prepare(
        &self,
        method: Method,
        route: &str,
        headers: &CallHeaders,
        timeout: Option<Duration>,
    ) -> Result<RequestBuilder, QuickRestError> {
        let url = Url::parse(&format!("{}{route}", self.base_url))?;

        let mut header_map = HeaderMap::new();
        headers.write_to(&mut header_map)?;

        let mut request = self.client.request(method, url).headers(header_map);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        Ok(request)
    }

    fn send(&self, request: RequestBuilder) -> Result<ServerResponse, QuickRestError> {
        let request = request.build()?;
        debug!(method = %request.method(), url = %request.url(), "sending...");
        let response = self.client.execute(request)?;
        debug!(status = %response.status(), "...receiving");

        self.handle_response(response)
    }

    fn handle_response(&self, response: Response) -> Result<ServerResponse, QuickRestError> {
        let status = response.status();
        let reason = reason_phrase(&response);
        if !response::is_success(status) {
            return Err(QuickRestError::ServerError {
                status_code: status.as_u16(),
                reason,
            });
        }

        let raw = response.bytes()?;
        Ok(ServerResponse::new(status, reason, raw, self.encoding))
    }
}

/// The reason phrase sent by the server.
///
/// The transport only keeps the phrase when it differs from the canonical
/// one, so the canonical phrase is used otherwise.
fn reason_phrase(response: &Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
        .or_else(|| response.status().canonical_reason().map(str::to_string))
        .unwrap_or_default()
}
