use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};
use tracing::debug;

use super::response::encoding_for_label;
use super::{Authentication, Credentials, JwtAuth, OAuthConfig, QuickRestError, RestClient};

/// Builder for creating `RestClient` instances.
///
/// # Default Configuration
///
/// - **Base URL**: empty (routes must then be absolute URLs)
/// - **Encoding**: UTF-8
/// - **Timeout**: none, calls block until the exchange completes
/// - **TLS verification**: enabled
/// - **Authentication**: none
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use quick_rest::{Credentials, RestClient};
///
/// # fn example() -> Result<(), quick_rest::QuickRestError> {
/// let client = RestClient::builder()
///     .with_base_url("https://api.example.com/v1")
///     .with_encoding("utf-8")?
///     .with_timeout(Duration::from_secs(10))
///     .with_key_auth(Credentials::new().add("X-Api-Key", "secret"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RestClientBuilder {
    base_url: String,
    encoding: &'static Encoding,
    timeout: Option<Duration>,
    tls_verification: bool,
    credentials: Option<Credentials>,
    authentication: Option<Authentication>,
    oauth: Option<OAuthConfig>,
}

impl Default for RestClientBuilder {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            encoding: UTF_8,
            timeout: None,
            tls_verification: true,
            credentials: None,
            authentication: None,
            oauth: None,
        }
    }
}

impl RestClientBuilder {
    /// Builds the final `RestClient` instance with all configured settings.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    /// - OAuth authentication was configured, it is not supported yet
    /// - The underlying HTTP client cannot be initialized
    pub fn build(self) -> Result<RestClient, QuickRestError> {
        let Self {
            base_url,
            encoding,
            timeout,
            tls_verification,
            credentials,
            authentication,
            oauth,
        } = self;

        if oauth.is_some() {
            return Err(QuickRestError::NotImplemented { feature: "OAuth" });
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!tls_verification)
            .build()?;

        debug!(%base_url, encoding = encoding.name(), ?timeout, tls_verification, "client ready");
        Ok(RestClient {
            client,
            base_url,
            encoding,
            credentials,
            authentication,
        })
    }

    /// Sets the base URL every route is appended to.
    ///
    /// Routes are concatenated verbatim, no `/` is inserted: with a base URL
    /// `https://api.example.com/v1`, the route must be `/users`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the text encoding used to decode responses and write exports.
    ///
    /// # Errors
    ///
    /// Fails if the label is not a known WHATWG encoding label.
    pub fn with_encoding(mut self, label: &str) -> Result<Self, QuickRestError> {
        self.encoding = encoding_for_label(label)?;
        Ok(self)
    }

    /// Sets a timeout for every call of the client.
    ///
    /// Without it, calls block until the exchange completes.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables or disables TLS certificate verification for the whole client.
    ///
    /// Verification is enabled by default. Only disable it against test
    /// servers with self-signed certificates.
    #[must_use]
    pub fn with_tls_verification(mut self, enabled: bool) -> Self {
        self.tls_verification = enabled;
        self
    }

    /// Stores credentials on the client without sending them.
    ///
    /// See [`with_key_auth`](Self::with_key_auth) to send them as headers.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sends the credentials as headers with every request.
    ///
    /// Caller headers with the same name take precedence.
    #[must_use]
    pub fn with_key_auth(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials.clone());
        self.authentication = Some(Authentication::Key(credentials));
        self
    }

    /// Fetches a token before every request, see [`JwtAuth`].
    #[must_use]
    pub fn with_jwt_auth(mut self, jwt: JwtAuth) -> Self {
        self.authentication = Some(Authentication::Jwt(jwt));
        self
    }

    /// Configures OAuth authentication.
    ///
    /// OAuth is not supported yet: [`build`](Self::build) will fail.
    #[must_use]
    pub fn with_oauth(mut self, oauth: OAuthConfig) -> Self {
        self.oauth = Some(oauth);
        self
    }
}
