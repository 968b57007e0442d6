//! OAuth authentication placeholder.
//!
//! The configuration type exists so the API is stable, but no OAuth flow is
//! implemented: building a client with it fails with
//! [`QuickRestError::NotImplemented`](crate::QuickRestError::NotImplemented).

use super::Credentials;

/// OAuth authentication configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    auth_route: String,
    token_field: String,
    credentials: Credentials,
}

impl OAuthConfig {
    /// Creates an OAuth configuration.
    pub fn new(
        auth_route: impl Into<String>,
        token_field: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            auth_route: auth_route.into(),
            token_field: token_field.into(),
            credentials,
        }
    }

    /// The token endpoint route.
    pub fn auth_route(&self) -> &str {
        &self.auth_route
    }

    /// The field read from the token response.
    pub fn token_field(&self) -> &str {
        &self.token_field
    }

    /// The client credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
