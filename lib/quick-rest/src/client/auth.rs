use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::CallHeaders;

/// Secure wrapper for sensitive string data that automatically zeroes memory on drop.
///
/// This wrapper ensures that credentials and tokens are cleared from memory
/// when they are no longer needed, and never shown in full in logs.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    ///
    /// # Security Note
    /// The returned reference should not be stored for extended periods
    /// to minimize exposure time of sensitive data.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masks sensitive data for display/logging purposes.
    fn mask_sensitive(value: &str) -> String {
        let count = value.chars().count();
        if count <= 8 {
            "***".to_string()
        } else {
            let head: String = value.chars().take(4).collect();
            let tail: String = value.chars().skip(count - 4).collect();
            format!("{head}...{tail}")
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl Serialize for SecureString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// An ordered set of opaque credentials.
///
/// Depending on the authentication strategy, credentials are either merged
/// verbatim into the request headers, or sent as the JSON body of the
/// authentication request. Values are [`SecureString`]s.
///
/// # Example
///
/// ```rust
/// use quick_rest::Credentials;
///
/// let credentials = Credentials::new()
///     .add("X-Api-Key", "secret-key")
///     .add("X-Api-User", "alice");
/// assert_eq!(credentials.len(), 2);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Credentials(IndexMap<String, SecureString>);

impl Credentials {
    /// Creates an empty set of credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a credential, replacing any previous value with the same name.
    #[must_use]
    pub fn add(mut self, name: impl Into<String>, value: impl Into<SecureString>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns the value of a credential.
    pub fn get(&self, name: &str) -> Option<&SecureString> {
        self.0.get(name)
    }

    /// Checks if there is no credential.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of credentials.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the credentials, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecureString)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub(in crate::client) fn to_headers(&self) -> CallHeaders {
        self.iter()
            .fold(CallHeaders::new(), |headers, (name, value)| {
                headers.add_header(name, value.as_str())
            })
    }

    pub(in crate::client) fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    serde_json::Value::String(value.as_str().to_string()),
                )
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Credentials
where
    K: Into<String>,
    V: Into<SecureString>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.keys().map(|name| (name, "[REDACTED]")))
            .finish()
    }
}

/// Token-based authentication: the token is minted by an authentication
/// endpoint before *every* request.
///
/// The client POSTs the credentials as a JSON body to `auth_route`, reads
/// `token_field` from the JSON response, and sends
/// `<header_field>: <token_prefix><token>` with the actual request.
/// Tokens are never cached.
///
/// # Example
///
/// ```rust
/// use quick_rest::{Credentials, JwtAuth};
///
/// let jwt = JwtAuth::new("/auth/login", "access_token", "Authorization")
///     .with_prefix("Bearer ")
///     .with_credentials(Credentials::new().add("username", "alice").add("password", "s3cr3t"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct JwtAuth {
    pub(in crate::client) auth_route: String,
    pub(in crate::client) token_field: String,
    pub(in crate::client) header_field: String,
    pub(in crate::client) token_prefix: String,
    pub(in crate::client) credentials: Credentials,
}

impl JwtAuth {
    /// Creates a token authentication without prefix nor credentials.
    pub fn new(
        auth_route: impl Into<String>,
        token_field: impl Into<String>,
        header_field: impl Into<String>,
    ) -> Self {
        Self {
            auth_route: auth_route.into(),
            token_field: token_field.into(),
            header_field: header_field.into(),
            token_prefix: String::new(),
            credentials: Credentials::default(),
        }
    }

    /// Sets the prefix written before the token, e.g. `"Bearer "`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.token_prefix = prefix.into();
        self
    }

    /// Sets the credentials presented to the authentication route.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// The route used to exchange the credentials for a token.
    pub fn auth_route(&self) -> &str {
        &self.auth_route
    }

    /// The field read from the authentication response.
    pub fn token_field(&self) -> &str {
        &self.token_field
    }

    /// The header set on authenticated requests.
    pub fn header_field(&self) -> &str {
        &self.header_field
    }

    pub(in crate::client) fn to_headers(&self, token: &str) -> CallHeaders {
        let value = format!("{}{token}", self.token_prefix);
        CallHeaders::new().add_header(self.header_field.clone(), value)
    }
}

impl fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAuth")
            .field("auth_route", &self.auth_route)
            .field("token_field", &self.token_field)
            .field("header_field", &self.header_field)
            .field("token_prefix", &self.token_prefix)
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Authentication strategy of a [`RestClient`](crate::RestClient).
///
/// The strategy decides which headers are attached before the shared request
/// path runs. Caller headers are always layered on top of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    /// Credentials merged verbatim into the headers of every request.
    Key(Credentials),

    /// Token fetched from an authentication route before every request.
    Jwt(JwtAuth),
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(credentials) => {
                let names = credentials.iter().map(|(name, _)| name).collect::<Vec<_>>();
                write!(f, "Key ({})", names.join(", "))
            }
            Self::Jwt(jwt) => write!(f, "Jwt ({} -> {})", jwt.auth_route, jwt.header_field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_string_mask_short_tokens() {
        assert_eq!(SecureString::mask_sensitive("short"), "***");
        assert_eq!(SecureString::mask_sensitive("12345678"), "***");
        assert_eq!(SecureString::mask_sensitive("123456789"), "1234...6789");
    }

    #[test]
    fn test_secure_string_debug() {
        let secure = SecureString::new("secret-password".to_string());
        let debug_str = format!("{secure:?}");
        assert_eq!(debug_str, "SecureString { value: \"[REDACTED]\" }");
        assert!(!debug_str.contains("secret-password"));
    }

    #[test]
    fn test_secure_string_conversions() {
        let secure: SecureString = "test".to_string().into();
        assert_eq!(secure.as_str(), "test");

        let secure = SecureString::from("test");
        assert_eq!(secure, SecureString::new("test".to_string()));
    }

    #[test]
    fn test_credentials_keep_insertion_order() {
        let credentials = Credentials::new().add("b", "2").add("a", "1");

        let names: Vec<_> = credentials.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = Credentials::new().add("X-Api-Key", "super-secret");

        let debug_str = format!("{credentials:?}");
        assert_eq!(debug_str, r#"{"X-Api-Key": "[REDACTED]"}"#);
    }

    #[test]
    fn test_credentials_serialize_as_plain_object() {
        let credentials: Credentials = [("username", "alice"), ("password", "pass")]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&credentials).expect("serialize credentials");
        assert_eq!(json, r#"{"username":"alice","password":"pass"}"#);
        assert_eq!(
            serde_json::Value::Object(credentials.to_json()).to_string(),
            json
        );
    }

    #[test]
    fn test_jwt_headers_with_prefix() {
        let jwt = JwtAuth::new("/auth", "token", "Authorization").with_prefix("Bearer ");

        let headers = jwt.to_headers("abc");
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![("Authorization", "Bearer abc")]
        );
    }

    #[test]
    fn test_jwt_headers_without_prefix() {
        let jwt = JwtAuth::new("/auth", "token", "X-Token");

        let headers = jwt.to_headers("abc");
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec![("X-Token", "abc")]);
    }

    #[test]
    fn test_authentication_display_hides_secrets() {
        let auth = Authentication::Key(Credentials::new().add("X-Api-Key", "secret-key-12345"));
        assert_eq!(auth.to_string(), "Key (X-Api-Key)");

        let auth = Authentication::Jwt(JwtAuth::new("/auth", "token", "Authorization"));
        assert_eq!(auth.to_string(), "Jwt (/auth -> Authorization)");
    }
}
