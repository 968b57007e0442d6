//! # Quick Rest
//!
//! A small blocking client for REST APIs.
//!
//! - **[`RestClient`]** - Sends GET and POST requests relative to a base URL
//! - **[`ServerResponse`]** - Decodes the body as JSON and exports it as CSV or raw text
//! - **[`Authentication`]** - Static header credentials or a token fetched before every call
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quick_rest::RestClient;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RestClient::new("https://dog.ceo/api")?;
//!
//! let breeds = client.get("/breeds/list/all")?.decode()?;
//! println!("{breeds:#}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Authentication
//!
//! ### Header credentials
//!
//! Every request carries the credentials as headers. Headers given for a
//! single call take precedence.
//!
//! ```rust,no_run
//! use quick_rest::{CallOptions, Credentials, RestClient};
//!
//! # fn main() -> Result<(), quick_rest::QuickRestError> {
//! let client = RestClient::key(
//!     "https://api.example.com",
//!     Credentials::new().add("X-Api-Key", "my-key"),
//! )?;
//!
//! let response = client.get_with(
//!     "/reports",
//!     CallOptions::new().add_header("X-Api-Key", "another-key"),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Token authentication
//!
//! Before every request, the credentials are posted as a JSON object to the
//! authentication route, and the token read from the response is sent in a
//! header. There is no token caching: each call makes two exchanges.
//!
//! ```rust,no_run
//! use quick_rest::{Credentials, JwtAuth, RestClient};
//!
//! # fn main() -> Result<(), quick_rest::QuickRestError> {
//! let jwt = JwtAuth::new("/auth", "token", "Authorization")
//!     .with_prefix("Bearer ")
//!     .with_credentials(Credentials::new().add("user", "alice").add("pass", "s3cr3t"));
//! let client = RestClient::jwt("https://api.example.com", jwt)?;
//!
//! let me = client.get("/me")?.decode()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Exports
//!
//! ```rust,no_run
//! use quick_rest::{CsvOptions, RestClient};
//!
//! # fn main() -> Result<(), quick_rest::QuickRestError> {
//! let client = RestClient::builder()
//!     .with_base_url("https://api.example.com")
//!     .with_encoding("windows-1252")?
//!     .build()?;
//!
//! // {"items": [{"x": 1, "y": 2}, {"x": 3, "y": 4}]}
//! let response = client.get("/items")?;
//! response.to_csv_with("items.csv", &CsvOptions::new().with_line_terminator("\r\n"))?;
//! response.to_text("items.json")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every operation returns a [`QuickRestError`], see [`QuickRestError::kind`]
//! for a coarse classification.

mod client;

pub use self::client::{
    Authentication, CallBody, CallHeaders, CallOptions, Credentials, CsvOptions, ErrorKind,
    JwtAuth, OAuthConfig, QuickRestError, RestClient, RestClientBuilder, SecureString,
    ServerResponse,
};
