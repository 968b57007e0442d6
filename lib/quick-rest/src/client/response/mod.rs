//! Response handling, status classification and export.
//!
//! This module provides:
//!
//! - [`ServerResponse`] - A completed exchange, with JSON decoding helpers
//! - [`CsvOptions`] - Options for exporting a response as CSV

use std::fmt;
use std::fs;
use std::path::Path;

use bytes::Bytes;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use http::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::QuickRestError;

mod csv;
pub use self::csv::CsvOptions;

mod status;
pub(in crate::client) use self::status::is_success;

/// A completed and accepted HTTP exchange.
///
/// The raw body is kept as received. Decoding is done on demand with the
/// client text encoding, or an explicit one.
///
/// # Example
///
/// ```rust,no_run
/// use quick_rest::{CsvOptions, RestClient};
///
/// # fn example() -> Result<(), quick_rest::QuickRestError> {
/// let client = RestClient::new("https://api.example.com")?;
/// let response = client.get("/users")?;
///
/// let users = response.decode()?;
/// response.to_csv_with("users.csv", &CsvOptions::new().with_line_terminator("\r\n"))?;
/// response.to_text("users.json")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ServerResponse {
    status: StatusCode,
    reason: String,
    raw: Bytes,
    encoding: &'static Encoding,
}

impl ServerResponse {
    pub(in crate::client) fn new(
        status: StatusCode,
        reason: impl Into<String>,
        raw: Bytes,
        encoding: &'static Encoding,
    ) -> Self {
        Self {
            status,
            reason: reason.into(),
            raw,
            encoding,
        }
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The protocol reason phrase, empty when unknown.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The raw, undecoded body.
    pub fn bytes(&self) -> &Bytes {
        &self.raw
    }

    /// The text encoding used by [`decode`](Self::decode) and the exports.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Decodes the body as text with the response encoding.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are malformed for the encoding.
    pub fn text(&self) -> Result<String, QuickRestError> {
        decode_text(&self.raw, self.encoding)
    }

    /// Decodes the body as JSON.
    ///
    /// Object keys keep the order they have in the body.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are malformed for the encoding, or are not JSON.
    pub fn decode(&self) -> Result<serde_json::Value, QuickRestError> {
        parse_json(self.text()?)
    }

    /// Decodes the body as JSON with an explicit text encoding.
    ///
    /// The label is a WHATWG encoding label, e.g. `"utf-8"`, `"latin1"`,
    /// `"utf-16le"`.
    ///
    /// # Errors
    ///
    /// Fails if the label is unknown, if the bytes are malformed for that
    /// encoding, or are not JSON.
    pub fn decode_with(&self, label: &str) -> Result<serde_json::Value, QuickRestError> {
        let encoding = encoding_for_label(label)?;
        parse_json(decode_text(&self.raw, encoding)?)
    }

    /// Decodes the body as JSON into a typed value.
    ///
    /// # Errors
    ///
    /// Fails like [`decode`](Self::decode), or with the JSON path of the
    /// first value that does not match `T`.
    pub fn decode_as<T>(&self) -> Result<T, QuickRestError>
    where
        T: DeserializeOwned,
    {
        let text = self.text()?;
        let mut deserializer = serde_json::Deserializer::from_str(&text);
        let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            QuickRestError::JsonPath {
                path: err.path().to_string(),
                error: err.into_inner(),
            }
        })?;
        deserializer
            .end()
            .map_err(|error| QuickRestError::JsonDecode {
                error,
                body: text.clone(),
            })?;
        Ok(value)
    }

    /// Writes the decoded body as CSV with the default [`CsvOptions`].
    ///
    /// # Errors
    ///
    /// See [`to_csv_with`](Self::to_csv_with).
    pub fn to_csv(&self, path: impl AsRef<Path>) -> Result<(), QuickRestError> {
        self.to_csv_with(path, &CsvOptions::default())
    }

    /// Writes the decoded body as CSV.
    ///
    /// The body must be a JSON object with exactly one key holding a
    /// non-empty array of objects. The first object's keys give the columns.
    /// The file is written with the response encoding and overwritten if it
    /// exists.
    ///
    /// # Errors
    ///
    /// Fails with a format error when the body does not have that shape or
    /// cannot be represented in the response encoding, and with an I/O error
    /// when the file cannot be written.
    pub fn to_csv_with(
        &self,
        path: impl AsRef<Path>,
        options: &CsvOptions,
    ) -> Result<(), QuickRestError> {
        let path = path.as_ref();
        let value = self.decode()?;
        let csv = csv::render(&value, options)?;

        let data = encode_text(&csv, self.encoding)?;

        debug!(path = %path.display(), bytes = data.len(), "writing CSV export");
        fs::write(path, data)?;
        Ok(())
    }

    /// Writes the raw body verbatim. The file is overwritten if it exists.
    ///
    /// # Errors
    ///
    /// Fails with an I/O error when the file cannot be written.
    pub fn to_text(&self, path: impl AsRef<Path>) -> Result<(), QuickRestError> {
        let path = path.as_ref();
        debug!(path = %path.display(), bytes = self.raw.len(), "writing raw export");
        fs::write(path, &self.raw)?;
        Ok(())
    }
}

impl fmt::Debug for ServerResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerResponse")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .field("raw", &format_args!("{} bytes", self.raw.len()))
            .field("encoding", &self.encoding.name())
            .finish()
    }
}

impl fmt::Display for ServerResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.status, self.raw.len())
    }
}

pub(in crate::client) fn encoding_for_label(
    label: &str,
) -> Result<&'static Encoding, QuickRestError> {
    Encoding::for_label(label.as_bytes()).ok_or_else(|| QuickRestError::UnknownEncoding {
        label: label.to_string(),
    })
}

fn decode_text(raw: &[u8], encoding: &'static Encoding) -> Result<String, QuickRestError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(raw)
        .map(|text| text.into_owned())
        .ok_or(QuickRestError::InvalidEncoding {
            encoding: encoding.name(),
        })
}

/// Encodes text with exactly the given encoding.
///
/// The encoder of `encoding_rs` writes UTF-8 for UTF-16 labels, so UTF-16 is
/// written from the code units directly, without BOM.
fn encode_text(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>, QuickRestError> {
    if encoding == UTF_16LE {
        return Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }

    let (data, used, had_errors) = encoding.encode(text);
    if had_errors || used != encoding {
        return Err(QuickRestError::UnencodableText {
            encoding: encoding.name(),
        });
    }
    Ok(data.into_owned())
}

fn parse_json(text: String) -> Result<serde_json::Value, QuickRestError> {
    serde_json::from_str(&text).map_err(|error| QuickRestError::JsonDecode { error, body: text })
}

#[cfg(test)]
mod tests {
    use encoding_rs::{UTF_8, WINDOWS_1252};
    use rstest::rstest;
    use serde::Deserialize;

    use super::*;
    use crate::ErrorKind;

    fn response(body: &'static [u8]) -> ServerResponse {
        ServerResponse::new(StatusCode::OK, "OK", Bytes::from_static(body), UTF_8)
    }

    #[test]
    fn test_decode_object() {
        let value = response(br#"{"a":1}"#).decode().expect("valid JSON");

        insta::assert_debug_snapshot!(value, @r#"
        Object {
            "a": Number(1),
        }
        "#);
    }

    #[test]
    fn test_decode_keeps_key_order() {
        let value = response(br#"{"z":1,"a":2,"m":3}"#)
            .decode()
            .expect("valid JSON");

        let keys: Vec<_> = value
            .as_object()
            .expect("an object")
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_decode_invalid_json_is_format_error() {
        let error = response(b"not json").decode().expect_err("invalid JSON");

        assert_eq!(error.kind(), ErrorKind::Format);
        assert!(error.to_string().contains("not json"));
    }

    #[test]
    fn test_decode_invalid_utf8_is_format_error() {
        let error = response(b"{\"a\":\"\xff\"}").decode().expect_err("invalid UTF-8");

        assert_eq!(error.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_decode_with_explicit_encoding() {
        // "é" in windows-1252
        let value = response(b"{\"name\":\"caf\xe9\"}")
            .decode_with("latin1")
            .expect("valid latin1 JSON");

        assert_eq!(value["name"], "café");
    }

    #[test]
    fn test_decode_with_unknown_encoding() {
        let error = response(b"{}")
            .decode_with("klingon")
            .expect_err("unknown label");

        assert_eq!(error.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_decode_as_reports_path() {
        #[derive(Debug, Deserialize)]
        struct User {
            #[allow(dead_code)]
            id: u32,
        }
        #[derive(Debug, Deserialize)]
        struct Users {
            #[allow(dead_code)]
            users: Vec<User>,
        }

        let error = response(br#"{"users":[{"id":1},{"id":"two"}]}"#)
            .decode_as::<Users>()
            .expect_err("id is not a number");

        let QuickRestError::JsonPath { path, .. } = &error else {
            panic!("Expected JsonPath error, got {error:?}");
        };
        assert_eq!(path, "users[1].id");
        assert_eq!(error.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_to_text_writes_raw_bytes() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("raw.bin");
        let body: &'static [u8] = b"\x00\x01binary\xff";

        response(body).to_text(&path)?;

        assert_eq!(fs::read(&path)?, body);
        Ok(())
    }

    #[test]
    fn test_to_csv_overwrites_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("items.csv");
        fs::write(&path, "previous content that is longer than the export")?;

        response(br#"{"items":[{"x":1,"y":2},{"x":3,"y":4}]}"#).to_csv(&path)?;

        assert_eq!(fs::read_to_string(&path)?, "x,y\n1,2\n3,4\n");
        Ok(())
    }

    #[test]
    fn test_to_csv_uses_response_encoding() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("items.csv");
        let response = ServerResponse::new(
            StatusCode::OK,
            "OK",
            Bytes::from_static(b"{\"items\":[{\"name\":\"caf\xe9\"}]}"),
            WINDOWS_1252,
        );

        response.to_csv(&path)?;

        assert_eq!(fs::read(&path)?, b"name\ncaf\xe9\n");
        Ok(())
    }

    fn utf16(text: &str, to_bytes: fn(u16) -> [u8; 2]) -> Vec<u8> {
        text.encode_utf16().flat_map(to_bytes).collect()
    }

    #[rstest]
    #[case::little_endian(UTF_16LE, u16::to_le_bytes)]
    #[case::big_endian(UTF_16BE, u16::to_be_bytes)]
    fn test_to_csv_writes_utf16(
        #[case] encoding: &'static Encoding,
        #[case] to_bytes: fn(u16) -> [u8; 2],
    ) -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("items.csv");
        let body = utf16(r#"{"items":[{"x":"é"}]}"#, to_bytes);
        let response = ServerResponse::new(StatusCode::OK, "OK", Bytes::from(body), encoding);

        assert_eq!(response.decode()?["items"][0]["x"], "é");
        response.to_csv(&path)?;

        assert_eq!(fs::read(&path)?, utf16("x\né\n", to_bytes));
        Ok(())
    }

    #[test]
    fn test_to_csv_rejects_unencodable_text() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("items.csv");
        let response = ServerResponse::new(
            StatusCode::OK,
            "OK",
            Bytes::from_static(br#"{"items":[{"x":"\u4e2d"}]}"#),
            WINDOWS_1252,
        );

        let error = response.to_csv(&path).expect_err("not representable in windows-1252");

        assert!(matches!(error, QuickRestError::UnencodableText { encoding: "windows-1252" }));
        assert_eq!(error.kind(), ErrorKind::Format);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_to_csv_rejects_multiple_keys() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("items.csv");

        let error = response(br#"{"items":[{"x":1}],"other":[{"x":2}]}"#)
            .to_csv(&path)
            .expect_err("two top-level keys");

        assert_eq!(error.kind(), ErrorKind::Format);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_debug_hides_body() {
        let debug = format!("{:?}", response(b"secret body"));

        assert!(!debug.contains("secret body"));
        assert!(debug.contains("UTF-8"));
    }
}
