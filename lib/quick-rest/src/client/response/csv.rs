use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::client::QuickRestError;

/// Options for [`ServerResponse::to_csv_with`](crate::ServerResponse::to_csv_with).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    line_terminator: String,
    omit_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            line_terminator: "\n".to_string(),
            omit_header: false,
        }
    }
}

impl CsvOptions {
    /// Creates the default options: `\n` terminated lines, with a header row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the string written at the end of every line, e.g. `"\r\n"`.
    #[must_use]
    pub fn with_line_terminator(mut self, line_terminator: impl Into<String>) -> Self {
        self.line_terminator = line_terminator.into();
        self
    }

    /// Skips the header row.
    #[must_use]
    pub fn without_header(mut self) -> Self {
        self.omit_header = true;
        self
    }
}

/// Renders a decoded response as CSV.
///
/// The value must be an object with exactly one key, holding a non-empty
/// array of objects. The first row's keys give the columns.
pub(in crate::client) fn render(value: &Value, options: &CsvOptions) -> Result<String, QuickRestError> {
    let rows = single_array(value)?;
    let Some(first) = rows.first() else {
        return Err(QuickRestError::format("the response holds no row"));
    };
    let fields: Vec<&str> = as_row(first, 0)?.keys().map(String::as_str).collect();

    let mut csv = String::new();
    if !options.omit_header {
        let header = fields.iter().map(|field| escape(field)).collect::<Vec<_>>();
        csv.push_str(&header.join(","));
        csv.push_str(&options.line_terminator);
    }

    for (index, row) in rows.iter().enumerate() {
        let row = as_row(row, index)?;
        if let Some(extra) = row.keys().find(|key| !fields.contains(&key.as_str())) {
            return Err(QuickRestError::format(format!(
                "row {index} contains field '{extra}' which is not in the header {fields:?}"
            )));
        }
        let cells = fields
            .iter()
            .map(|field| row.get(*field).map_or(Cow::Borrowed(""), cell))
            .map(|value| escape(&value).into_owned())
            .collect::<Vec<_>>();
        csv.push_str(&cells.join(","));
        csv.push_str(&options.line_terminator);
    }

    Ok(csv)
}

fn single_array(value: &Value) -> Result<&[Value], QuickRestError> {
    let Value::Object(object) = value else {
        return Err(QuickRestError::format(format!(
            "the response is not an object: {value}"
        )));
    };
    let mut entries = object.iter();
    let (Some((key, data)), None) = (entries.next(), entries.next()) else {
        return Err(QuickRestError::format(format!(
            "the response must have exactly one key, found {}",
            object.len()
        )));
    };
    let Value::Array(rows) = data else {
        return Err(QuickRestError::format(format!(
            "the value of '{key}' is not an array"
        )));
    };
    Ok(rows)
}

fn as_row(value: &Value, index: usize) -> Result<&Map<String, Value>, QuickRestError> {
    value.as_object().ok_or_else(|| {
        QuickRestError::format(format!("row {index} is not an object: {value}"))
    })
}

fn cell(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(text) => Cow::Borrowed(text),
        other => Cow::Owned(other.to_string()),
    }
}

/// Escape a value for CSV (handle commas, quotes, newlines)
fn escape(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
