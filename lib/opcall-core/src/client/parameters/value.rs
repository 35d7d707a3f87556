use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use tracing::warn;

use crate::client::RequestError;

/// Renders a scalar JSON value as a string.
///
/// Returns `None` for arrays and objects.
pub(in crate::client) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Renders a path parameter value using the simple style: scalars as-is, arrays of
/// scalars joined with `,`.
pub(in crate::client) fn path_value(name: &str, value: &Value) -> Result<String, RequestError> {
    let rendered = match value {
        Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Option<Vec<_>>>()
            .map(|items| items.join(",")),
        _ => scalar_to_string(value),
    };

    rendered.ok_or_else(|| {
        warn!(?name, ?value, "path parameter value cannot be rendered");
        RequestError::UnsupportedParameterValue {
            name: name.to_string(),
            value: value.clone(),
        }
    })
}

pub(in crate::client) fn encode_path_value(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}
