use serde_json::Value;

use super::ParameterMap;
use crate::error::{Result, SignerError};

/// Canonical text of a single parameter value.
///
/// Strings are taken verbatim, numbers exactly as written in the source JSON
/// (`1.50` stays `1.50`) and booleans as `true`/`false`. Returns `None` for
/// `null`, arrays and objects.
pub fn encode_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Encodes parameters as a sorted URL query string.
///
/// This is the exact byte string that signers sign and verify, so it must
/// not depend on map iteration order: pairs are sorted by raw key bytes
/// before serialization. Keys and values are query-escaped: alphanumerics
/// and `-_.~` are kept, space becomes `+`, everything else is `%XX`.
/// An empty map encodes to `""`.
pub fn encode_parameters(params: &ParameterMap) -> Result<String> {
    let mut pairs = params
        .iter()
        .map(|(key, value)| {
            encode_value(value)
                .map(|text| (key.as_str(), text))
                .ok_or_else(|| {
                    SignerError::Encoding(format!(
                        "parameter `{key}` is not a string, number or boolean"
                    ))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    pairs.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let encoded = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", query_escape(key), query_escape(value)))
        .collect::<Vec<_>>()
        .join("&");
    Ok(encoded)
}

// `%` itself is escaped to `%25`, so every `%20` in the output is a space.
fn query_escape(text: &str) -> String {
    urlencoding::encode(text).replace("%20", "+")
}
