mod query;

pub use query::{encode_parameters, encode_value};

/// Flat, string-keyed request parameters.
///
/// Values must be scalars (strings, numbers, booleans) to be signable.
pub type ParameterMap = serde_json::Map<String, serde_json::Value>;
