use crate::encoding::ParameterMap;
use crate::error::Result;

use super::params;

/// Parameter carrying the request signature. Never part of the signed string.
pub const SIGNATURE_FIELD: &str = "signature";

/// Trait for signing canonical request strings.
///
/// Implementations are sync — signing is CPU-bound — and hold only
/// immutable key material, so one instance can be shared across threads.
pub trait RequestSigner: Send + Sync {
    /// Sign a canonical message. Returns the encoded signature (hex or base64,
    /// depending on the scheme).
    fn create_signature(&self, message: &str) -> Result<String>;

    /// Check `signature` against `message`. Malformed signatures are `false`.
    fn validate_signature(&self, message: &str, signature: &str) -> bool;

    /// API-key identifier sent alongside the signature.
    fn api_key_id(&self) -> &str;

    /// Algorithm identifier string (e.g. "hmac-sha256").
    fn algorithm(&self) -> &str;

    /// Returns a copy of `params` with a fresh `signature` field.
    ///
    /// Any `signature` already present is dropped before encoding. The
    /// caller's map is left untouched.
    fn sign_parameters(&self, params: &ParameterMap) -> Result<ParameterMap> {
        params::sign_parameters(self, params)
    }

    /// Verify the `signature` field of `params` against the other fields.
    fn validate_signature_params(&self, params: &ParameterMap) -> bool {
        params::validate_signature_params(self, params)
    }
}
