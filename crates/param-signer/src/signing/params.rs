use serde_json::Value;
use tracing::debug;

use super::signer::{RequestSigner, SIGNATURE_FIELD};
use crate::encoding::{ParameterMap, encode_parameters};
use crate::error::Result;

/// Signs `params` with `signer`, returning a new map that carries the signature.
pub fn sign_parameters<S>(signer: &S, params: &ParameterMap) -> Result<ParameterMap>
where
    S: RequestSigner + ?Sized,
{
    let mut signed = params.clone();
    signed.remove(SIGNATURE_FIELD);

    let message = encode_parameters(&signed)?;
    let signature = signer.create_signature(&message)?;
    debug!(
        algorithm = signer.algorithm(),
        api_key_id = signer.api_key_id(),
        parameters = signed.len(),
        "signed request parameters"
    );

    signed.insert(SIGNATURE_FIELD.to_owned(), Value::String(signature));
    Ok(signed)
}

/// Validates the `signature` field of `params`.
///
/// Every failure (missing or non-string signature, unencodable parameters,
/// mismatch) is reported as `false`.
pub fn validate_signature_params<S>(signer: &S, params: &ParameterMap) -> bool
where
    S: RequestSigner + ?Sized,
{
    let Some(Value::String(signature)) = params.get(SIGNATURE_FIELD) else {
        debug!(algorithm = signer.algorithm(), "missing or non-string signature field");
        return false;
    };

    let mut unsigned = params.clone();
    unsigned.remove(SIGNATURE_FIELD);

    let message = match encode_parameters(&unsigned) {
        Ok(message) => message,
        Err(e) => {
            debug!(algorithm = signer.algorithm(), error = %e, "cannot encode parameters for validation");
            return false;
        }
    };

    signer.validate_signature(&message, signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::HmacSigner;
    use serde_json::json;

    fn signer() -> HmacSigner {
        HmacSigner::new("apy_key", "apy_secret")
    }

    fn timestamp_params() -> ParameterMap {
        let mut params = ParameterMap::new();
        params.insert("timestamp".into(), json!(1610612740000u64));
        params
    }

    #[test]
    fn input_map_is_not_mutated() {
        let params = timestamp_params();
        let signed = sign_parameters(&signer(), &params).unwrap();
        assert!(params.get(SIGNATURE_FIELD).is_none());
        assert!(signed.get(SIGNATURE_FIELD).is_some());
    }

    #[test]
    fn existing_signature_is_replaced() {
        let mut params = timestamp_params();
        params.insert(SIGNATURE_FIELD.into(), json!("stale"));

        let signed = sign_parameters(&signer(), &params).unwrap();
        let fresh = sign_parameters(&signer(), &timestamp_params()).unwrap();
        assert_eq!(signed, fresh);
    }

    #[test]
    fn non_string_signature_fails_validation() {
        let mut params = timestamp_params();
        params.insert(SIGNATURE_FIELD.into(), json!(12345));
        assert!(!validate_signature_params(&signer(), &params));
    }

    #[test]
    fn missing_signature_fails_validation() {
        assert!(!validate_signature_params(&signer(), &timestamp_params()));
    }

    #[test]
    fn unencodable_parameters_fail_validation() {
        let mut params = sign_parameters(&signer(), &timestamp_params()).unwrap();
        params.insert("nested".into(), json!({"a": 1}));
        assert!(!validate_signature_params(&signer(), &params));
    }

    #[test]
    fn unencodable_parameters_fail_signing() {
        let mut params = timestamp_params();
        params.insert("list".into(), json!([1, 2, 3]));
        assert!(sign_parameters(&signer(), &params).is_err());
    }

    #[test]
    fn works_through_trait_object() {
        let signer: Box<dyn RequestSigner> = Box::new(signer());
        let signed = signer.sign_parameters(&timestamp_params()).unwrap();
        assert!(signer.validate_signature_params(&signed));
    }
}
