use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use super::signer::RequestSigner;
use crate::error::{Result, SignerError};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signer over a shared API secret.
///
/// Signatures are the lowercase hex encoding of the 32-byte tag.
pub struct HmacSigner {
    api_key_id: String,
    secret: Vec<u8>,
}

impl HmacSigner {
    pub fn new(api_key_id: impl Into<String>, secret: impl AsRef<[u8]>) -> Self {
        Self {
            api_key_id: api_key_id.into(),
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self, message: &str) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| SignerError::Signing(format!("invalid HMAC key: {e}")))?;
        mac.update(message.as_bytes());
        Ok(mac)
    }
}

impl RequestSigner for HmacSigner {
    fn create_signature(&self, message: &str) -> Result<String> {
        let tag = self.mac(message)?.finalize().into_bytes();
        Ok(hex::encode(tag))
    }

    fn validate_signature(&self, message: &str, signature: &str) -> bool {
        // signatures are always emitted as lowercase hex
        if !signature.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            debug!("HMAC signature is not lowercase hex");
            return false;
        }
        let Ok(expected) = hex::decode(signature) else {
            debug!("HMAC signature is not valid hex");
            return false;
        };
        match self.mac(message) {
            // constant-time comparison
            Ok(mac) => mac.verify_slice(&expected).is_ok(),
            Err(_) => false,
        }
    }

    fn api_key_id(&self) -> &str {
        &self.api_key_id
    }

    fn algorithm(&self) -> &str {
        "hmac-sha256"
    }
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner")
            .field("api_key_id", &self.api_key_id)
            .finish_non_exhaustive()
    }
}
