use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use tracing::debug;

use super::signer::RequestSigner;
use crate::error::{Result, SignerError};
use crate::keys::{PrivateKeyMaterial, PublicKeyMaterial, load_private_key, load_public_key};

/// Ed25519 signer (pure Ed25519, no pre-hash).
///
/// Signatures are the standard padded base64 encoding of the 64-byte
/// signature.
pub struct Ed25519Signer {
    api_key_id: String,
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl Ed25519Signer {
    pub fn new(
        api_key_id: impl Into<String>,
        signing_key: SigningKey,
        verifying_key: VerifyingKey,
    ) -> Self {
        Self {
            api_key_id: api_key_id.into(),
            signing_key,
            verifying_key,
        }
    }

    /// Builds a signer from a SPKI `PUBLIC KEY` PEM and a PKCS#8 `PRIVATE KEY` PEM.
    pub fn from_pem(
        api_key_id: impl Into<String>,
        public_key_pem: &str,
        private_key_pem: &str,
    ) -> Result<Self> {
        let signing_key = match load_private_key(private_key_pem)? {
            PrivateKeyMaterial::Ed25519(key) => key,
            other => return Err(wrong_algorithm("private", other.algorithm())),
        };
        let verifying_key = match load_public_key(public_key_pem)? {
            PublicKeyMaterial::Ed25519(key) => key,
            other => return Err(wrong_algorithm("public", other.algorithm())),
        };
        Ok(Self::new(api_key_id, signing_key, verifying_key))
    }

    /// Public half used by `validate_signature`, e.g. for publishing to the
    /// API server when registering the key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

fn wrong_algorithm(kind: &str, found: &str) -> SignerError {
    SignerError::KeyFormat(format!("not an Ed25519 {kind} key (found {found})"))
}

impl RequestSigner for Ed25519Signer {
    fn create_signature(&self, message: &str) -> Result<String> {
        let signature = self
            .signing_key
            .try_sign(message.as_bytes())
            .map_err(|e| SignerError::Signing(format!("ed25519 signing failed: {e}")))?;
        Ok(STANDARD.encode(signature.to_bytes()))
    }

    fn validate_signature(&self, message: &str, signature: &str) -> bool {
        let Ok(bytes) = STANDARD.decode(signature) else {
            debug!("ed25519 signature is not valid base64");
            return false;
        };
        let Ok(signature) = Signature::from_slice(&bytes) else {
            debug!(len = bytes.len(), "ed25519 signature has the wrong length");
            return false;
        };
        self.verifying_key
            .verify(message.as_bytes(), &signature)
            .is_ok()
    }

    fn api_key_id(&self) -> &str {
        &self.api_key_id
    }

    fn algorithm(&self) -> &str {
        "ed25519"
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("api_key_id", &self.api_key_id)
            .field("verifying_key", &hex::encode(self.verifying_key.as_bytes()))
            .finish_non_exhaustive()
    }
}
