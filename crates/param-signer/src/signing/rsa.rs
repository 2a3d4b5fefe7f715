use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use tracing::debug;

use super::signer::RequestSigner;
use crate::error::{Result, SignerError};
use crate::keys::{PrivateKeyMaterial, PublicKeyMaterial, load_private_key, load_public_key};

/// RSA PKCS#1 v1.5 signer with SHA-256 digest.
///
/// Signatures are the standard padded base64 encoding of the raw signature,
/// as long as the key modulus.
pub struct RsaSigner {
    api_key_id: String,
    signing_key: SigningKey<Sha256>,
    verifying_key: VerifyingKey<Sha256>,
    modulus_bits: usize,
}

impl RsaSigner {
    pub fn new(
        api_key_id: impl Into<String>,
        private_key: RsaPrivateKey,
        public_key: RsaPublicKey,
    ) -> Self {
        let modulus_bits = public_key.size() * 8;
        Self {
            api_key_id: api_key_id.into(),
            signing_key: SigningKey::<Sha256>::new(private_key),
            verifying_key: VerifyingKey::<Sha256>::new(public_key),
            modulus_bits,
        }
    }

    /// Builds a signer from PEM keys in either PKCS#8/SPKI or PKCS#1 form.
    pub fn from_pem(
        api_key_id: impl Into<String>,
        public_key_pem: &str,
        private_key_pem: &str,
    ) -> Result<Self> {
        let private_key = match load_private_key(private_key_pem)? {
            PrivateKeyMaterial::Rsa(key) => key,
            other => return Err(wrong_algorithm("private", other.algorithm())),
        };
        let public_key = match load_public_key(public_key_pem)? {
            PublicKeyMaterial::Rsa(key) => key,
            other => return Err(wrong_algorithm("public", other.algorithm())),
        };
        Ok(Self::new(api_key_id, private_key, public_key))
    }
}

fn wrong_algorithm(kind: &str, found: &str) -> SignerError {
    SignerError::KeyFormat(format!("not an RSA {kind} key (found {found})"))
}

impl RequestSigner for RsaSigner {
    fn create_signature(&self, message: &str) -> Result<String> {
        let signature = self
            .signing_key
            .try_sign(message.as_bytes())
            .map_err(|e| SignerError::Signing(format!("RSA PKCS#1 v1.5 signing failed: {e}")))?;
        Ok(STANDARD.encode(signature.to_bytes()))
    }

    fn validate_signature(&self, message: &str, signature: &str) -> bool {
        let Ok(bytes) = STANDARD.decode(signature) else {
            debug!("RSA signature is not valid base64");
            return false;
        };
        let Ok(signature) = Signature::try_from(bytes.as_slice()) else {
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
        "rsa-pkcs1v15-sha256"
    }
}

impl fmt::Debug for RsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigner")
            .field("api_key_id", &self.api_key_id)
            .field("modulus_bits", &self.modulus_bits)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC_KEY: &str = include_str!("../../tests/fixtures/rsa-pub-key.pem");
    const PRIVATE_KEY: &str = include_str!("../../tests/fixtures/rsa-prv-key.pem");
    const MESSAGE: &str = "timestamp=1610612740000";
    const EXPECTED: &str = "mEBDK0Ip4YIcvjMIEC2xEQ+1wNL4zdB4Qg8JM/KtR7gKvDzRNxhF/2UKVTyxEFfdmmk9bga+CHe5jotGsZUCKkMd2McFcDDNAmgjPWidvqzFImmb0m6mTIOwu4EaQYng4mR+EzRoiue3S/txy4iQIdkL/8W9995TVrBpysj46SCf1KeeBbYrRBPJTPBHCBqbApeMqDbBv0PBsvBMulJxwbZclVIX9OD457iQd07iFaMmKZ3WD+8AhQOqmDD0ecXTba//q2khyWMFXeIbXIoNUij2bN/GaMJO9wwdk2EUMqY3N/cVsyB/JmTVmbqmT98zH9ZSgQrnxB/RfUTUUwsS4A==";

    fn test_signer() -> RsaSigner {
        RsaSigner::from_pem("apy_key", PUBLIC_KEY, PRIVATE_KEY).unwrap()
    }

    #[test]
    fn known_answer() {
        assert_eq!(test_signer().create_signature(MESSAGE).unwrap(), EXPECTED);
    }

    #[test]
    fn signature_is_256_bytes() {
        let sig = test_signer().create_signature("data").unwrap();
        assert_eq!(STANDARD.decode(sig).unwrap().len(), 256);
    }

    #[test]
    fn signature_verifies() {
        let signer = test_signer();
        let sig = signer.create_signature(MESSAGE).unwrap();
        assert!(signer.validate_signature(MESSAGE, &sig));
    }

    #[test]
    fn malformed_signatures_are_rejected() {
        let signer = test_signer();
        assert!(!signer.validate_signature(MESSAGE, "wrong_signature"));
        assert!(!signer.validate_signature(MESSAGE, &STANDARD.encode([0u8; 256])));
        assert!(!signer.validate_signature("timestamp=1610612740001", EXPECTED));
    }

    #[test]
    fn undersized_key_is_a_signing_error() {
        // 256-bit modulus: too short for a SHA-256 DigestInfo block.
        let uint = |h: &str| rsa::BigUint::from_bytes_be(&hex::decode(h).unwrap());
        let private_key = RsaPrivateKey::from_components(
            uint("90f0a30cc9138faf04215d58a6f0aadc22b80bb4d8c866e26102659af191f36b"),
            uint("010001"),
            uint("584270c7845a6910864f5aec751bf0ae98a3aa103e73cccbecacd5bc58209401"),
            vec![
                uint("ae658f33fe3b890b93f448b3a5aa3c81"),
                uint("d4c28c2e7c26847f0316909e3bbbe9eb"),
            ],
        )
        .unwrap();
        let public_key = private_key.to_public_key();
        let signer = RsaSigner::new("apy_key", private_key, public_key);

        assert!(matches!(
            signer.create_signature(MESSAGE),
            Err(SignerError::Signing(_))
        ));
        assert!(signer.sign_parameters(&crate::ParameterMap::new()).is_err());
    }

    #[test]
    fn algorithm_is_rsa_pkcs1v15_sha256() {
        assert_eq!(test_signer().algorithm(), "rsa-pkcs1v15-sha256");
    }

    #[test]
    fn debug_reports_modulus_size() {
        assert!(format!("{:?}", test_signer()).contains("modulus_bits: 2048"));
    }
}
