//! PEM key loading for the asymmetric signers.
//!
//! Private keys are accepted as PKCS#8 (`PRIVATE KEY`, Ed25519 or RSA) or
//! PKCS#1 (`RSA PRIVATE KEY`). Public keys are accepted as SPKI
//! (`PUBLIC KEY`, Ed25519 or RSA) or PKCS#1 (`RSA PUBLIC KEY`).

use std::fmt;
use std::path::Path;

use ed25519_dalek::pkcs8::{DecodePrivateKey, DecodePublicKey};
use ed25519_dalek::{SigningKey, VerifyingKey};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey as _, DecodePublicKey as _};
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::warn;

use crate::error::{Result, SignerError};

const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";
const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
const RSA_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";

/// A parsed private key.
pub enum PrivateKeyMaterial {
    Ed25519(SigningKey),
    Rsa(RsaPrivateKey),
}

impl PrivateKeyMaterial {
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Ed25519(_) => "ed25519",
            Self::Rsa(_) => "rsa",
        }
    }
}

impl fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKeyMaterial")
            .field(&self.algorithm())
            .finish()
    }
}

/// A parsed public key.
#[derive(Debug)]
pub enum PublicKeyMaterial {
    Ed25519(VerifyingKey),
    Rsa(RsaPublicKey),
}

impl PublicKeyMaterial {
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Ed25519(_) => "ed25519",
            Self::Rsa(_) => "rsa",
        }
    }
}

/// Label of the first PEM block in `pem` (e.g. `PRIVATE KEY`).
pub fn pem_label(pem: &str) -> Result<&str> {
    pem.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("-----BEGIN ")?.strip_suffix("-----"))
        .ok_or_else(|| SignerError::KeyFormat("failed to decode PEM block".into()))
}

pub fn load_private_key(pem: &str) -> Result<PrivateKeyMaterial> {
    let pem = pem.trim();
    match pem_label(pem)? {
        PRIVATE_KEY_LABEL => {
            if let Ok(key) = SigningKey::from_pkcs8_pem(pem) {
                return Ok(PrivateKeyMaterial::Ed25519(key));
            }
            RsaPrivateKey::from_pkcs8_pem(pem)
                .map(PrivateKeyMaterial::Rsa)
                .map_err(|e| {
                    SignerError::KeyFormat(format!(
                        "not an Ed25519 or RSA PKCS#8 private key: {e}"
                    ))
                })
        }
        RSA_PRIVATE_KEY_LABEL => RsaPrivateKey::from_pkcs1_pem(pem)
            .map(PrivateKeyMaterial::Rsa)
            .map_err(|e| SignerError::KeyFormat(format!("invalid PKCS#1 RSA private key: {e}"))),
        other => Err(unexpected_label("private", other)),
    }
}

pub fn load_public_key(pem: &str) -> Result<PublicKeyMaterial> {
    let pem = pem.trim();
    match pem_label(pem)? {
        PUBLIC_KEY_LABEL => {
            if let Ok(key) = VerifyingKey::from_public_key_pem(pem) {
                return Ok(PublicKeyMaterial::Ed25519(key));
            }
            RsaPublicKey::from_public_key_pem(pem)
                .map(PublicKeyMaterial::Rsa)
                .map_err(|e| {
                    SignerError::KeyFormat(format!("not an Ed25519 or RSA public key: {e}"))
                })
        }
        RSA_PUBLIC_KEY_LABEL => RsaPublicKey::from_pkcs1_pem(pem)
            .map(PublicKeyMaterial::Rsa)
            .map_err(|e| SignerError::KeyFormat(format!("invalid PKCS#1 RSA public key: {e}"))),
        other => Err(unexpected_label("public", other)),
    }
}

/// Reads a PEM file into memory.
pub fn read_pem_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| SignerError::KeyRead {
        path: path.to_path_buf(),
        source,
    })
}

fn unexpected_label(kind: &str, label: &str) -> SignerError {
    warn!(label, "rejected PEM block, expected a {kind} key");
    SignerError::KeyFormat(format!(
        "failed to decode PEM block containing {kind} key: unexpected label `{label}`"
    ))
}
