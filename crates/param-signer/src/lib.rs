pub mod encoding;
pub mod error;
pub mod keys;
pub mod signing;

pub use encoding::{ParameterMap, encode_parameters};
pub use error::{Result, SignerError};
pub use keys::{PrivateKeyMaterial, PublicKeyMaterial, load_private_key, load_public_key};
pub use signing::{Ed25519Signer, HmacSigner, RequestSigner, RsaSigner, SIGNATURE_FIELD};
