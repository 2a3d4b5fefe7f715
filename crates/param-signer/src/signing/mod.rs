mod signer;
mod params;
mod hmac;
mod ed25519;
mod rsa;

pub use signer::{RequestSigner, SIGNATURE_FIELD};
pub use params::{sign_parameters, validate_signature_params};
pub use self::hmac::HmacSigner;
pub use ed25519::Ed25519Signer;
pub use self::rsa::RsaSigner;
