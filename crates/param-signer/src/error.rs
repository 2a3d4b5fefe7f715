use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("Invalid key format: {0}")]
    KeyFormat(String),
    #[error("Failed to read key file {}: {source}", .path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode request parameters: {0}")]
    Encoding(String),
    #[error("Failed to create signature: {0}")]
    Signing(String),
}

pub type Result<T> = std::result::Result<T, SignerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn key_format_message_includes_reason() {
        let error = SignerError::KeyFormat("unexpected PEM label `PUBLIC KEY`".into());
        assert_eq!(
            error.to_string(),
            "Invalid key format: unexpected PEM label `PUBLIC KEY`"
        );
    }

    #[test]
    fn key_read_exposes_io_source() {
        let error = SignerError::KeyRead {
            path: PathBuf::from("/missing/key.pem"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(error.to_string().contains("/missing/key.pem"));
        assert!(error.source().is_some());
    }

    #[test]
    fn signing_error_has_no_source() {
        let error = SignerError::Signing("message too long".into());
        assert!(error.source().is_none());
    }
}
