use thiserror::Error;
use tracing::{info, warn};

use crate::models::ContactRecord;
use crate::network::{SigningClient, SigningError};
use crate::payload::{self, PassPayload, PayloadError};

#[derive(Error, Debug)]
pub enum IssueError {
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Signing(#[from] SigningError),
}

/// Structural check on the bytes the signer sends back.
pub trait PassValidator: Send + Sync {
    fn validate(&self, signed: &[u8]) -> bool;
}

/// Accepts anything that starts like a ZIP archive, the container of a
/// signed pass bundle.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveCheck;

impl PassValidator for ZipArchiveCheck {
    fn validate(&self, signed: &[u8]) -> bool {
        signed.starts_with(b"PK\x03\x04")
    }
}

/// Card in, signed pass out.
pub struct PassIssuer<V: PassValidator = ZipArchiveCheck> {
    client: SigningClient,
    validator: V,
}

impl PassIssuer<ZipArchiveCheck> {
    pub fn with_default_validator(client: SigningClient) -> Self {
        Self::new(client, ZipArchiveCheck)
    }
}

impl<V: PassValidator> PassIssuer<V> {
    pub fn new(client: SigningClient, validator: V) -> Self {
        Self { client, validator }
    }

    pub fn build_payload(&self, card: &ContactRecord) -> Result<PassPayload, IssueError> {
        Ok(payload::build_payload(card, self.client.config())?)
    }

    /// Build, sign and validate a pass for `card`.
    pub async fn issue(&self, card: &ContactRecord) -> Result<Vec<u8>, IssueError> {
        let payload = self.build_payload(card)?;
        let signed = self.client.sign(&payload).await?;

        if !self.validator.validate(&signed) {
            warn!(serial = %card.id, bytes = signed.len(), "signer returned an unreadable pass");
            return Err(SigningError::InvalidPass.into());
        }
        info!(serial = %card.id, fingerprint = %payload.fingerprint(), "pass issued");
        Ok(signed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PassConfig;

    #[test]
    fn test_zip_archive_check() {
        assert!(ZipArchiveCheck.validate(b"PK\x03\x04rest-of-archive"));
        assert!(!ZipArchiveCheck.validate(b"<html>oops</html>"));
        assert!(!ZipArchiveCheck.validate(b""));
    }

    #[test]
    fn test_build_payload_has_full_file_set() {
        let issuer = PassIssuer::with_default_validator(SigningClient::new(PassConfig::default()));
        let payload = issuer.build_payload(&ContactRecord::new("Alex")).unwrap();
        assert_eq!(payload.files.len(), 4);
        assert!(payload.files.values().all(|data| !data.is_empty()));
    }
}
