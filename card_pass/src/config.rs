use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::network::SigningError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Signer address and pass identity. Supplied by the caller, never mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    #[serde(rename = "signerBaseURL")]
    pub signer_base_url: String,
    #[serde(rename = "passTypeIdentifier")]
    pub pass_type_identifier: String,
    #[serde(rename = "teamIdentifier")]
    pub team_identifier: String,
    #[serde(rename = "organizationName")]
    pub organization_name: String,
    #[serde(rename = "passDescription")]
    pub pass_description: String,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            signer_base_url: "http://192.168.1.2:8080".to_string(),
            pass_type_identifier: "pass.com.example.businesscard".to_string(),
            team_identifier: "TEAMID1234".to_string(),
            organization_name: "Example Org".to_string(),
            pass_description: "Business Card".to_string(),
        }
    }
}

impl PassConfig {
    /// Parse a settings document. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve `path` against the signer base address.
    ///
    /// The joined string must parse as an absolute URL with a host.
    pub fn endpoint(&self, path: &str) -> Result<Url, SigningError> {
        let raw = format!("{}{}", self.signer_base_url.trim_end_matches('/'), path);
        let url = Url::parse(&raw).map_err(|_| SigningError::InvalidUrl(raw.clone()))?;
        if !url.has_host() {
            return Err(SigningError::InvalidUrl(raw));
        }
        Ok(url)
    }
}
