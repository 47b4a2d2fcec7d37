use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PassConfig;
use crate::payload::PassPayload;
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper};

pub const SIGN_PATH: &str = "/sign-pass";
pub const HEALTH_PATH: &str = "/health";

/// Everything that can go wrong between a payload and a signed pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("The signer URL is invalid: {0}")]
    InvalidUrl(String),
    #[error("Could not reach the signer service: {0}")]
    Network(String),
    #[error("Signer error ({code}): {message}")]
    Server { code: String, message: String },
    #[error("The signer returned an unexpected response.")]
    InvalidResponse,
    #[error("The signer returned an invalid pass file.")]
    InvalidPass,
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Connection error: {0}")]
    Connection(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub name: String,
    pub data: String,
}

/// Body of `POST /sign-pass`. Everything binary is standard base64.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SignRequest {
    #[serde(rename = "passJson")]
    pub pass_json: String,
    pub files: Vec<FilePayload>,
}

impl SignRequest {
    pub fn from_payload(payload: &PassPayload) -> Self {
        Self {
            pass_json: general_purpose::STANDARD.encode(&payload.pass_json),
            files: payload
                .files
                .iter()
                .map(|(name, data)| FilePayload {
                    name: name.clone(),
                    data: general_purpose::STANDARD.encode(data),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Deserialize)]
struct ServerErrorBody {
    code: String,
    message: String,
}

// FastAPI-style signers nest the error under "detail"
#[derive(Deserialize)]
#[serde(untagged)]
enum ServerErrorEnvelope {
    Flat(ServerErrorBody),
    Detail { detail: ServerErrorBody },
}

/// Status and body of an HTTP exchange, whatever the status was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// The HTTP leg of the protocol. `Err` means no response was obtained at all.
#[async_trait]
pub trait SignerTransport: Send + Sync {
    async fn post_json(
        &self,
        url: Url,
        request: &SignRequest,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError>;

    async fn get(&self, url: Url, timeout: Duration) -> Result<HttpReply, TransportError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SignerTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: Url,
        request: &SignRequest,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpReply { status, body })
    }

    async fn get(&self, url: Url, timeout: Duration) -> Result<HttpReply, TransportError> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpReply { status, body })
    }
}

/// Map a `/sign-pass` reply onto signed bytes or a typed error.
pub fn classify_sign_reply(reply: HttpReply) -> Result<Vec<u8>, SigningError> {
    match reply.status {
        200..=299 => Ok(reply.body),
        400.. => match serde_json::from_slice::<ServerErrorEnvelope>(&reply.body) {
            Ok(ServerErrorEnvelope::Flat(e)) | Ok(ServerErrorEnvelope::Detail { detail: e }) => {
                Err(SigningError::Server {
                    code: e.code,
                    message: e.message,
                })
            }
            Err(_) => Err(SigningError::InvalidResponse),
        },
        _ => Err(SigningError::InvalidResponse),
    }
}

/// Client for the remote pass signer.
///
/// Holds no per-call state; one instance can serve concurrent `sign` calls.
#[derive(Clone)]
pub struct SigningClient {
    config: PassConfig,
    policy: RetryPolicy,
    transport: Arc<dyn SignerTransport>,
    sleeper: Arc<dyn Sleeper>,
}

impl SigningClient {
    pub fn new(config: PassConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::default()))
    }

    pub fn with_transport(config: PassConfig, transport: Arc<dyn SignerTransport>) -> Self {
        Self {
            config,
            policy: RetryPolicy::default(),
            transport,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn config(&self) -> &PassConfig {
        &self.config
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send the payload to the signer and return the signed bundle bytes.
    ///
    /// Transport failures, non-2xx statuses and undecodable replies are retried
    /// up to the policy's attempt budget; the last error is returned unchanged.
    /// An unusable base URL fails before any request is made.
    pub async fn sign(&self, payload: &PassPayload) -> Result<Vec<u8>, SigningError> {
        let url = self.config.endpoint(SIGN_PATH)?;
        let request = SignRequest::from_payload(payload);
        let max_attempts = self.policy.attempts();

        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(attempt, %url, files = request.files.len(), "sending signing request");

            let error = match self.try_sign(&url, &request).await {
                Ok(signed) => {
                    info!(attempt, bytes = signed.len(), "pass signed");
                    return Ok(signed);
                }
                Err(e) => e,
            };
            warn!(attempt, max_attempts, error = %error, "signing attempt failed");

            if attempt >= max_attempts {
                if self.policy.sleep_after_final {
                    self.sleeper.sleep(self.policy.delay_for(attempt)).await;
                }
                return Err(error);
            }
            self.sleeper.sleep(self.policy.delay_for(attempt)).await;
        }
    }

    async fn try_sign(&self, url: &Url, request: &SignRequest) -> Result<Vec<u8>, SigningError> {
        let reply = self
            .transport
            .post_json(url.clone(), request, self.policy.attempt_timeout)
            .await
            .map_err(|e| SigningError::Network(e.to_string()))?;
        classify_sign_reply(reply)
    }

    /// Probe `GET /health` once.
    pub async fn health_check(&self) -> Result<HealthStatus, SigningError> {
        let url = self.config.endpoint(HEALTH_PATH)?;
        debug!(%url, "probing signer health");

        let reply = self
            .transport
            .get(url, self.policy.attempt_timeout)
            .await
            .map_err(|e| SigningError::Network(e.to_string()))?;
        if reply.status >= 400 {
            return Err(SigningError::InvalidResponse);
        }
        serde_json::from_slice(&reply.body).map_err(|_| SigningError::InvalidResponse)
    }
}
