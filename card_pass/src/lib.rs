//! Wallet passes for business cards.
//!
//! Turns a [`ContactRecord`] into an unsigned pass bundle and gets it signed:
//! - vCard encoding of the card and a QR code thumbnail
//! - a deterministic `pass.json` descriptor (sorted keys, fixed field order)
//! - branding icons at three densities
//! - transport to a remote signer with bounded retries
//!
//! Configuration is always passed in explicitly as a [`PassConfig`].

pub mod config;
pub mod icon;
pub mod issuer;
pub mod models;
pub mod network;
pub mod pass;
pub mod payload;
pub mod qr;
pub mod retry;
pub mod vcard;

pub use config::{ConfigError, PassConfig};
pub use issuer::{IssueError, PassIssuer, PassValidator, ZipArchiveCheck};
pub use models::{BarcodePayload, ContactRecord};
pub use network::{
    HealthStatus, HttpReply, ReqwestTransport, SignRequest, SignerTransport, SigningClient,
    SigningError, TransportError,
};
pub use pass::PassDescriptor;
pub use payload::{build_payload, IconSet, PassPayload, PayloadError};
pub use qr::RenderError;
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
