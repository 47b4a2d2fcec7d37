use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the pass barcode encodes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(tag = "kind", content = "url", rename_all = "camelCase")]
pub enum BarcodePayload {
    /// A vCard built from the record's own fields.
    #[default]
    StructuredContact,
    /// An arbitrary URL, passed through unvalidated.
    CustomUrl(String),
}

impl BarcodePayload {
    /// Map the persisted raw kind (`"vCard"` / `"url"`) back to a payload.
    /// Unknown kinds fall back to a structured contact.
    pub fn from_stored(raw_kind: &str, custom_url: &str) -> Self {
        match raw_kind {
            "url" => BarcodePayload::CustomUrl(custom_url.to_string()),
            _ => BarcodePayload::StructuredContact,
        }
    }

    /// Raw kind string as the storage layer persists it.
    pub fn stored_kind(&self) -> &'static str {
        match self {
            BarcodePayload::StructuredContact => "vCard",
            BarcodePayload::CustomUrl(_) => "url",
        }
    }
}

/// A business card as entered by the user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContactRecord {
    pub id: Uuid,
    pub full_name: String,
    pub company: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub subtitle: String, // shown on the back of the pass
    pub is_primary: bool, // uniqueness across records is the store's job
    pub barcode: BarcodePayload,
}

impl ContactRecord {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Self::default()
        }
    }
}

impl Default for ContactRecord {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: String::new(),
            company: String::new(),
            title: String::new(),
            email: String::new(),
            phone: String::new(),
            website: String::new(),
            subtitle: String::new(),
            is_primary: false,
            barcode: BarcodePayload::StructuredContact,
        }
    }
}
