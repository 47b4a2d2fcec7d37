//! The `pass.json` descriptor for a generic pass.

use serde::{Deserialize, Serialize};

use crate::config::PassConfig;
use crate::models::{BarcodePayload, ContactRecord};
use crate::vcard;

pub const FORMAT_VERSION: u32 = 1;
pub const BARCODE_FORMAT: &str = "PKBarcodeFormatQR";
pub const BARCODE_ENCODING: &str = "iso-8859-1";

pub const BACKGROUND_COLOR: &str = "rgb(28,28,30)";
pub const FOREGROUND_COLOR: &str = "rgb(255,255,255)";
pub const LABEL_COLOR: &str = "rgb(174,174,178)";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Barcode {
    pub format: String,
    pub message: String,
    pub message_encoding: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub label: String,
    pub value: String,
}

impl Field {
    fn new(key: &str, label: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Generic {
    pub primary_fields: Vec<Field>,
    pub secondary_fields: Vec<Field>,
    pub auxiliary_fields: Vec<Field>,
    pub back_fields: Vec<Field>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PassDescriptor {
    pub format_version: u32,
    pub serial_number: String,
    pub pass_type_identifier: String,
    pub team_identifier: String,
    pub organization_name: String,
    pub description: String,
    pub background_color: String,
    pub foreground_color: String,
    pub label_color: String,
    pub barcode: Barcode,
    pub barcodes: Vec<Barcode>,
    pub generic: Generic,
}

/// The text the QR code carries for this card.
pub fn barcode_message(card: &ContactRecord) -> String {
    match &card.barcode {
        BarcodePayload::StructuredContact => vcard::build(card),
        BarcodePayload::CustomUrl(url) => url.clone(),
    }
}

fn non_empty(fields: Vec<Field>) -> Vec<Field> {
    fields.into_iter().filter(|f| !f.value.is_empty()).collect()
}

impl PassDescriptor {
    pub fn build(card: &ContactRecord, config: &PassConfig) -> Self {
        let barcode = Barcode {
            format: BARCODE_FORMAT.to_string(),
            message: barcode_message(card),
            message_encoding: BARCODE_ENCODING.to_string(),
        };

        let generic = Generic {
            // Always present, even for a blank name
            primary_fields: vec![Field::new("name", "NAME", &card.full_name)],
            secondary_fields: non_empty(vec![
                Field::new("company", "COMPANY", &card.company),
                Field::new("title", "TITLE", &card.title),
            ]),
            auxiliary_fields: non_empty(vec![
                Field::new("email", "EMAIL", &card.email),
                Field::new("phone", "PHONE", &card.phone),
                Field::new("website", "WEB", &card.website),
            ]),
            back_fields: non_empty(vec![Field::new("note", "NOTE", &card.subtitle)]),
        };

        Self {
            format_version: FORMAT_VERSION,
            serial_number: format!("{:X}", card.id.hyphenated()),
            pass_type_identifier: config.pass_type_identifier.clone(),
            team_identifier: config.team_identifier.clone(),
            organization_name: config.organization_name.clone(),
            description: config.pass_description.clone(),
            background_color: BACKGROUND_COLOR.to_string(),
            foreground_color: FOREGROUND_COLOR.to_string(),
            label_color: LABEL_COLOR.to_string(),
            barcodes: vec![barcode.clone()],
            barcode,
            generic,
        }
    }
}
