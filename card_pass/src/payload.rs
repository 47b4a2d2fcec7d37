use std::collections::BTreeMap;

use sha1::Sha1;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::PassConfig;
use crate::icon::{self, ICON_SIZES};
use crate::models::ContactRecord;
use crate::pass::PassDescriptor;
use crate::qr::{self, RenderError, DEFAULT_QR_SIZE};

pub const PASS_JSON: &str = "pass.json";
pub const ICON: &str = "icon.png";
pub const ICON_2X: &str = "icon@2x.png";
pub const ICON_3X: &str = "icon@3x.png";
pub const THUMBNAIL: &str = "thumbnail.png";

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// PNG icons at the three display densities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    pub standard: Vec<u8>,
    pub double: Vec<u8>,
    pub triple: Vec<u8>,
}

impl IconSet {
    pub fn render() -> Self {
        let [standard, double, triple] = ICON_SIZES.map(icon::circle_icon_png);
        Self {
            standard,
            double,
            triple,
        }
    }
}

/// Unsigned pass bundle: descriptor bytes plus named asset files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassPayload {
    pub pass_json: Vec<u8>,
    pub files: BTreeMap<String, Vec<u8>>,
}

/// Serialize a descriptor as pretty JSON with keys sorted at every level.
pub fn canonical_json(descriptor: &PassDescriptor) -> Result<Vec<u8>, PayloadError> {
    // serde_json::Map is ordered by key, so the round trip sorts every object
    let value = serde_json::to_value(descriptor)?;
    Ok(serde_json::to_vec_pretty(&value)?)
}

impl PassPayload {
    pub fn assemble(
        descriptor: &PassDescriptor,
        barcode_png: Vec<u8>,
        icons: IconSet,
    ) -> Result<Self, PayloadError> {
        let pass_json = canonical_json(descriptor)?;

        let files = BTreeMap::from([
            (ICON.to_string(), icons.standard),
            (ICON_2X.to_string(), icons.double),
            (ICON_3X.to_string(), icons.triple),
            (THUMBNAIL.to_string(), barcode_png),
        ]);

        Ok(Self { pass_json, files })
    }

    /// SHA-1 of every bundle file keyed by name, as it appears in `manifest.json`.
    pub fn manifest(&self) -> BTreeMap<String, String> {
        let mut manifest = BTreeMap::new();
        manifest.insert(PASS_JSON.to_string(), hex::encode(Sha1::digest(&self.pass_json)));
        for (name, data) in &self.files {
            manifest.insert(name.clone(), hex::encode(Sha1::digest(data)));
        }
        manifest
    }

    /// Content hash over the descriptor and all files, for deduplication.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.pass_json.len() as u64).to_le_bytes());
        hasher.update(&self.pass_json);
        for (name, data) in &self.files {
            hasher.update((name.len() as u64).to_le_bytes());
            hasher.update(name.as_bytes());
            hasher.update((data.len() as u64).to_le_bytes());
            hasher.update(data);
        }
        hex::encode(hasher.finalize())
    }
}

/// Build the complete unsigned payload for a card.
pub fn build_payload(card: &ContactRecord, config: &PassConfig) -> Result<PassPayload, PayloadError> {
    let descriptor = PassDescriptor::build(card, config);
    let barcode_png = qr::generate_png(&descriptor.barcode.message, DEFAULT_QR_SIZE)?;
    PassPayload::assemble(&descriptor, barcode_png, IconSet::render())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_with(pass_json: &[u8], files: &[(&str, &[u8])]) -> PassPayload {
        PassPayload {
            pass_json: pass_json.to_vec(),
            files: files
                .iter()
                .map(|(name, data)| (name.to_string(), data.to_vec()))
                .collect(),
        }
    }

    #[test]
    fn test_manifest_sha1_generation() {
        let payload = payload_with(b"{}", &[("icon.png", &b"icon"[..])]);
        let manifest = payload.manifest();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest["pass.json"], "bf21a9e8fbc5a3846fb05b4fa0859e0917b2202f");
        assert_eq!(manifest["icon.png"], "f8995ba5891b07e328c60d6bd6c10159878c5a13");
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = payload_with(b"{}", &[("icon.png", &b"icon"[..])]);
        let b = payload_with(b"{}", &[("icon.png", &b"icon"[..])]);
        let c = payload_with(b"{}", &[("icon.png", &b"icon2"[..])]);
        // Moving a byte across the name/data boundary must change the hash
        let d = payload_with(b"{}", &[("icon.pngi", &b"con"[..])]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_ne!(a.fingerprint(), d.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_assemble_file_set() {
        let card = ContactRecord::new("Alex");
        let descriptor = PassDescriptor::build(&card, &PassConfig::default());
        let icons = IconSet::render();
        let payload = PassPayload::assemble(&descriptor, b"qr".to_vec(), icons.clone()).unwrap();

        let names: Vec<&str> = payload.files.keys().map(String::as_str).collect();
        assert_eq!(names, ["icon.png", "icon@2x.png", "icon@3x.png", "thumbnail.png"]);
        assert_eq!(payload.files[THUMBNAIL], b"qr");
        assert_eq!(payload.files[ICON_3X], icons.triple);
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let card = ContactRecord::new("Alex");
        let descriptor = PassDescriptor::build(&card, &PassConfig::default());
        let json = String::from_utf8(canonical_json(&descriptor).unwrap()).unwrap();

        let top_level: Vec<&str> = json
            .lines()
            .filter(|l| l.starts_with("  \"") && !l.starts_with("   "))
            .map(|l| l.trim().split('"').nth(1).unwrap())
            .collect();
        let mut sorted = top_level.clone();
        sorted.sort();
        assert_eq!(top_level, sorted);
        assert!(top_level.contains(&"formatVersion"));
        // Pretty printed
        assert!(json.contains("\n  \"barcode\": {\n"));
    }
}
