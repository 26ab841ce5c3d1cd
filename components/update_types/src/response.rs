use crate::ByteSize;
use serde::{Deserialize, Serialize};

/// Parsed update check response, as produced by the check stage
///
/// Fields the server omitted deserialize to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmahaResponse {
    pub update_exists: bool,
    pub version: String,
    pub size: ByteSize,
    pub hash: String,
    pub metadata_size: ByteSize,
    pub metadata_signature: String,
    /// Empty when the response carries no signing key
    pub public_key_rsa: String,
    pub payload_urls: Vec<String>,
    pub is_delta_payload: bool,
    /// Opaque deadline data, passed through byte for byte
    #[serde(with = "deadline_text")]
    pub deadline: Vec<u8>,
}

impl OmahaResponse {
    pub fn has_public_key(&self) -> bool {
        !self.public_key_rsa.is_empty()
    }
}

/// Deadline is carried as text in JSON, or as a byte array when it is not
/// valid UTF-8
mod deadline_text {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Deadline {
        Text(String),
        Bytes(Vec<u8>),
    }

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(bytes) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => serializer.collect_seq(bytes),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        Ok(match Deadline::deserialize(deserializer)? {
            Deadline::Text(text) => text.into_bytes(),
            Deadline::Bytes(bytes) => bytes,
        })
    }
}
