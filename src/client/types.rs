// src/client/types.rs
// Wire types for the VCT log REST API (RFC 6962 shaped JSON)

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Signed tree head (`get-sth`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTreeHead {
    pub tree_size: u64,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    #[serde(with = "base64_bytes")]
    pub sha256_root_hash: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub tree_head_signature: Vec<u8>,
}

impl SignedTreeHead {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.timestamp).ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

/// Receipt returned by `add-vc`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddVcResponse {
    pub svct_version: u8,
    #[serde(with = "base64_bytes")]
    pub id: Vec<u8>,
    pub timestamp: u64,
    #[serde(default)]
    pub extensions: String,
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
}

/// `get-sth-consistency`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyProof {
    #[serde(default, with = "base64_vec")]
    pub consistency: Vec<Vec<u8>>,
}

/// `get-proof-by-hash`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditProof {
    pub leaf_index: u64,
    #[serde(default, with = "base64_vec")]
    pub audit_path: Vec<Vec<u8>>,
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafEntry {
    #[serde(with = "base64_bytes")]
    pub leaf_input: Vec<u8>,
    #[serde(default, with = "base64_bytes")]
    pub extra_data: Vec<u8>,
}

/// `get-entries`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetEntriesResponse {
    #[serde(default)]
    pub entries: Vec<LeafEntry>,
}

/// Standard base64 (padded) for a byte field
pub mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        STANDARD.decode(encoded.as_bytes()).map_err(D::Error::custom)
    }
}

/// Standard base64 for a list of hashes; `null` reads as empty
pub mod base64_vec {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de::Error, ser::SerializeSeq};

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&STANDARD.encode(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        let encoded = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
        encoded
            .iter()
            .map(|s| STANDARD.decode(s.as_bytes()).map_err(D::Error::custom))
            .collect()
    }
}
