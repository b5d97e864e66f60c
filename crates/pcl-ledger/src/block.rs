use chrono::{DateTime, Utc};
use pcl_crypto::{ChainLink, HashChainVerifier};
use pcl_types::digest::link_to_string;
use pcl_types::{Digest, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload wrapper; puts the record at `data.product` on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    pub product: Record,
}

/// One chained record plus its linkage metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the ledger.
    pub index: u64,
    /// Creation time, RFC 3339 on the wire.
    pub timestamp: DateTime<Utc>,
    pub data: BlockData,
    /// Digest of the preceding block; `None` (wire `"0"`) for the first block.
    #[serde(
        rename = "previousHash",
        alias = "previousDigest",
        with = "pcl_types::digest::link"
    )]
    pub previous_digest: Option<Digest>,
    #[serde(rename = "hash", alias = "digest")]
    pub digest: Digest,
}

impl Block {
    pub fn record(&self) -> &Record {
        &self.data.product
    }

    /// Recompute the digest from the stored record and link.
    pub fn expected_digest(&self) -> Digest {
        compute_digest(self.record(), self.previous_digest.as_ref())
    }
}

impl ChainLink for Block {
    fn index(&self) -> u64 {
        self.index
    }

    fn digest(&self) -> Digest {
        self.digest
    }

    fn previous_digest(&self) -> Option<Digest> {
        self.previous_digest
    }

    fn payload_bytes(&self) -> Vec<u8> {
        canonical_bytes(self.record(), self.previous_digest.as_ref())
    }
}

/// Canonical hash input for a record and its link.
///
/// Compact JSON of `{"previousHash": <"0" | hex>, "product": <record>}` with
/// object keys in ascending byte order. Integers print in decimal and floats
/// in shortest round-trip form. This encoding is frozen: changing it
/// invalidates every stored digest.
pub fn canonical_bytes(record: &Record, previous: Option<&Digest>) -> Vec<u8> {
    let mut object = Map::new();
    object.insert("previousHash".into(), Value::from(link_to_string(previous)));
    object.insert("product".into(), record.to_canonical_json());
    Value::Object(object).to_string().into_bytes()
}

pub fn compute_digest(record: &Record, previous: Option<&Digest>) -> Digest {
    HashChainVerifier::compute_digest(&canonical_bytes(record, previous))
}
