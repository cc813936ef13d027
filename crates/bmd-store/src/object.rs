use bmd_crypto::inventory_hash;
use bmd_types::{ObjectHash, ObjectType};
use bmd_wire::ObjectHeader;
use chrono::{DateTime, Utc};

use crate::error::StoreResult;

/// A stored object: raw bytes plus the header fields the indices need.
///
/// `StoredObject` is the unit of storage. It is immutable once built; only
/// its membership in the indices changes. The raw bytes are an owned copy, so
/// the caller's buffer is never aliased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub hash: ObjectHash,
    pub object_type: ObjectType,
    pub version: u64,
    pub stream: u64,
    pub expires_at: DateTime<Utc>,
    pub data: Vec<u8>,
}

impl StoredObject {
    /// Decode just enough of `data` to classify it, and hash it.
    pub fn decode(data: &[u8]) -> StoreResult<Self> {
        let (header, _) = ObjectHeader::decode(data)?;
        Ok(Self {
            hash: inventory_hash(data),
            object_type: header.object_type,
            version: header.version,
            stream: header.stream,
            expires_at: header.expires_at,
            data: data.to_vec(),
        })
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}
