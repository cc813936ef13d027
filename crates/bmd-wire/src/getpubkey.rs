use bmd_types::{ObjectType, Tag};
use chrono::{DateTime, Utc};

use crate::error::{WireError, WireResult};
use crate::header::ObjectHeader;
use crate::varint::read_array;

pub const RIPE_SIZE: usize = 20;

/// Decoded payload of a `getpubkey` request.
///
/// Requests for version 2 and 3 addresses name the address RIPE hash directly;
/// version 4 requests carry only the tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GetPubKeyObject {
    Ripe([u8; RIPE_SIZE]),
    Tag(Tag),
}

impl GetPubKeyObject {
    pub fn decode(data: &[u8]) -> WireResult<(ObjectHeader, Self)> {
        let (header, consumed) = ObjectHeader::decode(data)?;
        header.expect_type(ObjectType::GET_PUBKEY)?;
        let mut buf = &data[consumed..];
        let body = match header.version {
            2 | 3 => Self::Ripe(read_array(&mut buf, "getpubkey ripe")?),
            4 => Self::Tag(Tag::from_bytes(read_array(&mut buf, "getpubkey tag")?)),
            other => {
                return Err(WireError::UnsupportedVersion {
                    kind: "getpubkey",
                    version: other,
                })
            }
        };
        Ok((header, body))
    }

    /// Encode a complete request object for an address of `address_version`.
    pub fn encode(
        &self,
        nonce: u64,
        expires_at: DateTime<Utc>,
        address_version: u64,
        stream: u64,
    ) -> Vec<u8> {
        let payload: &[u8] = match self {
            Self::Ripe(ripe) => ripe,
            Self::Tag(tag) => tag.as_bytes(),
        };
        ObjectHeader::new(nonce, expires_at, ObjectType::GET_PUBKEY, address_version, stream)
            .encode_with_payload(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expires() -> DateTime<Utc> {
        DateTime::from_timestamp(1_800_000_000, 0).unwrap()
    }

    #[test]
    fn decode_ripe_request() {
        let req = GetPubKeyObject::Ripe([78; 20]);
        let data = req.encode(654, expires(), 3, 1);
        let (header, body) = GetPubKeyObject::decode(&data).unwrap();
        assert_eq!(header.version, 3);
        assert_eq!(body, req);
    }

    #[test]
    fn decode_tag_request() {
        let req = GetPubKeyObject::Tag(Tag::from_bytes([100; 32]));
        let data = req.encode(654, expires(), 4, 1);
        let (_, body) = GetPubKeyObject::decode(&data).unwrap();
        assert_eq!(body, req);
    }

    #[test]
    fn decode_rejects_old_version() {
        let data = GetPubKeyObject::Ripe([0; 20]).encode(0, expires(), 1, 1);
        assert!(matches!(
            GetPubKeyObject::decode(&data),
            Err(WireError::UnsupportedVersion { kind: "getpubkey", version: 1 })
        ));
    }

    #[test]
    fn decode_rejects_truncated_tag() {
        let data = GetPubKeyObject::Ripe([0; 20]).encode(0, expires(), 4, 1);
        assert!(matches!(
            GetPubKeyObject::decode(&data),
            Err(WireError::Truncated { .. })
        ));
    }
}
