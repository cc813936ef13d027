use bmd_types::ObjectType;
use bytes::{Buf, BufMut};
use chrono::{DateTime, Utc};

use crate::error::{WireError, WireResult};
use crate::varint::{ensure, read_varint, varint_len, write_varint};

/// Common header carried by every network object.
///
/// Layout: nonce (u64 BE), expiry (u64 BE unix seconds), object type
/// (u32 BE), version (varint), stream (varint). The payload follows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectHeader {
    pub nonce: u64,
    pub expires_at: DateTime<Utc>,
    pub object_type: ObjectType,
    pub version: u64,
    pub stream: u64,
}

impl ObjectHeader {
    pub fn new(
        nonce: u64,
        expires_at: DateTime<Utc>,
        object_type: ObjectType,
        version: u64,
        stream: u64,
    ) -> Self {
        Self {
            nonce,
            expires_at,
            object_type,
            version,
            stream,
        }
    }

    /// Decode the header at the start of `data`.
    ///
    /// Returns the header and the number of bytes it occupied, so the caller
    /// can slice off the payload.
    pub fn decode(data: &[u8]) -> WireResult<(Self, usize)> {
        let mut buf = data;
        ensure(buf, 20, "object header")?;
        let nonce = buf.get_u64();
        let expires_secs = buf.get_u64();
        let object_type = ObjectType::new(buf.get_u32());
        let version = read_varint(&mut buf)?;
        let stream = read_varint(&mut buf)?;

        let expires_at = i64::try_from(expires_secs)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(WireError::InvalidExpiry(expires_secs))?;

        let consumed = data.len() - buf.len();
        Ok((
            Self {
                nonce,
                expires_at,
                object_type,
                version,
                stream,
            },
            consumed,
        ))
    }

    /// Append the encoded header to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.put_u64(self.nonce);
        out.put_u64(self.expires_at.timestamp().max(0) as u64);
        out.put_u32(self.object_type.value());
        write_varint(out, self.version);
        write_varint(out, self.stream);
    }

    /// Encode the header followed by `payload` as a complete object.
    pub fn encode_with_payload(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len() + payload.len());
        self.encode_into(&mut out);
        out.extend_from_slice(payload);
        out
    }

    /// Length of the encoded header in bytes.
    pub fn encoded_len(&self) -> usize {
        20 + varint_len(self.version) + varint_len(self.stream)
    }

    /// Fail unless this header carries `expected` as its type.
    pub fn expect_type(&self, expected: ObjectType) -> WireResult<()> {
        if self.object_type != expected {
            return Err(WireError::UnexpectedType {
                expected,
                actual: self.object_type,
            });
        }
        Ok(())
    }
}
