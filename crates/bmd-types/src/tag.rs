use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Public-key tag: a 32-byte value derivable from an address.
///
/// Tags index identity-bearing objects so that an address can be resolved to
/// its most recent public key without scanning every stored object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag([u8; 32]);

impl Tag {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, which must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| TypeError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_roundtrip() {
        let tag = Tag::from_slice(&[3u8; 32]).unwrap();
        assert_eq!(tag.as_bytes(), &[3u8; 32]);
        assert_eq!(tag, Tag::from_bytes([3u8; 32]));
    }

    #[test]
    fn from_slice_rejects_short_input() {
        assert!(Tag::from_slice(&[0u8; 20]).is_err());
    }

    #[test]
    fn debug_is_short() {
        let tag = Tag::from_bytes([0xab; 32]);
        assert_eq!(format!("{tag:?}"), "Tag(abababab)");
    }
}
