use std::fmt;

use bmd_types::Tag;
use bmd_wire::{varint_len, write_varint};
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};
use crate::hasher::double_sha512;

/// Oldest address version the store can resolve.
pub const MIN_ADDRESS_VERSION: u64 = 2;
/// Newest address version the store can resolve.
pub const MAX_ADDRESS_VERSION: u64 = 4;

/// A decoded Bitmessage address: version, stream, and RIPE hash.
///
/// Parsing the human-readable `BM-` form belongs to the address module of the
/// daemon; the store only needs the decoded fields.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    version: u64,
    stream: u64,
    ripe: [u8; 20],
}

impl Address {
    pub fn new(version: u64, stream: u64, ripe: [u8; 20]) -> CryptoResult<Self> {
        if !(MIN_ADDRESS_VERSION..=MAX_ADDRESS_VERSION).contains(&version) {
            return Err(CryptoError::UnsupportedAddressVersion(version));
        }
        Ok(Self {
            version,
            stream,
            ripe,
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn stream(&self) -> u64 {
        self.stream
    }

    pub fn ripe(&self) -> &[u8; 20] {
        &self.ripe
    }

    /// Tag under which this address's public key is indexed.
    ///
    /// The tag is the second half of the double SHA-512 over the varint
    /// version, varint stream, and RIPE hash. The first half is the key that
    /// decrypts version 4 pubkeys, so the tag reveals nothing about it.
    pub fn tag(&self) -> Tag {
        let digest = self.hashed_data();
        let mut tag = [0u8; 32];
        tag.copy_from_slice(&digest[32..]);
        Tag::from_bytes(tag)
    }

    fn hashed_data(&self) -> [u8; 64] {
        let mut data = Vec::with_capacity(varint_len(self.version) + varint_len(self.stream) + 20);
        write_varint(&mut data, self.version);
        write_varint(&mut data, self.stream);
        data.extend_from_slice(&self.ripe);
        double_sha512(&data)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Address(v{} s{} {})",
            self.version,
            self.stream,
            hex::encode(self.ripe)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ripe() -> [u8; 20] {
        let mut ripe = [0u8; 20];
        for (i, byte) in ripe.iter_mut().enumerate() {
            *byte = 78 + i as u8;
        }
        ripe
    }

    #[test]
    fn rejects_unsupported_versions() {
        assert_eq!(
            Address::new(1, 1, [0; 20]).unwrap_err(),
            CryptoError::UnsupportedAddressVersion(1)
        );
        assert!(Address::new(5, 1, [0; 20]).is_err());
        assert!(Address::new(2, 1, [0; 20]).is_ok());
    }

    #[test]
    fn tag_known_vector() {
        let addr = Address::new(4, 1, ripe()).unwrap();
        assert_eq!(
            addr.tag().to_hex(),
            "5241830ab49b32bb4b51abe3ed7a156898e4fe4c10db5162fe8d8b19b76ad9db"
        );
    }

    #[test]
    fn tag_depends_on_version_and_stream() {
        let v4 = Address::new(4, 1, ripe()).unwrap();
        let v3 = Address::new(3, 1, ripe()).unwrap();
        let s2 = Address::new(4, 2, ripe()).unwrap();
        assert_ne!(v4.tag(), v3.tag());
        assert_ne!(v4.tag(), s2.tag());
    }

    #[test]
    fn serde_roundtrip() {
        let addr = Address::new(3, 1, ripe()).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, parsed);
    }
}
