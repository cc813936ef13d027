use bmd_types::{ObjectType, Tag};
use bytes::{Buf, BufMut};

use crate::error::{WireError, WireResult};
use crate::header::ObjectHeader;
use crate::varint::{ensure, read_array, read_var_bytes, read_varint, write_varint};

/// Plaintext keys with the behavior bitfield only.
pub const SIMPLE_PUBKEY_VERSION: u64 = 2;
/// Plaintext keys plus proof-of-work parameters and a signature.
pub const EXTENDED_PUBKEY_VERSION: u64 = 3;
/// Tag followed by an encrypted body.
pub const ENCRYPTED_PUBKEY_VERSION: u64 = 4;

/// Uncompressed secp256k1 point without the leading `0x04`.
pub const PUBLIC_KEY_SIZE: usize = 64;

const MAX_SIGNATURE_SIZE: usize = 1024;

pub type PublicKeyBytes = [u8; PUBLIC_KEY_SIZE];

/// Decoded payload of a `pubkey` object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PubKeyObject {
    Simple {
        behavior: u32,
        signing_key: PublicKeyBytes,
        encryption_key: PublicKeyBytes,
    },
    Extended {
        behavior: u32,
        signing_key: PublicKeyBytes,
        encryption_key: PublicKeyBytes,
        nonce_trials_per_byte: u64,
        extra_bytes: u64,
        signature: Vec<u8>,
    },
    Encrypted {
        tag: Tag,
        encrypted: Vec<u8>,
    },
}

impl PubKeyObject {
    /// Decode a complete `pubkey` object (header and payload).
    pub fn decode(data: &[u8]) -> WireResult<(ObjectHeader, Self)> {
        let (header, consumed) = ObjectHeader::decode(data)?;
        header.expect_type(ObjectType::PUBKEY)?;
        let body = Self::decode_payload(header.version, &data[consumed..])?;
        Ok((header, body))
    }

    /// Decode the payload that follows a `pubkey` header of `version`.
    pub fn decode_payload(version: u64, payload: &[u8]) -> WireResult<Self> {
        let mut buf = payload;
        match version {
            SIMPLE_PUBKEY_VERSION | EXTENDED_PUBKEY_VERSION => {
                ensure(buf, 4, "pubkey behavior")?;
                let behavior = buf.get_u32();
                let signing_key = read_array(&mut buf, "signing key")?;
                let encryption_key = read_array(&mut buf, "encryption key")?;
                if version == SIMPLE_PUBKEY_VERSION {
                    return Ok(Self::Simple {
                        behavior,
                        signing_key,
                        encryption_key,
                    });
                }
                let nonce_trials_per_byte = read_varint(&mut buf)?;
                let extra_bytes = read_varint(&mut buf)?;
                let signature = read_var_bytes(&mut buf, MAX_SIGNATURE_SIZE, "signature")?;
                Ok(Self::Extended {
                    behavior,
                    signing_key,
                    encryption_key,
                    nonce_trials_per_byte,
                    extra_bytes,
                    signature,
                })
            }
            ENCRYPTED_PUBKEY_VERSION => {
                let tag = Tag::from_bytes(read_array(&mut buf, "pubkey tag")?);
                Ok(Self::Encrypted {
                    tag,
                    encrypted: buf.to_vec(),
                })
            }
            other => Err(WireError::UnsupportedVersion {
                kind: "pubkey",
                version: other,
            }),
        }
    }

    /// The header version that carries this payload.
    pub fn version(&self) -> u64 {
        match self {
            Self::Simple { .. } => SIMPLE_PUBKEY_VERSION,
            Self::Extended { .. } => EXTENDED_PUBKEY_VERSION,
            Self::Encrypted { .. } => ENCRYPTED_PUBKEY_VERSION,
        }
    }

    pub fn encode_payload(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Self::Simple {
                behavior,
                signing_key,
                encryption_key,
            } => {
                out.put_u32(*behavior);
                out.put_slice(signing_key);
                out.put_slice(encryption_key);
            }
            Self::Extended {
                behavior,
                signing_key,
                encryption_key,
                nonce_trials_per_byte,
                extra_bytes,
                signature,
            } => {
                out.put_u32(*behavior);
                out.put_slice(signing_key);
                out.put_slice(encryption_key);
                write_varint(&mut out, *nonce_trials_per_byte);
                write_varint(&mut out, *extra_bytes);
                write_varint(&mut out, signature.len() as u64);
                out.put_slice(signature);
            }
            Self::Encrypted { tag, encrypted } => {
                out.put_slice(tag.as_bytes());
                out.put_slice(encrypted);
            }
        }
        out
    }

    /// Encode a complete object. The header's type and version are taken
    /// from this payload.
    pub fn encode(&self, nonce: u64, expires_at: chrono::DateTime<chrono::Utc>, stream: u64) -> Vec<u8> {
        ObjectHeader::new(nonce, expires_at, ObjectType::PUBKEY, self.version(), stream)
            .encode_with_payload(&self.encode_payload())
    }
}
