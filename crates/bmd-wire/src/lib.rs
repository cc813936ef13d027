//! Object wire codec for bmd.
//!
//! The store only needs a narrow slice of the Bitmessage object format: the
//! common header that classifies every object, and the two identity-bearing
//! payloads (`pubkey` and `getpubkey`) it indexes by tag or RIPE hash. Message
//! and broadcast bodies stay opaque.

pub mod error;
pub mod getpubkey;
pub mod header;
pub mod pubkey;
pub mod varint;

pub use error::{WireError, WireResult};
pub use getpubkey::{GetPubKeyObject, RIPE_SIZE};
pub use header::ObjectHeader;
pub use pubkey::{
    PubKeyObject, PublicKeyBytes, ENCRYPTED_PUBKEY_VERSION, EXTENDED_PUBKEY_VERSION,
    PUBLIC_KEY_SIZE, SIMPLE_PUBKEY_VERSION,
};
pub use varint::{read_varint, varint_len, write_varint};
