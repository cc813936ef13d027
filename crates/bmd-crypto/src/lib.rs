//! Hashing and address primitives for bmd.
//!
//! Provides the inventory hash that identifies objects, the RIPE hash that
//! identifies key pairs, and the address tag used to index public keys.
//!
//! All primitives wrap established libraries (`sha2`, `ripemd`).

pub mod address;
pub mod error;
pub mod hasher;
pub mod identity;

pub use address::{Address, MAX_ADDRESS_VERSION, MIN_ADDRESS_VERSION};
pub use error::{CryptoError, CryptoResult};
pub use hasher::{double_sha512, inventory_hash, ripe_from_keys};
pub use identity::{PublicIdentity, DEFAULT_EXTRA_BYTES, DEFAULT_NONCE_TRIALS_PER_BYTE};
