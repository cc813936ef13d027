use bmd_wire::{PubKeyObject, PublicKeyBytes};

use crate::address::Address;
use crate::error::{CryptoError, CryptoResult};
use crate::hasher::ripe_from_keys;

/// Proof-of-work difficulty assumed for version 2 pubkeys, which do not
/// advertise their own.
pub const DEFAULT_NONCE_TRIALS_PER_BYTE: u64 = 1000;
pub const DEFAULT_EXTRA_BYTES: u64 = 1000;

/// The public half of an identity, as announced in a `pubkey` object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicIdentity {
    pub address: Address,
    pub behavior: u32,
    pub signing_key: PublicKeyBytes,
    pub encryption_key: PublicKeyBytes,
    pub nonce_trials_per_byte: u64,
    pub extra_bytes: u64,
}

impl PublicIdentity {
    /// Rebuild an identity from a plaintext pubkey seen on `stream`.
    ///
    /// The address version follows the pubkey version and the RIPE hash is
    /// derived from the keys. Encrypted (version 4) pubkeys fail with
    /// [`CryptoError::EncryptedPubKey`].
    pub fn from_pubkey(stream: u64, pubkey: &PubKeyObject) -> CryptoResult<Self> {
        let (behavior, signing_key, encryption_key, nonce_trials_per_byte, extra_bytes) =
            match pubkey {
                PubKeyObject::Simple {
                    behavior,
                    signing_key,
                    encryption_key,
                } => (
                    *behavior,
                    *signing_key,
                    *encryption_key,
                    DEFAULT_NONCE_TRIALS_PER_BYTE,
                    DEFAULT_EXTRA_BYTES,
                ),
                PubKeyObject::Extended {
                    behavior,
                    signing_key,
                    encryption_key,
                    nonce_trials_per_byte,
                    extra_bytes,
                    ..
                } => (
                    *behavior,
                    *signing_key,
                    *encryption_key,
                    *nonce_trials_per_byte,
                    *extra_bytes,
                ),
                PubKeyObject::Encrypted { .. } => return Err(CryptoError::EncryptedPubKey),
            };

        let ripe = ripe_from_keys(&signing_key, &encryption_key);
        let address = Address::new(pubkey.version(), stream, ripe)?;
        Ok(Self {
            address,
            behavior,
            signing_key,
            encryption_key,
            nonce_trials_per_byte,
            extra_bytes,
        })
    }
}
