use bmd_types::ObjectHash;
use bmd_wire::PublicKeyBytes;
use ripemd::Ripemd160;
use sha2::{Digest, Sha512};

/// SHA-512 applied twice.
pub fn double_sha512(data: &[u8]) -> [u8; 64] {
    let first = Sha512::digest(data);
    let second = Sha512::digest(first);
    let mut out = [0u8; 64];
    out.copy_from_slice(&second);
    out
}

/// Inventory hash of a raw object: the first 32 bytes of its double SHA-512.
///
/// This is the content hash peers use to advertise and request objects, and
/// the key of the store's hash index.
pub fn inventory_hash(data: &[u8]) -> ObjectHash {
    let digest = double_sha512(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..32]);
    ObjectHash::from_hash(out)
}

/// RIPE hash identifying a key pair: RIPEMD-160 over SHA-512 of both keys in
/// uncompressed form.
pub fn ripe_from_keys(signing_key: &PublicKeyBytes, encryption_key: &PublicKeyBytes) -> [u8; 20] {
    let mut sha = Sha512::new();
    sha.update([0x04]);
    sha.update(signing_key);
    sha.update([0x04]);
    sha.update(encryption_key);
    let ripe = Ripemd160::digest(sha.finalize());
    let mut out = [0u8; 20];
    out.copy_from_slice(&ripe);
    out
}
