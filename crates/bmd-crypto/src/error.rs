/// Errors from address and identity operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("unsupported address version: {0}")]
    UnsupportedAddressVersion(u64),

    #[error("pubkey is encrypted; cannot rebuild identity without decryption")]
    EncryptedPubKey,
}

pub type CryptoResult<T> = Result<T, CryptoError>;
