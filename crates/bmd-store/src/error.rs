use bmd_crypto::{Address, CryptoError};
use bmd_types::{ObjectHash, ObjectType, Tag};
use bmd_wire::WireError;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store has been closed; open a new instance to continue.
    #[error("store is closed")]
    Closed,

    #[error("object not found: {0}")]
    ObjectNotFound(ObjectHash),

    #[error("no {object_type} object at counter {counter}")]
    CounterNotFound { object_type: ObjectType, counter: u64 },

    #[error("no pubkey stored under tag {0}")]
    TagNotFound(Tag),

    #[error("no identity stored for {0:?}")]
    IdentityNotFound(Address),

    /// Nothing unexpired is stored to pick from.
    #[error("no unexpired objects stored")]
    NoLiveObjects,

    /// An object with the same inventory hash is already stored.
    #[error("duplicate object: {0}")]
    Duplicate(ObjectHash),

    /// The operation is undefined for this backend or object. Callers should
    /// treat this as a capability answer, not a transient failure.
    #[error("operation not supported: {0}")]
    Unsupported(String),

    /// The object bytes could not be decoded at insert.
    #[error("invalid object: {0}")]
    InvalidObject(#[from] WireError),

    #[error("identity error: {0}")]
    Identity(#[from] CryptoError),

    #[error("unknown driver type: {0}")]
    UnknownDriver(String),

    #[error("invalid arguments for driver {driver}: {reason}")]
    InvalidArguments { driver: String, reason: String },
}

impl StoreError {
    /// Returns `true` for every "absent" variant.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ObjectNotFound(_)
                | Self::CounterNotFound { .. }
                | Self::TagNotFound(_)
                | Self::IdentityNotFound(_)
                | Self::NoLiveObjects
        )
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
