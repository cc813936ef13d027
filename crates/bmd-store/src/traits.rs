use bmd_crypto::{Address, PublicIdentity};
use bmd_types::{ObjectHash, ObjectType, Tag};

use crate::error::StoreResult;

/// Result of a successful insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Inserted {
    pub hash: ObjectHash,
    /// Counter assigned in the object's type bucket. Zero means the backend
    /// keeps no sync cursor for this type.
    pub counter: u64,
}

/// One page of a counter-ordered fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CounterBatch {
    /// `(counter, bytes)` pairs in strictly ascending counter order.
    pub entries: Vec<(u64, Vec<u8>)>,
    /// Counter of the last entry, or 0 when the batch is empty.
    pub last_counter: u64,
}

impl CounterBatch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counter to resume from so the last entry is not delivered twice.
    pub fn next_counter(&self) -> Option<u64> {
        (!self.is_empty()).then(|| self.last_counter + 1)
    }
}

/// Storage engine contract for network objects.
///
/// All implementations must satisfy these invariants:
/// - Every operation fails with `StoreError::Closed` once the store is closed.
/// - Every hash referenced by a counter bucket exists in the hash index.
/// - Counters within a type are assigned `1, 2, 3, ...` and never reused.
/// - Returned byte buffers are copies; callers may mutate them freely.
/// - Operations are atomic with respect to each other.
///
/// Proof-of-work, stream routing, and expiry freshness are checked by the
/// caller before insert; the store does not gate on them.
pub trait ObjectStore: Send + Sync {
    /// Check whether an object with the given inventory hash is stored.
    fn exists_object(&self, hash: &ObjectHash) -> StoreResult<bool>;

    /// Fetch an object's raw bytes by inventory hash.
    fn fetch_object_by_hash(&self, hash: &ObjectHash) -> StoreResult<Vec<u8>>;

    /// Fetch an object by its counter within `object_type`.
    fn fetch_object_by_counter(&self, object_type: ObjectType, counter: u64)
        -> StoreResult<Vec<u8>>;

    /// Fetch up to `max_count` objects of `object_type` with counter
    /// `>= from_counter`, in ascending counter order.
    ///
    /// The range is inclusive of `from_counter`. To page through a backlog,
    /// resume from [`CounterBatch::next_counter`] (`last_counter + 1`).
    fn fetch_objects_from_counter(
        &self,
        object_type: ObjectType,
        from_counter: u64,
        max_count: usize,
    ) -> StoreResult<CounterBatch>;

    /// Resolve an address to the public identity announced for it.
    fn fetch_identity_by_address(&self, address: &Address) -> StoreResult<PublicIdentity>;

    /// Check whether a `getpubkey` request for `address` is stored.
    fn exists_get_pubkey_request(&self, address: &Address) -> StoreResult<bool>;

    /// Pick a uniformly random unexpired object, for propagation.
    fn fetch_random_object(&self) -> StoreResult<Vec<u8>>;

    /// Highest counter assigned so far for `object_type`.
    fn get_counter(&self, object_type: ObjectType) -> StoreResult<u64>;

    /// Insert raw object bytes, returning the inventory hash and the counter
    /// assigned to the object.
    fn insert_object(&self, data: &[u8]) -> StoreResult<Inserted>;

    /// Remove an object by inventory hash.
    fn remove_object(&self, hash: &ObjectHash) -> StoreResult<()>;

    /// Remove the object at `counter` within `object_type`.
    fn remove_object_by_counter(&self, object_type: ObjectType, counter: u64) -> StoreResult<()>;

    /// Evict every non-pubkey object whose expiry plus the grace period has
    /// passed. Returns how many objects were removed.
    fn remove_expired_objects(&self) -> StoreResult<usize>;

    /// Remove the tag index entry for `tag`. The object itself stays stored.
    fn remove_pubkey_tag(&self, tag: &Tag) -> StoreResult<()>;

    /// Shut the store down, flushing whatever the backend persists.
    fn close(&self) -> StoreResult<()>;

    /// Barrier: returns once no operation is in flight and durable state is
    /// flushed.
    fn sync(&self) -> StoreResult<()>;

    /// Discard changes made since the last [`sync`](Self::sync) and close.
    fn rollback_close(&self) -> StoreResult<()>;
}
