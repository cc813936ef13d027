use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use bmd_crypto::{Address, PublicIdentity};
use bmd_types::{ObjectHash, ObjectType, Tag};
use bmd_wire::{GetPubKeyObject, PubKeyObject};
use chrono::{DateTime, Utc};
use rand::seq::IteratorRandom;
use tracing::{debug, error, info, trace};

use crate::config::StoreOptions;
use crate::counter::CounterIndex;
use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::sweep::ExpiryPolicy;
use crate::tags::{pubkey_tag, TagIndex};
use crate::traits::{CounterBatch, Inserted, ObjectStore};

/// Registry name of the in-memory driver.
pub const MEMDB_DRIVER: &str = "memdb";

/// Everything a live store holds. Dropped as a whole on close.
#[derive(Debug, Default)]
struct MemState {
    objects: HashMap<ObjectHash, StoredObject>,
    tags: TagIndex,
    counters: CounterIndex,
}

/// Volatile object store.
///
/// A single mutex guards all three indices, so every operation is atomic with
/// respect to every other. Closing drops the indices; nothing survives the
/// process.
pub struct MemDb {
    state: Mutex<Option<MemState>>,
    expiry: ExpiryPolicy,
}

impl MemDb {
    pub fn new() -> Self {
        Self::with_expiry(ExpiryPolicy::default())
    }

    pub fn with_expiry(expiry: ExpiryPolicy) -> Self {
        Self {
            state: Mutex::new(Some(MemState::default())),
            expiry,
        }
    }

    /// Number of objects in the hash index. Zero once closed.
    pub fn len(&self) -> usize {
        self.lock().as_ref().map_or(0, |state| state.objects.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    /// Sweep against an explicit clock.
    pub fn remove_expired_objects_at(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        let expiry = self.expiry;
        self.with_state(|state| Ok(state.sweep(&expiry, now)))
    }

    /// Random pick against an explicit clock.
    pub fn fetch_random_object_at(&self, now: DateTime<Utc>) -> StoreResult<Vec<u8>> {
        self.with_state(|state| {
            state
                .objects
                .values()
                .filter(|object| object.expires_at > now)
                .choose(&mut rand::thread_rng())
                .map(|object| object.data.clone())
                .ok_or(StoreError::NoLiveObjects)
        })
    }

    fn lock(&self) -> MutexGuard<'_, Option<MemState>> {
        self.state.lock().expect("lock poisoned")
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemState) -> StoreResult<T>) -> StoreResult<T> {
        let mut guard = self.lock();
        let state = guard.as_mut().ok_or(StoreError::Closed)?;
        f(state)
    }

    fn shut_down(&self, reason: &'static str) -> StoreResult<()> {
        let state = self.lock().take().ok_or(StoreError::Closed)?;
        debug!(objects = state.objects.len(), reason, "memdb closed");
        Ok(())
    }
}

impl Default for MemDb {
    fn default() -> Self {
        Self::new()
    }
}

impl MemState {
    /// Object referenced by `counter` in the bucket for `object_type`.
    fn object_at(&self, object_type: ObjectType, counter: u64) -> StoreResult<&StoredObject> {
        let hash = self
            .counters
            .bucket(object_type)
            .and_then(|bucket| bucket.get(counter))
            .ok_or(StoreError::CounterNotFound {
                object_type,
                counter,
            })?;
        Ok(self.indexed(hash))
    }

    /// Look up a hash taken from a counter bucket.
    fn indexed(&self, hash: &ObjectHash) -> &StoredObject {
        match self.objects.get(hash) {
            Some(object) => object,
            None => consistency_violation(format_args!(
                "counter index references missing object {hash}"
            )),
        }
    }

    fn fetch_from_counter(
        &self,
        object_type: ObjectType,
        from_counter: u64,
        max_count: usize,
    ) -> CounterBatch {
        let Some(bucket) = self.counters.bucket(object_type) else {
            return CounterBatch::default();
        };
        let entries: Vec<(u64, Vec<u8>)> = bucket
            .range_from(from_counter, max_count)
            .into_iter()
            .map(|(counter, hash)| (counter, self.indexed(&hash).data.clone()))
            .collect();
        let last_counter = entries.last().map_or(0, |(counter, _)| *counter);
        CounterBatch {
            entries,
            last_counter,
        }
    }

    fn identity(&self, address: &Address) -> StoreResult<PublicIdentity> {
        let data = self
            .tags
            .get(&address.tag())
            .ok_or(StoreError::IdentityNotFound(*address))?;
        let (header, pubkey) = PubKeyObject::decode(data)?;
        if let PubKeyObject::Encrypted { .. } = pubkey {
            return Err(StoreError::Unsupported(
                "version 4 pubkeys are encrypted; decrypt before resolving the identity".into(),
            ));
        }
        let identity = PublicIdentity::from_pubkey(header.stream, &pubkey)?;
        if identity.address != *address {
            return Err(StoreError::IdentityNotFound(*address));
        }
        Ok(identity)
    }

    fn has_get_pubkey_request(&self, address: &Address) -> bool {
        let Some(bucket) = self.counters.bucket(ObjectType::GET_PUBKEY) else {
            return false;
        };
        let tag = address.tag();
        bucket.iter().any(|(counter, hash)| {
            let object = self.indexed(hash);
            if object.stream != address.stream() || object.version != address.version() {
                return false;
            }
            match GetPubKeyObject::decode(&object.data) {
                Ok((_, GetPubKeyObject::Ripe(ripe))) => ripe == *address.ripe(),
                Ok((_, GetPubKeyObject::Tag(request_tag))) => request_tag == tag,
                Err(e) => {
                    trace!(counter, error = %e, "skipping undecodable getpubkey");
                    false
                }
            }
        })
    }

    fn insert(&mut self, data: &[u8]) -> StoreResult<Inserted> {
        let object = StoredObject::decode(data)?;
        let hash = object.hash;
        if self.objects.contains_key(&hash) {
            return Err(StoreError::Duplicate(hash));
        }

        // Derive the tag before touching any index, so a bad pubkey leaves the
        // store unchanged.
        if object.object_type == ObjectType::PUBKEY {
            let tag = pubkey_tag(&object)?;
            if self.tags.upsert(tag, object.data.clone()) {
                debug!(tag = ?tag, hash = %hash.short_hex(), "pubkey tag replaced by newer object");
            }
        }

        let object_type = object.object_type;
        let counter = self.counters.bucket_or_create(object_type).insert(hash);
        self.objects.insert(hash, object);
        debug!(hash = %hash.short_hex(), %object_type, counter, "object inserted");
        Ok(Inserted { hash, counter })
    }

    fn remove(&mut self, hash: &ObjectHash) -> StoreResult<()> {
        let object = self
            .objects
            .remove(hash)
            .ok_or(StoreError::ObjectNotFound(*hash))?;
        let counter = self
            .counters
            .bucket_mut(object.object_type)
            .and_then(|bucket| bucket.remove_hash(hash));
        match counter {
            Some(counter) => {
                debug!(hash = %hash.short_hex(), object_type = %object.object_type, counter, "object removed");
                Ok(())
            }
            None => consistency_violation(format_args!(
                "object {hash} is missing from the {} counter index",
                object.object_type
            )),
        }
    }

    fn remove_by_counter(&mut self, object_type: ObjectType, counter: u64) -> StoreResult<()> {
        let hash = self
            .counters
            .bucket_mut(object_type)
            .and_then(|bucket| bucket.remove(counter))
            .ok_or(StoreError::CounterNotFound {
                object_type,
                counter,
            })?;
        if self.objects.remove(&hash).is_none() {
            consistency_violation(format_args!(
                "counter {counter} of {object_type} references missing object {hash}"
            ));
        }
        debug!(hash = %hash.short_hex(), %object_type, counter, "object removed by counter");
        Ok(())
    }

    fn sweep(&mut self, expiry: &ExpiryPolicy, now: DateTime<Utc>) -> usize {
        let expired: HashSet<ObjectHash> = self
            .objects
            .values()
            .filter(|object| expiry.should_evict(object, now))
            .map(|object| object.hash)
            .collect();
        if expired.is_empty() {
            return 0;
        }
        self.objects.retain(|hash, _| !expired.contains(hash));
        self.counters.retain(|hash| !expired.contains(hash));
        info!(removed = expired.len(), remaining = self.objects.len(), "expired objects swept");
        expired.len()
    }
}

/// Abort on a broken index invariant. Such a state cannot be repaired by the
/// caller, so it is never surfaced as an error.
fn consistency_violation(detail: fmt::Arguments<'_>) -> ! {
    error!(%detail, "object store consistency violation");
    panic!("object store consistency violation: {detail}");
}

impl ObjectStore for MemDb {
    fn exists_object(&self, hash: &ObjectHash) -> StoreResult<bool> {
        self.with_state(|state| Ok(state.objects.contains_key(hash)))
    }

    fn fetch_object_by_hash(&self, hash: &ObjectHash) -> StoreResult<Vec<u8>> {
        self.with_state(|state| {
            trace!(hash = %hash.short_hex(), "fetch by hash");
            state
                .objects
                .get(hash)
                .map(|object| object.data.clone())
                .ok_or(StoreError::ObjectNotFound(*hash))
        })
    }

    fn fetch_object_by_counter(
        &self,
        object_type: ObjectType,
        counter: u64,
    ) -> StoreResult<Vec<u8>> {
        self.with_state(|state| {
            trace!(%object_type, counter, "fetch by counter");
            Ok(state.object_at(object_type, counter)?.data.clone())
        })
    }

    fn fetch_objects_from_counter(
        &self,
        object_type: ObjectType,
        from_counter: u64,
        max_count: usize,
    ) -> StoreResult<CounterBatch> {
        self.with_state(|state| {
            let batch = state.fetch_from_counter(object_type, from_counter, max_count);
            trace!(%object_type, from_counter, returned = batch.len(), "fetch from counter");
            Ok(batch)
        })
    }

    fn fetch_identity_by_address(&self, address: &Address) -> StoreResult<PublicIdentity> {
        self.with_state(|state| state.identity(address))
    }

    fn exists_get_pubkey_request(&self, address: &Address) -> StoreResult<bool> {
        self.with_state(|state| Ok(state.has_get_pubkey_request(address)))
    }

    fn fetch_random_object(&self) -> StoreResult<Vec<u8>> {
        self.fetch_random_object_at(Utc::now())
    }

    fn get_counter(&self, object_type: ObjectType) -> StoreResult<u64> {
        self.with_state(|state| {
            Ok(state
                .counters
                .bucket(object_type)
                .map_or(0, |bucket| bucket.position()))
        })
    }

    fn insert_object(&self, data: &[u8]) -> StoreResult<Inserted> {
        self.with_state(|state| state.insert(data))
    }

    fn remove_object(&self, hash: &ObjectHash) -> StoreResult<()> {
        self.with_state(|state| state.remove(hash))
    }

    fn remove_object_by_counter(&self, object_type: ObjectType, counter: u64) -> StoreResult<()> {
        self.with_state(|state| state.remove_by_counter(object_type, counter))
    }

    fn remove_expired_objects(&self) -> StoreResult<usize> {
        self.remove_expired_objects_at(Utc::now())
    }

    fn remove_pubkey_tag(&self, tag: &Tag) -> StoreResult<()> {
        self.with_state(|state| match state.tags.remove(tag) {
            Some(_) => {
                debug!(tag = ?tag, "pubkey tag removed");
                Ok(())
            }
            None => Err(StoreError::TagNotFound(*tag)),
        })
    }

    fn close(&self) -> StoreResult<()> {
        self.shut_down("close")
    }

    fn sync(&self) -> StoreResult<()> {
        // Taking the lock waits out any operation in flight.
        self.with_state(|_| Ok(()))
    }

    fn rollback_close(&self) -> StoreResult<()> {
        // Nothing is ever persisted, so rolling back is just closing.
        self.shut_down("rollback")
    }
}

impl fmt::Debug for MemDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.lock();
        let mut s = f.debug_struct("MemDb");
        match guard.as_ref() {
            Some(state) => s
                .field("objects", &state.objects.len())
                .field("tags", &state.tags.len())
                .field("unknown_buckets", &state.counters.unknown_bucket_count()),
            None => s.field("closed", &true),
        };
        s.field("grace", &self.expiry.grace()).finish()
    }
}

/// Driver entry point for `memdb`. It keeps nothing on disk, so a storage
/// path is rejected.
pub fn create_memdb(options: &StoreOptions) -> StoreResult<Arc<dyn ObjectStore>> {
    if let Some(path) = &options.path {
        return Err(StoreError::InvalidArguments {
            driver: MEMDB_DRIVER.into(),
            reason: format!("memdb does not accept a storage path ({})", path.display()),
        });
    }
    debug!(grace_secs = options.expiry_grace_secs, "memdb created");
    Ok(Arc::new(MemDb::with_expiry(options.expiry_policy())))
}

/// Opening `memdb` always yields a fresh, empty store.
pub fn open_memdb(options: &StoreOptions) -> StoreResult<Arc<dyn ObjectStore>> {
    create_memdb(options)
}
