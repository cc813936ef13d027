//! Per-type counter index.
//!
//! Every insertion into a bucket is assigned the next counter value. Counters
//! are never reused: removing an entry leaves a gap, and `position` keeps the
//! highest value ever assigned. Clients use counters as sync cursors.

use std::collections::{BTreeMap, HashMap};

use bmd_types::{ObjectHash, ObjectType};

/// Counter bucket for one object type.
#[derive(Debug, Default)]
pub struct CounterBucket {
    by_counter: BTreeMap<u64, ObjectHash>,
    position: u64,
}

impl CounterBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next counter to `hash` and return it.
    pub fn insert(&mut self, hash: ObjectHash) -> u64 {
        self.position += 1;
        self.by_counter.insert(self.position, hash);
        self.position
    }

    /// Highest counter ever assigned in this bucket.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn get(&self, counter: u64) -> Option<&ObjectHash> {
        self.by_counter.get(&counter)
    }

    pub fn remove(&mut self, counter: u64) -> Option<ObjectHash> {
        self.by_counter.remove(&counter)
    }

    /// Remove the entry pointing at `hash`, returning its counter.
    ///
    /// Linear in the bucket size; removal by hash is rare compared with
    /// inserts and counter-ordered fetches.
    pub fn remove_hash(&mut self, hash: &ObjectHash) -> Option<u64> {
        let counter = self
            .by_counter
            .iter()
            .find_map(|(counter, h)| (h == hash).then_some(*counter))?;
        self.by_counter.remove(&counter);
        Some(counter)
    }

    /// Up to `max_count` entries with counter `>= from`, in ascending order.
    pub fn range_from(&self, from: u64, max_count: usize) -> Vec<(u64, ObjectHash)> {
        self.by_counter
            .range(from..)
            .take(max_count)
            .map(|(counter, hash)| (*counter, *hash))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &ObjectHash)> + '_ {
        self.by_counter.iter().map(|(counter, hash)| (*counter, hash))
    }

    /// Keep only entries whose hash satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&ObjectHash) -> bool) {
        self.by_counter.retain(|_, hash| keep(hash));
    }

    pub fn len(&self) -> usize {
        self.by_counter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_counter.is_empty()
    }
}

/// Counter buckets for all object types.
///
/// The four known types have fixed buckets. Unknown types get a bucket on the
/// first insert of that type; lookups never create one.
#[derive(Debug, Default)]
pub struct CounterIndex {
    get_pubkey: CounterBucket,
    pubkey: CounterBucket,
    msg: CounterBucket,
    broadcast: CounterBucket,
    unknown: HashMap<ObjectType, CounterBucket>,
}

impl CounterIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(&self, object_type: ObjectType) -> Option<&CounterBucket> {
        match object_type {
            ObjectType::GET_PUBKEY => Some(&self.get_pubkey),
            ObjectType::PUBKEY => Some(&self.pubkey),
            ObjectType::MSG => Some(&self.msg),
            ObjectType::BROADCAST => Some(&self.broadcast),
            other => self.unknown.get(&other),
        }
    }

    pub fn bucket_mut(&mut self, object_type: ObjectType) -> Option<&mut CounterBucket> {
        match object_type {
            ObjectType::GET_PUBKEY => Some(&mut self.get_pubkey),
            ObjectType::PUBKEY => Some(&mut self.pubkey),
            ObjectType::MSG => Some(&mut self.msg),
            ObjectType::BROADCAST => Some(&mut self.broadcast),
            other => self.unknown.get_mut(&other),
        }
    }

    /// Bucket for `object_type`, creating it for an unknown type.
    pub fn bucket_or_create(&mut self, object_type: ObjectType) -> &mut CounterBucket {
        match object_type {
            ObjectType::GET_PUBKEY => &mut self.get_pubkey,
            ObjectType::PUBKEY => &mut self.pubkey,
            ObjectType::MSG => &mut self.msg,
            ObjectType::BROADCAST => &mut self.broadcast,
            other => self.unknown.entry(other).or_default(),
        }
    }

    /// Drop every entry, in every bucket, whose hash fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&ObjectHash) -> bool) {
        self.get_pubkey.retain(&mut keep);
        self.pubkey.retain(&mut keep);
        self.msg.retain(&mut keep);
        self.broadcast.retain(&mut keep);
        for bucket in self.unknown.values_mut() {
            bucket.retain(&mut keep);
        }
    }

    /// Number of lazily created buckets.
    pub fn unknown_bucket_count(&self) -> usize {
        self.unknown.len()
    }
}
