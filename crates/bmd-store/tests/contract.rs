//! Contract tests for stores built through the driver registry.
//!
//! Every test works against `Arc<dyn ObjectStore>` so it applies unchanged to
//! any backend registered under a new name.

use std::sync::Arc;

use bmd_crypto::{inventory_hash, ripe_from_keys, Address};
use bmd_store::{
    BacklogCursor, DriverRegistry, Inserted, ObjectStore, StoreError, StoreOptions, MEMDB_DRIVER,
};
use bmd_types::ObjectType;
use bmd_wire::{ObjectHeader, PubKeyObject};
use chrono::{DateTime, Duration, Utc};

fn open_store() -> Arc<dyn ObjectStore> {
    DriverRegistry::with_builtin()
        .create(MEMDB_DRIVER, &StoreOptions::default())
        .expect("memdb should be registered")
}

fn object(object_type: ObjectType, nonce: u64, expires_at: DateTime<Utc>) -> Vec<u8> {
    ObjectHeader::new(nonce, expires_at, object_type, 1, 1).encode_with_payload(b"opaque payload")
}

fn in_an_hour() -> DateTime<Utc> {
    Utc::now() + Duration::hours(1)
}

fn pubkey(expires_at: DateTime<Utc>) -> (Vec<u8>, Address) {
    let signing_key = [0x11; 64];
    let encryption_key = [0x22; 64];
    let data = PubKeyObject::Simple {
        behavior: 0,
        signing_key,
        encryption_key,
    }
    .encode(7, expires_at, 1);
    let address = Address::new(2, 1, ripe_from_keys(&signing_key, &encryption_key)).unwrap();
    (data, address)
}

// ============================================================================
// Round trip and counters
// ============================================================================

#[test]
fn fetch_by_hash_returns_inserted_bytes() {
    let store = open_store();
    let data = object(ObjectType::MSG, 1, in_an_hour());
    let Inserted { hash, counter } = store.insert_object(&data).unwrap();
    assert_eq!(hash, inventory_hash(&data));
    assert_eq!(counter, 1);
    assert_eq!(store.fetch_object_by_hash(&hash).unwrap(), data);
}

#[test]
fn counters_are_per_type() {
    let store = open_store();
    for nonce in 0..3 {
        store.insert_object(&object(ObjectType::MSG, nonce, in_an_hour())).unwrap();
    }
    let broadcast = store
        .insert_object(&object(ObjectType::BROADCAST, 0, in_an_hour()))
        .unwrap();
    let unknown = store
        .insert_object(&object(ObjectType::new(1000), 0, in_an_hour()))
        .unwrap();

    assert_eq!(broadcast.counter, 1);
    assert_eq!(unknown.counter, 1);
    assert_eq!(store.get_counter(ObjectType::MSG).unwrap(), 3);
    assert_eq!(store.get_counter(ObjectType::GET_PUBKEY).unwrap(), 0);
}

#[test]
fn broadcast_scenario() {
    let store = open_store();
    let first = object(ObjectType::BROADCAST, 1, in_an_hour());
    let second = object(ObjectType::BROADCAST, 2, in_an_hour());
    store.insert_object(&first).unwrap();
    assert_eq!(store.insert_object(&second).unwrap().counter, 2);

    store.remove_object_by_counter(ObjectType::BROADCAST, 1).unwrap();
    assert!(!store.exists_object(&inventory_hash(&first)).unwrap());

    let batch = store
        .fetch_objects_from_counter(ObjectType::BROADCAST, 1, 10)
        .unwrap();
    assert_eq!(batch.entries, vec![(2, second)]);
    assert_eq!(batch.last_counter, 2);
    assert_eq!(batch.next_counter(), Some(3));
}

#[test]
fn backlog_cursor_over_trait_object() {
    let store = open_store();
    for nonce in 0..10 {
        store.insert_object(&object(ObjectType::MSG, nonce, in_an_hour())).unwrap();
        store.insert_object(&object(ObjectType::BROADCAST, nonce, in_an_hour())).unwrap();
    }
    let entries = BacklogCursor::new(store.as_ref(), ObjectType::MSG, 1, 3)
        .collect_all()
        .unwrap();
    let counters: Vec<u64> = entries.iter().map(|(counter, _)| *counter).collect();
    assert_eq!(counters, (1..=10).collect::<Vec<_>>());
}

// ============================================================================
// Expiry
// ============================================================================

#[test]
fn sweep_keeps_expired_pubkey_and_drops_expired_msg() {
    let store = open_store();
    let long_ago = Utc::now() - Duration::days(2);
    let (key, address) = pubkey(long_ago);
    let msg = object(ObjectType::MSG, 1, long_ago);

    // Expired objects are accepted; freshness is the caller's call.
    store.insert_object(&key).unwrap();
    store.insert_object(&msg).unwrap();

    assert_eq!(store.remove_expired_objects().unwrap(), 1);
    assert!(store.exists_object(&inventory_hash(&key)).unwrap());
    assert!(!store.exists_object(&inventory_hash(&msg)).unwrap());
    assert_eq!(store.fetch_identity_by_address(&address).unwrap().address, address);
}

#[test]
fn expired_objects_are_never_picked_at_random() {
    let store = open_store();
    let stale = object(ObjectType::MSG, 1, Utc::now() - Duration::minutes(1));
    store.insert_object(&stale).unwrap();
    assert!(store.fetch_random_object().unwrap_err().is_not_found());
}

// ============================================================================
// Tags
// ============================================================================

#[test]
fn tag_and_hash_removal_are_independent() {
    let store = open_store();
    let (key, address) = pubkey(in_an_hour());
    let Inserted { hash, .. } = store.insert_object(&key).unwrap();

    store.remove_pubkey_tag(&address.tag()).unwrap();
    assert!(store.exists_object(&hash).unwrap());
    assert!(store.fetch_identity_by_address(&address).unwrap_err().is_not_found());

    let store = open_store();
    let Inserted { hash, .. } = store.insert_object(&key).unwrap();
    store.remove_object(&hash).unwrap();
    assert!(store.fetch_identity_by_address(&address).is_ok());
    store.remove_pubkey_tag(&address.tag()).unwrap();
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn every_operation_fails_after_close() {
    let store = open_store();
    let data = object(ObjectType::MSG, 1, in_an_hour());
    let Inserted { hash, .. } = store.insert_object(&data).unwrap();
    let (_, address) = pubkey(in_an_hour());
    store.sync().unwrap();
    store.close().unwrap();

    let closed = |result: Result<(), StoreError>| matches!(result, Err(StoreError::Closed));
    assert!(closed(store.exists_object(&hash).map(drop)));
    assert!(closed(store.fetch_object_by_hash(&hash).map(drop)));
    assert!(closed(store.fetch_object_by_counter(ObjectType::MSG, 1).map(drop)));
    assert!(closed(store.fetch_objects_from_counter(ObjectType::MSG, 1, 5).map(drop)));
    assert!(closed(store.fetch_identity_by_address(&address).map(drop)));
    assert!(closed(store.exists_get_pubkey_request(&address).map(drop)));
    assert!(closed(store.fetch_random_object().map(drop)));
    assert!(closed(store.get_counter(ObjectType::MSG).map(drop)));
    assert!(closed(store.insert_object(&data).map(drop)));
    assert!(closed(store.remove_object(&hash)));
    assert!(closed(store.remove_object_by_counter(ObjectType::MSG, 1)));
    assert!(closed(store.remove_expired_objects().map(drop)));
    assert!(closed(store.remove_pubkey_tag(&address.tag())));
    assert!(closed(store.sync()));
    assert!(closed(store.close()));
    assert!(closed(store.rollback_close()));
}

#[test]
fn a_fresh_open_starts_empty() {
    let registry = DriverRegistry::with_builtin();
    let options = StoreOptions::default();
    let store = registry.create(MEMDB_DRIVER, &options).unwrap();
    let data = object(ObjectType::MSG, 1, in_an_hour());
    store.insert_object(&data).unwrap();
    store.close().unwrap();

    let reopened = registry.open(MEMDB_DRIVER, &options).unwrap();
    assert!(!reopened.exists_object(&inventory_hash(&data)).unwrap());
    assert_eq!(reopened.get_counter(ObjectType::MSG).unwrap(), 0);
}
