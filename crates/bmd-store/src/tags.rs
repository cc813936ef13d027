//! Tag index: public-key tag to the most recent pubkey object carrying it.
//!
//! The tag index holds its own copy of the object bytes. It is not kept in
//! step with the hash index: removing an object by hash leaves its tag entry
//! alone, and removing a tag leaves the object stored.

use std::collections::HashMap;

use bmd_crypto::PublicIdentity;
use bmd_types::Tag;
use bmd_wire::PubKeyObject;

use crate::error::StoreResult;
use crate::object::StoredObject;

#[derive(Debug, Default)]
pub struct TagIndex {
    by_tag: HashMap<Tag, Vec<u8>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `tag`. Returns `true` if an older entry was
    /// replaced.
    pub fn upsert(&mut self, tag: Tag, data: Vec<u8>) -> bool {
        self.by_tag.insert(tag, data).is_some()
    }

    pub fn get(&self, tag: &Tag) -> Option<&[u8]> {
        self.by_tag.get(tag).map(Vec::as_slice)
    }

    pub fn remove(&mut self, tag: &Tag) -> Option<Vec<u8>> {
        self.by_tag.remove(tag)
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.by_tag.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

/// Derive the tag a `pubkey` object is indexed under.
///
/// Version 2 and 3 pubkeys carry plaintext keys: the identity is rebuilt and
/// its address tag computed. Version 4 pubkeys carry the tag directly.
pub fn pubkey_tag(object: &StoredObject) -> StoreResult<Tag> {
    let (_, pubkey) = PubKeyObject::decode(&object.data)?;
    match pubkey {
        PubKeyObject::Encrypted { tag, .. } => Ok(tag),
        plain => {
            let identity = PublicIdentity::from_pubkey(object.stream, &plain)?;
            Ok(identity.address.tag())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmd_crypto::{ripe_from_keys, Address};
    use chrono::{DateTime, Utc};

    fn expires() -> DateTime<Utc> {
        DateTime::from_timestamp(1_800_000_000, 0).unwrap()
    }

    #[test]
    fn upsert_reports_replacement() {
        let mut index = TagIndex::new();
        let tag = Tag::from_bytes([1; 32]);
        assert!(!index.upsert(tag, vec![1]));
        assert!(index.upsert(tag, vec![2]));
        assert_eq!(index.get(&tag), Some(&[2u8][..]));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn remove_returns_bytes() {
        let mut index = TagIndex::new();
        let tag = Tag::from_bytes([1; 32]);
        index.upsert(tag, vec![7]);
        assert_eq!(index.remove(&tag), Some(vec![7]));
        assert!(!index.contains(&tag));
        assert!(index.is_empty());
    }

    #[test]
    fn encrypted_pubkey_tag_is_read_directly() {
        let tag = Tag::from_bytes([98; 32]);
        let data = PubKeyObject::Encrypted {
            tag,
            encrypted: vec![1, 2, 3],
        }
        .encode(1, expires(), 1);
        let object = StoredObject::decode(&data).unwrap();
        assert_eq!(pubkey_tag(&object).unwrap(), tag);
    }

    #[test]
    fn plain_pubkey_tag_is_derived_from_address() {
        let data = PubKeyObject::Simple {
            behavior: 1,
            signing_key: [5; 64],
            encryption_key: [6; 64],
        }
        .encode(1, expires(), 1);
        let object = StoredObject::decode(&data).unwrap();
        let address = Address::new(2, 1, ripe_from_keys(&[5; 64], &[6; 64])).unwrap();
        assert_eq!(pubkey_tag(&object).unwrap(), address.tag());
    }

    #[test]
    fn malformed_pubkey_fails() {
        let data = bmd_wire::ObjectHeader::new(1, expires(), bmd_types::ObjectType::PUBKEY, 3, 1)
            .encode_with_payload(&[0, 0, 0, 1]);
        let object = StoredObject::decode(&data).unwrap();
        assert!(pubkey_tag(&object).is_err());
    }
}
