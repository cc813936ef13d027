//! Expiration policy for the sweep.

use bmd_types::ObjectType;
use chrono::{DateTime, Duration, Utc};

use crate::object::StoredObject;

/// Objects are kept this long past their expiry, since peers keep relaying
/// them for a while after it.
pub const DEFAULT_EXPIRY_GRACE_SECS: u64 = 3 * 60 * 60;

// Upper bound accepted by `chrono::Duration::seconds`.
const MAX_GRACE_SECS: u64 = (i64::MAX / 1000) as u64;

/// Decides which objects a sweep evicts.
///
/// Pubkeys are exempt: an address refers to its key indefinitely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpiryPolicy {
    grace: Duration,
}

impl ExpiryPolicy {
    pub fn new(grace_secs: u64) -> Self {
        Self {
            grace: Duration::seconds(grace_secs.min(MAX_GRACE_SECS) as i64),
        }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Returns `true` if `object` is past its expiry plus the grace period
    /// at `now` and is not exempt.
    pub fn should_evict(&self, object: &StoredObject, now: DateTime<Utc>) -> bool {
        if object.object_type == ObjectType::PUBKEY {
            return false;
        }
        match now.checked_sub_signed(self.grace) {
            Some(cutoff) => cutoff > object.expires_at,
            None => false,
        }
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRY_GRACE_SECS)
    }
}
