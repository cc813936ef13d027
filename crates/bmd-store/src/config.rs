use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sweep::{ExpiryPolicy, DEFAULT_EXPIRY_GRACE_SECS};

/// Options passed to a driver when a store is created or opened.
///
/// Every field is optional in serialized form. Drivers reject options they
/// cannot honour instead of silently ignoring them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Storage location for persistent backends.
    pub path: Option<PathBuf>,
    /// Seconds an object is kept past its expiry before a sweep removes it.
    pub expiry_grace_secs: u64,
}

impl StoreOptions {
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::new(self.expiry_grace_secs)
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            path: None,
            expiry_grace_secs: DEFAULT_EXPIRY_GRACE_SECS,
        }
    }
}
