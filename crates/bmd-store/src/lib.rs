//! Object store for bmd.
//!
//! Holds the network objects a node relays: a hash index keyed by inventory
//! hash, a per-type counter index that clients use as a sync cursor, and a
//! tag index resolving addresses to their most recent public key.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait and are constructed
//! through a [`DriverRegistry`]:
//!
//! - [`MemDb`] (`"memdb"`): volatile, single-lock store for tests and
//!   short-lived nodes
//!
//! # Design Rules
//!
//! 1. Objects are immutable once stored; only index membership changes.
//! 2. Counters per type start at 1, grow by one per insert, and are never
//!    reused, even after removal.
//! 3. Every hash referenced by a counter bucket is present in the hash index.
//!    A breach is a bug and panics.
//! 4. Returned bytes are always owned copies.
//! 5. Expired objects are removed only by an explicit sweep. Pubkeys are
//!    never swept.

pub mod backlog;
pub mod config;
pub mod counter;
pub mod error;
pub mod memory;
pub mod object;
pub mod registry;
pub mod sweep;
pub mod tags;
pub mod traits;

pub use backlog::BacklogCursor;
pub use config::StoreOptions;
pub use error::{StoreError, StoreResult};
pub use memory::{MemDb, MEMDB_DRIVER};
pub use object::StoredObject;
pub use registry::{Driver, DriverFn, DriverRegistry};
pub use sweep::{ExpiryPolicy, DEFAULT_EXPIRY_GRACE_SECS};
pub use traits::{CounterBatch, Inserted, ObjectStore};
