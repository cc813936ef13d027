//! Named store drivers.
//!
//! A [`DriverRegistry`] maps driver names to constructors. It is an ordinary
//! value: callers build one, register what they need, and pass it around.

use std::sync::Arc;

use tracing::debug;

use crate::config::StoreOptions;
use crate::error::{StoreError, StoreResult};
use crate::memory::{create_memdb, open_memdb, MEMDB_DRIVER};
use crate::traits::ObjectStore;

/// Constructor shared by `create` and `open`.
pub type DriverFn = fn(&StoreOptions) -> StoreResult<Arc<dyn ObjectStore>>;

/// A named pair of constructors.
#[derive(Clone, Copy, Debug)]
pub struct Driver {
    pub name: &'static str,
    /// Build a new, empty store.
    pub create: DriverFn,
    /// Open an existing store.
    pub open: DriverFn,
}

#[derive(Clone, Debug, Default)]
pub struct DriverRegistry {
    drivers: Vec<Driver>,
}

impl DriverRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every driver this crate ships.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.add_driver(Driver {
            name: MEMDB_DRIVER,
            create: create_memdb,
            open: open_memdb,
        });
        registry
    }

    /// Register `driver`. The first registration of a name wins; returns
    /// `false` if the name was already taken.
    pub fn add_driver(&mut self, driver: Driver) -> bool {
        if self.find(driver.name).is_ok() {
            debug!(driver = driver.name, "driver already registered");
            return false;
        }
        self.drivers.push(driver);
        true
    }

    pub fn create(&self, name: &str, options: &StoreOptions) -> StoreResult<Arc<dyn ObjectStore>> {
        let driver = self.find(name)?;
        debug!(driver = name, "creating store");
        (driver.create)(options)
    }

    pub fn open(&self, name: &str, options: &StoreOptions) -> StoreResult<Arc<dyn ObjectStore>> {
        let driver = self.find(name)?;
        debug!(driver = name, "opening store");
        (driver.open)(options)
    }

    /// Registered driver names, in registration order.
    pub fn supported_drivers(&self) -> Vec<&'static str> {
        self.drivers.iter().map(|driver| driver.name).collect()
    }

    fn find(&self, name: &str) -> StoreResult<&Driver> {
        self.drivers
            .iter()
            .find(|driver| driver.name == name)
            .ok_or_else(|| StoreError::UnknownDriver(name.to_string()))
    }
}
