//! Volume store abstraction
//!
//! The catalog service only talks to storage through [`VolumeStore`].
//! `MemStore` keeps records in memory (tests, throwaway runs);
//! [`RocksStore`](crate::catalog::rocks::RocksStore) is the durable backend.

use crate::catalog::volume::Volume;
use crate::common::{Error, Result};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Durable home of volume records, keyed by barcode.
///
/// Implementations must be safe to share between concurrent requests and
/// each call is a single atomic operation against the store.
pub trait VolumeStore: Send + Sync {
    /// Snapshot of every record at call time, in storage order.
    fn list_all(&self) -> Result<Vec<Volume>>;

    /// Fails with `Error::NotFound` when no record has this barcode.
    fn get(&self, barcode: &str) -> Result<Volume>;

    /// Fails with `Error::Conflict` when the barcode is already taken.
    fn insert(&self, volume: &Volume) -> Result<()>;

    /// Replaces the record named by `volume.barcode`.
    fn update(&self, volume: &Volume) -> Result<()>;

    /// Removes the record and returns it as it was stored.
    fn delete(&self, barcode: &str) -> Result<Volume>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemStore {
    map: Mutex<BTreeMap<String, Volume>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Volume>>> {
        self.map
            .lock()
            .map_err(|_| Error::Store("memory store lock poisoned".into()))
    }
}

impl VolumeStore for MemStore {
    fn list_all(&self) -> Result<Vec<Volume>> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn get(&self, barcode: &str) -> Result<Volume> {
        self.lock()?
            .get(barcode)
            .cloned()
            .ok_or_else(|| Error::NotFound(barcode.to_string()))
    }

    fn insert(&self, volume: &Volume) -> Result<()> {
        let mut map = self.lock()?;
        if map.contains_key(&volume.barcode) {
            return Err(Error::Conflict(volume.barcode.clone()));
        }
        map.insert(volume.barcode.clone(), volume.clone());
        Ok(())
    }

    fn update(&self, volume: &Volume) -> Result<()> {
        let mut map = self.lock()?;
        match map.get_mut(&volume.barcode) {
            Some(slot) => {
                *slot = volume.clone();
                Ok(())
            }
            None => Err(Error::NotFound(volume.barcode.clone())),
        }
    }

    fn delete(&self, barcode: &str) -> Result<Volume> {
        self.lock()?
            .remove(barcode)
            .ok_or_else(|| Error::NotFound(barcode.to_string()))
    }
}
