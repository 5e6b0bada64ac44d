//! RocksDB-backed volume store
//!
//! Records live in the `catalog` column family, keyed by barcode and
//! encoded with bincode. Writes run inside a pessimistic transaction so
//! two requests racing on one barcode are ordered by RocksDB's row locks,
//! not by anything in this process.

use crate::catalog::store::VolumeStore;
use crate::catalog::volume::Volume;
use crate::common::{Error, Result};
use rocksdb::{
    ColumnFamily, IteratorMode, Options, Transaction, TransactionDB, TransactionDBOptions,
};
use std::path::Path;
use tracing::{info, instrument};

const CF_CATALOG: &str = "catalog";

pub struct RocksStore {
    db: TransactionDB,
}

impl RocksStore {
    /// Open or create the catalog database
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = TransactionDB::open_cf(
            &opts,
            &TransactionDBOptions::default(),
            path,
            [CF_CATALOG],
        )?;
        info!("Catalog store opened");

        Ok(Self { db })
    }

    fn cf(&self) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(CF_CATALOG)
            .ok_or_else(|| Error::Store(format!("missing column family {}", CF_CATALOG)))
    }

    /// Runs `f` inside one transaction and commits when it succeeds.
    fn with_txn<T>(
        &self,
        f: impl FnOnce(&Transaction<'_, TransactionDB>, &ColumnFamily) -> Result<T>,
    ) -> Result<T> {
        let cf = self.cf()?;
        let txn = self.db.transaction();
        let out = f(&txn, cf)?;
        txn.commit()?;
        Ok(out)
    }
}

fn encode(volume: &Volume) -> Result<Vec<u8>> {
    bincode::serialize(volume).map_err(|e| Error::Store(format!("Serialize error: {}", e)))
}

fn decode(bytes: &[u8]) -> Result<Volume> {
    bincode::deserialize(bytes).map_err(|e| Error::Store(format!("Corrupted volume row: {}", e)))
}

impl VolumeStore for RocksStore {
    fn list_all(&self) -> Result<Vec<Volume>> {
        let cf = self.cf()?;
        let iter = self.db.iterator_cf(cf, IteratorMode::Start);

        let mut volumes = Vec::new();
        for item in iter {
            let (_, value) = item?;
            volumes.push(decode(&value)?);
        }
        Ok(volumes)
    }

    fn get(&self, barcode: &str) -> Result<Volume> {
        let cf = self.cf()?;
        match self.db.get_cf(cf, barcode.as_bytes())? {
            Some(bytes) => decode(&bytes),
            None => Err(Error::NotFound(barcode.to_string())),
        }
    }

    fn insert(&self, volume: &Volume) -> Result<()> {
        let value = encode(volume)?;
        self.with_txn(|txn, cf| {
            let key = volume.barcode.as_bytes();
            if txn.get_for_update_cf(cf, key, true)?.is_some() {
                return Err(Error::Conflict(volume.barcode.clone()));
            }
            txn.put_cf(cf, key, value)?;
            Ok(())
        })
    }

    fn update(&self, volume: &Volume) -> Result<()> {
        let value = encode(volume)?;
        self.with_txn(|txn, cf| {
            let key = volume.barcode.as_bytes();
            if txn.get_for_update_cf(cf, key, true)?.is_none() {
                return Err(Error::NotFound(volume.barcode.clone()));
            }
            txn.put_cf(cf, key, value)?;
            Ok(())
        })
    }

    fn delete(&self, barcode: &str) -> Result<Volume> {
        self.with_txn(|txn, cf| {
            let key = barcode.as_bytes();
            let existing = txn
                .get_for_update_cf(cf, key, true)?
                .ok_or_else(|| Error::NotFound(barcode.to_string()))?;
            let volume = decode(&existing)?;
            txn.delete_cf(cf, key)?;
            Ok(volume)
        })
    }
}
