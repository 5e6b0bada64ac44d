//! Catalog service: the CRUD contract over a [`VolumeStore`]
//!
//! Operations take raw payload bytes, so a body that fails to decode is
//! rejected here with `Error::Validation` and never reaches the store.
//! Nothing here is transport-specific.

use crate::catalog::store::VolumeStore;
use crate::catalog::volume::{validate_barcode, Volume};
use crate::common::{Error, Result};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn VolumeStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn VolumeStore>) -> Self {
        Self { store }
    }

    // === Collection operations ===

    /// Every volume currently in the catalog
    pub fn list_volumes(&self) -> Result<Vec<Volume>> {
        let volumes = self.store.list_all().inspect_err(|e| log_failure("list", "*", e))?;
        debug!(count = volumes.len(), "Listed volumes");
        Ok(volumes)
    }

    /// Decode, validate and insert a new volume.
    pub fn create_volume(&self, payload: &[u8]) -> Result<Volume> {
        let volume = Volume::from_json(payload).inspect_err(|e| log_failure("create", "-", e))?;
        volume
            .validate()
            .and_then(|_| self.store.insert(&volume))
            .inspect_err(|e| log_failure("create", &volume.barcode, e))?;

        debug!(
            barcode = %volume.barcode,
            free_bytes = volume.free_bytes(),
            "Created volume"
        );
        Ok(volume)
    }

    // === Single-resource operations ===

    pub fn get_volume(&self, barcode: &str) -> Result<Volume> {
        self.store
            .get(barcode)
            .inspect_err(|e| log_failure("get", barcode, e))
    }

    /// Replace the whole record for `barcode` with the payload.
    ///
    /// The payload's barcode must match the one in the path.
    pub fn update_volume(&self, barcode: &str, payload: &[u8]) -> Result<Volume> {
        let volume = Volume::from_json(payload)
            .and_then(|v| check_same_barcode(barcode, v))
            .inspect_err(|e| log_failure("update", barcode, e))?;
        volume
            .validate()
            .and_then(|_| self.store.update(&volume))
            .inspect_err(|e| log_failure("update", barcode, e))?;

        debug!(
            barcode = %volume.barcode,
            free_bytes = volume.free_bytes(),
            "Updated volume"
        );
        Ok(volume)
    }

    /// Delete the record named by the barcode in the payload.
    ///
    /// Returns the record as it was stored right before removal.
    pub fn delete_volume(&self, barcode: &str, payload: &[u8]) -> Result<Volume> {
        let removed = Volume::from_json(payload)
            .and_then(|v| check_same_barcode(barcode, v))
            .and_then(|v| self.store.delete(&v.barcode))
            .inspect_err(|e| log_failure("delete", barcode, e))?;

        debug!(barcode = %removed.barcode, "Deleted volume");
        Ok(removed)
    }
}

fn check_same_barcode(path_barcode: &str, volume: Volume) -> Result<Volume> {
    validate_barcode(&volume.barcode)?;
    if volume.barcode != path_barcode {
        return Err(Error::Validation(format!(
            "body barcode {:?} does not match path barcode {:?}",
            volume.barcode, path_barcode
        )));
    }
    Ok(volume)
}

fn log_failure(op: &str, barcode: &str, err: &Error) {
    if err.is_client_error() {
        debug!(op, barcode, kind = err.kind(), "Rejected: {}", err);
    } else {
        warn!(op, barcode, kind = err.kind(), "Store failure: {}", err);
    }
}
