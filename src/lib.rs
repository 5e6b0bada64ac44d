//! # volume-catalog
//!
//! A catalog of removable storage media (tapes, disks) for backup and
//! archival systems:
//! - One flat record per volume, keyed by its barcode
//! - REST API for create, read, full-replace update and body-keyed delete
//! - RocksDB persistence with per-request transactions
//!
//! ## Architecture
//!
//! ```text
//! HTTP request
//!   │  catalog::http    (routing, status codes, JSON errors)
//!   ▼
//! catalog::service      (decode, validate, CRUD contract)
//!   │
//!   ▼
//! catalog::store        (VolumeStore trait: MemStore / RocksStore)
//! ```
//!
//! ## Usage
//!
//! ```bash
//! catalogd --bind 0.0.0.0:8080 --db ./catalog-data --log ./catalog.log
//!
//! curl -X POST localhost:8080/catalog -d @volume.json
//! curl localhost:8080/catalog/B001
//! ```

pub mod catalog;
pub mod common;

// Re-export commonly used types
pub use catalog::{CatalogServer, CatalogService, MemStore, RocksStore, Volume, VolumeStore};
pub use common::{Config, Error, Result};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
