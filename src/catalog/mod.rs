//! Volume catalog
//!
//! - `volume`: the record shape and its validation rules
//! - `store`: storage abstraction and the in-memory backend
//! - `rocks`: durable RocksDB backend
//! - `service`: CRUD operations, independent of transport
//! - `http`: REST binding for the service
//! - `server`: wiring and process lifecycle

pub mod http;
pub mod rocks;
pub mod server;
pub mod service;
pub mod store;
pub mod volume;

pub use rocks::RocksStore;
pub use server::CatalogServer;
pub use service::CatalogService;
pub use store::{MemStore, VolumeStore};
pub use volume::Volume;
