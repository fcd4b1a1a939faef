//! Catalog: the product persistence boundary (`CatalogStore`) and the
//! business layer over it (`CatalogService`).

pub mod file_store;
pub mod service;
pub mod store;

pub use file_store::JsonFileCatalogStore;
pub use service::CatalogService;
pub use store::CatalogStore;
