use std::path::{Path, PathBuf};

use async_trait::async_trait;
use models::Product;

use crate::catalog::store::CatalogStore;
use crate::errors::ServiceError;
use crate::storage::json_list_store::JsonListStore;

/// Catalog persisted as a pretty-printed JSON array at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileCatalogStore {
    store: JsonListStore<Product>,
}

impl JsonFileCatalogStore {
    /// Open the catalog document, creating an empty one if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let store = JsonListStore::open(path).await?;
        Ok(Self { store })
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }
}

#[async_trait]
impl CatalogStore for JsonFileCatalogStore {
    async fn load(&self) -> Result<Vec<Product>, ServiceError> {
        self.store.read_all().await
    }

    async fn save(&self, products: &[Product]) -> Result<(), ServiceError> {
        self.store.write_all(products).await
    }
}
