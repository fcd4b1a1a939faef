use async_trait::async_trait;
use models::Product;

use crate::errors::ServiceError;

/// Persistence boundary for the product collection.
///
/// The collection is one document: `load` returns it whole, `save` replaces it
/// whole. Callers do read-modify-write; implementations need no partial updates.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn load(&self) -> Result<Vec<Product>, ServiceError>;
    async fn save(&self, products: &[Product]) -> Result<(), ServiceError>;
}

/// In-memory stores for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryCatalogStore {
        products: Mutex<Vec<Product>>,
        saves: AtomicUsize,
    }

    impl InMemoryCatalogStore {
        pub fn with_products(products: Vec<Product>) -> Self {
            Self { products: Mutex::new(products), saves: AtomicUsize::new(0) }
        }

        /// Number of `save` calls so far.
        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        pub fn snapshot(&self) -> Vec<Product> {
            self.products.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogStore for InMemoryCatalogStore {
        async fn load(&self) -> Result<Vec<Product>, ServiceError> {
            Ok(self.products.lock().unwrap().clone())
        }

        async fn save(&self, products: &[Product]) -> Result<(), ServiceError> {
            *self.products.lock().unwrap() = products.to_vec();
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Store whose medium is always unreadable and unwritable.
    #[derive(Default)]
    pub struct UnavailableStore;

    #[async_trait]
    impl CatalogStore for UnavailableStore {
        async fn load(&self) -> Result<Vec<Product>, ServiceError> {
            Err(ServiceError::StorageUnavailable("medium offline".into()))
        }

        async fn save(&self, _products: &[Product]) -> Result<(), ServiceError> {
            Err(ServiceError::StorageUnavailable("medium offline".into()))
        }
    }
}
