use std::sync::Arc;

use chrono::Utc;
use models::{available_categories, filter_by_category, NewProduct, Product};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::store::CatalogStore;
use crate::errors::ServiceError;

/// Validation and mutation rules over a `CatalogStore`.
///
/// Mutations run under a writer lock so concurrent adds/deletes in this
/// process are applied one after another instead of overwriting each other.
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    write_lock: Mutex<()>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store, write_lock: Mutex::new(()) }
    }

    /// All products, oldest first.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        self.store.load().await
    }

    /// Products whose category equals `category`; `None`/empty lists everything.
    pub async fn list_by_category(&self, category: Option<&str>) -> Result<Vec<Product>, ServiceError> {
        let products = self.list_products().await?;
        Ok(filter_by_category(products, category))
    }

    /// Predefined categories merged with the ones in use, sorted.
    pub async fn list_categories(&self) -> Result<Vec<String>, ServiceError> {
        let products = self.list_products().await?;
        Ok(available_categories(&products))
    }

    /// Validate and append a product.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::NewProduct;
    /// use service::catalog::{CatalogService, store::mock::InMemoryCatalogStore};
    /// let svc = CatalogService::new(Arc::new(InMemoryCatalogStore::default()));
    /// let p = tokio_test::block_on(svc.add_product(NewProduct::new("https://amzn.to/x", " Books "))).unwrap();
    /// assert_eq!(p.category, "Books");
    /// let all = tokio_test::block_on(svc.list_products()).unwrap();
    /// assert_eq!(all, vec![p]);
    /// ```
    #[instrument(skip(self, input))]
    pub async fn add_product(&self, input: NewProduct) -> Result<Product, ServiceError> {
        let (link, category) = input.validate().map_err(|e| {
            debug!(error = %e, "product rejected");
            ServiceError::from(e)
        })?;

        let _guard = self.write_lock.lock().await;
        let mut products = self.store.load().await?;
        let product = Product::create(link, category, Utc::now(), &products);
        products.push(product.clone());
        self.store.save(&products).await?;

        info!(product_id = %product.id, category = %product.category, total = products.len(), "product_added");
        Ok(product)
    }

    /// Remove the product with `id` and persist; returns the removed record.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> Result<Product, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.store.load().await?;
        let Some(pos) = products.iter().position(|p| p.id == id) else {
            warn!(product_id = %id, "delete of unknown product");
            return Err(ServiceError::not_found("product"));
        };
        let removed = products.remove(pos);
        self.store.save(&products).await?;

        info!(product_id = %removed.id, total = products.len(), "product_deleted");
        Ok(removed)
    }
}
