use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use models::{NewProduct, Product};
use serde::{Deserialize, Serialize};
use service::auth::domain::AdminClaims;
use tracing::info;

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct AddProductOutput {
    pub message: &'static str,
    pub product: Product,
}

#[derive(Serialize)]
pub struct DeleteProductOutput {
    pub message: &'static str,
    pub id: String,
}

/// List products, optionally narrowed to one exact category
#[utoipa::path(get, path = "/api/products", tag = "products", params(("category" = Option<String>, Query, description = "Exact, case-sensitive category filter")), responses((status = 200, description = "Products in insertion order", body = [crate::openapi::ProductDoc]), (status = 500, description = "Store unreadable", body = crate::openapi::ErrorDoc)))]
pub async fn list_products(
    State(state): State<ServerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, JsonApiError> {
    let Query(q) = query.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    state
        .catalog
        .list_by_category(q.category.as_deref())
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to read products"))
}

#[utoipa::path(get, path = "/api/categories", tag = "products", responses((status = 200, description = "Predefined and in-use categories, sorted", body = [String]), (status = 500, description = "Store unreadable", body = crate::openapi::ErrorDoc)))]
pub async fn list_categories(State(state): State<ServerState>) -> Result<Json<Vec<String>>, JsonApiError> {
    state
        .catalog
        .list_categories()
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to read categories"))
}

#[utoipa::path(post, path = "/api/products", tag = "products", request_body = crate::openapi::NewProductDoc, responses((status = 200, description = "Created", body = crate::openapi::AddProductResponseDoc), (status = 400, description = "Missing fields or invalid URL", body = crate::openapi::ErrorDoc), (status = 401, description = "Unauthorized", body = crate::openapi::ErrorDoc), (status = 500, description = "Store unavailable", body = crate::openapi::ErrorDoc)))]
pub async fn create_product(
    State(state): State<ServerState>,
    Extension(admin): Extension<AdminClaims>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<Json<AddProductOutput>, JsonApiError> {
    let Json(input) = payload.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    let product = state
        .catalog
        .add_product(input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to add product"))?;
    info!(admin = %admin.sub, product_id = %product.id, "admin added product");
    Ok(Json(AddProductOutput { message: "Product added successfully", product }))
}

#[utoipa::path(delete, path = "/api/products/{id}", tag = "products", params(("id" = String, Path, description = "Product id")), responses((status = 200, description = "Deleted"), (status = 401, description = "Unauthorized", body = crate::openapi::ErrorDoc), (status = 404, description = "Unknown id", body = crate::openapi::ErrorDoc)))]
pub async fn delete_product(
    State(state): State<ServerState>,
    Extension(admin): Extension<AdminClaims>,
    Path(id): Path<String>,
) -> Result<Json<DeleteProductOutput>, JsonApiError> {
    let removed = state
        .catalog
        .delete_product(&id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to delete product"))?;
    info!(admin = %admin.sub, product_id = %removed.id, "admin deleted product");
    Ok(Json(DeleteProductOutput { message: "Product deleted successfully", id: removed.id }))
}
