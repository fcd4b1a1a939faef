use axum::Json;
use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct ProductDoc {
    pub id: String,
    pub link: String,
    pub category: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(ToSchema)]
pub struct NewProductDoc { pub link: String, pub category: String }

#[derive(ToSchema)]
pub struct AddProductResponseDoc { pub message: String, pub product: ProductDoc }

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginResponseDoc { pub message: String, pub token: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::products::list_products,
        crate::routes::products::list_categories,
        crate::routes::products::create_product,
        crate::routes::products::delete_product,
    ),
    components(
        schemas(
            HealthResponse,
            ProductDoc,
            NewProductDoc,
            AddProductResponseDoc,
            LoginRequest,
            LoginResponseDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth", description = "Admin login"),
        (name = "products", description = "Affiliate product catalog"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
