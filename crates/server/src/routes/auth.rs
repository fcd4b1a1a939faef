use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use tracing::{error, warn};

use service::auth::{domain::LoginInput, AdminAuthService};
use service::catalog::CatalogService;

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<CatalogService>,
    pub auth: Arc<AdminAuthService>,
    /// Name of the session cookie set on login.
    pub cookie_name: String,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub message: &'static str,
    pub token: String,
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in; session cookie set", body = crate::openapi::LoginResponseDoc), (status = 401, description = "Invalid credentials", body = crate::openapi::ErrorDoc)))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let Json(input) = payload.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    let session = state.auth.login(input).map_err(|e| {
        if e.is_client_error() {
            return JsonApiError::new(StatusCode::UNAUTHORIZED, "Invalid credentials");
        }
        error!(err = %e, code = e.code(), "login failed");
        JsonApiError::internal("Authentication failed")
    })?;

    let cookie = session_cookie(&state.cookie_name, &session.token, state.auth.session_ttl().num_seconds())?;
    let out = LoginOutput { message: "Login successful", token: session.token };
    Ok((jar.add(cookie), Json(out)))
}

pub async fn logout(State(state): State<ServerState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    // always emit the expired cookie, even if the request carried none
    let mut expired = Cookie::build((state.cookie_name.clone(), "")).path("/").http_only(true).build();
    expired.make_removal();
    (jar.add(expired), StatusCode::NO_CONTENT)
}

/// HttpOnly, path-wide session cookie expiring with the token.
fn session_cookie(name: &str, token: &str, max_age_secs: i64) -> Result<Cookie<'static>, JsonApiError> {
    Cookie::parse(format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")).map_err(|e| {
        error!(err = %e, "session cookie build failed");
        JsonApiError::internal("Authentication failed")
    })
}

/// Admin middleware: requires `Authorization: Bearer <token>`, falling back to
/// the session cookie when the header is absent. Verified claims are stored in
/// request extensions.
pub async fn require_admin(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();

    let token = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => {
            let value = value.to_str().unwrap_or_default();
            match value.strip_prefix("Bearer ") {
                Some(t) if !t.trim().is_empty() => t.trim().to_string(),
                _ => {
                    warn!(path = %path, "invalid Authorization format (expect Bearer)");
                    return Err(JsonApiError::unauthorized());
                }
            }
        }
        None => match CookieJar::from_headers(req.headers()).get(&state.cookie_name) {
            Some(c) if !c.value().is_empty() => c.value().to_string(),
            _ => {
                warn!(path = %path, "missing Authorization header and session cookie");
                return Err(JsonApiError::unauthorized());
            }
        },
    };

    match state.auth.verify(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(path = %path, err = %e, "token validation failed");
            Err(JsonApiError::unauthorized())
        }
    }
}
