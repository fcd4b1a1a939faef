use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{info, instrument, warn};

use super::domain::{AdminClaims, AdminSession, LoginInput};
use super::errors::AuthError;

/// Admin auth configuration
#[derive(Clone)]
pub struct AdminAuthConfig {
    pub username: String,
    /// Argon2 PHC string; takes precedence over `password`.
    pub password_hash: Option<String>,
    /// Plaintext password, hashed once in `AdminAuthService::new`.
    pub password: Option<String>,
    pub jwt_secret: String,
    pub session_ttl: Duration,
}

/// Authenticates the single admin and issues/verifies session tokens.
pub struct AdminAuthService {
    username: String,
    password_hash: String,
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

/// Hash a password with argon2 and a random salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}

impl AdminAuthService {
    pub fn new(cfg: AdminAuthConfig) -> Result<Self, AuthError> {
        if cfg.jwt_secret.is_empty() {
            return Err(AuthError::Config("jwt secret must not be empty".into()));
        }
        if cfg.session_ttl <= Duration::zero() {
            return Err(AuthError::Config("session ttl must be positive".into()));
        }
        let password_hash = match (cfg.password_hash, cfg.password) {
            (Some(hash), _) => {
                PasswordHash::new(&hash).map_err(|e| AuthError::Config(format!("admin password hash: {e}")))?;
                hash
            }
            (None, Some(plain)) => hash_password(&plain)?,
            (None, None) => return Err(AuthError::Config("no admin password configured".into())),
        };

        Ok(Self {
            username: cfg.username,
            password_hash,
            encoding: EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            ttl: cfg.session_ttl,
        })
    }

    pub fn session_ttl(&self) -> Duration {
        self.ttl
    }

    /// Check the admin credentials and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AdminAuthConfig, AdminAuthService, domain::LoginInput};
    /// let svc = AdminAuthService::new(AdminAuthConfig {
    ///     username: "admin".into(),
    ///     password_hash: None,
    ///     password: Some("Passw0rd".into()),
    ///     jwt_secret: "secret".into(),
    ///     session_ttl: chrono::Duration::hours(24),
    /// }).unwrap();
    /// let session = svc.login(LoginInput { username: "admin".into(), password: "Passw0rd".into() }).unwrap();
    /// assert_eq!(svc.verify(&session.token).unwrap().sub, "admin");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub fn login(&self, input: LoginInput) -> Result<AdminSession, AuthError> {
        let parsed = PasswordHash::new(&self.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        let password_ok = Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed)
            .is_ok();
        if input.username != self.username || !password_ok {
            warn!("admin_login_rejected");
            return Err(AuthError::Unauthorized);
        }

        let session = self.issue_at(Utc::now())?;
        info!(expires_at = %session.expires_at, "admin_login");
        Ok(session)
    }

    /// Sign a session token for the admin as of `now`.
    pub fn issue_at(&self, now: DateTime<Utc>) -> Result<AdminSession, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::TokenError("session expiry out of range".into()))?;
        let claims = AdminClaims {
            sub: self.username.clone(),
            iat: now.timestamp().max(0) as usize,
            exp: expires_at.timestamp().max(0) as usize,
        };
        let token = encode(&JwtHeader::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(AdminSession { token, expires_at })
    }

    /// Validate signature, expiry and subject of a presented token.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.sub = Some(self.username.clone());
        decode::<AdminClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::Unauthorized)
    }
}
