use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";
/// Upper bound for `auth.session_ttl_hours` (one year).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON document holding the whole product list.
    #[serde(default = "default_products_file")]
    pub products_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { products_file: default_products_file() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    /// Plaintext password, hashed with argon2 at startup. Ignored when a hash is set.
    #[serde(default)]
    pub admin_password: Option<String>,
    /// Argon2 PHC string, e.g. `$argon2id$v=19$...`.
    #[serde(default)]
    pub admin_password_hash: Option<String>,
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin_username(),
            admin_password: None,
            admin_password_hash: None,
            jwt_secret: None,
            session_ttl_hours: default_session_ttl_hours(),
            cookie_name: default_cookie_name(),
        }
    }
}

fn default_products_file() -> String { "data/products.json".into() }
fn default_admin_username() -> String { DEFAULT_ADMIN_USERNAME.into() }
fn default_session_ttl_hours() -> i64 { 24 }
fn default_cookie_name() -> String { "adminAuth".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is absent, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(path) = lookup("PRODUCTS_FILE") {
            self.storage.products_file = path;
        }
        if let Some(user) = lookup("ADMIN_USERNAME") {
            self.auth.admin_username = user;
        }
        if let Some(pass) = lookup("ADMIN_PASSWORD") {
            self.auth.admin_password = Some(pass);
        }
        if let Some(hash) = lookup("ADMIN_PASSWORD_HASH") {
            self.auth.admin_password_hash = Some(hash);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.auth.normalize_and_validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.products_file.trim().is_empty() {
            return Err(anyhow!("storage.products_file must not be empty"));
        }
        Ok(())
    }
}

impl AuthConfig {
    fn normalize_and_validate(&mut self) -> Result<()> {
        self.admin_username = self.admin_username.trim().to_string();
        if self.admin_username.is_empty() {
            return Err(anyhow!("auth.admin_username must not be empty"));
        }
        if matches!(&self.admin_password_hash, Some(h) if h.trim().is_empty()) {
            self.admin_password_hash = None;
        }
        if self.admin_password_hash.is_none() && self.admin_password.is_none() {
            self.admin_password = Some(DEFAULT_ADMIN_PASSWORD.to_string());
        }
        if matches!(&self.jwt_secret, Some(s) if s.is_empty()) {
            self.jwt_secret = None;
        }
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
            return Err(anyhow!("auth.session_ttl_hours must be within 1..={MAX_SESSION_TTL_HOURS}"));
        }
        if self.cookie_name.trim().is_empty() {
            self.cookie_name = default_cookie_name();
        }
        Ok(())
    }

    /// Secret used to sign session tokens, with the development fallback.
    pub fn jwt_secret_or_default(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or(DEV_JWT_SECRET)
    }

    pub fn uses_default_password(&self) -> bool {
        self.admin_password_hash.is_none()
            && self.admin_password.as_deref() == Some(DEFAULT_ADMIN_PASSWORD)
    }
}
