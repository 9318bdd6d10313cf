use axum_extra::extract::cookie::Key;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

const DEFAULT_SECRET_KEY: &str = "change-this-secret-key-in-production";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Runtime configuration, built once at startup and handed to the
/// components that need it. Every field can be overridden through the
/// environment variable of the same name in uppercase (`SECRET_KEY`,
/// `ADMIN_PASSWORD`, `DATABASE_URL`, `LISTEN_ADDR`, `LOGLEVEL`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    pub database_url: String,
    /// Master secret for the private session cookie jar. Falls back to a
    /// well-known insecure value when unset.
    pub secret_key: String,
    /// Seed for the `admin_password` setting on first startup.
    pub admin_password: String,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            database_url: "sqlite:feedback.db".to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(&[
                "listen_addr",
                "database_url",
                "secret_key",
                "admin_password",
                "loglevel",
            ]))
            .extract()
    }

    /// Signing/encryption key for the session cookie jar.
    /// `Key::derive_from` needs at least 32 bytes of material, so shorter
    /// secrets are cycled until the minimum is met.
    pub fn session_key(&self) -> Key {
        let secret = if self.secret_key.is_empty() {
            DEFAULT_SECRET_KEY
        } else {
            self.secret_key.as_str()
        };
        let mut material = secret.as_bytes().to_vec();
        while material.len() < 32 {
            material.extend_from_slice(secret.as_bytes());
        }
        Key::derive_from(&material)
    }
}
