use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: Server,
    pub auth: Auth,
    pub storage: Storage,
}

/// Network settings for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    /// The interface to bind (e.g., "0.0.0.0").
    pub host: String,
    pub port: u16,
}

/// Token issuance settings and the bootstrap credentials accepted by login.
#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
    /// The HMAC secret used to sign bearer tokens. Must be kept private.
    pub secret_key: String,
    /// How long an issued token stays valid.
    pub token_ttl_hours: u64,
    pub admin_username: String,
    pub admin_password: String,
}

/// Selects which storage backend the server runs against.
#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// The mutex-guarded in-process store. State is lost on restart.
    Memory,
    /// PostgreSQL over a pooled connection; needs DATABASE_URL.
    Postgres,
}
