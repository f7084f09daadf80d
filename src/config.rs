//! Application configuration management.
//!
//! Configuration is read from environment variables. The `envy` crate
//! deserializes them into a type-safe struct; an optional `.env` file is
//! loaded first with `dotenvy`.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `STORAGE_DIR` (optional): root directory of the object store, defaults to `./storage`
/// - `ACCESS_TOKEN_TTL_HOURS` (optional): access token lifetime, defaults to 48
/// - `REFRESH_TOKEN_TTL_HOURS` (optional): refresh token lifetime, defaults to 720
/// - `UPLOAD_MAX_BYTES` (optional): upload body limit, defaults to 10 MiB
/// - `SEED_ADMIN_EMAIL` / `SEED_ADMIN_PASSWORD` (optional): credentials of the seeded admin
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    #[serde(default = "default_access_token_ttl_hours")]
    pub access_token_ttl_hours: i64,

    #[serde(default = "default_refresh_token_ttl_hours")]
    pub refresh_token_ttl_hours: i64,

    #[serde(default = "default_upload_max_bytes")]
    pub upload_max_bytes: usize,

    #[serde(default = "default_seed_admin_email")]
    pub seed_admin_email: String,

    #[serde(default = "default_seed_admin_password")]
    pub seed_admin_password: String,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

fn default_storage_dir() -> String {
    "./storage".to_string()
}

fn default_access_token_ttl_hours() -> i64 {
    48
}

fn default_refresh_token_ttl_hours() -> i64 {
    24 * 30
}

fn default_upload_max_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_seed_admin_email() -> String {
    "admin@example.com".to_string()
}

fn default_seed_admin_password() -> String {
    "admin".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are converted automatically: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }

    /// Token lifetimes as `chrono` durations.
    pub fn session_lifetimes(&self) -> SessionLifetimes {
        SessionLifetimes {
            access: chrono::Duration::hours(self.access_token_ttl_hours),
            refresh: chrono::Duration::hours(self.refresh_token_ttl_hours),
        }
    }
}

/// Independent expiries of the two tokens of a session.
#[derive(Debug, Clone, Copy)]
pub struct SessionLifetimes {
    pub access: chrono::Duration,
    pub refresh: chrono::Duration,
}

impl Default for SessionLifetimes {
    fn default() -> Self {
        Self {
            access: chrono::Duration::hours(default_access_token_ttl_hours()),
            refresh: chrono::Duration::hours(default_refresh_token_ttl_hours()),
        }
    }
}
