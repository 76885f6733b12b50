//! # Rollcall Config
//!
//! Configuration types for the Rollcall API.
//!
//! Every structure is loaded from environment variables (a `.env` file is
//! read by the binaries through `dotenvy` before any of these are built):
//!
//! - [`database`]: PostgreSQL connection settings
//! - [`server`]: Listen address
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`observability`]: Log directory, OTLP export and metrics switch
//!
//! # Example
//!
//! ```ignore
//! use rollcall_config::{CorsConfig, DatabaseConfig, ServerConfig};
//!
//! let database = DatabaseConfig::from_env()?;
//! let server = ServerConfig::from_env();
//! let cors = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod observability;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use observability::ObservabilityConfig;
pub use server::ServerConfig;

/// Reads `key` and parses it, falling back to `default` when unset or invalid.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
