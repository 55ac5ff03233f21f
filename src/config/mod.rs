/// Configuration management for the RegTime backend
///
/// Handles server binding, the hosted data service connection, and the contact form embed.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Hosted data service configuration
    pub database: DatabaseConfig,
    /// Contact form embed configuration
    pub form: FormConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Connection settings for the hosted database and auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Service root, e.g. "https://xyz.supabase.co". REST lives under /rest/v1, auth under /auth/v1
    pub url: String,
    /// Anonymous API key, sent both as `apikey` and as the bearer token
    pub anon_key: String,
}

/// Third-party form embed settings
///
/// Values are kept raw here; trimming and validation happen in `forms::FormEmbedConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub portal_id: String,
    pub form_id: String,
    pub region: String,
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("REGTIME_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("REGTIME_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
            },
            database: DatabaseConfig {
                url: std::env::var("SUPABASE_URL")
                    .unwrap_or_else(|_| "http://localhost:54321".to_string()),
                anon_key: std::env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            },
            form: FormConfig {
                portal_id: std::env::var("HUBSPOT_PORTAL_ID").unwrap_or_default(),
                form_id: std::env::var("HUBSPOT_FORM_ID").unwrap_or_default(),
                region: std::env::var("HUBSPOT_REGION").unwrap_or_else(|_| "na1".to_string()),
            },
        }
    }
}
