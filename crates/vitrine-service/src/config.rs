use std::env;

use tracing::info;

/// Environment-driven service configuration. Only the database URL is
/// mandatory; everything else has a sensible default for local runs.
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
}

impl Config {
    pub fn load() -> Self {
        let database_url =
            env::var("DATABASE_URL").expect("DATABASE_URL environment variable must be set");

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| {
            let default = "0.0.0.0:3000".to_string();
            info!("BIND_ADDR not set, using default: {default}");
            default
        });

        Self {
            bind_addr,
            database_url,
        }
    }
}
