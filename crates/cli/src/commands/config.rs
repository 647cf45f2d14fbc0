use secrecy::ExposeSecret;
use serde_json::json;

use orcapro_core::config::{AppConfig, LoadOptions};

/// Print the effective configuration with secrets redacted.
pub fn run() -> String {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            let payload = json!({
                "database": {
                    "url": config.database.url,
                    "max_connections": config.database.max_connections,
                    "timeout_secs": config.database.timeout_secs,
                },
                "server": {
                    "bind_address": config.server.bind_address,
                    "port": config.server.port,
                    "graceful_shutdown_secs": config.server.graceful_shutdown_secs,
                },
                "auth": {
                    "token_secret": redact(config.auth.token_secret.expose_secret()),
                    "token_ttl_hours": config.auth.token_ttl_hours,
                },
                "numbering": { "base": config.numbering.base },
                "document": {
                    "logo_url": config.document.logo_url,
                    "logo_timeout_secs": config.document.logo_timeout_secs,
                },
                "logging": {
                    "level": config.logging.level,
                    "format": config.logging.format,
                },
            });
            serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|_| "configuration could not be serialized".to_string())
        }
        Err(error) => format!("configuration issue: {error}"),
    }
}

fn redact(secret: &str) -> String {
    if secret.is_empty() {
        "(unset)".to_string()
    } else {
        "********".to_string()
    }
}
