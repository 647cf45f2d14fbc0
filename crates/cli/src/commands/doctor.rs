use serde_json::json;

use orcapro_core::config::{AppConfig, LoadOptions};
use orcapro_db::connect_with_settings;

struct Check {
    name: &'static str,
    ok: bool,
    detail: String,
}

/// Validate configuration and database connectivity.
pub fn run(as_json: bool) -> String {
    let mut checks = Vec::new();

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(Check {
                name: "config",
                ok: true,
                detail: "configuration loaded and validated".to_string(),
            });
            Some(config)
        }
        Err(error) => {
            checks.push(Check { name: "config", ok: false, detail: error.to_string() });
            None
        }
    };

    if let Some(config) = config {
        let detail = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(async {
                match connect_with_settings(
                    &config.database.url,
                    config.database.max_connections,
                    config.database.timeout_secs,
                )
                .await
                {
                    Ok(pool) => {
                        pool.close().await;
                        Check {
                            name: "database",
                            ok: true,
                            detail: format!("connected to {}", config.database.url),
                        }
                    }
                    Err(error) => {
                        Check { name: "database", ok: false, detail: error.to_string() }
                    }
                }
            }),
            Err(error) => Check {
                name: "database",
                ok: false,
                detail: format!("failed to initialize async runtime: {error}"),
            },
        };
        checks.push(detail);
    }

    if as_json {
        let payload: Vec<_> = checks
            .iter()
            .map(|check| json!({ "check": check.name, "ok": check.ok, "detail": check.detail }))
            .collect();
        serde_json::to_string_pretty(&json!({ "checks": payload }))
            .unwrap_or_else(|_| "doctor output could not be serialized".to_string())
    } else {
        checks
            .iter()
            .map(|check| {
                format!("[{}] {}: {}", if check.ok { "ok" } else { "fail" }, check.name, check.detail)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
