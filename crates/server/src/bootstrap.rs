use std::sync::Arc;

use orcapro_core::auth::TokenService;
use orcapro_core::codec::CodecOptions;
use orcapro_core::config::{AppConfig, ConfigError, LoadOptions};
use orcapro_core::render::{DocumentRenderer, RenderError};
use orcapro_core::sequence::NumberingOptions;
use orcapro_db::{connect_with_settings, migrations, DbPool};
use thiserror::Error;
use tracing::info;

use crate::state::AppState;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("document templates failed to load: {0}")]
    Templates(#[source] RenderError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let renderer = DocumentRenderer::new(&config.document).map_err(BootstrapError::Templates)?;

    let state = AppState {
        db_pool: db_pool.clone(),
        tokens: TokenService::new(config.auth.token_secret.clone()),
        token_ttl_hours: config.auth.token_ttl_hours,
        numbering: NumberingOptions { base: config.numbering.base },
        codec: CodecOptions::default(),
        renderer: Arc::new(renderer),
    };

    Ok(Application { config, db_pool, state })
}

#[cfg(test)]
mod tests {
    use orcapro_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::bootstrap;

    fn valid_options(database_url: &str) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                token_secret: Some("integration-test-secret".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_without_a_token_secret() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:".to_string()),
                token_secret: Some("short".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await;

        let message = result.err().expect("bootstrap should fail").to_string();
        assert!(message.contains("auth.token_secret"));
    }

    #[tokio::test]
    async fn bootstrap_applies_migrations_and_builds_state() {
        let app = bootstrap(valid_options("sqlite::memory:?cache=shared"))
            .await
            .expect("bootstrap should succeed");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
             AND name IN ('usuarios', 'clientes', 'propostas', 'romaneios')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("baseline tables should exist after bootstrap");
        assert_eq!(table_count, 4, "bootstrap should expose all baseline tables");

        assert_eq!(app.state.numbering.base, 260_000);
        app.db_pool.close().await;
    }
}
