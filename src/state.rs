//! Shared application state for all routes.

use crate::config::{Settings, StoreKind};
use crate::error::AppError;
use crate::migration::{apply_migrations, ensure_database_exists};
use crate::service::{DeveloperService, LanguageService};
use crate::store::Repositories;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub developers: DeveloperService,
    pub languages: LanguageService,
    /// Present only for the postgres backend; used by the readiness probe.
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn new(repos: Repositories, pool: Option<PgPool>) -> Self {
        AppState {
            developers: DeveloperService::new(repos.developers),
            languages: LanguageService::new(repos.languages),
            pool,
        }
    }

    /// State backed by fresh in-memory tables.
    pub fn in_memory() -> Self {
        AppState::new(Repositories::in_memory(), None)
    }

    /// Build state for the configured backend, creating database and tables when needed.
    pub async fn connect(settings: &Settings) -> Result<Self, AppError> {
        match settings.store {
            StoreKind::Memory => {
                tracing::warn!("using in-memory store; data is lost on exit");
                Ok(AppState::in_memory())
            }
            StoreKind::Postgres => {
                ensure_database_exists(&settings.database_url).await?;
                let pool = PgPoolOptions::new()
                    .max_connections(settings.db_max_connections)
                    .connect(&settings.database_url)
                    .await?;
                apply_migrations(&pool).await?;
                Ok(AppState::new(Repositories::postgres(pool.clone()), Some(pool)))
            }
        }
    }
}
