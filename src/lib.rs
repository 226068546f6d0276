//! Developer registry: a REST service for developers and the programming
//! languages they know, backed by PostgreSQL or an in-memory store.

pub mod config;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod logging;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{Settings, StoreKind};
pub use error::{AppError, ConfigError};
pub use logging::init_tracing;
pub use migration::{apply_migrations, ensure_database_exists};
pub use routes::{build_router, common_routes_with_ready, developer_routes, language_routes};
pub use service::{DeveloperService, LanguageService};
pub use state::AppState;
pub use store::Repositories;
