//! Persistence gateway: one repository per entity plus the join-table association.
//!
//! Two backends implement the same contract:
//! - [`postgres`]: `sqlx` against the `developer`, `programming_language` and
//!   `developer_programming_language` tables.
//! - [`memory`]: process-local tables with identical semantics, for development and tests.
//!
//! The association is a single set of `(developer_id, language_id)` facts. Neither
//! entity owns a collection; both sides are read through [`DeveloperRepository::languages_of`]
//! and [`LanguageRepository::developers_of`].

pub mod memory;
pub mod postgres;

use crate::error::AppError;
use crate::model::{
    Developer, DeveloperFields, DeveloperId, LanguageFields, LanguageId, LanguageRef, PageRequest,
    Paged, ProgrammingLanguage,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Per-entity CRUD contract.
#[async_trait]
pub trait Repository: Send + Sync {
    type Entity: Send;
    type Fields: Send;

    async fn find_by_id(&self, id: i64) -> Result<Option<Self::Entity>, AppError>;

    /// All rows ordered by id.
    async fn find_all(&self) -> Result<Vec<Self::Entity>, AppError>;

    /// Rows whose id is in `ids`; unknown ids are omitted.
    async fn find_all_by_ids(&self, ids: &[i64]) -> Result<Vec<Self::Entity>, AppError>;

    /// Insert a new row; the store assigns the id.
    async fn insert(&self, fields: Self::Fields) -> Result<Self::Entity, AppError>;

    /// Overwrite the mutable columns of an existing row. `None` if the id is absent.
    async fn update_by_id(
        &self,
        id: i64,
        fields: Self::Fields,
    ) -> Result<Option<Self::Entity>, AppError>;

    /// Remove the row and its association rows. Returns whether a row was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait DeveloperRepository: Repository<Entity = Developer, Fields = DeveloperFields> {
    async fn find_page(&self, request: PageRequest) -> Result<Paged<Developer>, AppError>;

    async fn find_by_last_name(&self, last_name: &str) -> Result<Vec<Developer>, AppError>;

    /// Link a language to the developer, inserting the language first when it is new.
    /// Linking an already linked pair is a no-op. Runs as one unit of work.
    async fn add_language(
        &self,
        developer_id: DeveloperId,
        language: LanguageRef,
    ) -> Result<ProgrammingLanguage, AppError>;

    /// Languages linked to the developer, ordered by id. Empty when the developer is absent.
    async fn languages_of(
        &self,
        developer_id: DeveloperId,
    ) -> Result<Vec<ProgrammingLanguage>, AppError>;
}

#[async_trait]
pub trait LanguageRepository:
    Repository<Entity = ProgrammingLanguage, Fields = LanguageFields>
{
    /// Developers linked to the language, ordered by id. Empty when the language is absent.
    async fn developers_of(&self, language_id: LanguageId) -> Result<Vec<Developer>, AppError>;
}

/// The pair of repositories a running service needs, sharing one backend.
#[derive(Clone)]
pub struct Repositories {
    pub developers: Arc<dyn DeveloperRepository>,
    pub languages: Arc<dyn LanguageRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Repositories {
            developers: Arc::new(postgres::PgDevelopers::new(pool.clone())),
            languages: Arc::new(postgres::PgLanguages::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let tables = memory::MemoryTables::shared();
        Repositories {
            developers: Arc::new(memory::MemoryDevelopers::new(tables.clone())),
            languages: Arc::new(memory::MemoryLanguages::new(tables)),
        }
    }
}
