//! PostgreSQL backend. Tables are created by [`crate::migration::apply_migrations`].

use super::{DeveloperRepository, LanguageRepository, Repository};
use crate::error::AppError;
use crate::model::{
    Developer, DeveloperFields, DeveloperId, LanguageFields, LanguageId, LanguageRef, PageRequest,
    Paged, ProgrammingLanguage,
};
use async_trait::async_trait;
use sqlx::PgPool;

const DEVELOPER_COLUMNS: &str = "id, first_name, last_name";
const LANGUAGE_COLUMNS: &str = "id, name, creators_name";

pub struct PgDevelopers {
    pool: PgPool,
}

impl PgDevelopers {
    pub fn new(pool: PgPool) -> Self {
        PgDevelopers { pool }
    }
}

pub struct PgLanguages {
    pool: PgPool,
}

impl PgLanguages {
    pub fn new(pool: PgPool) -> Self {
        PgLanguages { pool }
    }
}

#[async_trait]
impl Repository for PgDevelopers {
    type Entity = Developer;
    type Fields = DeveloperFields;

    async fn find_by_id(&self, id: i64) -> Result<Option<Developer>, AppError> {
        let sql = format!("SELECT {} FROM developer WHERE id = $1", DEVELOPER_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Developer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<Developer>, AppError> {
        let sql = format!("SELECT {} FROM developer ORDER BY id", DEVELOPER_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Developer>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_all_by_ids(&self, ids: &[i64]) -> Result<Vec<Developer>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM developer WHERE id = ANY($1) ORDER BY id",
            DEVELOPER_COLUMNS
        );
        tracing::debug!(sql = %sql, ids = ?ids, "query");
        let rows = sqlx::query_as::<_, Developer>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, fields: DeveloperFields) -> Result<Developer, AppError> {
        let sql = format!(
            "INSERT INTO developer (first_name, last_name) VALUES ($1, $2) RETURNING {}",
            DEVELOPER_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, Developer>(&sql)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_by_id(
        &self,
        id: i64,
        fields: DeveloperFields,
    ) -> Result<Option<Developer>, AppError> {
        let sql = format!(
            "UPDATE developer SET first_name = $2, last_name = $3 WHERE id = $1 RETURNING {}",
            DEVELOPER_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Developer>(&sql)
            .bind(id)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        // Join rows go with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM developer WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM developer WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

#[async_trait]
impl DeveloperRepository for PgDevelopers {
    async fn find_page(&self, request: PageRequest) -> Result<Paged<Developer>, AppError> {
        let sql = format!(
            "SELECT {} FROM developer ORDER BY id LIMIT $1 OFFSET $2",
            DEVELOPER_COLUMNS
        );
        tracing::debug!(sql = %sql, page = request.page, size = request.size, "query");
        let offset = i64::try_from(request.offset())
            .map_err(|_| AppError::BadRequest("page out of range".into()))?;
        let mut tx = self.pool.begin().await?;
        let items = sqlx::query_as::<_, Developer>(&sql)
            .bind(i64::from(request.size))
            .bind(offset)
            .fetch_all(&mut *tx)
            .await?;
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM developer")
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Paged {
            items,
            request,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn find_by_last_name(&self, last_name: &str) -> Result<Vec<Developer>, AppError> {
        let sql = format!(
            "SELECT {} FROM developer WHERE last_name = $1 ORDER BY id",
            DEVELOPER_COLUMNS
        );
        tracing::debug!(sql = %sql, last_name, "query");
        let rows = sqlx::query_as::<_, Developer>(&sql)
            .bind(last_name)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn add_language(
        &self,
        developer_id: DeveloperId,
        language: LanguageRef,
    ) -> Result<ProgrammingLanguage, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock the developer row so a concurrent delete cannot interleave with the link.
        let locked: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM developer WHERE id = $1 FOR UPDATE")
                .bind(developer_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(AppError::DeveloperNotFound(developer_id));
        }

        let language = match language {
            LanguageRef::Existing(id) => {
                let sql = format!(
                    "SELECT {} FROM programming_language WHERE id = $1 FOR SHARE",
                    LANGUAGE_COLUMNS
                );
                sqlx::query_as::<_, ProgrammingLanguage>(&sql)
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(AppError::LanguageNotFound(id))?
            }
            LanguageRef::New(fields) => {
                let sql = format!(
                    "INSERT INTO programming_language (name, creators_name) VALUES ($1, $2) RETURNING {}",
                    LANGUAGE_COLUMNS
                );
                sqlx::query_as::<_, ProgrammingLanguage>(&sql)
                    .bind(&fields.name)
                    .bind(&fields.creators_name)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        sqlx::query(
            "INSERT INTO developer_programming_language (developer_id, programming_language_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(developer_id)
        .bind(language.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(language)
    }

    async fn languages_of(
        &self,
        developer_id: DeveloperId,
    ) -> Result<Vec<ProgrammingLanguage>, AppError> {
        let sql = "SELECT l.id, l.name, l.creators_name FROM programming_language l \
                   JOIN developer_programming_language j ON j.programming_language_id = l.id \
                   WHERE j.developer_id = $1 ORDER BY l.id";
        tracing::debug!(sql = %sql, developer_id, "query");
        let rows = sqlx::query_as::<_, ProgrammingLanguage>(sql)
            .bind(developer_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl Repository for PgLanguages {
    type Entity = ProgrammingLanguage;
    type Fields = LanguageFields;

    async fn find_by_id(&self, id: i64) -> Result<Option<ProgrammingLanguage>, AppError> {
        let sql = format!(
            "SELECT {} FROM programming_language WHERE id = $1",
            LANGUAGE_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, ProgrammingLanguage>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<ProgrammingLanguage>, AppError> {
        let sql = format!(
            "SELECT {} FROM programming_language ORDER BY id",
            LANGUAGE_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, ProgrammingLanguage>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_all_by_ids(&self, ids: &[i64]) -> Result<Vec<ProgrammingLanguage>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM programming_language WHERE id = ANY($1) ORDER BY id",
            LANGUAGE_COLUMNS
        );
        tracing::debug!(sql = %sql, ids = ?ids, "query");
        let rows = sqlx::query_as::<_, ProgrammingLanguage>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, fields: LanguageFields) -> Result<ProgrammingLanguage, AppError> {
        let sql = format!(
            "INSERT INTO programming_language (name, creators_name) VALUES ($1, $2) RETURNING {}",
            LANGUAGE_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, ProgrammingLanguage>(&sql)
            .bind(&fields.name)
            .bind(&fields.creators_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_by_id(
        &self,
        id: i64,
        fields: LanguageFields,
    ) -> Result<Option<ProgrammingLanguage>, AppError> {
        let sql = format!(
            "UPDATE programming_language SET name = $2, creators_name = $3 WHERE id = $1 RETURNING {}",
            LANGUAGE_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, ProgrammingLanguage>(&sql)
            .bind(id)
            .bind(&fields.name)
            .bind(&fields.creators_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM programming_language WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM programming_language WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

#[async_trait]
impl LanguageRepository for PgLanguages {
    async fn developers_of(&self, language_id: LanguageId) -> Result<Vec<Developer>, AppError> {
        let sql = "SELECT d.id, d.first_name, d.last_name FROM developer d \
                   JOIN developer_programming_language j ON j.developer_id = d.id \
                   WHERE j.programming_language_id = $1 ORDER BY d.id";
        tracing::debug!(sql = %sql, language_id, "query");
        let rows = sqlx::query_as::<_, Developer>(sql)
            .bind(language_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
