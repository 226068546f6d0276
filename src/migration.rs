//! Database bootstrap: create the database if missing, then the registry tables.
//! Every statement is idempotent so this runs on each startup.

use crate::config::DATABASE_URL;
use crate::error::{AppError, ConfigError};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// Table DDL in dependency order. Join rows cascade on delete of either side.
const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS developer (
        id BIGSERIAL PRIMARY KEY,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS developer_last_name_idx ON developer (last_name)",
    r#"
    CREATE TABLE IF NOT EXISTS programming_language (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        creators_name VARCHAR(200) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS developer_programming_language (
        developer_id BIGINT NOT NULL REFERENCES developer (id) ON DELETE CASCADE,
        programming_language_id BIGINT NOT NULL REFERENCES programming_language (id) ON DELETE CASCADE,
        PRIMARY KEY (developer_id, programming_language_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS developer_programming_language_language_idx \
     ON developer_programming_language (programming_language_id)",
];

pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for ddl in DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(statements = DDL.len(), "schema ready");
    Ok(())
}

/// Ensure the database named in `database_url` exists; create it if not. Connects to
/// the `postgres` maintenance database to run CREATE DATABASE. Call before building the pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = split_database_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| invalid_url(e.to_string()))?;
    let mut conn = opts.connect().await?;
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split `postgres://host/db?opts` into (`postgres://host/postgres?opts`, `db`).
fn split_database_url(url: &str) -> Result<(String, String), ConfigError> {
    let (without_query, query) = match url.split_once('?') {
        Some((u, q)) => (u, Some(q)),
        None => (url, None),
    };
    let path_start = without_query
        .rfind('/')
        .ok_or_else(|| invalid_url("missing database path".into()))?
        + 1;
    let (base, db_name) = without_query.split_at(path_start);
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.trim().to_string()))
}

/// Credentials stay out of the error; `reason` describes what is wrong with the URL.
fn invalid_url(reason: String) -> ConfigError {
    ConfigError::Invalid {
        key: DATABASE_URL,
        value: reason,
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
