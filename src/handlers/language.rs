//! Programming-language handlers: CRUD, batch fetch, and the developer listing.

use super::parse_id;
use crate::dto::{DeveloperView, ProgrammingLanguageInput, ProgrammingLanguageView};
use crate::error::{AppError, ErrorBody};
use crate::extractors::{QueryParams, ValidatedJson};
use crate::response::{created, Created};
use crate::state::AppState;
use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LanguageListQuery {
    /// Comma-separated ids, e.g. `1,2,3`. Unknown ids are skipped.
    pub ids: Option<String>,
}

fn parse_id_list(raw: &str) -> Result<Vec<i64>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_id)
        .collect()
}

#[utoipa::path(
    get,
    path = "/v1/programming_language",
    tag = "programming_language",
    params(LanguageListQuery),
    responses(
        (status = 200, body = Vec<ProgrammingLanguageView>),
        (status = 400, description = "Malformed ids", body = ErrorBody),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<LanguageListQuery>,
) -> Result<Json<Vec<ProgrammingLanguageView>>, AppError> {
    let rows = match query.ids.as_deref() {
        Some(raw) => state.languages.get_by_ids(&parse_id_list(raw)?).await?,
        None => state.languages.get_all().await?,
    };
    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/v1/programming_language",
    tag = "programming_language",
    request_body = ProgrammingLanguageInput,
    responses(
        (status = 201, body = ProgrammingLanguageView),
        (status = 400, body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ValidatedJson(input): ValidatedJson<ProgrammingLanguageInput>,
) -> Result<Created<ProgrammingLanguageView>, AppError> {
    let saved = state.languages.save(input).await?;
    Ok(created(&uri, saved.id, saved))
}

#[utoipa::path(
    get,
    path = "/v1/programming_language/{id}",
    tag = "programming_language",
    params(("id" = i64, Path, description = "Programming language id")),
    responses(
        (status = 200, body = ProgrammingLanguageView),
        (status = 404, body = ErrorBody),
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<ProgrammingLanguageView>, AppError> {
    let id = parse_id(&id_str)?;
    let language = state
        .languages
        .get_by_id(id)
        .await?
        .ok_or(AppError::LanguageNotFound(id))?;
    Ok(Json(language))
}

#[utoipa::path(
    put,
    path = "/v1/programming_language/{id}",
    tag = "programming_language",
    params(("id" = i64, Path, description = "Programming language id")),
    request_body = ProgrammingLanguageInput,
    responses(
        (status = 200, body = ProgrammingLanguageView),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    ValidatedJson(input): ValidatedJson<ProgrammingLanguageInput>,
) -> Result<Json<ProgrammingLanguageView>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.languages.update(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/programming_language/{id}",
    tag = "programming_language",
    params(("id" = i64, Path, description = "Programming language id")),
    responses(
        (status = 204),
        (status = 404, body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id_str)?;
    state.languages.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/v1/programming_language/{id}/developers",
    tag = "programming_language",
    params(("id" = i64, Path, description = "Programming language id")),
    responses((status = 200, description = "Possibly empty", body = Vec<DeveloperView>))
)]
pub async fn list_developers(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Vec<DeveloperView>>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.languages.list_developers(id).await?))
}
