//! Developer handlers: CRUD plus the developer side of the language association.

use super::parse_id;
use crate::dto::{
    DeveloperInput, DeveloperPage, DeveloperView, ProgrammingLanguageInput,
    ProgrammingLanguageView,
};
use crate::error::{AppError, ErrorBody};
use crate::extractors::{QueryParams, ValidatedJson};
use crate::model::PageRequest;
use crate::response::{created, Created};
use crate::state::AppState;
use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeveloperListQuery {
    /// Zero-based page; switches the response to a page object.
    pub page: Option<u32>,
    /// Page size, 1 to 100 (default 20); switches the response to a page object.
    pub size: Option<u32>,
    /// Exact last-name match.
    pub last_name: Option<String>,
}

/// All developers, a page of them, or the ones matching `lastName`.
#[utoipa::path(
    get,
    path = "/v1/developer",
    tag = "developer",
    params(DeveloperListQuery),
    responses(
        (status = 200, description = "Array of developers, or a page when page/size is given", body = Vec<DeveloperView>),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DeveloperListQuery>,
) -> Result<Response, AppError> {
    if let Some(last_name) = query.last_name.as_deref() {
        let rows = state.developers.find_by_last_name(last_name).await?;
        return Ok(Json(rows).into_response());
    }
    if query.page.is_some() || query.size.is_some() {
        let page: DeveloperPage = state
            .developers
            .get_page(PageRequest::new(query.page, query.size))
            .await?;
        return Ok(Json(page).into_response());
    }
    Ok(Json(state.developers.get_all().await?).into_response())
}

#[utoipa::path(
    post,
    path = "/v1/developer",
    tag = "developer",
    request_body = DeveloperInput,
    responses(
        (status = 201, description = "Created; Location points at the new developer", body = DeveloperView),
        (status = 400, description = "Validation failed", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ValidatedJson(input): ValidatedJson<DeveloperInput>,
) -> Result<Created<DeveloperView>, AppError> {
    let saved = state.developers.save(input).await?;
    Ok(created(&uri, saved.id, saved))
}

#[utoipa::path(
    get,
    path = "/v1/developer/{id}",
    tag = "developer",
    params(("id" = i64, Path, description = "Developer id")),
    responses(
        (status = 200, body = DeveloperView),
        (status = 404, body = ErrorBody),
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<DeveloperView>, AppError> {
    let id = parse_id(&id_str)?;
    let developer = state
        .developers
        .get_by_id(id)
        .await?
        .ok_or(AppError::DeveloperNotFound(id))?;
    Ok(Json(developer))
}

#[utoipa::path(
    put,
    path = "/v1/developer/{id}",
    tag = "developer",
    params(("id" = i64, Path, description = "Developer id")),
    request_body = DeveloperInput,
    responses(
        (status = 200, body = DeveloperView),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    ValidatedJson(input): ValidatedJson<DeveloperInput>,
) -> Result<Json<DeveloperView>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.developers.update(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/developer/{id}",
    tag = "developer",
    params(("id" = i64, Path, description = "Developer id")),
    responses((status = 204, description = "Deleted, or already absent"))
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id_str)?;
    state.developers.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/v1/developer/{id}/languages",
    tag = "developer",
    params(("id" = i64, Path, description = "Developer id")),
    request_body = ProgrammingLanguageInput,
    responses(
        (status = 200, description = "Linked language", body = ProgrammingLanguageView),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
    )
)]
pub async fn add_language(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    ValidatedJson(input): ValidatedJson<ProgrammingLanguageInput>,
) -> Result<Json<ProgrammingLanguageView>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.developers.add_language(id, input).await?))
}

#[utoipa::path(
    get,
    path = "/v1/developer/{id}/languages",
    tag = "developer",
    params(("id" = i64, Path, description = "Developer id")),
    responses((status = 200, description = "Possibly empty", body = Vec<ProgrammingLanguageView>))
)]
pub async fn list_languages(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Vec<ProgrammingLanguageView>>, AppError> {
    let id = parse_id(&id_str)?;
    Ok(Json(state.developers.list_languages(id).await?))
}
