//! Programming-language lifecycle and the language side of the association.

use crate::dto::{DeveloperView, ProgrammingLanguageInput, ProgrammingLanguageView};
use crate::error::AppError;
use crate::model::LanguageId;
use crate::store::{LanguageRepository, Repository};
use std::sync::Arc;

#[derive(Clone)]
pub struct LanguageService {
    languages: Arc<dyn LanguageRepository>,
}

impl LanguageService {
    pub fn new(languages: Arc<dyn LanguageRepository>) -> Self {
        LanguageService { languages }
    }

    pub async fn get_by_id(
        &self,
        id: LanguageId,
    ) -> Result<Option<ProgrammingLanguageView>, AppError> {
        tracing::info!(id, "fetching programming language");
        Ok(self
            .languages
            .find_by_id(id)
            .await?
            .map(ProgrammingLanguageView::from))
    }

    pub async fn get_all(&self) -> Result<Vec<ProgrammingLanguageView>, AppError> {
        tracing::info!("fetching all programming languages");
        let rows = self.languages.find_all().await?;
        Ok(rows.into_iter().map(ProgrammingLanguageView::from).collect())
    }

    /// Batch fetch; ids with no row are left out of the result.
    pub async fn get_by_ids(
        &self,
        ids: &[LanguageId],
    ) -> Result<Vec<ProgrammingLanguageView>, AppError> {
        tracing::info!(count = ids.len(), "fetching programming languages by ids");
        let rows = self.languages.find_all_by_ids(ids).await?;
        Ok(rows.into_iter().map(ProgrammingLanguageView::from).collect())
    }

    pub async fn save(
        &self,
        input: ProgrammingLanguageInput,
    ) -> Result<ProgrammingLanguageView, AppError> {
        tracing::info!("saving programming language");
        let row = self.languages.insert(input.into_fields()).await?;
        Ok(row.into())
    }

    pub async fn update(
        &self,
        id: LanguageId,
        input: ProgrammingLanguageInput,
    ) -> Result<ProgrammingLanguageView, AppError> {
        tracing::info!(id, "updating programming language");
        self.languages
            .update_by_id(id, input.into_fields())
            .await?
            .map(ProgrammingLanguageView::from)
            .ok_or(AppError::LanguageNotFound(id))
    }

    /// Unlike developers, deleting an unknown language is an error.
    pub async fn delete_by_id(&self, id: LanguageId) -> Result<(), AppError> {
        tracing::info!(id, "deleting programming language");
        if !self.languages.exists_by_id(id).await? {
            return Err(AppError::LanguageNotFound(id));
        }
        // A concurrent delete between the check and here still counts as absent.
        if !self.languages.delete_by_id(id).await? {
            return Err(AppError::LanguageNotFound(id));
        }
        Ok(())
    }

    /// Developers linked to the language; empty when the language does not exist.
    pub async fn list_developers(&self, id: LanguageId) -> Result<Vec<DeveloperView>, AppError> {
        tracing::info!(id, "fetching developers for programming language");
        let rows = self.languages.developers_of(id).await?;
        Ok(rows.into_iter().map(DeveloperView::from).collect())
    }
}
