//! Developer lifecycle and the developer side of the language association.

use crate::dto::{
    DeveloperInput, DeveloperPage, DeveloperView, ProgrammingLanguageInput,
    ProgrammingLanguageView,
};
use crate::error::AppError;
use crate::model::{DeveloperId, PageRequest};
use crate::store::{DeveloperRepository, Repository};
use std::sync::Arc;

#[derive(Clone)]
pub struct DeveloperService {
    developers: Arc<dyn DeveloperRepository>,
}

impl DeveloperService {
    pub fn new(developers: Arc<dyn DeveloperRepository>) -> Self {
        DeveloperService { developers }
    }

    pub async fn get_by_id(&self, id: DeveloperId) -> Result<Option<DeveloperView>, AppError> {
        tracing::info!(id, "fetching developer");
        Ok(self.developers.find_by_id(id).await?.map(DeveloperView::from))
    }

    pub async fn get_all(&self) -> Result<Vec<DeveloperView>, AppError> {
        tracing::info!("fetching all developers");
        let rows = self.developers.find_all().await?;
        Ok(rows.into_iter().map(DeveloperView::from).collect())
    }

    pub async fn get_page(&self, request: PageRequest) -> Result<DeveloperPage, AppError> {
        tracing::info!(page = request.page, size = request.size, "fetching developer page");
        Ok(self.developers.find_page(request).await?.into())
    }

    pub async fn find_by_last_name(&self, last_name: &str) -> Result<Vec<DeveloperView>, AppError> {
        tracing::info!(last_name, "fetching developers by last name");
        let rows = self.developers.find_by_last_name(last_name).await?;
        Ok(rows.into_iter().map(DeveloperView::from).collect())
    }

    /// Insert a new developer. The input's `id` is ignored.
    pub async fn save(&self, input: DeveloperInput) -> Result<DeveloperView, AppError> {
        tracing::info!("saving developer");
        let row = self.developers.insert(input.into_fields()).await?;
        Ok(row.into())
    }

    /// Overwrite first and last name. Linked languages are untouched.
    pub async fn update(
        &self,
        id: DeveloperId,
        input: DeveloperInput,
    ) -> Result<DeveloperView, AppError> {
        tracing::info!(id, "updating developer");
        self.developers
            .update_by_id(id, input.into_fields())
            .await?
            .map(DeveloperView::from)
            .ok_or(AppError::DeveloperNotFound(id))
    }

    /// Delete if present. Deleting an unknown id succeeds.
    pub async fn delete_by_id(&self, id: DeveloperId) -> Result<(), AppError> {
        tracing::info!(id, "deleting developer");
        let removed = self.developers.delete_by_id(id).await?;
        if !removed {
            tracing::debug!(id, "developer already absent");
        }
        Ok(())
    }

    /// Link a language to the developer. A language input without a positive id
    /// always creates a new language row, even if one with the same name exists.
    pub async fn add_language(
        &self,
        id: DeveloperId,
        language: ProgrammingLanguageInput,
    ) -> Result<ProgrammingLanguageView, AppError> {
        tracing::info!(id, "adding language to developer");
        if !self.developers.exists_by_id(id).await? {
            return Err(AppError::DeveloperNotFound(id));
        }
        let linked = self.developers.add_language(id, language.into_ref()).await?;
        Ok(linked.into())
    }

    /// Languages linked to the developer; empty when the developer does not exist.
    pub async fn list_languages(
        &self,
        id: DeveloperId,
    ) -> Result<Vec<ProgrammingLanguageView>, AppError> {
        tracing::info!(id, "fetching languages for developer");
        let rows = self.developers.languages_of(id).await?;
        Ok(rows.into_iter().map(ProgrammingLanguageView::from).collect())
    }
}
