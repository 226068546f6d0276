//! In-memory backend. All three tables live behind one mutex so every call is a
//! single atomic unit of work, the same guarantee a database transaction gives.

use super::{DeveloperRepository, LanguageRepository, Repository};
use crate::error::AppError;
use crate::model::{
    Developer, DeveloperFields, DeveloperId, LanguageFields, LanguageId, LanguageRef, PageRequest,
    Paged, ProgrammingLanguage,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
pub struct MemoryTables {
    developers: BTreeMap<DeveloperId, Developer>,
    languages: BTreeMap<LanguageId, ProgrammingLanguage>,
    links: BTreeSet<(DeveloperId, LanguageId)>,
    last_developer_id: DeveloperId,
    last_language_id: LanguageId,
}

pub type SharedTables = Arc<Mutex<MemoryTables>>;

impl MemoryTables {
    pub fn shared() -> SharedTables {
        Arc::new(Mutex::new(MemoryTables::default()))
    }

    fn insert_language(&mut self, fields: LanguageFields) -> ProgrammingLanguage {
        self.last_language_id += 1;
        let language = ProgrammingLanguage::with_fields(self.last_language_id, fields);
        self.languages.insert(language.id, language.clone());
        language
    }
}

fn lock(tables: &SharedTables) -> MutexGuard<'_, MemoryTables> {
    tables.lock().unwrap_or_else(PoisonError::into_inner)
}

fn by_ids<T: Clone>(rows: &BTreeMap<i64, T>, ids: &[i64]) -> Vec<T> {
    let wanted: BTreeSet<i64> = ids.iter().copied().collect();
    wanted.iter().filter_map(|id| rows.get(id).cloned()).collect()
}

pub struct MemoryDevelopers {
    tables: SharedTables,
}

impl MemoryDevelopers {
    pub fn new(tables: SharedTables) -> Self {
        MemoryDevelopers { tables }
    }
}

pub struct MemoryLanguages {
    tables: SharedTables,
}

impl MemoryLanguages {
    pub fn new(tables: SharedTables) -> Self {
        MemoryLanguages { tables }
    }
}

#[async_trait]
impl Repository for MemoryDevelopers {
    type Entity = Developer;
    type Fields = DeveloperFields;

    async fn find_by_id(&self, id: i64) -> Result<Option<Developer>, AppError> {
        Ok(lock(&self.tables).developers.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Developer>, AppError> {
        Ok(lock(&self.tables).developers.values().cloned().collect())
    }

    async fn find_all_by_ids(&self, ids: &[i64]) -> Result<Vec<Developer>, AppError> {
        Ok(by_ids(&lock(&self.tables).developers, ids))
    }

    async fn insert(&self, fields: DeveloperFields) -> Result<Developer, AppError> {
        let mut t = lock(&self.tables);
        t.last_developer_id += 1;
        let developer = Developer::with_fields(t.last_developer_id, fields);
        t.developers.insert(developer.id, developer.clone());
        Ok(developer)
    }

    async fn update_by_id(
        &self,
        id: i64,
        fields: DeveloperFields,
    ) -> Result<Option<Developer>, AppError> {
        let mut t = lock(&self.tables);
        Ok(t.developers.get_mut(&id).map(|row| {
            *row = Developer::with_fields(id, fields);
            row.clone()
        }))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        let mut t = lock(&self.tables);
        t.links.retain(|(developer_id, _)| *developer_id != id);
        Ok(t.developers.remove(&id).is_some())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        Ok(lock(&self.tables).developers.contains_key(&id))
    }
}

#[async_trait]
impl DeveloperRepository for MemoryDevelopers {
    async fn find_page(&self, request: PageRequest) -> Result<Paged<Developer>, AppError> {
        let t = lock(&self.tables);
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = t
            .developers
            .values()
            .skip(offset)
            .take(request.size as usize)
            .cloned()
            .collect();
        Ok(Paged {
            items,
            request,
            total: t.developers.len() as u64,
        })
    }

    async fn find_by_last_name(&self, last_name: &str) -> Result<Vec<Developer>, AppError> {
        Ok(lock(&self.tables)
            .developers
            .values()
            .filter(|d| d.last_name == last_name)
            .cloned()
            .collect())
    }

    async fn add_language(
        &self,
        developer_id: DeveloperId,
        language: LanguageRef,
    ) -> Result<ProgrammingLanguage, AppError> {
        let mut t = lock(&self.tables);
        if !t.developers.contains_key(&developer_id) {
            return Err(AppError::DeveloperNotFound(developer_id));
        }
        let language = match language {
            LanguageRef::Existing(id) => t
                .languages
                .get(&id)
                .cloned()
                .ok_or(AppError::LanguageNotFound(id))?,
            LanguageRef::New(fields) => t.insert_language(fields),
        };
        t.links.insert((developer_id, language.id));
        Ok(language)
    }

    async fn languages_of(
        &self,
        developer_id: DeveloperId,
    ) -> Result<Vec<ProgrammingLanguage>, AppError> {
        let t = lock(&self.tables);
        Ok(t.links
            .range((developer_id, LanguageId::MIN)..=(developer_id, LanguageId::MAX))
            .filter_map(|(_, language_id)| t.languages.get(language_id).cloned())
            .collect())
    }
}

#[async_trait]
impl Repository for MemoryLanguages {
    type Entity = ProgrammingLanguage;
    type Fields = LanguageFields;

    async fn find_by_id(&self, id: i64) -> Result<Option<ProgrammingLanguage>, AppError> {
        Ok(lock(&self.tables).languages.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<ProgrammingLanguage>, AppError> {
        Ok(lock(&self.tables).languages.values().cloned().collect())
    }

    async fn find_all_by_ids(&self, ids: &[i64]) -> Result<Vec<ProgrammingLanguage>, AppError> {
        Ok(by_ids(&lock(&self.tables).languages, ids))
    }

    async fn insert(&self, fields: LanguageFields) -> Result<ProgrammingLanguage, AppError> {
        Ok(lock(&self.tables).insert_language(fields))
    }

    async fn update_by_id(
        &self,
        id: i64,
        fields: LanguageFields,
    ) -> Result<Option<ProgrammingLanguage>, AppError> {
        let mut t = lock(&self.tables);
        Ok(t.languages.get_mut(&id).map(|row| {
            *row = ProgrammingLanguage::with_fields(id, fields);
            row.clone()
        }))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        let mut t = lock(&self.tables);
        t.links.retain(|(_, language_id)| *language_id != id);
        Ok(t.languages.remove(&id).is_some())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        Ok(lock(&self.tables).languages.contains_key(&id))
    }
}

#[async_trait]
impl LanguageRepository for MemoryLanguages {
    async fn developers_of(&self, language_id: LanguageId) -> Result<Vec<Developer>, AppError> {
        let t = lock(&self.tables);
        Ok(t.links
            .iter()
            .filter(|(_, l)| *l == language_id)
            .filter_map(|(developer_id, _)| t.developers.get(developer_id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Repositories;

    fn ada() -> DeveloperFields {
        DeveloperFields {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        }
    }

    fn analytical() -> LanguageFields {
        LanguageFields {
            name: "Analytical".into(),
            creators_name: "Ada".into(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially_and_never_reused() {
        let repos = Repositories::in_memory();
        let first = repos.developers.insert(ada()).await.unwrap();
        assert!(repos.developers.delete_by_id(first.id).await.unwrap());
        let second = repos.developers.insert(ada()).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn association_is_visible_from_both_sides() {
        let repos = Repositories::in_memory();
        let dev = repos.developers.insert(ada()).await.unwrap();
        let lang = repos
            .developers
            .add_language(dev.id, LanguageRef::New(analytical()))
            .await
            .unwrap();

        let langs = repos.developers.languages_of(dev.id).await.unwrap();
        assert_eq!(langs, vec![lang.clone()]);
        let devs = repos.languages.developers_of(lang.id).await.unwrap();
        assert_eq!(devs, vec![dev]);
    }

    #[tokio::test]
    async fn linking_same_pair_twice_is_idempotent() {
        let repos = Repositories::in_memory();
        let dev = repos.developers.insert(ada()).await.unwrap();
        let lang = repos.languages.insert(analytical()).await.unwrap();
        for _ in 0..2 {
            repos
                .developers
                .add_language(dev.id, LanguageRef::Existing(lang.id))
                .await
                .unwrap();
        }
        assert_eq!(repos.developers.languages_of(dev.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_either_side_clears_join_rows() {
        let repos = Repositories::in_memory();
        let dev = repos.developers.insert(ada()).await.unwrap();
        let lang = repos
            .developers
            .add_language(dev.id, LanguageRef::New(analytical()))
            .await
            .unwrap();

        assert!(repos.languages.delete_by_id(lang.id).await.unwrap());
        assert!(repos.developers.languages_of(dev.id).await.unwrap().is_empty());

        let other = repos
            .developers
            .add_language(dev.id, LanguageRef::New(analytical()))
            .await
            .unwrap();
        assert!(repos.developers.delete_by_id(dev.id).await.unwrap());
        assert!(repos.languages.developers_of(other.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_existing_language_is_not_found() {
        let repos = Repositories::in_memory();
        let dev = repos.developers.insert(ada()).await.unwrap();
        let err = repos
            .developers
            .add_language(dev.id, LanguageRef::Existing(42))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::LanguageNotFound(42)));
        assert!(repos.languages.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_all_by_ids_skips_missing() {
        let repos = Repositories::in_memory();
        let a = repos.languages.insert(analytical()).await.unwrap();
        let found = repos
            .languages
            .find_all_by_ids(&[a.id, 999, a.id])
            .await
            .unwrap();
        assert_eq!(found, vec![a]);
    }

    #[tokio::test]
    async fn pages_report_total() {
        let repos = Repositories::in_memory();
        for _ in 0..5 {
            repos.developers.insert(ada()).await.unwrap();
        }
        let page = repos
            .developers
            .find_page(PageRequest::new(Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.iter().map(|d| d.id).collect::<Vec<_>>(), vec![3, 4]);
    }
}
