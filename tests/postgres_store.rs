//! Repository contract tests against a live PostgreSQL.
//!
//! Runs only when `DATABASE_URL` is set; otherwise each test returns early.
//! Every test works in its own freshly created schema, dropped at the end.

use std::str::FromStr;

use dev_registry::error::AppError;
use dev_registry::model::{DeveloperFields, LanguageFields, LanguageRef, PageRequest};
use dev_registry::store::{DeveloperRepository, LanguageRepository, Repositories, Repository};
use dev_registry::{apply_migrations, ensure_database_exists};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

struct TestDb {
    admin: PgPool,
    schema: String,
    repos: Repositories,
}

impl TestDb {
    async fn connect() -> Option<TestDb> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL unset; skipping postgres store test");
            return None;
        };
        ensure_database_exists(&url).await.unwrap();
        let schema = format!("registry_test_{}", uuid::Uuid::new_v4().simple());
        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .unwrap();
        sqlx::query(&format!("CREATE SCHEMA {}", schema))
            .execute(&admin)
            .await
            .unwrap();

        let options = PgConnectOptions::from_str(&url)
            .unwrap()
            .options([("search_path", schema.as_str())]);
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .unwrap();
        apply_migrations(&pool).await.unwrap();
        Some(TestDb {
            admin,
            schema,
            repos: Repositories::postgres(pool),
        })
    }

    async fn drop_schema(self) {
        sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .execute(&self.admin)
            .await
            .unwrap();
    }
}

fn developer(first: &str, last: &str) -> DeveloperFields {
    DeveloperFields {
        first_name: first.into(),
        last_name: last.into(),
    }
}

fn language(name: &str, creators: &str) -> LanguageFields {
    LanguageFields {
        name: name.into(),
        creators_name: creators.into(),
    }
}

#[tokio::test]
async fn developer_crud_round_trip() {
    let Some(db) = TestDb::connect().await else { return };
    let devs = &db.repos.developers;

    let ada = devs.insert(developer("Ada", "Lovelace")).await.unwrap();
    assert_eq!(devs.find_by_id(ada.id).await.unwrap(), Some(ada.clone()));
    assert!(devs.exists_by_id(ada.id).await.unwrap());

    let renamed = devs
        .update_by_id(ada.id, developer("Augusta Ada", "King"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.first_name, "Augusta Ada");
    assert_eq!(renamed.id, ada.id);
    assert!(devs
        .update_by_id(ada.id + 1000, developer("X", "Y"))
        .await
        .unwrap()
        .is_none());

    assert!(devs.delete_by_id(ada.id).await.unwrap());
    assert!(!devs.delete_by_id(ada.id).await.unwrap());
    assert!(!devs.exists_by_id(ada.id).await.unwrap());
    db.drop_schema().await;
}

#[tokio::test]
async fn batch_fetch_skips_missing_ids_and_orders_by_id() {
    let Some(db) = TestDb::connect().await else { return };
    let langs = &db.repos.languages;
    let c = langs.insert(language("C", "Ritchie")).await.unwrap();
    let ml = langs.insert(language("ML", "Milner")).await.unwrap();

    let found = langs.find_all_by_ids(&[ml.id, 9_999, c.id]).await.unwrap();
    assert_eq!(found, vec![c.clone(), ml.clone()]);
    assert!(langs.find_all_by_ids(&[]).await.unwrap().is_empty());
    assert_eq!(langs.find_all().await.unwrap(), vec![c, ml]);
    db.drop_schema().await;
}

#[tokio::test]
async fn add_language_links_both_sides_with_set_semantics() {
    let Some(db) = TestDb::connect().await else { return };
    let repos = &db.repos;
    let ada = repos.developers.insert(developer("Ada", "Lovelace")).await.unwrap();

    let analytical = repos
        .developers
        .add_language(ada.id, LanguageRef::New(language("Analytical", "Babbage")))
        .await
        .unwrap();
    for _ in 0..2 {
        let linked = repos
            .developers
            .add_language(ada.id, LanguageRef::Existing(analytical.id))
            .await
            .unwrap();
        assert_eq!(linked, analytical);
    }

    assert_eq!(
        repos.developers.languages_of(ada.id).await.unwrap(),
        vec![analytical.clone()]
    );
    assert_eq!(
        repos.languages.developers_of(analytical.id).await.unwrap(),
        vec![ada]
    );
    db.drop_schema().await;
}

#[tokio::test]
async fn failed_add_language_leaves_no_rows_behind() {
    let Some(db) = TestDb::connect().await else { return };
    let repos = &db.repos;

    let missing_dev = repos
        .developers
        .add_language(404, LanguageRef::New(language("Ghost", "Nobody")))
        .await;
    assert!(matches!(missing_dev, Err(AppError::DeveloperNotFound(404))));
    assert!(repos.languages.find_all().await.unwrap().is_empty());

    let ada = repos.developers.insert(developer("Ada", "Lovelace")).await.unwrap();
    let missing_lang = repos
        .developers
        .add_language(ada.id, LanguageRef::Existing(77))
        .await;
    assert!(matches!(missing_lang, Err(AppError::LanguageNotFound(77))));
    assert!(repos.developers.languages_of(ada.id).await.unwrap().is_empty());
    db.drop_schema().await;
}

#[tokio::test]
async fn concurrent_additions_are_all_kept() {
    let Some(db) = TestDb::connect().await else { return };
    let repos = &db.repos;
    let ada = repos.developers.insert(developer("Ada", "Lovelace")).await.unwrap();

    let (a, b) = tokio::join!(
        repos
            .developers
            .add_language(ada.id, LanguageRef::New(language("Rust", "Hoare"))),
        repos
            .developers
            .add_language(ada.id, LanguageRef::New(language("Go", "Pike"))),
    );
    a.unwrap();
    b.unwrap();
    assert_eq!(repos.developers.languages_of(ada.id).await.unwrap().len(), 2);
    db.drop_schema().await;
}

#[tokio::test]
async fn deleting_either_side_cascades_join_rows_only() {
    let Some(db) = TestDb::connect().await else { return };
    let repos = &db.repos;
    let ada = repos.developers.insert(developer("Ada", "Lovelace")).await.unwrap();
    let pascal = repos
        .developers
        .add_language(ada.id, LanguageRef::New(language("Pascal", "Wirth")))
        .await
        .unwrap();
    let oberon = repos
        .developers
        .add_language(ada.id, LanguageRef::New(language("Oberon", "Wirth")))
        .await
        .unwrap();

    assert!(repos.languages.delete_by_id(pascal.id).await.unwrap());
    assert_eq!(
        repos.developers.languages_of(ada.id).await.unwrap(),
        vec![oberon.clone()]
    );

    assert!(repos.developers.delete_by_id(ada.id).await.unwrap());
    assert!(repos.languages.developers_of(oberon.id).await.unwrap().is_empty());
    assert!(repos.languages.exists_by_id(oberon.id).await.unwrap());
    db.drop_schema().await;
}

#[tokio::test]
async fn paging_and_last_name_lookup() {
    let Some(db) = TestDb::connect().await else { return };
    let devs = &db.repos.developers;
    let mut ids = Vec::new();
    for (first, last) in [
        ("Ada", "Lovelace"),
        ("Alan", "Turing"),
        ("Byron", "Lovelace"),
        ("Grace", "Hopper"),
        ("Ken", "Thompson"),
    ] {
        ids.push(devs.insert(developer(first, last)).await.unwrap().id);
    }

    let page = devs
        .find_page(PageRequest::new(Some(1), Some(2)))
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(
        page.items.iter().map(|d| d.id).collect::<Vec<_>>(),
        vec![ids[2], ids[3]]
    );

    let past_end = devs
        .find_page(PageRequest::new(Some(9), Some(2)))
        .await
        .unwrap();
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total, 5);

    let lovelaces = devs.find_by_last_name("Lovelace").await.unwrap();
    assert_eq!(
        lovelaces.iter().map(|d| d.first_name.as_str()).collect::<Vec<_>>(),
        vec!["Ada", "Byron"]
    );
    db.drop_schema().await;
}
