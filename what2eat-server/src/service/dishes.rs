//! Dish use-case service.
//!
//! # Responsibility
//! - Provide the CRUD entry points the HTTP layer calls.
//! - Delegate persistence to [`DishRepo`].
//!
//! # Invariants
//! - Stateless: every call is independent.
//! - A unique-name violation is the only store fault translated here; it
//!   becomes [`ServiceError::Validation`]. Everything else passes through.
//! - An update with no supplied fields issues no write.

use crate::db::{DbError, Dish, DishRepo};
use crate::models::{DishChanges, DishListQuery, NewDish};

/// Message for a name that collides with an existing dish.
pub const DUPLICATE_NAME_MESSAGE: &str = "dish name already exists";

/// Service error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Caller-correctable rejection
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

/// Use-case service for dishes.
pub struct DishService<'a> {
    repo: DishRepo<'a>,
}

impl<'a> DishService<'a> {
    pub fn new(repo: DishRepo<'a>) -> Self {
        Self { repo }
    }

    /// Create a dish.
    ///
    /// # Contract
    /// - Duplicate name → `ServiceError::Validation(DUPLICATE_NAME_MESSAGE)`.
    /// - Store state is unchanged on rejection.
    pub async fn create_dish(&mut self, data: NewDish) -> Result<Dish, ServiceError> {
        self.repo.create(&data).await.map_err(translate_duplicate)
    }

    pub async fn get_dish(&mut self, id: i64) -> Result<Option<Dish>, ServiceError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn list_dishes(&mut self, query: &DishListQuery) -> Result<Vec<Dish>, ServiceError> {
        Ok(self.repo.get_all(query).await?)
    }

    /// Apply a partial update.
    ///
    /// # Contract
    /// - No supplied fields: plain fetch, no write.
    /// - `Ok(None)` when the id doesn't exist.
    /// - Renaming onto an existing name is rejected like a duplicate create.
    pub async fn update_dish(
        &mut self,
        id: i64,
        data: DishChanges,
    ) -> Result<Option<Dish>, ServiceError> {
        if data.is_empty() {
            return Ok(self.repo.get_by_id(id).await?);
        }
        self.repo.update(&data, id).await.map_err(translate_duplicate)
    }

    /// Hard delete. `false` when nothing was removed.
    pub async fn delete_dish(&mut self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.repo.delete(id).await?)
    }
}

fn translate_duplicate(err: DbError) -> ServiceError {
    if err.is_unique_violation() {
        ServiceError::Validation(DUPLICATE_NAME_MESSAGE.to_string())
    } else {
        ServiceError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, Settings};
    use crate::db::{create_tables, Database};
    use crate::models::{DishName, Field};

    async fn sqlite_db(dir: &tempfile::TempDir) -> Database {
        let config = AppConfig::new(Settings {
            sqlite_db_path: dir.path().join("service.sqlite3"),
            ..Settings::default()
        });
        let db = Database::connect(&config).await.unwrap();
        create_tables(&db).await.unwrap();
        db
    }

    fn new_dish(name: &str, description: Option<&str>) -> NewDish {
        NewDish {
            name: DishName::new(name).unwrap(),
            description: description.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn duplicate_create_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = sqlite_db(&dir).await;
        let mut session = db.acquire().await.unwrap();
        let mut service = DishService::new(DishRepo::new(&mut session));

        let first = service.create_dish(new_dish("Tacos", None)).await.unwrap();
        assert_eq!(first.name, "Tacos");

        let err = service
            .create_dish(new_dish("Tacos", Some("again")))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == DUPLICATE_NAME_MESSAGE));

        let all = service.list_dishes(&DishListQuery::default()).await.unwrap();
        assert_eq!(all, vec![first]);
    }

    #[tokio::test]
    async fn empty_update_returns_current_state() {
        let dir = tempfile::tempdir().unwrap();
        let db = sqlite_db(&dir).await;
        let mut session = db.acquire().await.unwrap();
        let mut service = DishService::new(DishRepo::new(&mut session));

        let created = service
            .create_dish(new_dish("Pho", Some("Beef broth")))
            .await
            .unwrap();

        let same = service
            .update_dish(created.id, DishChanges::default())
            .await
            .unwrap();
        assert_eq!(same, Some(created));

        let missing = service
            .update_dish(12345, DishChanges::default())
            .await
            .unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn partial_updates_leave_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let db = sqlite_db(&dir).await;
        let mut session = db.acquire().await.unwrap();
        let mut service = DishService::new(DishRepo::new(&mut session));

        let created = service
            .create_dish(new_dish("Bibimbap", Some("Rice bowl")))
            .await
            .unwrap();

        let described = service
            .update_dish(
                created.id,
                DishChanges {
                    description: Field::Present(Some("Mixed rice".into())),
                    ..DishChanges::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(described.name, "Bibimbap");
        assert_eq!(described.description.as_deref(), Some("Mixed rice"));

        let renamed = service
            .update_dish(
                created.id,
                DishChanges {
                    name: Field::Present(DishName::new("Dolsot Bibimbap").unwrap()),
                    ..DishChanges::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Dolsot Bibimbap");
        assert_eq!(renamed.description.as_deref(), Some("Mixed rice"));
        assert_eq!(renamed.id, created.id);
        assert_eq!(renamed.created_at, created.created_at);
    }

    #[tokio::test]
    async fn rename_onto_existing_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = sqlite_db(&dir).await;
        let mut session = db.acquire().await.unwrap();
        let mut service = DishService::new(DishRepo::new(&mut session));

        service.create_dish(new_dish("Sushi", None)).await.unwrap();
        let other = service.create_dish(new_dish("Sashimi", None)).await.unwrap();

        let err = service
            .update_dish(
                other.id,
                DishChanges {
                    name: Field::Present(DishName::new("Sushi").unwrap()),
                    ..DishChanges::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let unchanged = service.get_dish(other.id).await.unwrap().unwrap();
        assert_eq!(unchanged.name, "Sashimi");
    }

    #[tokio::test]
    async fn delete_then_get_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let db = sqlite_db(&dir).await;
        let mut session = db.acquire().await.unwrap();
        let mut service = DishService::new(DishRepo::new(&mut session));

        let created = service.create_dish(new_dish("Paella", None)).await.unwrap();
        assert!(service.delete_dish(created.id).await.unwrap());
        assert_eq!(service.get_dish(created.id).await.unwrap(), None);
        assert!(!service.delete_dish(created.id).await.unwrap());
    }
}
