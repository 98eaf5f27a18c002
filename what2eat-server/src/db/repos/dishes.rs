//! Dish repository
//!
//! The only code that speaks SQL for dishes. Queries are shared between
//! PostgreSQL and SQLite; `QueryBuilder` picks the placeholder style.
//!
//! Search is a case-insensitive substring match on `name`:
//! `LOWER(name) LIKE LOWER('%<term>%')` with `%`, `_` and `\` escaped.
//! Both sides go through the store's `LOWER`, so a term always matches its
//! own spelling. How far case folding reaches beyond ASCII is up to the
//! store (SQLite: ASCII only).

use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder};

use crate::db::pool::DbSession;
use crate::models::{DishChanges, DishListQuery, Field, NewDish, SortColumn};

/// Run one sqlx expression against whichever backend the session holds.
///
/// The optional `Db` ident names the backend's `sqlx::Database` type inside
/// the body, for `QueryBuilder::<Db>`.
macro_rules! with_conn {
    ($session:expr, $conn:ident => $body:expr) => {
        match &mut *$session {
            DbSession::Postgres($conn) => $body,
            DbSession::Sqlite($conn) => $body,
        }
    };
    ($session:expr, $conn:ident, $db:ident => $body:expr) => {
        match &mut *$session {
            DbSession::Postgres($conn) => {
                type $db = sqlx::Postgres;
                $body
            }
            DbSession::Sqlite($conn) => {
                type $db = sqlx::Sqlite;
                $body
            }
        }
    };
}

const SELECT_DISH: &str = "SELECT id, name, description, created_at FROM dishes";
const RETURNING_DISH: &str = " RETURNING id, name, description, created_at";

/// Dish record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DbError {
    /// True if the store rejected a write for duplicating a unique column.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::Sqlx(sqlx::Error::Database(e)) if e.is_unique_violation())
    }
}

/// Dish repository
pub struct DishRepo<'a> {
    session: &'a mut DbSession,
}

impl<'a> DishRepo<'a> {
    pub fn new(session: &'a mut DbSession) -> Self {
        Self { session }
    }

    /// Insert a dish. A duplicate name surfaces as a unique violation.
    pub async fn create(&mut self, new: &NewDish) -> Result<Dish, DbError> {
        let dish = with_conn!(self.session, conn => {
            sqlx::query_as::<_, Dish>(
                r#"
                INSERT INTO dishes (name, description)
                VALUES ($1, $2)
                RETURNING id, name, description, created_at
                "#,
            )
            .bind(new.name.as_str())
            .bind(new.description.as_deref())
            .fetch_one(&mut **conn)
            .await
        })?;

        tracing::debug!(id = dish.id, "dish created");
        Ok(dish)
    }

    /// Get a dish by id. `None` if absent.
    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<Dish>, DbError> {
        let dish = with_conn!(self.session, conn => {
            sqlx::query_as::<_, Dish>(
                "SELECT id, name, description, created_at FROM dishes WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&mut **conn)
            .await
        })?;

        Ok(dish)
    }

    /// List one page of dishes, optionally filtered by name.
    pub async fn get_all(&mut self, query: &DishListQuery) -> Result<Vec<Dish>, DbError> {
        let pattern = query.search.as_deref().map(like_pattern);

        let dishes = with_conn!(self.session, conn, Db => {
            let mut builder = QueryBuilder::<Db>::new(SELECT_DISH);

            if let Some(pattern) = &pattern {
                builder.push(" WHERE LOWER(name) LIKE LOWER(");
                builder.push_bind(pattern.as_str());
                builder.push(r") ESCAPE '\'");
            }

            push_order(&mut builder, query);

            builder
                .push(" LIMIT ")
                .push_bind(i64::from(query.page.limit()))
                .push(" OFFSET ")
                .push_bind(i64::from(query.page.offset()));

            builder.build_query_as::<Dish>().fetch_all(&mut **conn).await
        })?;

        Ok(dishes)
    }

    /// Write the supplied fields. `None` if no dish has this id.
    pub async fn update(&mut self, changes: &DishChanges, id: i64) -> Result<Option<Dish>, DbError> {
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let dish = with_conn!(self.session, conn, Db => {
            let mut builder = QueryBuilder::<Db>::new("UPDATE dishes SET ");

            {
                let mut columns = builder.separated(", ");
                if let Field::Present(name) = &changes.name {
                    columns.push("name = ");
                    columns.push_bind_unseparated(name.as_str());
                }
                if let Field::Present(description) = &changes.description {
                    columns.push("description = ");
                    columns.push_bind_unseparated(description.as_deref());
                }
            }

            builder.push(" WHERE id = ");
            builder.push_bind(id);
            builder.push(RETURNING_DISH);

            builder.build_query_as::<Dish>().fetch_optional(&mut **conn).await
        })?;

        if let Some(dish) = &dish {
            tracing::debug!(id = dish.id, "dish updated");
        }
        Ok(dish)
    }

    /// Hard delete. Returns whether a row was removed.
    pub async fn delete(&mut self, id: i64) -> Result<bool, DbError> {
        let affected = with_conn!(self.session, conn => {
            sqlx::query("DELETE FROM dishes WHERE id = $1")
                .bind(id)
                .execute(&mut **conn)
                .await
                .map(|result| result.rows_affected())
        })?;

        tracing::debug!(id, affected, "dish delete");
        Ok(affected > 0)
    }
}

/// ORDER BY from the allow-listed column, with `id` as tiebreaker.
fn push_order<DB: sqlx::Database>(builder: &mut QueryBuilder<'_, DB>, query: &DishListQuery) {
    let direction = query.direction.as_sql();
    builder.push(" ORDER BY ");
    builder.push(query.order_by.as_sql());
    builder.push(" ");
    builder.push(direction);

    if query.order_by != SortColumn::Id {
        builder.push(", id ");
        builder.push(direction);
    }
}

/// `%term%` with LIKE wildcards escaped by `\`. Case is left to the store.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
