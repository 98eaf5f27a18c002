//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::error::ApiError;
use super::server::AppState;
use crate::db::DbSession;
use crate::models::ValidationError;

/// One pooled connection for the current request.
///
/// Dropped when the handler finishes, fails or is cancelled, which returns
/// the connection to the pool.
pub struct Session(pub DbSession);

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = state.db.acquire().await?;
        Ok(Self(session))
    }
}

/// Extract and validate a numeric dish id from path
pub struct DishId(pub i64);

impl<S> FromRequestParts<S> for DishId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let id = id.parse::<i64>().map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be an integer",
            })
        })?;

        Ok(Self(id))
    }
}
