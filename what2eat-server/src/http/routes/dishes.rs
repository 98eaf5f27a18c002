//! Dish endpoints

use std::sync::Arc;

use axum::{
    extract::Query,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{Dish, DishRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{DishId, Session};
use crate::http::server::AppState;
use crate::models::{
    DishChanges, DishListQuery, DishName, Field, ListParams, NewDish, ValidationError,
};
use crate::service::DishService;

/// Create dish request
#[derive(Deserialize)]
pub struct CreateDishRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<CreateDishRequest> for NewDish {
    type Error = ValidationError;

    fn try_from(req: CreateDishRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: DishName::new(&req.name)?,
            description: req.description,
        })
    }
}

/// Update dish request; omitted keys are left untouched
#[derive(Deserialize)]
pub struct UpdateDishRequest {
    #[serde(default)]
    pub name: Field<Option<String>>,
    #[serde(default)]
    pub description: Field<Option<String>>,
}

impl TryFrom<UpdateDishRequest> for DishChanges {
    type Error = ValidationError;

    fn try_from(req: UpdateDishRequest) -> Result<Self, Self::Error> {
        let name = req.name.try_map(|name| match name {
            Some(name) => DishName::new(&name),
            None => Err(ValidationError::Null { field: "name" }),
        })?;

        Ok(Self {
            name,
            description: req.description,
        })
    }
}

/// Dish response
#[derive(Debug, Serialize, Deserialize)]
pub struct DishResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<Dish> for DishResponse {
    fn from(d: Dish) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            created_at: d.created_at.to_rfc3339(),
        }
    }
}

/// GET /dishes - list dishes with search, sort and offset/limit
async fn list_dishes(
    Session(mut session): Session,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<DishResponse>>, ApiError> {
    let query = DishListQuery::try_from(params)?;
    let dishes = DishService::new(DishRepo::new(&mut session))
        .list_dishes(&query)
        .await?;

    Ok(Json(dishes.into_iter().map(DishResponse::from).collect()))
}

/// POST /dishes - create a dish
async fn create_dish(
    Session(mut session): Session,
    Json(req): Json<CreateDishRequest>,
) -> Result<(StatusCode, Json<DishResponse>), ApiError> {
    let data = NewDish::try_from(req)?;
    let dish = DishService::new(DishRepo::new(&mut session))
        .create_dish(data)
        .await?;

    Ok((StatusCode::CREATED, Json(DishResponse::from(dish))))
}

/// GET /dishes/{id} - get a single dish
async fn get_dish(
    DishId(id): DishId,
    Session(mut session): Session,
) -> Result<Json<DishResponse>, ApiError> {
    let dish = DishService::new(DishRepo::new(&mut session))
        .get_dish(id)
        .await?
        .ok_or_else(|| ApiError::dish_not_found(id))?;

    Ok(Json(DishResponse::from(dish)))
}

/// PUT /dishes/{id} - partial update
async fn update_dish(
    DishId(id): DishId,
    Session(mut session): Session,
    Json(req): Json<UpdateDishRequest>,
) -> Result<Json<DishResponse>, ApiError> {
    let changes = DishChanges::try_from(req)?;
    let dish = DishService::new(DishRepo::new(&mut session))
        .update_dish(id, changes)
        .await?
        .ok_or_else(|| ApiError::dish_not_found(id))?;

    Ok(Json(DishResponse::from(dish)))
}

/// DELETE /dishes/{id} - delete a dish
async fn delete_dish(
    DishId(id): DishId,
    Session(mut session): Session,
) -> Result<StatusCode, ApiError> {
    let removed = DishService::new(DishRepo::new(&mut session))
        .delete_dish(id)
        .await?;

    if !removed {
        return Err(ApiError::dish_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Dish routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dishes", get(list_dishes).post(create_dish))
        .route(
            "/dishes/{id}",
            get(get_dish).put(update_dish).delete(delete_dish),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_maps_presence() {
        let req: UpdateDishRequest =
            serde_json::from_str(r#"{"description": "Creamy Italian"}"#).unwrap();
        let changes = DishChanges::try_from(req).unwrap();
        assert_eq!(changes.name, Field::Absent);
        assert_eq!(
            changes.description,
            Field::Present(Some("Creamy Italian".to_string()))
        );
    }

    #[test]
    fn update_request_rejects_null_name() {
        let req: UpdateDishRequest = serde_json::from_str(r#"{"name": null}"#).unwrap();
        let err = DishChanges::try_from(req).unwrap_err();
        assert_eq!(err, ValidationError::Null { field: "name" });
    }

    #[test]
    fn create_request_validates_name() {
        let req: CreateDishRequest =
            serde_json::from_str(&format!(r#"{{"name": "{}"}}"#, "x".repeat(256))).unwrap();
        assert!(matches!(
            NewDish::try_from(req).unwrap_err(),
            ValidationError::TooLong { max: 255, .. }
        ));
    }
}
