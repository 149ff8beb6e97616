// HTTP handlers for menu catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::auth::middleware::AuthenticatedEmployee;
use crate::clock;
use crate::error::ApiError;
use crate::menus::models::{CreateMenuRequest, Menu, MenuType, UpdateMenuRequest};

/// Optional explicit date range for catalog listings
#[derive(Debug, Deserialize)]
pub struct MenuRangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Handler for GET /api/menus
/// Lists available items, defaulting to the current admin week (Monday start)
#[utoipa::path(
    get,
    path = "/api/menus",
    params(
        ("start" = Option<NaiveDate>, Query, description = "Range start (defaults to Monday of the current business week)"),
        ("end" = Option<NaiveDate>, Query, description = "Range end (defaults to Sunday of the current business week)")
    ),
    responses(
        (status = 200, description = "Available menu items", body = [Menu])
    )
)]
pub async fn list_menus_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<MenuRangeQuery>,
) -> Result<Json<Vec<Menu>>, ApiError> {
    let (default_start, default_end) = clock::admin_week(clock::business_today(Utc::now()));
    let start = query.start.unwrap_or(default_start);
    let end = query.end.unwrap_or(default_end);

    let menus = state.menu_repo.list_available(start, end).await?;
    Ok(Json(menus))
}

/// Handler for GET /api/menus/weekly
/// Weekly reservation menu, Sunday-start week
#[utoipa::path(
    get,
    path = "/api/menus/weekly",
    responses(
        (status = 200, description = "This week's reservation menu", body = [Menu])
    )
)]
pub async fn weekly_menu_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<Menu>>, ApiError> {
    let (start, end) = clock::reservation_week(clock::business_today(Utc::now()));
    let menus = state.menu_repo.list_available(start, end).await?;
    Ok(Json(menus))
}

/// Handler for GET /api/menus/find/{menu_type}/{date}
/// Items of one type sellable on exactly one date
#[utoipa::path(
    get,
    path = "/api/menus/find/{menu_type}/{date}",
    params(
        ("menu_type" = MenuType, Path, description = "Menu category"),
        ("date" = NaiveDate, Path, description = "Availability date")
    ),
    responses(
        (status = 200, description = "Matching menu items", body = [Menu])
    )
)]
pub async fn find_menus_handler(
    State(state): State<crate::AppState>,
    Path((menu_type, date)): Path<(MenuType, NaiveDate)>,
) -> Result<Json<Vec<Menu>>, ApiError> {
    let menus = state.menu_repo.find_menus(menu_type, date).await?;
    Ok(Json(menus))
}

/// Handler for GET /api/menus/{id}
#[utoipa::path(
    get,
    path = "/api/menus/{id}",
    params(("id" = i32, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item", body = Menu),
        (status = 404, description = "Menu item not found")
    )
)]
pub async fn get_menu_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Menu>, ApiError> {
    let menu = state
        .menu_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Menu".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(menu))
}

/// Handler for POST /api/menus
/// Creates a catalog item (admin only)
#[utoipa::path(
    post,
    path = "/api/menus",
    request_body = CreateMenuRequest,
    responses(
        (status = 201, description = "Menu item created", body = Menu),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_menu_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
    Json(request): Json<CreateMenuRequest>,
) -> Result<(StatusCode, Json<Menu>), ApiError> {
    request.validate()?;

    let menu = state.menu_repo.create(&request).await?;
    tracing::info!(menu_id = menu.id, menu_type = %menu.menu_type, "menu item created");
    Ok((StatusCode::CREATED, Json(menu)))
}

/// Handler for POST /api/menus/batch
/// Creates the parsed rows of an uploaded menu sheet atomically (admin only)
#[utoipa::path(
    post,
    path = "/api/menus/batch",
    request_body = [CreateMenuRequest],
    responses(
        (status = 201, description = "Menu items created", body = [Menu]),
        (status = 400, description = "Validation error")
    )
)]
pub async fn batch_create_menus_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
    Json(requests): Json<Vec<CreateMenuRequest>>,
) -> Result<(StatusCode, Json<Vec<Menu>>), ApiError> {
    for request in &requests {
        request.validate()?;
    }

    let menus = state.menu_repo.create_batch(&requests).await?;
    tracing::info!(count = menus.len(), "menu sheet uploaded");
    Ok((StatusCode::CREATED, Json(menus)))
}

/// Handler for PUT /api/menus/{id}
/// Updates a catalog item (admin only)
#[utoipa::path(
    put,
    path = "/api/menus/{id}",
    params(("id" = i32, Path, description = "Menu item id")),
    request_body = UpdateMenuRequest,
    responses(
        (status = 200, description = "Menu item updated", body = Menu),
        (status = 404, description = "Menu item not found")
    )
)]
pub async fn update_menu_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
    Path(id): Path<i32>,
    Json(request): Json<UpdateMenuRequest>,
) -> Result<Json<Menu>, ApiError> {
    request.validate()?;

    let menu = state
        .menu_repo
        .update(id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Menu".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(menu))
}

/// Handler for DELETE /api/menus/{id}
/// Deletes a catalog item (admin only)
#[utoipa::path(
    delete,
    path = "/api/menus/{id}",
    params(("id" = i32, Path, description = "Menu item id")),
    responses(
        (status = 204, description = "Menu item deleted"),
        (status = 404, description = "Menu item not found")
    )
)]
pub async fn delete_menu_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.menu_repo.delete(id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound {
            resource: "Menu".to_string(),
            id: id.to_string(),
        })
    }
}
