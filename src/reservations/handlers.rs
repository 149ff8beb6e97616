// HTTP handlers for reservation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthenticatedEmployee;
use crate::auth::models::Role;
use crate::menus::models::MenuType;
use crate::reservations::models::{
    AdvanceBatchRequest, BatchSubmitResponse, BulkCompleteResponse, CombinedOrder, Order,
    PlaceOrderRequest, UpdateReservationRequest,
};
use crate::reservations::service::MealCategory;
use crate::reservations::ReservationError;

/// Query parameters for the tokenized summary view
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub token: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub employee_id: String,
    pub orders: Vec<CombinedOrder>,
}

/// Handler for POST /api/orders
/// Places a same-day order. Employees may only order for themselves;
/// admins may place on behalf of anyone.
pub async fn place_order_handler(
    State(state): State<crate::AppState>,
    caller: AuthenticatedEmployee,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ReservationError> {
    request
        .validate()
        .map_err(|e| ReservationError::ValidationError(e.to_string()))?;

    if caller.role != Role::Admin && caller.employee_id != request.employee_id {
        return Err(ReservationError::Unauthorized);
    }

    let order = state
        .reservation_service
        .place_order(request, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Handler for GET /api/orders/summary
/// Anonymous token-gated view of one employee's order history
pub async fn order_summary_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, ReservationError> {
    let (employee_id, orders) = state
        .reservation_service
        .order_summary(query.token, Utc::now())
        .await?;

    Ok(Json(SummaryResponse { employee_id, orders }))
}

/// Handler for PUT /api/orders/{reference}
/// Quantity/menu correction on an existing reservation
pub async fn update_reservation_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
    Path(reference): Path<String>,
    Json(request): Json<UpdateReservationRequest>,
) -> Result<Json<CombinedOrder>, ReservationError> {
    request
        .validate()
        .map_err(|e| ReservationError::ValidationError(e.to_string()))?;

    let updated = state
        .reservation_service
        .update_reservation(&reference, request)
        .await?;

    Ok(Json(updated))
}

/// Handler for POST /api/orders/{reference}/cancel
pub async fn cancel_reservation_handler(
    State(state): State<crate::AppState>,
    caller: AuthenticatedEmployee,
    Path(reference): Path<String>,
) -> Result<Json<CombinedOrder>, ReservationError> {
    let existing = state
        .combined_repo
        .find_by_reference(&reference)
        .await?
        .ok_or_else(|| ReservationError::NotFound(reference.clone()))?;

    if caller.role != Role::Admin && caller.employee_id != existing.employee_id {
        return Err(ReservationError::Unauthorized);
    }

    let cancelled = state
        .reservation_service
        .cancel_reservation(&reference)
        .await?;

    Ok(Json(cancelled))
}

/// Handler for POST /api/orders/complete/{menu_type}
/// Admin bulk completion sweep for business-today
pub async fn bulk_complete_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
    Path(menu_type): Path<MenuType>,
) -> Result<Json<BulkCompleteResponse>, ReservationError> {
    let completed = state
        .reservation_service
        .bulk_complete_by_type(menu_type, Utc::now())
        .await?;

    let message = if completed == 0 {
        "No matching orders".to_string()
    } else {
        format!("{} orders marked as completed", completed)
    };

    Ok(Json(BulkCompleteResponse {
        menu_type,
        completed,
        message,
    }))
}

/// Handler for GET /api/orders/today/{menu_type}
/// Business-today's reservations of one type, every status
pub async fn today_orders_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
    Path(menu_type): Path<MenuType>,
) -> Result<Json<Vec<CombinedOrder>>, ReservationError> {
    let orders = state
        .reservation_service
        .today_orders(menu_type, Utc::now())
        .await?;

    Ok(Json(orders))
}

/// Handler for POST /api/advance-orders/lunch
pub async fn submit_lunch_batch_handler(
    State(state): State<crate::AppState>,
    caller: AuthenticatedEmployee,
    Json(request): Json<AdvanceBatchRequest>,
) -> Result<Json<BatchSubmitResponse>, ReservationError> {
    let result = state
        .advance_order_service
        .submit_batch(&caller.employee_id, request, MealCategory::Lunch, Utc::now())
        .await?;

    Ok(Json(result))
}

/// Handler for POST /api/advance-orders/breakfast
pub async fn submit_breakfast_batch_handler(
    State(state): State<crate::AppState>,
    caller: AuthenticatedEmployee,
    Json(request): Json<AdvanceBatchRequest>,
) -> Result<Json<BatchSubmitResponse>, ReservationError> {
    let result = state
        .advance_order_service
        .submit_batch(
            &caller.employee_id,
            request,
            MealCategory::Breakfast,
            Utc::now(),
        )
        .await?;

    Ok(Json(result))
}
