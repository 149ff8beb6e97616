// HTTP handlers for reporting endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::auth::middleware::AuthenticatedEmployee;
use crate::clock;
use crate::employees::models::CustomerType;
use crate::menus::models::MenuType;
use crate::reports::csv::{csv_filename, render_orders_csv};
use crate::reports::models::{DailySummaryEntry, ExpatMonthlyDeduction};
use crate::reservations::models::CombinedOrder;
use crate::reservations::ReservationError;

/// Handler for GET /api/reports/deductions/monthly
/// Payroll deduction buckets for the current business month (admin only)
pub async fn monthly_deductions_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
) -> Result<Json<Vec<ExpatMonthlyDeduction>>, ReservationError> {
    let report = state.report_service.monthly_deductions(Utc::now()).await?;
    Ok(Json(report))
}

/// Handler for GET /api/reports/summary/daily
/// Per-type counters for business-today
pub async fn daily_summary_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
) -> Result<Json<Vec<DailySummaryEntry>>, ReservationError> {
    let summary = state.report_service.daily_summary(Utc::now()).await?;
    Ok(Json(summary))
}

/// Handler for GET /api/reports/csv/{customer_type}
/// Daily fulfillment export as a CSV download
pub async fn orders_csv_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
    Path(customer_type): Path<CustomerType>,
) -> Result<Response, ReservationError> {
    let now = Utc::now();
    let rows = state
        .report_service
        .daily_orders_for_export(customer_type, now)
        .await?;

    let body = render_orders_csv(&rows);
    let filename = csv_filename(customer_type, clock::business_today(now));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

/// Handler for GET /api/reports/fulfillment/{menu_type}
/// Kitchen feed for one menu type: marks business-today's Pending rows of
/// that type Completed, then returns the day's rows. Document rendering is
/// an external concern; this endpoint supplies the data and the side effect.
pub async fn fulfillment_feed_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
    Path(menu_type): Path<MenuType>,
) -> Result<Json<Vec<CombinedOrder>>, ReservationError> {
    let now = Utc::now();

    state
        .reservation_service
        .bulk_complete_by_type(menu_type, now)
        .await?;

    let mut orders = state.reservation_service.today_orders(menu_type, now).await?;
    // Grouped the way the document renderer paginates: customer type first.
    orders.sort_by(|a, b| {
        a.customer_type
            .as_str()
            .cmp(b.customer_type.as_str())
            .then(a.reservation_date.cmp(&b.reservation_date))
    });
    Ok(Json(orders))
}
