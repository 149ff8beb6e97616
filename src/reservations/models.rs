// Reservation data models and DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use crate::employees::models::CustomerType;
use crate::menus::models::MenuType;

/// Reservation lifecycle status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "text")]
pub enum ReservationStatus {
    Pending,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Completed => "Completed",
            ReservationStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which physical table a combined row came from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "text")]
pub enum Source {
    Order,
    AdvanceOrder,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Order => write!(f, "Order"),
            Source::AdvanceOrder => write!(f, "AdvanceOrder"),
        }
    }
}

/// Same-day order row. Employee name, section, and menu name are snapshots
/// taken at placement time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: i32,
    pub reference_number: String,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub section: Option<String>,
    pub menu_type: MenuType,
    pub order_name: String,
    pub quantity: i32,
    pub reservation_date: DateTime<Utc>,
    pub meal_time: String,
    pub customer_type: CustomerType,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Advance (future/monthly) order row. Same shape as [`Order`]; kept as a
/// separate table because the input channel and validation window differ.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdvanceOrder {
    pub id: i32,
    pub reference_number: String,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub section: Option<String>,
    pub menu_type: MenuType,
    pub order_name: String,
    pub quantity: i32,
    pub reservation_date: DateTime<Utc>,
    pub meal_time: String,
    pub customer_type: CustomerType,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the combined read model over both reservation tables.
/// `email` and `price` are joined in for notification and reporting use.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CombinedOrder {
    pub source: Source,
    pub reference_number: String,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub section: Option<String>,
    pub menu_type: MenuType,
    pub order_name: String,
    pub quantity: i32,
    pub reservation_date: DateTime<Utc>,
    pub meal_time: String,
    pub customer_type: CustomerType,
    pub status: ReservationStatus,
    pub email: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
}

/// Fully-resolved row ready to be written to either reservation table.
/// Built by the service layer after display-name resolution, reference
/// generation, and profile denormalization.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub reference_number: String,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub section: Option<String>,
    pub menu_type: MenuType,
    pub order_name: String,
    pub quantity: i32,
    pub reservation_date: DateTime<Utc>,
    pub meal_time: String,
    pub customer_type: CustomerType,
}

/// Request body for POST /api/orders
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlaceOrderRequest {
    #[validate(custom = "crate::validation::validate_employee_id")]
    pub employee_id: String,
    pub menu_type: MenuType,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub reservation_date: NaiveDate,
    #[validate(custom = "crate::validation::validate_meal_time")]
    pub meal_time: String,
}

/// Request body for PUT /api/orders/{reference}
///
/// `order_name` is accepted for wire compatibility but never trusted; the
/// stored name is always re-resolved from the catalog.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReservationRequest {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub menu_type: MenuType,
    pub order_name: Option<String>,
}

/// One desired (employee, date, menu) slot in an advance-order batch
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdvanceSelection {
    pub employee_id: String,
    pub date: NaiveDate,
    pub menu_type: MenuType,
}

/// Request body for the advance-order batch endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdvanceBatchRequest {
    pub selections: Vec<AdvanceSelection>,
    /// Overrides the category default ("12:00" lunch, "07:00" breakfast).
    pub meal_time: Option<String>,
}

/// Outcome summary returned by the batch endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchSubmitResponse {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

/// Result of a bulk completion sweep
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkCompleteResponse {
    pub menu_type: MenuType,
    pub completed: u64,
    pub message: String,
}
