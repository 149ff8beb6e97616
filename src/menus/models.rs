// Menu catalog models and DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

/// Display name stored on a reservation when no catalog item exists for its
/// (menu type, date) pair. Repaired to the real name once a menu is uploaded.
pub const NO_MENU_PLACEHOLDER: &str = "No specific menu uploaded yet";

/// Menu category. Fixed set; reservations and reports both key on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "text")]
pub enum MenuType {
    Bento,
    Maki,
    Curry,
    Noodles,
    Breakfast,
}

impl MenuType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuType::Bento => "Bento",
            MenuType::Maki => "Maki",
            MenuType::Curry => "Curry",
            MenuType::Noodles => "Noodles",
            MenuType::Breakfast => "Breakfast",
        }
    }
}

impl fmt::Display for MenuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog record. Orders snapshot `name` and price at placement time;
/// later catalog edits never retroactively change placed orders.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Menu {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub menu_type: MenuType,
    /// Single calendar date on which the item may be ordered.
    pub available_date: NaiveDate,
    pub is_available: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a catalog item
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMenuRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    #[validate(custom = "crate::validation::validate_non_negative_price")]
    pub price: Decimal,
    pub menu_type: MenuType,
    pub available_date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub image_url: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Request body for updating a catalog item
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMenuRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub price: Option<Decimal>,
    pub menu_type: Option<MenuType>,
    pub available_date: Option<NaiveDate>,
    pub is_available: Option<bool>,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_type_serializes_as_plain_name() {
        assert_eq!(serde_json::to_string(&MenuType::Bento).unwrap(), "\"Bento\"");
        assert_eq!(
            serde_json::to_string(&MenuType::Breakfast).unwrap(),
            "\"Breakfast\""
        );
    }

    #[test]
    fn menu_type_round_trips_from_json() {
        let parsed: MenuType = serde_json::from_str("\"Noodles\"").unwrap();
        assert_eq!(parsed, MenuType::Noodles);
        assert!(serde_json::from_str::<MenuType>("\"Pizza\"").is_err());
    }
}
