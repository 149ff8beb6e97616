// Report output models

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::menus::models::MenuType;

/// Per-person monthly deduction buckets for Completed Expat reservations.
/// Field names on the wire match the payroll import format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ExpatMonthlyDeduction {
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String)]
    pub expat_bento: Decimal,
    #[schema(value_type = String)]
    pub expat_curry_rice: Decimal,
    #[schema(value_type = String)]
    pub expat_noodles: Decimal,
    #[schema(value_type = String)]
    pub maki_roll: Decimal,
    #[schema(value_type = String)]
    pub breakfast: Decimal,
}

impl ExpatMonthlyDeduction {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            expat_bento: Decimal::ZERO,
            expat_curry_rice: Decimal::ZERO,
            expat_noodles: Decimal::ZERO,
            maki_roll: Decimal::ZERO,
            breakfast: Decimal::ZERO,
        }
    }

    pub fn total(&self) -> Decimal {
        self.expat_bento + self.expat_curry_rice + self.expat_noodles + self.maki_roll
            + self.breakfast
    }
}

/// One menu type's slice of the daily summary
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailySummaryEntry {
    pub menu_type: MenuType,
    pub total_orders: usize,
    pub total_quantity: i64,
    pub pending: usize,
    pub completed: usize,
    pub cancelled: usize,
}
