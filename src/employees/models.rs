// Employee directory models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Billing classification of an employee, denormalized onto every order
/// because fulfillment and payroll split along this line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
pub enum CustomerType {
    Local,
    Expat,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Local => "Local",
            CustomerType::Expat => "Expat",
        }
    }
}

/// Employee directory record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub section: Option<String>,
    pub position: Option<String>,
    pub employee_type: String,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Meal-program eligibility: expats and anyone whose position mentions
    /// "Manager" (substring match, so "Senior Manager" and "Manager, QA"
    /// both qualify).
    pub fn is_meal_eligible(&self) -> bool {
        if self.employee_type == "Expat" {
            return true;
        }
        self.position
            .as_deref()
            .map(|p| p.contains("Manager"))
            .unwrap_or(false)
    }

    /// Billing classification derived from the directory record.
    pub fn customer_type(&self) -> CustomerType {
        if self.employee_type == "Expat" {
            CustomerType::Expat
        } else {
            CustomerType::Local
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(employee_type: &str, position: Option<&str>) -> Employee {
        Employee {
            employee_id: "E00001".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Santos".to_string(),
            email: Some("alice@example.com".to_string()),
            section: Some("Assembly".to_string()),
            position: position.map(|p| p.to_string()),
            employee_type: employee_type.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn expats_are_eligible_regardless_of_position() {
        assert!(employee("Expat", None).is_meal_eligible());
        assert!(employee("Expat", Some("Operator")).is_meal_eligible());
    }

    #[test]
    fn manager_positions_are_eligible_by_substring() {
        assert!(employee("Local", Some("Manager")).is_meal_eligible());
        assert!(employee("Local", Some("Senior Manager")).is_meal_eligible());
        assert!(employee("Local", Some("Manager, QA")).is_meal_eligible());
    }

    #[test]
    fn local_non_managers_are_not_eligible() {
        assert!(!employee("Local", Some("Operator")).is_meal_eligible());
        assert!(!employee("Local", None).is_meal_eligible());
        // Case-sensitive on purpose; the directory stores title case.
        assert!(!employee("Local", Some("manager")).is_meal_eligible());
    }

    #[test]
    fn customer_type_follows_employee_type() {
        assert_eq!(employee("Expat", None).customer_type(), CustomerType::Expat);
        assert_eq!(employee("Local", None).customer_type(), CustomerType::Local);
        assert_eq!(employee("Agency", None).customer_type(), CustomerType::Local);
    }
}
