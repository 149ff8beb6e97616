// Validation utilities module
// Custom validation functions for reservation-specific rules

use validator::ValidationError;

/// Validates that a meal time is in `HH:MM` 24-hour form (e.g. "07:00", "12:00")
pub fn validate_meal_time(meal_time: &str) -> Result<(), ValidationError> {
    let ok = chrono::NaiveTime::parse_from_str(meal_time, "%H:%M").is_ok();
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_meal_time"))
    }
}

/// Validates that a catalog price is not negative
pub fn validate_non_negative_price(price: &rust_decimal::Decimal) -> Result<(), ValidationError> {
    if price < &rust_decimal::Decimal::ZERO {
        Err(ValidationError::new("price_must_be_non_negative"))
    } else {
        Ok(())
    }
}

/// Validates that an employee id is present and not just whitespace
pub fn validate_employee_id(employee_id: &str) -> Result<(), ValidationError> {
    if employee_id.trim().is_empty() {
        Err(ValidationError::new("employee_id_required"))
    } else {
        Ok(())
    }
}
