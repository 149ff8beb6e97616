// HTTP handlers for employee directory endpoints

use axum::{extract::{Path, State}, Json};

use crate::auth::middleware::AuthenticatedEmployee;
use crate::employees::models::Employee;
use crate::error::ApiError;

/// Handler for GET /api/employees/{employee_id}
/// Looks up a directory record
pub async fn get_employee_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
    Path(employee_id): Path<String>,
) -> Result<Json<Employee>, ApiError> {
    let employee = state
        .employee_repo
        .find_by_employee_id(&employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Employee".to_string(),
            id: employee_id,
        })?;

    Ok(Json(employee))
}

/// Handler for GET /api/employees/meal-eligible
/// Lists everyone enrolled in the self-service meal program
pub async fn list_meal_eligible_handler(
    State(state): State<crate::AppState>,
    _caller: AuthenticatedEmployee,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = state.employee_repo.list_meal_eligible().await?;
    Ok(Json(employees))
}
