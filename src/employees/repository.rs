// Employee directory data access

use crate::employees::models::Employee;
use sqlx::PgPool;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_employee_id(
        &self,
        employee_id: &str,
    ) -> Result<Option<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT employee_id, first_name, last_name, email, section, position,
                   employee_type, created_at
            FROM employees
            WHERE employee_id = $1
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Everyone enrolled in the self-service meal program: expats plus
    /// anyone whose position mentions "Manager".
    pub async fn list_meal_eligible(&self) -> Result<Vec<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT employee_id, first_name, last_name, email, section, position,
                   employee_type, created_at
            FROM employees
            WHERE employee_type = 'Expat' OR position LIKE '%Manager%'
            ORDER BY last_name, first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
