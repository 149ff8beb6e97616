use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::menus::models::MenuType;
use crate::reservations::error::ReservationError;
use crate::reservations::models::{
    AdvanceOrder, CombinedOrder, NewReservation, Order, ReservationStatus,
};

const ORDER_COLUMNS: &str = "id, reference_number, employee_id, first_name, last_name, section, \
     menu_type, order_name, quantity, reservation_date, meal_time, customer_type, status, \
     created_at, updated_at";

const COMBINED_COLUMNS: &str = "source, reference_number, employee_id, first_name, last_name, \
     section, menu_type, order_name, quantity, reservation_date, meal_time, customer_type, \
     status, email, price";

/// Repository for same-day order rows
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, row: &NewReservation) -> Result<Order, ReservationError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (reference_number, employee_id, first_name, last_name, section,
                                menu_type, order_name, quantity, reservation_date, meal_time,
                                customer_type, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'Pending')
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(&row.reference_number)
        .bind(&row.employee_id)
        .bind(&row.first_name)
        .bind(&row.last_name)
        .bind(&row.section)
        .bind(row.menu_type)
        .bind(&row.order_name)
        .bind(row.quantity)
        .bind(row.reservation_date)
        .bind(&row.meal_time)
        .bind(row.customer_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    /// Quantity/menu correction. `order_name` is the catalog-resolved name,
    /// already repaired by the service layer.
    pub async fn update_details(
        &self,
        reference: &str,
        quantity: i32,
        menu_type: MenuType,
        order_name: &str,
    ) -> Result<Option<Order>, ReservationError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET quantity = $2, menu_type = $3, order_name = $4, updated_at = NOW()
            WHERE reference_number = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(reference)
        .bind(quantity)
        .bind(menu_type)
        .bind(order_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn set_status(
        &self,
        reference: &str,
        status: ReservationStatus,
    ) -> Result<Option<Order>, ReservationError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET status = $2, updated_at = NOW()
            WHERE reference_number = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(reference)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }
}

/// Planned overwrite of one advance-order slot, produced from a resolver
/// Overwrite action after display-name resolution.
#[derive(Debug, Clone)]
pub struct SlotOverwrite {
    pub employee_id: String,
    pub day_start: DateTime<Utc>,
    pub day_end: DateTime<Utc>,
    pub meal_time: String,
    pub menu_type: MenuType,
    pub order_name: String,
}

/// Repository for advance-order rows
#[derive(Clone)]
pub struct AdvanceOrderRepository {
    pool: PgPool,
}

impl AdvanceOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Existing rows for one employee and meal time inside a UTC range.
    /// Feeds the conflict resolver.
    pub async fn find_slots(
        &self,
        employee_id: &str,
        meal_time: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AdvanceOrder>, ReservationError> {
        let rows = sqlx::query_as::<_, AdvanceOrder>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM advance_orders
            WHERE employee_id = $1 AND meal_time = $2
              AND reservation_date >= $3 AND reservation_date < $4
            ORDER BY reservation_date
            "#
        ))
        .bind(employee_id)
        .bind(meal_time)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Execute a reconcile plan in one transaction: either every insert and
    /// overwrite lands, or none does.
    pub async fn apply_plan(
        &self,
        inserts: &[NewReservation],
        overwrites: &[SlotOverwrite],
    ) -> Result<(), ReservationError> {
        let mut tx = self.pool.begin().await?;

        for row in inserts {
            sqlx::query(
                r#"
                INSERT INTO advance_orders (reference_number, employee_id, first_name, last_name,
                                            section, menu_type, order_name, quantity,
                                            reservation_date, meal_time, customer_type, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'Pending')
                "#,
            )
            .bind(&row.reference_number)
            .bind(&row.employee_id)
            .bind(&row.first_name)
            .bind(&row.last_name)
            .bind(&row.section)
            .bind(row.menu_type)
            .bind(&row.order_name)
            .bind(row.quantity)
            .bind(row.reservation_date)
            .bind(&row.meal_time)
            .bind(row.customer_type)
            .execute(&mut *tx)
            .await?;
        }

        for slot in overwrites {
            sqlx::query(
                r#"
                UPDATE advance_orders
                SET menu_type = $4, order_name = $5, status = 'Pending', updated_at = NOW()
                WHERE employee_id = $1 AND meal_time = $2
                  AND reservation_date >= $3 AND reservation_date < $6
                "#,
            )
            .bind(&slot.employee_id)
            .bind(&slot.meal_time)
            .bind(slot.day_start)
            .bind(slot.menu_type)
            .bind(&slot.order_name)
            .bind(slot.day_end)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn update_details(
        &self,
        reference: &str,
        quantity: i32,
        menu_type: MenuType,
        order_name: &str,
    ) -> Result<Option<AdvanceOrder>, ReservationError> {
        let order = sqlx::query_as::<_, AdvanceOrder>(&format!(
            r#"
            UPDATE advance_orders
            SET quantity = $2, menu_type = $3, order_name = $4, updated_at = NOW()
            WHERE reference_number = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(reference)
        .bind(quantity)
        .bind(menu_type)
        .bind(order_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn set_status(
        &self,
        reference: &str,
        status: ReservationStatus,
    ) -> Result<Option<AdvanceOrder>, ReservationError> {
        let order = sqlx::query_as::<_, AdvanceOrder>(&format!(
            r#"
            UPDATE advance_orders
            SET status = $2, updated_at = NOW()
            WHERE reference_number = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(reference)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }
}

/// Read model over both reservation tables, backed by the combined_orders
/// view. The view tags each row with its source and joins in the owner's
/// email and the catalog price for that (menu type, business date).
#[derive(Clone)]
pub struct CombinedOrderRepository {
    pool: PgPool,
}

impl CombinedOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a reference number to whichever table owns it.
    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<CombinedOrder>, ReservationError> {
        let row = sqlx::query_as::<_, CombinedOrder>(&format!(
            r#"
            SELECT {COMBINED_COLUMNS}
            FROM combined_orders
            WHERE reference_number = $1
            "#
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// All reservations of one type inside a UTC range, every status.
    pub async fn list_by_type_in_range(
        &self,
        menu_type: MenuType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CombinedOrder>, ReservationError> {
        let rows = sqlx::query_as::<_, CombinedOrder>(&format!(
            r#"
            SELECT {COMBINED_COLUMNS}
            FROM combined_orders
            WHERE menu_type = $1 AND reservation_date >= $2 AND reservation_date < $3
            ORDER BY reservation_date, reference_number
            "#
        ))
        .bind(menu_type)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// All reservations inside a UTC range, every type and status.
    pub async fn list_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CombinedOrder>, ReservationError> {
        let rows = sqlx::query_as::<_, CombinedOrder>(&format!(
            r#"
            SELECT {COMBINED_COLUMNS}
            FROM combined_orders
            WHERE reservation_date >= $1 AND reservation_date < $2
            ORDER BY reservation_date, reference_number
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// One employee's reservations dated on or after `from`, soonest first.
    /// Backs the tokenized summary view, which shows upcoming orders only.
    pub async fn list_upcoming_by_employee(
        &self,
        employee_id: &str,
        from: DateTime<Utc>,
    ) -> Result<Vec<CombinedOrder>, ReservationError> {
        let rows = sqlx::query_as::<_, CombinedOrder>(&format!(
            r#"
            SELECT {COMBINED_COLUMNS}
            FROM combined_orders
            WHERE employee_id = $1 AND reservation_date >= $2
            ORDER BY reservation_date, reference_number
            "#
        ))
        .bind(employee_id)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Completed Expat reservations inside a UTC range, for the monthly
    /// deduction report.
    pub async fn list_completed_expat_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CombinedOrder>, ReservationError> {
        let rows = sqlx::query_as::<_, CombinedOrder>(&format!(
            r#"
            SELECT {COMBINED_COLUMNS}
            FROM combined_orders
            WHERE customer_type = 'Expat' AND status = 'Completed'
              AND reservation_date >= $1 AND reservation_date < $2
            ORDER BY last_name, first_name, reservation_date
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Flip every Pending reservation of one type inside the range to
    /// Completed, across both tables, in one transaction. Returns rows
    /// affected; repeat calls find nothing left to flip. The status
    /// predicate is [`StatusMachine::completes_on_sweep`] expressed in SQL.
    ///
    /// [`StatusMachine::completes_on_sweep`]: crate::reservations::status_machine::StatusMachine::completes_on_sweep
    pub async fn bulk_complete(
        &self,
        menu_type: MenuType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, ReservationError> {
        let mut tx = self.pool.begin().await?;

        let orders = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'Completed', updated_at = NOW()
            WHERE menu_type = $1 AND status = 'Pending'
              AND reservation_date >= $2 AND reservation_date < $3
            "#,
        )
        .bind(menu_type)
        .bind(start)
        .bind(end)
        .execute(&mut *tx)
        .await?;

        let advance = sqlx::query(
            r#"
            UPDATE advance_orders
            SET status = 'Completed', updated_at = NOW()
            WHERE menu_type = $1 AND status = 'Pending'
              AND reservation_date >= $2 AND reservation_date < $3
            "#,
        )
        .bind(menu_type)
        .bind(start)
        .bind(end)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(orders.rows_affected() + advance.rows_affected())
    }
}
