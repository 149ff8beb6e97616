// Menu catalog data access

use crate::menus::models::{CreateMenuRequest, Menu, MenuType, UpdateMenuRequest, NO_MENU_PLACEHOLDER};
use chrono::NaiveDate;
use sqlx::PgPool;

#[derive(Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Items of one type sellable on exactly one date.
    pub async fn find_menus(
        &self,
        menu_type: MenuType,
        date: NaiveDate,
    ) -> Result<Vec<Menu>, sqlx::Error> {
        sqlx::query_as::<_, Menu>(
            r#"
            SELECT id, name, description, price, menu_type, available_date,
                   is_available, image_url, created_at, updated_at
            FROM menus
            WHERE menu_type = $1 AND available_date = $2 AND is_available = TRUE
            ORDER BY name
            "#,
        )
        .bind(menu_type)
        .bind(date)
        .fetch_all(&self.pool)
        .await
    }

    /// All available items in an inclusive date range, earliest first.
    pub async fn list_available(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Menu>, sqlx::Error> {
        sqlx::query_as::<_, Menu>(
            r#"
            SELECT id, name, description, price, menu_type, available_date,
                   is_available, image_url, created_at, updated_at
            FROM menus
            WHERE available_date >= $1 AND available_date <= $2 AND is_available = TRUE
            ORDER BY available_date ASC, name ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }

    /// Display name a reservation of (menu_type, date) should carry.
    /// Runs on creation and on every update; client-supplied names are
    /// never trusted. Falls back to the placeholder when no catalog item
    /// exists yet.
    pub async fn resolve_display_name(
        &self,
        menu_type: MenuType,
        date: NaiveDate,
    ) -> Result<String, sqlx::Error> {
        let name: Option<String> = sqlx::query_scalar(
            r#"
            SELECT name FROM menus
            WHERE menu_type = $1 AND available_date = $2 AND is_available = TRUE
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(menu_type)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(name.unwrap_or_else(|| NO_MENU_PLACEHOLDER.to_string()))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Menu>, sqlx::Error> {
        sqlx::query_as::<_, Menu>(
            r#"
            SELECT id, name, description, price, menu_type, available_date,
                   is_available, image_url, created_at, updated_at
            FROM menus
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create(&self, request: &CreateMenuRequest) -> Result<Menu, sqlx::Error> {
        sqlx::query_as::<_, Menu>(
            r#"
            INSERT INTO menus (name, description, price, menu_type, available_date,
                               is_available, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, price, menu_type, available_date,
                      is_available, image_url, created_at, updated_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.menu_type)
        .bind(request.available_date)
        .bind(request.is_available)
        .bind(&request.image_url)
        .fetch_one(&self.pool)
        .await
    }

    /// Insert the parsed rows of an uploaded menu sheet in one transaction;
    /// either the whole sheet lands or none of it does.
    pub async fn create_batch(
        &self,
        requests: &[CreateMenuRequest],
    ) -> Result<Vec<Menu>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(requests.len());

        for request in requests {
            let menu = sqlx::query_as::<_, Menu>(
                r#"
                INSERT INTO menus (name, description, price, menu_type, available_date,
                                   is_available, image_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, name, description, price, menu_type, available_date,
                          is_available, image_url, created_at, updated_at
                "#,
            )
            .bind(&request.name)
            .bind(&request.description)
            .bind(request.price)
            .bind(request.menu_type)
            .bind(request.available_date)
            .bind(request.is_available)
            .bind(&request.image_url)
            .fetch_one(&mut *tx)
            .await?;
            created.push(menu);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i32,
        request: &UpdateMenuRequest,
    ) -> Result<Option<Menu>, sqlx::Error> {
        sqlx::query_as::<_, Menu>(
            r#"
            UPDATE menus
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                menu_type = COALESCE($5, menu_type),
                available_date = COALESCE($6, available_date),
                is_available = COALESCE($7, is_available),
                image_url = COALESCE($8, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, price, menu_type, available_date,
                      is_available, image_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.menu_type)
        .bind(request.available_date)
        .bind(request.is_available)
        .bind(&request.image_url)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
