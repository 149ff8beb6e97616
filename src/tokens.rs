// Tokenized access to per-employee order summaries
//
// Confirmation links carry an opaque token instead of the employee id; the
// token resolves server-side and expires 24 hours after issue.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Validity window for summary links.
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("unknown access token")]
    Unknown,

    #[error("access token has expired")]
    Expired,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessToken {
    pub token: Uuid,
    pub employee_id: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Mint a fresh token for an employee, valid for 24 hours from `now`.
    pub fn issue(employee_id: &str, now: DateTime<Utc>) -> Self {
        AccessToken {
            token: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            expires_at: now + Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Absolute URL an employee follows from a confirmation message.
pub fn summary_link(base_url: &str, token: Uuid) -> String {
    format!("{}/api/orders/summary?token={}", base_url.trim_end_matches('/'), token)
}

#[derive(Clone)]
pub struct AccessTokenRepository {
    pool: PgPool,
}

impl AccessTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, token: &AccessToken) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO access_tokens (token, employee_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token.token)
        .bind(&token.employee_id)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find(&self, token: Uuid) -> Result<Option<AccessToken>, sqlx::Error> {
        sqlx::query_as::<_, AccessToken>(
            r#"
            SELECT token, employee_id, expires_at
            FROM access_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Clone)]
pub struct AccessTokenService {
    repository: AccessTokenRepository,
}

impl AccessTokenService {
    pub fn new(repository: AccessTokenRepository) -> Self {
        Self { repository }
    }

    /// Issue and persist a summary token for `employee_id`.
    pub async fn issue(
        &self,
        employee_id: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, TokenError> {
        let token = AccessToken::issue(employee_id, now);
        self.repository.insert(&token).await?;
        tracing::debug!(employee_id = %employee_id, "issued summary access token");
        Ok(token)
    }

    /// Resolve a token to its employee id, rejecting unknown or expired tokens.
    pub async fn resolve(&self, token: Uuid, now: DateTime<Utc>) -> Result<String, TokenError> {
        let found = self.repository.find(token).await?.ok_or(TokenError::Unknown)?;

        if !found.is_valid_at(now) {
            tracing::debug!(employee_id = %found.employee_id, "rejected expired access token");
            return Err(TokenError::Expired);
        }
        Ok(found.employee_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn token_is_valid_for_exactly_twenty_four_hours() {
        let issued = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        let token = AccessToken::issue("E12345", issued);

        assert!(token.is_valid_at(issued));
        assert!(token.is_valid_at(issued + Duration::hours(23)));
        // Expiry instant itself is no longer valid.
        assert!(!token.is_valid_at(issued + Duration::hours(24)));
        assert!(!token.is_valid_at(issued + Duration::days(2)));
    }

    #[test]
    fn issued_tokens_are_unique() {
        let now = Utc::now();
        let a = AccessToken::issue("E12345", now);
        let b = AccessToken::issue("E12345", now);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn summary_link_embeds_token_and_strips_trailing_slash() {
        let token = Uuid::new_v4();
        let link = summary_link("https://meals.example.com/", token);
        assert_eq!(
            link,
            format!("https://meals.example.com/api/orders/summary?token={}", token)
        );
    }
}
