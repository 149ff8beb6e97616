// Order confirmation notifications
//
// Dispatch failures are logged and swallowed; an order that was persisted is
// never rolled back or failed because its confirmation could not be sent.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("recipient address missing")]
    MissingRecipient,

    #[error("dispatch failed: {0}")]
    Transport(String),
}

/// Everything a confirmation message needs, assembled by the caller.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub recipient: String,
    pub subject: String,
    pub reference_number: String,
    pub item: String,
    pub date: NaiveDate,
    pub meal_time: String,
    /// Tokenized link to the recipient's order summary.
    pub link: String,
}

/// Outbound notification channel. The engine only ever talks to this trait;
/// the concrete transport is wired up at startup.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, request: &NotificationRequest) -> Result<(), DispatchError>;
}

/// Default dispatcher: records the confirmation in the application log.
/// Stands in wherever no real mail transport is configured.
pub struct LoggingDispatcher;

#[async_trait]
impl NotificationDispatcher for LoggingDispatcher {
    async fn dispatch(&self, request: &NotificationRequest) -> Result<(), DispatchError> {
        if request.recipient.trim().is_empty() {
            return Err(DispatchError::MissingRecipient);
        }
        tracing::info!(
            recipient = %request.recipient,
            reference = %request.reference_number,
            item = %request.item,
            date = %request.date,
            meal_time = %request.meal_time,
            "order confirmation dispatched: {}",
            request.subject
        );
        Ok(())
    }
}

/// Fire-and-forget wrapper used by services after a successful write.
/// Failures are logged at warn level and never propagated.
pub async fn dispatch_best_effort(
    dispatcher: &dyn NotificationDispatcher,
    request: NotificationRequest,
) {
    if let Err(e) = dispatcher.dispatch(&request).await {
        tracing::warn!(
            recipient = %request.recipient,
            reference = %request.reference_number,
            "failed to send order confirmation: {}",
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(recipient: &str) -> NotificationRequest {
        NotificationRequest {
            recipient: recipient.to_string(),
            subject: "Order Confirmation".to_string(),
            reference_number: "ORD-20250610-A1B2C3".to_string(),
            item: "Chicken Bento".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            meal_time: "12:00".to_string(),
            link: "https://meals.example.com/summary?token=abc".to_string(),
        }
    }

    #[tokio::test]
    async fn logging_dispatcher_accepts_complete_request() {
        let dispatcher = LoggingDispatcher;
        assert!(dispatcher.dispatch(&request("emp@example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn logging_dispatcher_rejects_blank_recipient() {
        let dispatcher = LoggingDispatcher;
        let result = dispatcher.dispatch(&request("  ")).await;
        assert!(matches!(result, Err(DispatchError::MissingRecipient)));
    }

    #[tokio::test]
    async fn best_effort_dispatch_swallows_errors() {
        // Must not panic or propagate.
        dispatch_best_effort(&LoggingDispatcher, request("")).await;
    }
}
