//! Error types for the shopping list.

use crate::subscriptions::SubscriptionId;
use crate::types::ItemId;
use thiserror::Error;

/// Main error type for list operations.
#[derive(Debug, Error)]
pub enum ListError {
    /// Request body is malformed, missing a required field, or has a field of the wrong type.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Path segment is not a non-negative integer.
    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Subscription closed: {0:?}")]
    SubscriptionClosed(SubscriptionId),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ListError {
    /// HTTP status code this error surfaces as.
    pub fn status_code(&self) -> u16 {
        match self {
            ListError::Validation(_) | ListError::InvalidId(_) => 400,
            ListError::NotFound(_) => 404,
            ListError::SubscriptionClosed(_)
            | ListError::Serialization(_)
            | ListError::Internal(_) => 500,
        }
    }

    /// True for errors whose detail must not reach the client.
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<serde_json::Error> for ListError {
    fn from(e: serde_json::Error) -> Self {
        ListError::Serialization(e.to_string())
    }
}

/// Result type for list operations.
pub type Result<T> = std::result::Result<T, ListError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ListError::Validation("name".into()).status_code(), 400);
        assert_eq!(ListError::InvalidId("abc".into()).status_code(), 400);
        assert_eq!(ListError::NotFound(ItemId(7)).status_code(), 404);
        assert_eq!(ListError::Internal("boom".into()).status_code(), 500);
        assert!(ListError::Serialization("bad".into()).is_internal());
        assert!(!ListError::NotFound(ItemId(1)).is_internal());
    }

    #[test]
    fn test_not_found_message() {
        let err = ListError::NotFound(ItemId(999));
        assert_eq!(err.to_string(), "Item not found: 999");
    }
}
