use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Order not found")]
    NotFound,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// First constraint an aggregate violates. `field` is a dotted path such as
/// `delivery.phone` or `items[2].rid`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
