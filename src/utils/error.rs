use crate::domain::model::ItemId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Requested quantity {requested} for item {item_id} exceeds stock ({available})")]
    StockExceeded {
        item_id: ItemId,
        requested: i64,
        available: i64,
    },

    #[error("Item {item_id} is not in the cart")]
    LineNotFound { item_id: ItemId },

    #[error("Inventory service unavailable for item {item_id}: {message}")]
    ServiceUnavailable { item_id: ItemId, message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl CartError {
    pub(crate) fn unavailable(item_id: ItemId, source: impl std::fmt::Display) -> Self {
        CartError::ServiceUnavailable {
            item_id,
            message: source.to_string(),
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            CartError::StockExceeded { .. } => 3,
            CartError::LineNotFound { .. } => 4,
            CartError::ServiceUnavailable { .. } | CartError::ApiError(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
