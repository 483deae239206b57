use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NO_RESPONSE_MESSAGE: &str = "No response from Printful API";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("{message} (upstream status {status})")]
    RemoteError {
        message: String,
        status: u16,
        details: serde_json::Value,
    },

    #[error("No response from Printful API: {reason}")]
    NoResponse { reason: String },

    #[error("An unexpected error occurred: {details}")]
    LocalFailure { details: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl RelayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// 呼叫端的錯誤回 400，其餘一律 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 轉換成回傳給呼叫端的錯誤格式
    pub fn to_body(&self) -> ErrorBody {
        match self {
            Self::ValidationError { message } => ErrorBody::new(message.clone()),
            Self::RemoteError {
                message, details, ..
            } => ErrorBody::with_details(message.clone(), details.clone()),
            Self::NoResponse { .. } => ErrorBody::new(NO_RESPONSE_MESSAGE),
            Self::LocalFailure { details } => ErrorBody::with_details(
                UNEXPECTED_ERROR_MESSAGE,
                serde_json::Value::String(details.clone()),
            ),
            other => ErrorBody::with_details(
                UNEXPECTED_ERROR_MESSAGE,
                serde_json::Value::String(other.to_string()),
            ),
        }
    }
}

/// Wire shape of every error response.
///
/// The message travels under the `error` key; `details` is left out entirely
/// when there is nothing to attach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "error")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(message: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            message: message.into(),
            details: Some(details),
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
